use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use std::sync::{OnceLock, PoisonError, RwLock};

use jb_utils::TypeIdMap;
use serde_json::Value;

use crate::Reflect;
use crate::codec::{Codec, Json};
use crate::convert::TreeConverter;
use crate::error::{ConfigError, DecodeError, EncodeError};
use crate::info::{TypeInfo, Typed};
use crate::model::{self, ClassModel, is_managed};

// -----------------------------------------------------------------------------
// ModelRegistry

type ModelEntry = Result<Arc<ClassModel>, ConfigError>;

#[derive(Default)]
struct ModelRegistry {
    models: RwLock<TypeIdMap<ModelEntry>>,
}

// -----------------------------------------------------------------------------
// CodecFactory

/// Creates codecs and caches the model of every managed type.
///
/// Clones share one registry. Models are built lazily on first use and never
/// rebuilt. A type whose declarations are invalid keeps failing with the
/// same [`ConfigError`].
///
/// # Examples
///
/// ```
/// use jb_bind::codec::CodecFactory;
/// use jb_bind::info::Typed;
///
/// let factory = CodecFactory::new();
///
/// // Containers and leaves are left to their plain conversion.
/// assert!(factory.try_create(<Vec<u8> as Typed>::type_info()).unwrap().is_none());
///
/// let text = factory.to_string(&vec![Some(1_u8), None]).unwrap();
/// assert_eq!(text, "[1,null]");
/// ```
#[derive(Clone, Default)]
pub struct CodecFactory {
    registry: Arc<ModelRegistry>,
}

impl CodecFactory {
    /// Creates a factory with an empty registry.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide factory.
    pub fn global() -> &'static CodecFactory {
        static GLOBAL: OnceLock<CodecFactory> = OnceLock::new();
        GLOBAL.get_or_init(CodecFactory::new)
    }

    /// Returns the codec of a managed type, `None` for any other type.
    pub fn try_create(&self, info: &'static TypeInfo) -> Result<Option<Codec>, ConfigError> {
        if !is_managed(info) {
            return Ok(None);
        }
        let model = self.model(info)?;
        Ok(Some(Codec::new(model, self.clone())))
    }

    /// Shortcut for [`try_create`](Self::try_create) with `T`'s info.
    #[inline]
    pub fn codec<T: ?Sized + Typed>(&self) -> Result<Option<Codec>, ConfigError> {
        self.try_create(T::type_info())
    }

    /// Returns the model of `info`, building it on first use.
    ///
    /// Concurrent first uses may each build a model; only the first one
    /// inserted is kept and returned to every caller.
    pub fn model(&self, info: &'static TypeInfo) -> Result<Arc<ClassModel>, ConfigError> {
        let ty_id = info.ty_id();
        if let Some(entry) = self
            .registry
            .models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&ty_id)
        {
            return entry.clone();
        }

        // Built outside the lock: building never touches the registry.
        let built = model::build(info).map(Arc::new);

        let mut models = self
            .registry
            .models
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = models.get(&ty_id) {
            log::debug!(
                "discarding concurrently built model of `{}`",
                info.type_path()
            );
            return entry.clone();
        }
        match &built {
            Ok(model) => log::debug!("built model of `{}`: {model:?}", info.type_path()),
            Err(err) => log::warn!("invalid binding declarations: {err}"),
        }
        models.insert(ty_id, built.clone());
        built
    }

    /// Number of models (and memoized failures) in the registry.
    pub fn model_count(&self) -> usize {
        self.registry
            .models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Resolves the converter for values of `info`.
    pub(crate) fn converter(&self, info: &'static TypeInfo) -> Result<TreeConverter, ConfigError> {
        if is_managed(info) {
            let model = self.model(info)?;
            return Ok(TreeConverter::Managed {
                info,
                model: Arc::downgrade(&model),
            });
        }
        if let Some(ops) = info.container() {
            return Ok(TreeConverter::Container { info, ops: *ops });
        }
        match info.delegate() {
            Some(delegate) => Ok(TreeConverter::Plain {
                info,
                delegate: *delegate,
            }),
            None => Err(ConfigError::Unsupported {
                type_path: info.type_path(),
            }),
        }
    }

    // -------------------------------------------------------------------------
    // Conversion

    /// Encodes `value` according to its runtime type.
    pub fn encode(&self, value: &dyn Reflect) -> Result<Value, EncodeError> {
        self.converter(value.reflect_type_info())?.to_tree(self, value)
    }

    /// Decodes `node` as the type described by `info`.
    pub fn decode(
        &self,
        info: &'static TypeInfo,
        node: Value,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        self.converter(info)?.from_tree(self, node)
    }

    /// Encodes `value` into a tree.
    #[inline]
    pub fn to_value<T: Reflect>(&self, value: &T) -> Result<Value, EncodeError> {
        self.encode(value)
    }

    /// Decodes a tree into a `T`.
    pub fn from_value<T: Typed>(&self, node: Value) -> Result<T, DecodeError> {
        let info = T::type_info();
        self.decode(info, node)?
            .take::<T>()
            .map_err(|value| DecodeError::Mismatch {
                expected: info.type_path(),
                found: value.reflect_type_info().type_path(),
            })
    }

    /// Encodes `value` into JSON text.
    pub fn to_string(&self, value: &dyn Reflect) -> Result<String, EncodeError> {
        let tree = self.encode(value)?;
        serde_json::to_string(&tree).map_err(EncodeError::Write)
    }

    /// Decodes JSON text into a `T`.
    pub fn from_str<T: Typed>(&self, text: &str) -> Result<T, DecodeError> {
        let tree: Value = serde_json::from_str(text)?;
        self.from_value(tree)
    }

    /// Wraps `value` for use with any `serde` serializer.
    #[inline]
    pub fn json<'a>(&'a self, value: &'a dyn Reflect) -> Json<'a> {
        Json::new(self, value)
    }

    // -------------------------------------------------------------------------
    // Registration

    /// Builds the models of every type marked `#[bind(auto_register)]`.
    ///
    /// Surfaces invalid declarations at startup instead of on first use.
    /// Returns the number of types visited.
    ///
    /// ```
    /// use jb_bind::codec::CodecFactory;
    /// use jb_bind::derive::Bind;
    ///
    /// #[derive(Bind, Default)]
    /// #[bind(skeleton, auto_register)]
    /// struct Config {
    ///     pub name: String,
    /// }
    ///
    /// let factory = CodecFactory::new();
    /// assert!(factory.auto_register().unwrap() >= 1);
    /// ```
    #[cfg(feature = "auto_register")]
    pub fn auto_register(&self) -> Result<usize, ConfigError> {
        use crate::__macro_exports::auto_register::AutoRegistration;

        let mut count = 0;
        for registration in inventory::iter::<AutoRegistration> {
            let info = (registration.0)();
            if is_managed(info) {
                self.model(info)?;
            }
            count += 1;
        }
        Ok(count)
    }
}

impl core::fmt::Debug for CodecFactory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CodecFactory")
            .field("models", &self.model_count())
            .finish()
    }
}
