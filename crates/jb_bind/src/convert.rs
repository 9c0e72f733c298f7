//! Value conversion between reflected values and JSON trees.
//!
//! A [`ValueConverterCache`] sits in every binding. Encoding resolves a
//! [`TreeConverter`] for the runtime type of the value and keeps the last one
//! in a single slot. Decoding always converts to the declared type.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::any::TypeId;
use std::sync::{OnceLock, PoisonError, RwLock};

use serde_json::{Map, Value};

use crate::Reflect;
use crate::codec::CodecFactory;
use crate::delegate::DelegateCodec;
use crate::error::{AccessError, ConfigError, DecodeError, EncodeError};
use crate::info::{ContainerOps, MapOps, OptionalOps, SequenceOps, TypeInfo};
use crate::model::ClassModel;

// -----------------------------------------------------------------------------
// TreeConverter

/// Converts values of one type.
#[derive(Clone)]
pub(crate) enum TreeConverter {
    /// Unmanaged leaf, handled by the delegate alone.
    Plain {
        info: &'static TypeInfo,
        delegate: DelegateCodec,
    },
    /// Managed type. Weak so models of recursive types do not keep each
    /// other alive.
    Managed {
        info: &'static TypeInfo,
        model: Weak<ClassModel>,
    },
    /// Container converted element by element.
    Container {
        info: &'static TypeInfo,
        ops: ContainerOps,
    },
}

impl TreeConverter {
    #[inline]
    pub(crate) fn info(&self) -> &'static TypeInfo {
        match self {
            TreeConverter::Plain { info, .. }
            | TreeConverter::Managed { info, .. }
            | TreeConverter::Container { info, .. } => info,
        }
    }

    /// `false` once the model behind a managed converter was dropped.
    #[inline]
    pub(crate) fn is_live(&self) -> bool {
        match self {
            TreeConverter::Managed { model, .. } => model.strong_count() > 0,
            _ => true,
        }
    }

    pub(crate) fn to_tree(
        &self,
        factory: &CodecFactory,
        value: &dyn Reflect,
    ) -> Result<Value, EncodeError> {
        match self {
            TreeConverter::Plain { info, delegate } => {
                delegate
                    .to_tree(value)
                    .map_err(|source| EncodeError::Delegate {
                        type_path: info.type_path(),
                        source,
                    })
            }
            TreeConverter::Managed { info, model } => {
                upgrade(factory, info, model)?.encode(factory, value)
            }
            TreeConverter::Container { info, ops } => match ops {
                ContainerOps::Sequence(ops) => encode_sequence(factory, info, ops, value),
                ContainerOps::Optional(ops) => encode_optional(factory, info, ops, value),
                ContainerOps::Map(ops) => encode_map(factory, info, ops, value),
            },
        }
    }

    pub(crate) fn from_tree(
        &self,
        factory: &CodecFactory,
        node: Value,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        match self {
            TreeConverter::Plain { info, delegate } => {
                delegate
                    .from_tree(node)
                    .map_err(|source| DecodeError::Delegate {
                        type_path: info.type_path(),
                        source,
                    })
            }
            TreeConverter::Managed { info, model } => {
                upgrade(factory, info, model)?.decode(factory, node)
            }
            TreeConverter::Container { info, ops } => match ops {
                ContainerOps::Sequence(ops) => decode_sequence(factory, info, ops, node),
                ContainerOps::Optional(ops) => decode_optional(factory, info, ops, node),
                ContainerOps::Map(ops) => decode_map(factory, info, ops, node),
            },
        }
    }
}

fn upgrade(
    factory: &CodecFactory,
    info: &'static TypeInfo,
    model: &Weak<ClassModel>,
) -> Result<Arc<ClassModel>, ConfigError> {
    match model.upgrade() {
        Some(model) => Ok(model),
        None => factory.model(info),
    }
}

// -----------------------------------------------------------------------------
// Containers

fn not_this(info: &'static TypeInfo, value: &dyn Reflect) -> EncodeError {
    EncodeError::Access {
        member: String::from(info.type_path()),
        source: AccessError::Value {
            expected: info.type_path(),
            found: value.reflect_type_info().type_path(),
        },
    }
}

fn element_encode(info: &'static TypeInfo, at: String, source: EncodeError) -> EncodeError {
    EncodeError::Element {
        type_path: info.type_path(),
        at,
        source: Box::new(source),
    }
}

fn element_decode(info: &'static TypeInfo, at: String, source: DecodeError) -> DecodeError {
    DecodeError::Element {
        type_path: info.type_path(),
        at,
        source: Box::new(source),
    }
}

fn collect_error(info: &'static TypeInfo, source: AccessError) -> DecodeError {
    DecodeError::Access {
        member: String::from(info.type_path()),
        source,
    }
}

fn shape_error(info: &'static TypeInfo, expected: &'static str, node: &Value) -> DecodeError {
    DecodeError::Shape {
        type_path: info.type_path(),
        expected,
        found: DecodeError::node_kind(node),
    }
}

fn encode_sequence(
    factory: &CodecFactory,
    info: &'static TypeInfo,
    ops: &SequenceOps,
    value: &dyn Reflect,
) -> Result<Value, EncodeError> {
    let items = (ops.items)(value).ok_or_else(|| not_this(info, value))?;
    let mut array = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let node = factory
            .encode(item)
            .map_err(|err| element_encode(info, index.to_string(), err))?;
        array.push(node);
    }
    Ok(Value::Array(array))
}

fn encode_optional(
    factory: &CodecFactory,
    info: &'static TypeInfo,
    ops: &OptionalOps,
    value: &dyn Reflect,
) -> Result<Value, EncodeError> {
    match (ops.get)(value).ok_or_else(|| not_this(info, value))? {
        Some(inner) => factory.encode(inner),
        None => Ok(Value::Null),
    }
}

fn encode_map(
    factory: &CodecFactory,
    info: &'static TypeInfo,
    ops: &MapOps,
    value: &dyn Reflect,
) -> Result<Value, EncodeError> {
    let entries = (ops.entries)(value).ok_or_else(|| not_this(info, value))?;
    let mut object = Map::with_capacity(entries.len());
    for (key, item) in entries {
        let node = factory
            .encode(item)
            .map_err(|err| element_encode(info, String::from(key), err))?;
        object.insert(String::from(key), node);
    }
    Ok(Value::Object(object))
}

fn decode_sequence(
    factory: &CodecFactory,
    info: &'static TypeInfo,
    ops: &SequenceOps,
    node: Value,
) -> Result<Box<dyn Reflect>, DecodeError> {
    let Value::Array(nodes) = node else {
        return Err(shape_error(info, "array", &node));
    };
    let item = (ops.item)();
    let mut items = Vec::with_capacity(nodes.len());
    for (index, node) in nodes.into_iter().enumerate() {
        let value = factory
            .decode(item, node)
            .map_err(|err| element_decode(info, index.to_string(), err))?;
        items.push(value);
    }
    (ops.collect)(items).map_err(|err| collect_error(info, err))
}

fn decode_optional(
    factory: &CodecFactory,
    info: &'static TypeInfo,
    ops: &OptionalOps,
    node: Value,
) -> Result<Box<dyn Reflect>, DecodeError> {
    let inner = match node {
        Value::Null => None,
        node => Some(factory.decode((ops.item)(), node)?),
    };
    (ops.wrap)(inner).map_err(|err| collect_error(info, err))
}

fn decode_map(
    factory: &CodecFactory,
    info: &'static TypeInfo,
    ops: &MapOps,
    node: Value,
) -> Result<Box<dyn Reflect>, DecodeError> {
    let Value::Object(nodes) = node else {
        return Err(shape_error(info, "object", &node));
    };
    let item = (ops.value)();
    let mut entries = Vec::with_capacity(nodes.len());
    for (key, node) in nodes {
        match factory.decode(item, node) {
            Ok(value) => entries.push((key, value)),
            Err(err) => return Err(element_decode(info, key, err)),
        }
    }
    (ops.collect)(entries).map_err(|err| collect_error(info, err))
}

// -----------------------------------------------------------------------------
// ValueConverterCache

/// Per-binding converter cache.
///
/// The encode slot is keyed by the runtime type last seen, so a binding
/// declared with a base type encodes derived values with their own model.
/// Decoding is keyed by the declared type only.
pub struct ValueConverterCache {
    declared: fn() -> &'static TypeInfo,
    slot: RwLock<Option<(TypeId, TreeConverter)>>,
    decoder: OnceLock<TreeConverter>,
}

impl ValueConverterCache {
    pub(crate) fn new(declared: fn() -> &'static TypeInfo) -> Self {
        Self {
            declared,
            slot: RwLock::new(None),
            decoder: OnceLock::new(),
        }
    }

    /// The declared value type.
    #[inline]
    pub fn declared(&self) -> &'static TypeInfo {
        (self.declared)()
    }

    /// Encodes `value` with the converter of its runtime type.
    pub(crate) fn to_tree(
        &self,
        factory: &CodecFactory,
        value: &dyn Reflect,
    ) -> Result<Value, EncodeError> {
        let info = value.reflect_type_info();
        let cached = self
            .slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|(ty_id, converter)| *ty_id == info.ty_id() && converter.is_live())
            .map(|(_, converter)| converter.clone());

        let converter = match cached {
            Some(converter) => converter,
            None => {
                let converter = factory.converter(info)?;
                log::trace!(
                    "converter slot for `{}` now holds `{}`",
                    self.declared().type_path(),
                    info.type_path(),
                );
                *self.slot.write().unwrap_or_else(PoisonError::into_inner) =
                    Some((info.ty_id(), converter.clone()));
                converter
            }
        };
        converter.to_tree(factory, value)
    }

    /// Decodes `node` as the declared type.
    pub(crate) fn from_tree(
        &self,
        factory: &CodecFactory,
        node: Value,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        let converter = match self.decoder.get() {
            Some(converter) if converter.is_live() => converter.clone(),
            _ => {
                let converter = factory.converter(self.declared())?;
                let _ = self.decoder.set(converter.clone());
                converter
            }
        };
        converter.from_tree(factory, node)
    }

    /// Runtime type currently held by the encode slot.
    pub fn cached_type(&self) -> Option<&'static TypeInfo> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, converter)| converter.info())
    }
}

impl core::fmt::Debug for ValueConverterCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ValueConverterCache")
            .field("declared", &self.declared().type_path())
            .field("cached", &self.cached_type().map(TypeInfo::type_path))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use serde_json::json;

    use super::ValueConverterCache;
    use crate::codec::CodecFactory;
    use crate::info::Typed;
    use crate::value::Untyped;

    #[test]
    fn slot_follows_runtime_type() {
        let factory = CodecFactory::new();
        let cache = ValueConverterCache::new(<Untyped as Typed>::type_info);
        assert!(cache.cached_type().is_none());

        assert_eq!(cache.to_tree(&factory, &3_i32).unwrap(), json!(3));
        assert!(cache.cached_type().unwrap().type_is::<i32>());

        let text = String::from("x");
        assert_eq!(cache.to_tree(&factory, &text).unwrap(), json!("x"));
        assert!(cache.cached_type().unwrap().type_is::<String>());
    }

    #[test]
    fn decode_uses_declared_type() {
        let factory = CodecFactory::new();
        let cache = ValueConverterCache::new(<Vec<Option<i64>> as Typed>::type_info);

        let value = cache.from_tree(&factory, json!([1, null, 3])).unwrap();
        assert_eq!(
            value.take::<Vec<Option<i64>>>().unwrap(),
            vec![Some(1), None, Some(3)]
        );

        let err = cache.from_tree(&factory, json!({"a": 1})).unwrap_err();
        assert!(err.to_string().contains("expected a JSON array"));

        let err = cache.from_tree(&factory, json!([1, "two"])).unwrap_err();
        assert!(err.to_string().contains("element `1`"));
    }
}
