//! The plain-shape codec of a type.
//!
//! A [`DelegateCodec`] knows how to turn a value into a JSON tree and back
//! using only the type's declared shape, ignoring every binding annotation.
//! Model codecs run it first and overlay their bindings on the result.

use alloc::boxed::Box;

use serde_core::{Deserialize, Deserializer, Serialize, Serializer};
use serde_core::ser::SerializeMap;
use serde_json::Value;

use crate::Reflect;
use crate::info::Typed;

// -----------------------------------------------------------------------------
// DelegateCodec

/// Type-erased `serde` functions of one concrete type.
///
/// Internally stores function pointers monomorphized for the type. Passing a
/// value of another type to [`to_tree`](Self::to_tree) reports an error
/// instead of serializing.
///
/// # Examples
///
/// ```
/// use jb_bind::delegate::DelegateCodec;
///
/// let codec = DelegateCodec::serde::<u32>();
/// let tree = codec.to_tree(&7_u32).unwrap();
/// assert_eq!(tree, serde_json::json!(7));
///
/// let back = codec.from_tree(tree).unwrap();
/// assert_eq!(back.take::<u32>().unwrap(), 7);
/// ```
#[derive(Clone, Copy)]
pub struct DelegateCodec {
    serialize: fn(value: &dyn Reflect) -> Option<&dyn erased_serde::Serialize>,
    deserialize: fn(
        deserializer: &mut dyn erased_serde::Deserializer,
    ) -> Result<Box<dyn Reflect>, erased_serde::Error>,
}

impl DelegateCodec {
    /// Uses the type's own `serde` implementations.
    pub fn serde<T>() -> Self
    where
        T: Typed + Send + Sync + Serialize + for<'de> Deserialize<'de>,
    {
        Self {
            serialize: |value| {
                value
                    .downcast_ref::<T>()
                    .map(|val| val as &dyn erased_serde::Serialize)
            },
            deserialize: |deserializer| Ok(Box::new(T::deserialize(deserializer)?)),
        }
    }

    /// Encodes every value as `{}` and decodes by calling [`Default::default`].
    ///
    /// For types whose members are all carried by bindings.
    pub fn skeleton<T>() -> Self
    where
        T: Typed + Send + Sync + Default,
    {
        Self {
            serialize: |value| {
                value
                    .is::<T>()
                    .then_some(&EmptyObject as &dyn erased_serde::Serialize)
            },
            deserialize: |_| Ok(Box::new(T::default())),
        }
    }

    /// Encodes `value` into a tree.
    pub fn to_tree(&self, value: &dyn Reflect) -> Result<Value, serde_json::Error> {
        match (self.serialize)(value) {
            Some(erased) => serde_json::to_value(erased),
            None => Err(<serde_json::Error as serde_core::ser::Error>::custom(
                format_args!(
                    "delegate codec received a `{}`",
                    value.reflect_type_info().type_path()
                ),
            )),
        }
    }

    /// Decodes a tree into a new boxed value.
    pub fn from_tree(&self, tree: Value) -> Result<Box<dyn Reflect>, serde_json::Error> {
        self.deserialize(tree)
    }

    /// Serializes `value` with any `serde` serializer.
    pub fn serialize<S: Serializer>(
        &self,
        value: &dyn Reflect,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match (self.serialize)(value) {
            Some(erased) => erased.serialize(serializer),
            None => Err(<S::Error as serde_core::ser::Error>::custom(
                "delegate codec received a value of another type",
            )),
        }
    }

    /// Deserializes a value with any `serde` deserializer.
    #[inline]
    pub fn deserialize<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Box<dyn Reflect>, D::Error> {
        let mut erased = <dyn erased_serde::Deserializer>::erase(deserializer);
        (self.deserialize)(&mut erased).map_err(<D::Error as serde_core::de::Error>::custom)
    }
}

impl core::fmt::Debug for DelegateCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("DelegateCodec")
    }
}

struct EmptyObject;

impl Serialize for EmptyObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_map(Some(0))?.end()
    }
}
