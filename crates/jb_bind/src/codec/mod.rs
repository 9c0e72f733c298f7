//! Codec construction and the model registry.
//!
//! A [`CodecFactory`] owns the models of every managed type it has seen.
//! [`CodecFactory::try_create`] returns a [`Codec`] for managed types and
//! `None` for everything the plain delegate handles.
//!
//! ```
//! use jb_bind::codec::CodecFactory;
//! use jb_bind::derive::Bind;
//! use serde_json::json;
//!
//! #[derive(Bind, Default)]
//! #[bind(skeleton)]
//! struct Point {
//!     pub x: i32,
//!     #[bind(rename = "vertical")]
//!     pub y: i32,
//! }
//!
//! let factory = CodecFactory::new();
//! let tree = factory.to_value(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(tree, json!({"x": 1, "vertical": 2}));
//!
//! let point: Point = factory.from_value(json!({"x": 3, "vertical": 4})).unwrap();
//! assert_eq!((point.x, point.y), (3, 4));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod factory;
mod json;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Exports

pub use factory::CodecFactory;
pub use json::Json;

use alloc::boxed::Box;
use alloc::sync::Arc;

use serde_core::de::{Deserialize, Deserializer, Error as _};
use serde_json::Value;

use crate::Reflect;
use crate::error::{DecodeError, EncodeError};
use crate::info::TypeInfo;
use crate::model::ClassModel;

// -----------------------------------------------------------------------------
// Codec

/// The model codec of one managed type.
///
/// Cheap to clone. Holds its factory so nested values resolve their own
/// converters.
#[derive(Clone)]
pub struct Codec {
    model: Arc<ClassModel>,
    factory: CodecFactory,
}

impl Codec {
    #[inline]
    pub(crate) fn new(model: Arc<ClassModel>, factory: CodecFactory) -> Self {
        Self { model, factory }
    }

    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.model.info()
    }

    #[inline]
    pub fn model(&self) -> &ClassModel {
        &self.model
    }

    #[inline]
    pub fn factory(&self) -> &CodecFactory {
        &self.factory
    }

    /// Delegate shape, then out-bindings, then the any-getter.
    pub fn to_tree(&self, value: &dyn Reflect) -> Result<Value, EncodeError> {
        self.model.encode(&self.factory, value)
    }

    /// Delegate skeleton, then in-bindings, then the any-setter.
    pub fn from_tree(&self, node: Value) -> Result<Box<dyn Reflect>, DecodeError> {
        self.model.decode(&self.factory, node)
    }

    /// Reads a tree from any `serde` deserializer and decodes it.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        &self,
        deserializer: D,
    ) -> Result<Box<dyn Reflect>, D::Error> {
        let node = Value::deserialize(deserializer)?;
        self.from_tree(node).map_err(D::Error::custom)
    }
}

impl core::fmt::Debug for Codec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Codec").field(&self.model).finish()
    }
}
