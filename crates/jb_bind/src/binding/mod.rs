//! Bindings between members and wire properties.
//!
//! Each binding moves one value between an instance and a JSON object node.
//! A field binding serves both directions. Getters only encode and setters
//! only decode.

// -----------------------------------------------------------------------------
// Modules

mod any;
mod field;
mod method;

// -----------------------------------------------------------------------------
// Exports

pub use any::{AnyGetterBinding, AnySetterBinding};
pub use field::FieldBinding;
pub use method::{GetterBinding, SetterBinding};

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;

use serde_json::{Map, Value};

use crate::Reflect;
use crate::codec::CodecFactory;
use crate::convert::ValueConverterCache;
use crate::error::{AccessError, DecodeError, EncodeError};
use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// BindingKind

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Field,
    MethodGetter,
    MethodSetter,
    AnyGetter,
    AnySetter,
}

// -----------------------------------------------------------------------------
// OutBinding

/// A binding that writes a property while encoding.
pub enum OutBinding {
    Field(Arc<FieldBinding>),
    Getter(GetterBinding),
}

impl OutBinding {
    pub fn kind(&self) -> BindingKind {
        match self {
            OutBinding::Field(_) => BindingKind::Field,
            OutBinding::Getter(_) => BindingKind::MethodGetter,
        }
    }

    /// Wire name.
    pub fn name(&self) -> &str {
        match self {
            OutBinding::Field(binding) => binding.name(),
            OutBinding::Getter(binding) => binding.name(),
        }
    }

    /// `type_path.member` of the declaring member.
    pub fn qualified_name(&self) -> &str {
        match self {
            OutBinding::Field(binding) => binding.qualified_name(),
            OutBinding::Getter(binding) => binding.qualified_name(),
        }
    }

    pub fn converter(&self) -> &ValueConverterCache {
        match self {
            OutBinding::Field(binding) => binding.converter(),
            OutBinding::Getter(binding) => binding.converter(),
        }
    }

    pub(crate) fn write(
        &self,
        factory: &CodecFactory,
        value: &dyn Reflect,
        object: &mut Map<String, Value>,
    ) -> Result<(), EncodeError> {
        match self {
            OutBinding::Field(binding) => binding.write(factory, value, object),
            OutBinding::Getter(binding) => binding.write(factory, value, object),
        }
    }
}

// -----------------------------------------------------------------------------
// InBinding

/// A binding that reads a property while decoding.
pub enum InBinding {
    Field(Arc<FieldBinding>),
    Setter(SetterBinding),
}

impl InBinding {
    pub fn kind(&self) -> BindingKind {
        match self {
            InBinding::Field(_) => BindingKind::Field,
            InBinding::Setter(_) => BindingKind::MethodSetter,
        }
    }

    /// Wire name.
    pub fn name(&self) -> &str {
        match self {
            InBinding::Field(binding) => binding.name(),
            InBinding::Setter(binding) => binding.name(),
        }
    }

    /// `type_path.member` of the declaring member.
    pub fn qualified_name(&self) -> &str {
        match self {
            InBinding::Field(binding) => binding.qualified_name(),
            InBinding::Setter(binding) => binding.qualified_name(),
        }
    }

    pub fn converter(&self) -> &ValueConverterCache {
        match self {
            InBinding::Field(binding) => binding.converter(),
            InBinding::Setter(binding) => binding.converter(),
        }
    }

    pub(crate) fn read(
        &self,
        factory: &CodecFactory,
        instance: &mut dyn Reflect,
        node: Value,
    ) -> Result<(), DecodeError> {
        match self {
            InBinding::Field(binding) => binding.read(factory, instance, node),
            InBinding::Setter(binding) => binding.read(factory, instance, node),
        }
    }
}

// -----------------------------------------------------------------------------
// Helpers

/// `type_path.member`
#[inline]
pub(crate) fn qualify(owner: &TypeInfo, member: &str) -> String {
    alloc::format!("{}.{}", owner.type_path(), member)
}

#[inline]
fn encode_failed(qualified: &str, source: EncodeError) -> EncodeError {
    EncodeError::Binding {
        binding: String::from(qualified),
        source: Box::new(source),
    }
}

#[inline]
fn decode_failed(qualified: &str, source: DecodeError) -> DecodeError {
    DecodeError::Binding {
        binding: String::from(qualified),
        source: Box::new(source),
    }
}

#[inline]
fn read_failed(qualified: &str, source: AccessError) -> EncodeError {
    EncodeError::Access {
        member: String::from(qualified),
        source,
    }
}

#[inline]
fn write_failed(qualified: &str, source: AccessError) -> DecodeError {
    DecodeError::Access {
        member: String::from(qualified),
        source,
    }
}
