use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::Reflect;
use crate::binding::{AnyGetterBinding, AnySetterBinding, InBinding, OutBinding};
use crate::codec::CodecFactory;
use crate::error::{DecodeError, EncodeError};
use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Slot

/// An entry of a binding map.
pub enum Slot<B> {
    Live(B),
    /// Explicitly unbound. Suppresses any inherited binding of the name.
    Tombstone,
}

impl<B> Slot<B> {
    #[inline]
    pub fn live(&self) -> Option<&B> {
        match self {
            Slot::Live(binding) => Some(binding),
            Slot::Tombstone => None,
        }
    }

    #[inline]
    pub fn is_tombstone(&self) -> bool {
        matches!(self, Slot::Tombstone)
    }
}

// -----------------------------------------------------------------------------
// ClassModel

/// The merged bindings of one managed type.
///
/// Built once per type and cached by a [`CodecFactory`]. Binding maps keep
/// the order in which names were first declared, most general type first.
pub struct ClassModel {
    pub(crate) info: &'static TypeInfo,
    pub(crate) out_bindings: IndexMap<String, Slot<OutBinding>>,
    pub(crate) in_bindings: IndexMap<String, Slot<InBinding>>,
    pub(crate) any_getter: Option<AnyGetterBinding>,
    pub(crate) any_setter: Option<AnySetterBinding>,
    pub(crate) hidden_out: Vec<&'static str>,
    pub(crate) hidden_in: Vec<&'static str>,
}

impl ClassModel {
    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    /// Encode-direction entry for a wire name.
    #[inline]
    pub fn out_binding(&self, name: &str) -> Option<&Slot<OutBinding>> {
        self.out_bindings.get(name)
    }

    /// Decode-direction entry for a wire name.
    #[inline]
    pub fn in_binding(&self, name: &str) -> Option<&Slot<InBinding>> {
        self.in_bindings.get(name)
    }

    /// Encode-direction names, live and tombstoned, in declaration order.
    pub fn out_names(&self) -> impl Iterator<Item = &str> {
        self.out_bindings.keys().map(String::as_str)
    }

    /// Decode-direction names, live and tombstoned, in declaration order.
    pub fn in_names(&self) -> impl Iterator<Item = &str> {
        self.in_bindings.keys().map(String::as_str)
    }

    #[inline]
    pub fn any_getter(&self) -> Option<&AnyGetterBinding> {
        self.any_getter.as_ref()
    }

    #[inline]
    pub fn any_setter(&self) -> Option<&AnySetterBinding> {
        self.any_setter.as_ref()
    }

    /// Raw delegate keys removed before overlaying bindings when encoding.
    #[inline]
    pub fn hidden_out(&self) -> &[&'static str] {
        &self.hidden_out
    }

    /// Raw keys removed from the input handed to the delegate when decoding.
    #[inline]
    pub fn hidden_in(&self) -> &[&'static str] {
        &self.hidden_in
    }

    /// `true` if the model changes nothing about the delegate's output.
    pub fn is_empty(&self) -> bool {
        self.out_bindings.is_empty()
            && self.in_bindings.is_empty()
            && self.any_getter.is_none()
            && self.any_setter.is_none()
            && self.hidden_out.is_empty()
            && self.hidden_in.is_empty()
    }

    /// Encodes `value`: delegate shape, then named bindings, then the
    /// any-getter.
    pub fn encode(
        &self,
        factory: &CodecFactory,
        value: &dyn Reflect,
    ) -> Result<Value, EncodeError> {
        let tree = match self.info.delegate() {
            Some(delegate) => delegate
                .to_tree(value)
                .map_err(|source| EncodeError::Delegate {
                    type_path: self.info.type_path(),
                    source,
                })?,
            None => Value::Object(Map::new()),
        };
        let mut object = match tree {
            Value::Object(object) => object,
            other if self.is_empty() => return Ok(other),
            _ => {
                return Err(EncodeError::NotAnObject {
                    type_path: self.info.type_path(),
                });
            }
        };

        for raw in &self.hidden_out {
            object.shift_remove(*raw);
        }
        for (name, slot) in &self.out_bindings {
            match slot {
                Slot::Live(binding) => binding.write(factory, value, &mut object)?,
                Slot::Tombstone => {
                    object.shift_remove(name);
                }
            }
        }
        if let Some(any_getter) = &self.any_getter {
            any_getter.write(factory, value, &mut object, |key| {
                self.out_bindings.contains_key(key)
            })?;
        }
        Ok(Value::Object(object))
    }

    /// Decodes `node`: delegate skeleton, then named bindings in declaration
    /// order, then the any-setter with the leftover keys in input order.
    pub fn decode(
        &self,
        factory: &CodecFactory,
        node: Value,
    ) -> Result<Box<dyn Reflect>, DecodeError> {
        let delegate = self.info.delegate().ok_or(DecodeError::NoDelegate {
            type_path: self.info.type_path(),
        })?;
        let mut object = match node {
            Value::Object(object) => object,
            other if self.is_empty() => {
                return delegate.from_tree(other).map_err(|source| DecodeError::Delegate {
                    type_path: self.info.type_path(),
                    source,
                });
            }
            other => {
                return Err(DecodeError::Shape {
                    type_path: self.info.type_path(),
                    expected: "object",
                    found: DecodeError::node_kind(&other),
                });
            }
        };

        let mut shape = object.clone();
        for raw in &self.hidden_in {
            shape.shift_remove(*raw);
        }
        let mut instance = delegate
            .from_tree(Value::Object(shape))
            .map_err(|source| DecodeError::Delegate {
                type_path: self.info.type_path(),
                source,
            })?;

        for (name, slot) in &self.in_bindings {
            let Some(node) = object.shift_remove(name) else {
                continue;
            };
            if let Slot::Live(binding) = slot {
                binding.read(factory, &mut *instance, node)?;
            }
        }
        if let Some(any_setter) = &self.any_setter {
            for (key, node) in object {
                any_setter.read(factory, &mut *instance, key, node)?;
            }
        }
        Ok(instance)
    }
}

impl fmt::Debug for ClassModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Names<'a, B>(&'a IndexMap<String, Slot<B>>);

        impl<B> fmt::Debug for Names<'_, B> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_map()
                    .entries(self.0.iter().map(|(name, slot)| {
                        (name, if slot.is_tombstone() { "tombstone" } else { "live" })
                    }))
                    .finish()
            }
        }

        f.debug_struct("ClassModel")
            .field("type_path", &self.info.type_path())
            .field("out", &Names(&self.out_bindings))
            .field("in", &Names(&self.in_bindings))
            .field(
                "any_getter",
                &self.any_getter.as_ref().map(AnyGetterBinding::qualified_name),
            )
            .field(
                "any_setter",
                &self.any_setter.as_ref().map(AnySetterBinding::qualified_name),
            )
            .finish()
    }
}
