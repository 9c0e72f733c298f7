use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;

use serde_json::{Map, Value};

use crate::Reflect;
use crate::binding::{decode_failed, encode_failed, qualify, read_failed, write_failed};
use crate::codec::CodecFactory;
use crate::convert::ValueConverterCache;
use crate::decl::{MutInvoke, RefInvoke};
use crate::error::{DecodeError, EncodeError};
use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// AnyGetterBinding

/// Flattens the entries of a map-returning accessor into the encoded object.
pub struct AnyGetterBinding {
    qualified: String,
    invoke: RefInvoke,
    converter: ValueConverterCache,
}

impl AnyGetterBinding {
    pub(crate) fn new(
        owner: &TypeInfo,
        method: &'static str,
        invoke: RefInvoke,
        ret: fn() -> &'static TypeInfo,
    ) -> Self {
        Self {
            qualified: qualify(owner, method),
            invoke,
            converter: ValueConverterCache::new(ret),
        }
    }

    #[inline]
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    /// Inserts every entry whose key is not `claimed` by a named binding.
    pub(crate) fn write(
        &self,
        factory: &CodecFactory,
        value: &dyn Reflect,
        object: &mut Map<String, Value>,
        claimed: impl Fn(&str) -> bool,
    ) -> Result<(), EncodeError> {
        let receiver: &dyn Any = value;
        let result =
            (self.invoke)(receiver, Vec::new()).map_err(|err| read_failed(&self.qualified, err))?;
        let Some(result) = result else {
            return Ok(());
        };
        let entries = match self.converter.to_tree(factory, &*result) {
            Ok(Value::Object(entries)) => entries,
            Ok(_) => {
                let err = EncodeError::NotAnObject {
                    type_path: result.reflect_type_info().type_path(),
                };
                return Err(encode_failed(&self.qualified, err));
            }
            Err(err) => return Err(encode_failed(&self.qualified, err)),
        };
        for (key, node) in entries {
            if !claimed(&key) {
                object.insert(key, node);
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// AnySetterBinding

/// Receives every input property no named binding claimed, as `(key, value)`.
pub struct AnySetterBinding {
    qualified: String,
    invoke: MutInvoke,
    converter: ValueConverterCache,
}

impl AnySetterBinding {
    pub(crate) fn new(
        owner: &TypeInfo,
        method: &'static str,
        invoke: MutInvoke,
        value: fn() -> &'static TypeInfo,
    ) -> Self {
        Self {
            qualified: qualify(owner, method),
            invoke,
            converter: ValueConverterCache::new(value),
        }
    }

    #[inline]
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    pub(crate) fn read(
        &self,
        factory: &CodecFactory,
        instance: &mut dyn Reflect,
        key: String,
        node: Value,
    ) -> Result<(), DecodeError> {
        let decoded = self
            .converter
            .from_tree(factory, node)
            .map_err(|err| decode_failed(&self.qualified, err))?;
        let receiver: &mut dyn Any = instance;
        let key: Box<dyn Reflect> = Box::new(key);
        (self.invoke)(receiver, vec![key, decoded])
            .map_err(|err| write_failed(&self.qualified, err))?;
        Ok(())
    }
}
