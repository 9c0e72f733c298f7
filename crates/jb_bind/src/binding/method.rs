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
// GetterBinding

/// A `&self` accessor bound for encoding.
pub struct GetterBinding {
    name: String,
    qualified: String,
    invoke: RefInvoke,
    converter: ValueConverterCache,
}

impl GetterBinding {
    pub(crate) fn new(
        name: String,
        owner: &TypeInfo,
        method: &'static str,
        invoke: RefInvoke,
        ret: fn() -> &'static TypeInfo,
    ) -> Self {
        Self {
            name,
            qualified: qualify(owner, method),
            invoke,
            converter: ValueConverterCache::new(ret),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    #[inline]
    pub fn converter(&self) -> &ValueConverterCache {
        &self.converter
    }

    pub(crate) fn write(
        &self,
        factory: &CodecFactory,
        value: &dyn Reflect,
        object: &mut Map<String, Value>,
    ) -> Result<(), EncodeError> {
        let receiver: &dyn Any = value;
        let result =
            (self.invoke)(receiver, Vec::new()).map_err(|err| read_failed(&self.qualified, err))?;
        let node = match result {
            Some(result) => self
                .converter
                .to_tree(factory, &*result)
                .map_err(|err| encode_failed(&self.qualified, err))?,
            None => Value::Null,
        };
        object.insert(self.name.clone(), node);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// SetterBinding

/// A one-argument `&mut self` method bound for decoding.
pub struct SetterBinding {
    name: String,
    qualified: String,
    invoke: MutInvoke,
    converter: ValueConverterCache,
}

impl SetterBinding {
    pub(crate) fn new(
        name: String,
        owner: &TypeInfo,
        method: &'static str,
        invoke: MutInvoke,
        param: fn() -> &'static TypeInfo,
    ) -> Self {
        Self {
            name,
            qualified: qualify(owner, method),
            invoke,
            converter: ValueConverterCache::new(param),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn qualified_name(&self) -> &str {
        &self.qualified
    }

    #[inline]
    pub fn converter(&self) -> &ValueConverterCache {
        &self.converter
    }

    pub(crate) fn read(
        &self,
        factory: &CodecFactory,
        instance: &mut dyn Reflect,
        node: Value,
    ) -> Result<(), DecodeError> {
        let decoded = self
            .converter
            .from_tree(factory, node)
            .map_err(|err| decode_failed(&self.qualified, err))?;
        let receiver: &mut dyn Any = instance;
        (self.invoke)(receiver, vec![decoded]).map_err(|err| write_failed(&self.qualified, err))?;
        Ok(())
    }
}
