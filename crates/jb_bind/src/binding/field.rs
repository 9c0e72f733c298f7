use alloc::string::String;
use core::any::Any;

use serde_json::{Map, Value};

use crate::Reflect;
use crate::binding::{decode_failed, encode_failed, qualify, read_failed, write_failed};
use crate::codec::CodecFactory;
use crate::convert::ValueConverterCache;
use crate::decl::{FieldClearer, FieldDecl, FieldGetter, FieldSetter};
use crate::error::{DecodeError, EncodeError};
use crate::info::TypeInfo;

/// A field bound in both directions.
///
/// An empty dynamic field encodes as `null`, and `null` empties an optional
/// dynamic field.
pub struct FieldBinding {
    name: String,
    qualified: String,
    getter: FieldGetter,
    setter: FieldSetter,
    clearer: Option<FieldClearer>,
    converter: ValueConverterCache,
}

impl FieldBinding {
    pub(crate) fn new(name: String, owner: &TypeInfo, field: &FieldDecl) -> Self {
        Self {
            name,
            qualified: qualify(owner, field.name()),
            getter: field.getter().clone(),
            setter: field.setter().clone(),
            clearer: field.clearer().cloned(),
            converter: ValueConverterCache::new(field.declared_fn()),
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
        let field = (self.getter)(receiver).map_err(|err| read_failed(&self.qualified, err))?;
        let node = match field {
            Some(field) => self
                .converter
                .to_tree(factory, field)
                .map_err(|err| encode_failed(&self.qualified, err))?,
            None => Value::Null,
        };
        object.insert(self.name.clone(), node);
        Ok(())
    }

    pub(crate) fn read(
        &self,
        factory: &CodecFactory,
        instance: &mut dyn Reflect,
        node: Value,
    ) -> Result<(), DecodeError> {
        if node.is_null()
            && let Some(clearer) = &self.clearer
        {
            let receiver: &mut dyn Any = instance;
            return clearer(receiver).map_err(|err| write_failed(&self.qualified, err));
        }
        let decoded = self
            .converter
            .from_tree(factory, node)
            .map_err(|err| decode_failed(&self.qualified, err))?;
        let receiver: &mut dyn Any = instance;
        (self.setter)(receiver, decoded).map_err(|err| write_failed(&self.qualified, err))
    }
}
