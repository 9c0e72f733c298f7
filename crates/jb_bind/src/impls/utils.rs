use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, type_name};

use crate::Reflect;
use crate::error::AccessError;
use crate::info::{MapOps, SequenceOps, Typed};

/// Unboxes a decoded element.
pub(super) fn take_item<T: Any>(index: usize, item: Box<dyn Reflect>) -> Result<T, AccessError> {
    item.take::<T>().map_err(|item| AccessError::Argument {
        index,
        expected: type_name::<T>(),
        found: item.reflect_type_info().type_path(),
    })
}

/// Operations of a sequence `C` that collects from its items.
pub(super) fn sequence_ops<C, T>() -> SequenceOps
where
    C: Typed + Send + Sync + FromIterator<T>,
    for<'a> &'a C: IntoIterator<Item = &'a T>,
    T: Typed + Send + Sync,
{
    SequenceOps {
        item: T::type_info,
        items: |value| {
            value
                .downcast_ref::<C>()
                .map(|items| items.into_iter().map(|item| item as &dyn Reflect).collect())
        },
        collect: |items| {
            let items = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| take_item::<T>(index, item))
                .collect::<Result<C, _>>()?;
            Ok(Box::new(items))
        },
    }
}

/// Operations of a string-keyed map `M`.
pub(super) fn map_ops<M, V>() -> MapOps
where
    M: Typed + Send + Sync + FromIterator<(String, V)>,
    for<'a> &'a M: IntoIterator<Item = (&'a String, &'a V)>,
    V: Typed + Send + Sync,
{
    MapOps {
        value: V::type_info,
        entries: |value| {
            value.downcast_ref::<M>().map(|entries| {
                entries
                    .into_iter()
                    .map(|(key, val)| (key.as_str(), val as &dyn Reflect))
                    .collect::<Vec<_>>()
            })
        },
        collect: |entries| {
            let entries = entries
                .into_iter()
                .enumerate()
                .map(|(index, (key, val))| take_item::<V>(index, val).map(|val| (key, val)))
                .collect::<Result<M, AccessError>>()?;
            Ok(Box::new(entries))
        },
    }
}
