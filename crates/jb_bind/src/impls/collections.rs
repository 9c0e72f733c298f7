use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet, VecDeque};
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::Hash;
use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::Reflect;
use crate::error::AccessError;
use crate::impls::utils::{map_ops, sequence_ops, take_item};
use crate::info::{
    ContainerOps, GenericTypeInfoCell, OptionalOps, SequenceOps, TypeInfo, TypeKind, Typed,
};

// -----------------------------------------------------------------------------
// Option

impl<T: Typed + Send + Sync> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new::<Self>(TypeKind::Optional).with_container(ContainerOps::Optional(
                OptionalOps {
                    item: T::type_info,
                    get: |value| {
                        value
                            .downcast_ref::<Option<T>>()
                            .map(|opt| opt.as_ref().map(|val| val as &dyn Reflect))
                    },
                    wrap: |item| match item {
                        Some(item) => Ok(Box::new(Some(take_item::<T>(0, item)?))),
                        None => Ok(Box::new(None::<T>)),
                    },
                },
            ))
        })
    }
}

// -----------------------------------------------------------------------------
// Array

impl<T: Typed + Send + Sync, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new::<Self>(TypeKind::Array).with_container(ContainerOps::Sequence(
                SequenceOps {
                    item: T::type_info,
                    items: |value| {
                        value
                            .downcast_ref::<[T; N]>()
                            .map(|items| items.iter().map(|item| item as &dyn Reflect).collect())
                    },
                    collect: |items| {
                        if items.len() != N {
                            return Err(AccessError::Arity {
                                expected: N,
                                found: items.len(),
                            });
                        }
                        let items = items
                            .into_iter()
                            .enumerate()
                            .map(|(index, item)| take_item::<T>(index, item))
                            .collect::<Result<Vec<T>, _>>()?;
                        match <[T; N]>::try_from(items) {
                            Ok(array) => Ok(Box::new(array)),
                            Err(items) => Err(AccessError::Arity {
                                expected: N,
                                found: items.len(),
                            }),
                        }
                    },
                },
            ))
        })
    }
}

// -----------------------------------------------------------------------------
// Sequences

impl<T: Typed + Send + Sync> Typed for Vec<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new::<Self>(TypeKind::List)
                .with_container(ContainerOps::Sequence(sequence_ops::<Self, T>()))
        })
    }
}

impl<T: Typed + Send + Sync> Typed for VecDeque<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new::<Self>(TypeKind::List)
                .with_container(ContainerOps::Sequence(sequence_ops::<Self, T>()))
        })
    }
}

impl<T: Typed + Send + Sync + Ord> Typed for BTreeSet<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new::<Self>(TypeKind::Set)
                .with_container(ContainerOps::Sequence(sequence_ops::<Self, T>()))
        })
    }
}

impl<T: Typed + Send + Sync + Eq + Hash> Typed for HashSet<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new::<Self>(TypeKind::Set)
                .with_container(ContainerOps::Sequence(sequence_ops::<Self, T>()))
        })
    }
}

// -----------------------------------------------------------------------------
// Maps

impl<V: Typed + Send + Sync> Typed for BTreeMap<String, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new::<Self>(TypeKind::Map)
                .with_container(ContainerOps::Map(map_ops::<Self, V>()))
        })
    }
}

impl<V: Typed + Send + Sync> Typed for HashMap<String, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new::<Self>(TypeKind::Map)
                .with_container(ContainerOps::Map(map_ops::<Self, V>()))
        })
    }
}

impl<V: Typed + Send + Sync> Typed for IndexMap<String, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::new::<Self>(TypeKind::Map)
                .with_container(ContainerOps::Map(map_ops::<Self, V>()))
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::Reflect;
    use crate::info::{ContainerOps, TypeKind, Typed};

    #[test]
    fn generic_infos_are_distinct() {
        assert!(Vec::<u8>::type_info().type_is::<Vec<u8>>());
        assert!(Vec::<String>::type_info().type_is::<Vec<String>>());
        assert_eq!(<[u8; 2]>::type_info().kind(), TypeKind::Array);
        assert_eq!(Option::<u8>::type_info().kind(), TypeKind::Optional);
    }

    #[test]
    fn sequence_ops_collect() {
        let Some(ContainerOps::Sequence(ops)) = Vec::<i32>::type_info().container() else {
            panic!("Vec is a sequence");
        };
        let value = vec![1, 2];
        assert_eq!((ops.items)(&value).unwrap().len(), 2);
        assert!((ops.items)(&1_i32).is_none());

        let items: Vec<Box<dyn Reflect>> = vec![Box::new(3_i32), Box::new(4_i32)];
        let collected = (ops.collect)(items).unwrap();
        assert_eq!(collected.take::<Vec<i32>>().unwrap(), [3, 4]);

        let items: Vec<Box<dyn Reflect>> = vec![Box::new(3_i32), Box::new(4_u8)];
        assert!((ops.collect)(items).is_err());
    }

    #[test]
    fn array_checks_length() {
        let Some(ContainerOps::Sequence(ops)) = <[u8; 2]>::type_info().container() else {
            panic!("arrays are sequences");
        };
        let items: Vec<Box<dyn Reflect>> = vec![Box::new(1_u8)];
        assert!((ops.collect)(items).is_err());
    }

    #[test]
    fn map_ops_keep_keys() {
        let Some(ContainerOps::Map(ops)) = BTreeMap::<String, u8>::type_info().container() else {
            panic!("BTreeMap is a map");
        };
        let mut map = BTreeMap::new();
        map.insert(String::from("a"), 1_u8);
        let entries = (ops.entries)(&map).unwrap();
        assert_eq!(entries[0].0, "a");

        let item: Box<dyn Reflect> = Box::new(2_u8);
        let collected = (ops.collect)(vec![(String::from("b"), item)]).unwrap();
        let collected = collected.take::<BTreeMap<String, u8>>().unwrap();
        assert_eq!(collected.get("b"), Some(&2));
    }
}
