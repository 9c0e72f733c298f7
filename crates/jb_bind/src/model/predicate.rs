use crate::info::{TypeInfo, TypeKind};

/// Returns `true` if values of this type go through a model codec.
///
/// Primitives, strings, enums, containers and the generic tree nodes are
/// left to their delegate or container converter. Structs, interfaces and
/// opaque types are managed.
///
/// # Examples
///
/// ```
/// use jb_bind::info::Typed;
/// use jb_bind::model::is_managed;
///
/// assert!(!is_managed(<Vec<u8> as Typed>::type_info()));
/// assert!(!is_managed(<serde_json::Value as Typed>::type_info()));
/// assert!(is_managed(<core::time::Duration as Typed>::type_info()));
/// ```
pub fn is_managed(info: &TypeInfo) -> bool {
    match info.kind() {
        TypeKind::Primitive
        | TypeKind::Str
        | TypeKind::Enum
        | TypeKind::Array
        | TypeKind::List
        | TypeKind::Set
        | TypeKind::Map
        | TypeKind::Optional
        | TypeKind::Tree => false,
        TypeKind::Struct | TypeKind::Interface | TypeKind::Opaque => true,
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::is_managed;
    use crate::info::Typed;
    use crate::value::Untyped;

    #[test]
    fn leaves_and_containers_are_unmanaged() {
        assert!(!is_managed(bool::type_info()));
        assert!(!is_managed(f64::type_info()));
        assert!(!is_managed(String::type_info()));
        assert!(!is_managed(Option::<i32>::type_info()));
        assert!(!is_managed(Vec::<String>::type_info()));
        assert!(!is_managed(<[u8; 4]>::type_info()));
        assert!(!is_managed(BTreeMap::<String, i32>::type_info()));
        assert!(!is_managed(Untyped::type_info()));
        assert!(!is_managed(serde_json::Value::type_info()));
    }

    #[test]
    fn opaque_is_managed() {
        assert!(is_managed(core::time::Duration::type_info()));
    }
}
