//! Wire property names of declared members.

use alloc::string::String;

use crate::decl::{FieldDecl, MethodDecl, Modifiers};

/// Returns `true` for `[A-Za-z][A-Za-z0-9_]*`.
///
/// Names starting with `_` are treated as synthetic and never bound by
/// default.
pub fn is_managed_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Wire name of a field, `None` if the field is not bound.
pub fn field_name(field: &FieldDecl) -> Option<&'static str> {
    let modifiers = field.modifiers();
    let annotations = field.annotations();
    if modifiers.contains(Modifiers::STATIC) {
        return None;
    }
    if let Some(name) = annotations.renamed() {
        return Some(name);
    }
    if !annotations.is_exposed()
        && (modifiers.contains(Modifiers::TRANSIENT) || !modifiers.contains(Modifiers::PUBLIC))
    {
        return None;
    }
    let name = field.name();
    is_managed_identifier(name).then_some(name)
}

/// Wire name of a getter method, `None` if it is not bound as one.
///
/// Does not check the method shape.
pub fn getter_name(method: &MethodDecl) -> Option<String> {
    if !is_visible(method) {
        return None;
    }
    if let Some(name) = method.annotations().renamed() {
        return Some(String::from(name));
    }
    let name = method.name();
    let stem = match name.strip_prefix("get") {
        Some(stem) => stem,
        None if method.ret().is_some_and(|ret| ret.type_is::<bool>()) => name.strip_prefix("is")?,
        None => return None,
    };
    decapitalize(stem)
}

/// Wire name of a setter method, `None` if it is not bound as one.
///
/// Does not check the method shape.
pub fn setter_name(method: &MethodDecl) -> Option<String> {
    if !is_visible(method) {
        return None;
    }
    if let Some(name) = method.annotations().renamed() {
        return Some(String::from(name));
    }
    decapitalize(method.name().strip_prefix("set")?)
}

/// The name an ignored method claims.
///
/// Prefixes are stripped when present but not required, and visibility is
/// not checked. `is` counts as a prefix only for `bool` getters.
pub(crate) fn ignored_method_name(method: &MethodDecl) -> String {
    if let Some(name) = method.annotations().renamed() {
        return String::from(name);
    }
    let name = method.name();
    let returns_bool = method.ret().is_some_and(|ret| ret.type_is::<bool>());
    ["get", "is", "set"]
        .iter()
        .filter(|prefix| **prefix != "is" || returns_bool)
        .find_map(|prefix| decapitalize(name.strip_prefix(prefix)?))
        .unwrap_or_else(|| String::from(name))
}

fn is_visible(method: &MethodDecl) -> bool {
    let modifiers = method.modifiers();
    !modifiers.contains(Modifiers::STATIC)
        && (modifiers.contains(Modifiers::PUBLIC) || method.annotations().is_exposed())
}

// `FullName` -> `fullName`, `_full_name` -> `full_name`.
fn decapitalize(stem: &str) -> Option<String> {
    let stem = stem.strip_prefix('_').unwrap_or(stem);
    let mut chars = stem.chars();
    let first = chars.next()?;
    let mut name = String::with_capacity(stem.len());
    name.extend(first.to_lowercase());
    name.push_str(chars.as_str());
    Some(name)
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{field_name, getter_name, ignored_method_name, is_managed_identifier, setter_name};
    use crate::decl::{Annotations, FieldDecl, MethodDecl, Modifiers};
    use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};

    #[derive(Default)]
    struct User {
        name: String,
        active: bool,
    }

    impl Typed for User {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Struct))
        }
    }

    fn name_field(raw: &'static str) -> FieldDecl {
        FieldDecl::new::<User, String>(raw, |u| &u.name, |u| &mut u.name)
    }

    fn name_getter(raw: &'static str) -> MethodDecl {
        MethodDecl::getter::<User, String>(raw, |u| u.name.clone())
    }

    fn flag_getter(raw: &'static str) -> MethodDecl {
        MethodDecl::getter::<User, bool>(raw, |u| u.active)
    }

    #[test]
    fn identifiers() {
        assert!(is_managed_identifier("name"));
        assert!(is_managed_identifier("Name_2"));
        assert!(!is_managed_identifier("_marker"));
        assert!(!is_managed_identifier("__x"));
        assert!(!is_managed_identifier("2d"));
        assert!(!is_managed_identifier(""));
    }

    #[test]
    fn field_names() {
        assert_eq!(field_name(&name_field("name").public()), Some("name"));
        assert_eq!(field_name(&name_field("name")), None);
        assert_eq!(field_name(&name_field("_name").public()), None);

        let exposed = name_field("name").with_annotations(Annotations::new().property());
        assert_eq!(field_name(&exposed), Some("name"));

        let renamed = name_field("name").with_annotations(Annotations::new().rename("userName"));
        assert_eq!(field_name(&renamed), Some("userName"));

        let transient = name_field("name").with_modifiers(Modifiers::PUBLIC | Modifiers::TRANSIENT);
        assert_eq!(field_name(&transient), None);
        let transient = transient.with_annotations(Annotations::new().property());
        assert_eq!(field_name(&transient), Some("name"));

        let shared = name_field("name")
            .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC)
            .with_annotations(Annotations::new().rename("x"));
        assert_eq!(field_name(&shared), None);
    }

    #[test]
    fn getter_prefixes() {
        assert_eq!(getter_name(&name_getter("getFullName").public()).as_deref(), Some("fullName"));
        assert_eq!(getter_name(&name_getter("get_full_name").public()).as_deref(), Some("full_name"));
        assert_eq!(getter_name(&name_getter("get").public()), None);
        assert_eq!(getter_name(&name_getter("get_").public()), None);
        assert_eq!(getter_name(&name_getter("name").public()), None);
        assert_eq!(getter_name(&name_getter("getName")), None);

        // `is` only for booleans
        assert_eq!(getter_name(&flag_getter("is_active").public()).as_deref(), Some("active"));
        assert_eq!(getter_name(&name_getter("isActive").public()), None);
    }

    #[test]
    fn setter_prefixes() {
        let setter = MethodDecl::setter::<User, String>("set_name", |u, v| u.name = v);
        assert_eq!(setter_name(&setter.clone().public()).as_deref(), Some("name"));
        assert_eq!(setter_name(&setter), None);

        let exposed = setter.with_annotations(Annotations::new().rename("alias"));
        assert_eq!(setter_name(&exposed).as_deref(), Some("alias"));

        let other = MethodDecl::setter::<User, bool>("toggle", |u, v| u.active = v).public();
        assert_eq!(setter_name(&other), None);
    }

    #[test]
    fn ignored_names() {
        assert_eq!(ignored_method_name(&name_getter("getSecret")), "secret");
        assert_eq!(ignored_method_name(&name_getter("secret")), "secret");
        assert_eq!(ignored_method_name(&name_getter("issue")), "issue");
        assert_eq!(ignored_method_name(&flag_getter("isHidden")), "hidden");
    }
}
