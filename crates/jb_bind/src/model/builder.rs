use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use indexmap::IndexMap;

use crate::binding::{
    AnyGetterBinding, AnySetterBinding, FieldBinding, GetterBinding, InBinding, OutBinding,
    SetterBinding, qualify,
};
use crate::decl::{ClassDecl, FieldDecl, Invoker, MethodDecl, Modifiers};
use crate::error::ConfigError;
use crate::info::{TypeInfo, TypeKind};
use crate::model::naming;
use crate::model::{ClassModel, Slot};

/// Builds the model of `info` from its class declaration.
///
/// Interfaces are visited first, then the superclass chain from the root,
/// then the type's own members. A later entry for a name replaces an
/// earlier one, live or tombstoned.
pub(crate) fn build(info: &'static TypeInfo) -> Result<ClassModel, ConfigError> {
    let mut builder = ModelBuilder::new(info);
    if let Some(class) = info.class() {
        builder.visit(&class())?;
    }
    Ok(builder.finish())
}

// Any-bindings already declared by the declaration being visited.
#[derive(Default)]
struct DeclaredAny {
    getter: Option<String>,
    setter: Option<String>,
}

struct ModelBuilder {
    info: &'static TypeInfo,
    out_bindings: IndexMap<String, Slot<OutBinding>>,
    in_bindings: IndexMap<String, Slot<InBinding>>,
    any_getter: Option<AnyGetterBinding>,
    any_setter: Option<AnySetterBinding>,
    claimed: Vec<&'static str>,
}

impl ModelBuilder {
    fn new(info: &'static TypeInfo) -> Self {
        Self {
            info,
            out_bindings: IndexMap::new(),
            in_bindings: IndexMap::new(),
            any_getter: None,
            any_setter: None,
            claimed: Vec::new(),
        }
    }

    fn visit(&mut self, decl: &ClassDecl) -> Result<(), ConfigError> {
        for interface in decl.interfaces() {
            self.visit(interface)?;
        }
        if let Some(superclass) = decl.superclass() {
            self.visit(superclass)?;
        }

        let owner = decl.info();
        self.claimed.extend_from_slice(decl.hidden());
        for field in decl.declared_fields() {
            self.add_field(owner, field);
        }
        let mut declared = DeclaredAny::default();
        for method in decl.declared_methods() {
            self.add_method(owner, method, &mut declared)?;
        }
        Ok(())
    }

    fn tombstone(&mut self, name: &str) {
        self.out_bindings.insert(String::from(name), Slot::Tombstone);
        self.in_bindings.insert(String::from(name), Slot::Tombstone);
    }

    fn add_field(&mut self, owner: &'static TypeInfo, field: &FieldDecl) {
        let modifiers = field.modifiers();
        let annotations = field.annotations();
        if modifiers.contains(Modifiers::STATIC) {
            return;
        }

        let raw = field.name();
        if annotations.ignore {
            self.claimed.push(raw);
            self.tombstone(annotations.renamed().unwrap_or(raw));
            return;
        }
        if modifiers.contains(Modifiers::TRANSIENT)
            || annotations.renamed().is_some_and(|name| name != raw)
        {
            self.claimed.push(raw);
        }

        let Some(name) = naming::field_name(field) else {
            return;
        };
        let binding = Arc::new(FieldBinding::new(String::from(name), owner, field));
        self.out_bindings.insert(
            String::from(name),
            Slot::Live(OutBinding::Field(binding.clone())),
        );
        self.in_bindings
            .insert(String::from(name), Slot::Live(InBinding::Field(binding)));
    }

    fn add_method(
        &mut self,
        owner: &'static TypeInfo,
        method: &MethodDecl,
        declared: &mut DeclaredAny,
    ) -> Result<(), ConfigError> {
        let annotations = method.annotations();
        if method.modifiers().contains(Modifiers::STATIC) {
            return Ok(());
        }
        if annotations.any_getter || annotations.any_setter {
            if annotations.any_getter {
                self.add_any_getter(owner, method, declared)?;
            }
            if annotations.any_setter {
                self.add_any_setter(owner, method, declared)?;
            }
            return Ok(());
        }
        if annotations.ignore {
            self.tombstone(&naming::ignored_method_name(method));
            return Ok(());
        }

        match (method.param_count(), method.ret_fn(), method.invoker()) {
            (0, Some(ret), Invoker::Ref(invoke)) => {
                if let Some(name) = naming::getter_name(method) {
                    let binding =
                        GetterBinding::new(name.clone(), owner, method.name(), invoke.clone(), ret);
                    self.out_bindings
                        .insert(name, Slot::Live(OutBinding::Getter(binding)));
                }
            }
            (1, None, Invoker::Mut(invoke)) => {
                if let (Some(name), Some(param)) = (naming::setter_name(method), method.param_fn(0))
                {
                    let binding =
                        SetterBinding::new(name.clone(), owner, method.name(), invoke.clone(), param);
                    self.in_bindings
                        .insert(name, Slot::Live(InBinding::Setter(binding)));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn add_any_getter(
        &mut self,
        owner: &'static TypeInfo,
        method: &MethodDecl,
        declared: &mut DeclaredAny,
    ) -> Result<(), ConfigError> {
        let qualified = qualify(owner, method.name());
        let invalid = |reason| ConfigError::AnyGetterSignature {
            method: qualified.clone(),
            reason,
        };

        if method.param_count() != 0 {
            return Err(invalid("must take no parameters"));
        }
        let Invoker::Ref(invoke) = method.invoker() else {
            return Err(invalid("must take `&self`"));
        };
        let Some(ret) = method.ret_fn().filter(|ret| ret().kind() == TypeKind::Map) else {
            return Err(invalid("must return a string-keyed map"));
        };
        if let Some(first) = &declared.getter {
            return Err(ConfigError::DuplicateAnyGetter {
                type_path: owner.type_path(),
                first: first.clone(),
                second: qualified,
            });
        }

        self.any_getter = Some(AnyGetterBinding::new(owner, method.name(), invoke.clone(), ret));
        declared.getter = Some(qualified);
        Ok(())
    }

    fn add_any_setter(
        &mut self,
        owner: &'static TypeInfo,
        method: &MethodDecl,
        declared: &mut DeclaredAny,
    ) -> Result<(), ConfigError> {
        let qualified = qualify(owner, method.name());
        let invalid = |reason| ConfigError::AnySetterSignature {
            method: qualified.clone(),
            reason,
        };

        let (2, Some(key), Some(value)) =
            (method.param_count(), method.param_fn(0), method.param_fn(1))
        else {
            return Err(invalid("must take exactly two parameters"));
        };
        let Invoker::Mut(invoke) = method.invoker() else {
            return Err(invalid("must take `&mut self`"));
        };
        if key().kind() != TypeKind::Str {
            return Err(invalid("first parameter must accept a string key"));
        }
        if let Some(first) = &declared.setter {
            return Err(ConfigError::DuplicateAnySetter {
                type_path: owner.type_path(),
                first: first.clone(),
                second: qualified,
            });
        }

        self.any_setter = Some(AnySetterBinding::new(owner, method.name(), invoke.clone(), value));
        declared.setter = Some(qualified);
        Ok(())
    }

    fn finish(self) -> ClassModel {
        let hidden_out = unclaimed(&self.claimed, &self.out_bindings);
        let hidden_in = unclaimed(&self.claimed, &self.in_bindings);
        ClassModel {
            info: self.info,
            out_bindings: self.out_bindings,
            in_bindings: self.in_bindings,
            any_getter: self.any_getter,
            any_setter: self.any_setter,
            hidden_out,
            hidden_in,
        }
    }
}

// Claimed raw keys that are not also a live wire name.
fn unclaimed<B>(
    claimed: &[&'static str],
    bindings: &IndexMap<String, Slot<B>>,
) -> Vec<&'static str> {
    let mut hidden: Vec<&'static str> = Vec::new();
    for &raw in claimed {
        let live = bindings.get(raw).is_some_and(|slot| slot.live().is_some());
        if !live && !hidden.contains(&raw) {
            hidden.push(raw);
        }
    }
    hidden
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::build;
    use crate::binding::BindingKind;
    use crate::decl::{Annotations, Class, ClassDecl, FieldDecl, MethodDecl};
    use crate::error::ConfigError;
    use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};

    macro_rules! typed {
        ($ty:ty) => {
            impl Typed for $ty {
                fn type_info() -> &'static TypeInfo {
                    static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                    CELL.get_or_init(|| {
                        TypeInfo::new::<Self>(TypeKind::Struct).with_class(<Self as Class>::class_decl)
                    })
                }
            }
        };
    }

    // -------------------------------------------------------------------------
    // Hierarchy

    trait Labeled {
        fn label(&self) -> String;
    }

    impl Typed for dyn Labeled {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Interface))
        }
    }

    fn labeled<T: Labeled + Typed + Send + Sync>() -> ClassDecl {
        ClassDecl::new::<dyn Labeled>()
            .method(MethodDecl::getter::<T, String>("get_label", |t| t.label()).public())
    }

    #[derive(Default)]
    struct Base {
        id: u32,
        note: String,
        code: String,
    }

    typed!(Base);

    impl Class for Base {
        fn class_decl() -> ClassDecl {
            ClassDecl::new::<Self>()
                .field(FieldDecl::new::<Self, u32>("id", |b| &b.id, |b| &mut b.id).public())
                .field(
                    FieldDecl::new::<Self, String>("note", |b| &b.note, |b| &mut b.note)
                        .with_annotations(Annotations::new().ignore()),
                )
                .method(MethodDecl::getter::<Self, String>("get_code", |b| b.code.clone()).public())
        }
    }

    #[derive(Default)]
    struct Derived {
        base: Base,
        name: String,
    }

    typed!(Derived);

    impl Labeled for Derived {
        fn label(&self) -> String {
            self.name.clone()
        }
    }

    impl Class for Derived {
        fn class_decl() -> ClassDecl {
            ClassDecl::new::<Self>()
                .implements(labeled::<Self>())
                .extends::<Self, Base>(|d| &d.base, |d| &mut d.base)
                .hide("base")
                .field(
                    FieldDecl::new::<Self, String>("name", |d| &d.name, |d| &mut d.name)
                        .public()
                        .with_annotations(Annotations::new().rename("fullName")),
                )
                .method(
                    MethodDecl::getter::<Self, String>("get_code", |d| d.base.code.clone())
                        .with_annotations(Annotations::new().ignore()),
                )
                .method(
                    MethodDecl::getter::<Self, String>("get_note", |d| d.base.note.clone())
                        .public(),
                )
        }
    }

    #[test]
    fn hierarchy_merge() {
        let model = build(Derived::type_info()).unwrap();

        let out: Vec<&str> = model.out_names().collect();
        assert_eq!(out, ["label", "id", "note", "code", "fullName"]);

        // inherited from the interface
        let label = model.out_binding("label").unwrap().live().unwrap();
        assert_eq!(label.kind(), BindingKind::MethodGetter);
        assert!(label.qualified_name().ends_with("Labeled.get_label"));

        // ignored here, live in the base
        assert!(model.out_binding("code").unwrap().is_tombstone());
        assert!(model.in_binding("code").unwrap().is_tombstone());

        // ignored in the base, revived here for encoding only
        assert!(model.out_binding("note").unwrap().live().is_some());
        assert!(model.in_binding("note").unwrap().is_tombstone());

        let id = model.in_binding("id").unwrap().live().unwrap();
        assert_eq!(id.kind(), BindingKind::Field);
        assert!(id.qualified_name().ends_with("Base.id"));

        assert_eq!(model.hidden_out(), &["base", "name"]);
        assert_eq!(model.hidden_in(), &["note", "base", "name"]);
    }

    // -------------------------------------------------------------------------
    // Any-bindings

    #[derive(Default)]
    struct Extras {
        extra: BTreeMap<String, i32>,
    }

    impl Extras {
        fn any(&self) -> BTreeMap<String, i32> {
            self.extra.clone()
        }

        fn put(&mut self, key: String, value: i32) {
            self.extra.insert(key, value);
        }
    }

    typed!(Extras);

    impl Class for Extras {
        fn class_decl() -> ClassDecl {
            ClassDecl::new::<Self>()
                .method(
                    MethodDecl::getter::<Self, BTreeMap<String, i32>>("any", Extras::any)
                        .with_annotations(Annotations::new().any_getter()),
                )
                .method(put::<Self>("put", Extras::put))
        }
    }

    fn put<T: Typed>(name: &'static str, f: fn(&mut T, String, i32)) -> MethodDecl {
        any_setter::<T, String>(name, f)
    }

    fn any_setter<T: Typed, K: Typed + Send + Sync>(
        name: &'static str,
        f: fn(&mut T, K, i32),
    ) -> MethodDecl {
        MethodDecl::by_mut::<T, _>(
            name,
            alloc::vec![K::type_info, i32::type_info],
            None,
            move |this, args| {
                let mut args = crate::decl::Args::new(args, 2)?;
                f(this, args.arg::<K>()?, args.arg::<i32>()?);
                Ok(None)
            },
        )
        .with_annotations(Annotations::new().any_setter())
    }

    #[test]
    fn any_bindings_are_accepted() {
        let model = build(Extras::type_info()).unwrap();
        assert!(model.any_getter().unwrap().qualified_name().ends_with("Extras.any"));
        assert!(model.any_setter().unwrap().qualified_name().ends_with("Extras.put"));
        assert_eq!(model.out_names().count(), 0);
    }

    #[derive(Default)]
    struct NumericKey;

    typed!(NumericKey);

    impl Class for NumericKey {
        fn class_decl() -> ClassDecl {
            ClassDecl::new::<Self>().method(any_setter::<Self, u64>("put", |_, _, _| {}))
        }
    }

    #[derive(Default)]
    struct ArgGetter;

    typed!(ArgGetter);

    impl Class for ArgGetter {
        fn class_decl() -> ClassDecl {
            ClassDecl::new::<Self>().method(
                any_setter::<Self, String>("get_extra", |_, _, _| {})
                    .with_annotations(Annotations::new().any_getter()),
            )
        }
    }

    #[derive(Default)]
    struct TwoGetters;

    typed!(TwoGetters);

    impl Class for TwoGetters {
        fn class_decl() -> ClassDecl {
            let any = || {
                MethodDecl::getter::<Self, BTreeMap<String, i32>>("a", |_| BTreeMap::new())
                    .with_annotations(Annotations::new().any_getter())
            };
            ClassDecl::new::<Self>().method(any()).method(any())
        }
    }

    #[test]
    fn any_binding_errors() {
        let err = build(NumericKey::type_info()).unwrap_err();
        let ConfigError::AnySetterSignature { method, .. } = &err else {
            panic!("unexpected error: {err}");
        };
        assert!(method.ends_with("NumericKey.put"));

        let err = build(ArgGetter::type_info()).unwrap_err();
        let ConfigError::AnyGetterSignature { method, reason } = &err else {
            panic!("unexpected error: {err}");
        };
        assert!(method.ends_with("ArgGetter.get_extra"));
        assert_eq!(*reason, "must take no parameters");

        let err = build(TwoGetters::type_info()).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateAnyGetter { .. }));
    }

    #[test]
    fn type_without_class_has_empty_model() {
        let model = build(core::time::Duration::type_info()).unwrap();
        assert!(model.is_empty());
    }
}
