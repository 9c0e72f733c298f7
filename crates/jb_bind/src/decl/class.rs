use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::decl::{FieldDecl, MethodDecl, Projection};
use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Class

/// A type that declares its members.
///
/// Implemented by [`#[derive(Bind)]`](crate::derive::Bind). The declaration
/// is read once, when the type's model is built.
pub trait Class: Typed {
    fn class_decl() -> ClassDecl;
}

// -----------------------------------------------------------------------------
// ClassDecl

/// Members declared by one type, plus the declarations it inherits from.
///
/// Members of a superclass or interface declaration already operate on the
/// concrete type: [`ClassDecl::extends`] lifts them through the embedded
/// base value.
#[derive(Clone)]
pub struct ClassDecl {
    info: &'static TypeInfo,
    interfaces: Vec<ClassDecl>,
    superclass: Option<Box<ClassDecl>>,
    fields: Vec<FieldDecl>,
    methods: Vec<MethodDecl>,
    hidden: Vec<&'static str>,
}

impl ClassDecl {
    /// An empty declaration for `T`, which may be a `dyn Trait`.
    pub fn new<T: ?Sized + Typed>() -> Self {
        Self::with_info(T::type_info())
    }

    /// An empty declaration for the type described by `info`.
    pub fn with_info(info: &'static TypeInfo) -> Self {
        Self {
            info,
            interfaces: Vec::new(),
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
            hidden: Vec::new(),
        }
    }

    #[inline]
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    #[inline]
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDecl>) -> Self {
        self.fields.extend(fields);
        self
    }

    #[inline]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    #[inline]
    pub fn methods(mut self, methods: impl IntoIterator<Item = MethodDecl>) -> Self {
        self.methods.extend(methods);
        self
    }

    /// Adds a directly implemented interface.
    ///
    /// Interfaces are visited in the order they are added, before the
    /// superclass.
    #[inline]
    pub fn implements(mut self, interface: ClassDecl) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Sets the superclass to `B`, embedded in `D` and reached through
    /// `get` / `get_mut`.
    ///
    /// Replaces any previous superclass.
    pub fn extends<D, B>(mut self, get: fn(&D) -> &B, get_mut: fn(&mut D) -> &mut B) -> Self
    where
        D: Typed,
        B: Class,
    {
        let projection = Projection::new(get, get_mut);
        self.superclass = Some(Box::new(B::class_decl().lift(&projection)));
        self
    }

    /// Marks a raw key of the delegate shape as not part of the wire format.
    ///
    /// Used for the field embedding the superclass, whose members are
    /// flattened into the derived object.
    #[inline]
    pub fn hide(mut self, raw: &'static str) -> Self {
        self.hidden.push(raw);
        self
    }

    #[inline]
    pub fn info(&self) -> &'static TypeInfo {
        self.info
    }

    #[inline]
    pub fn interfaces(&self) -> &[ClassDecl] {
        &self.interfaces
    }

    #[inline]
    pub fn superclass(&self) -> Option<&ClassDecl> {
        self.superclass.as_deref()
    }

    #[inline]
    pub fn declared_fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    #[inline]
    pub fn declared_methods(&self) -> &[MethodDecl] {
        &self.methods
    }

    #[inline]
    pub fn hidden(&self) -> &[&'static str] {
        &self.hidden
    }

    pub(crate) fn lift(self, projection: &Projection) -> Self {
        Self {
            info: self.info,
            interfaces: self
                .interfaces
                .into_iter()
                .map(|decl| decl.lift(projection))
                .collect(),
            superclass: self
                .superclass
                .map(|decl| Box::new(decl.lift(projection))),
            fields: self
                .fields
                .into_iter()
                .map(|field| field.lift(projection))
                .collect(),
            methods: self
                .methods
                .into_iter()
                .map(|method| method.lift(projection))
                .collect(),
            hidden: self.hidden,
        }
    }
}

impl core::fmt::Debug for ClassDecl {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ClassDecl")
            .field("type_path", &self.info.type_path())
            .field("interfaces", &self.interfaces)
            .field("superclass", &self.superclass)
            .field(
                "fields",
                &self.fields.iter().map(FieldDecl::name).collect::<Vec<_>>(),
            )
            .field(
                "methods",
                &self.methods.iter().map(MethodDecl::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::{Class, ClassDecl};
    use crate::decl::{FieldDecl, Invoker, MethodDecl};
    use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};

    #[derive(Default)]
    struct Base {
        id: u64,
    }

    impl Base {
        fn get_label(&self) -> String {
            alloc::format!("#{}", self.id)
        }
    }

    impl Typed for Base {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Struct))
        }
    }

    impl Class for Base {
        fn class_decl() -> ClassDecl {
            ClassDecl::new::<Self>()
                .field(FieldDecl::new::<Self, u64>("id", |b| &b.id, |b| &mut b.id).public())
                .method(MethodDecl::getter::<Self, String>("get_label", Base::get_label).public())
        }
    }

    #[derive(Default)]
    struct Derived {
        base: Base,
        name: String,
    }

    impl Typed for Derived {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Struct))
        }
    }

    impl Class for Derived {
        fn class_decl() -> ClassDecl {
            ClassDecl::new::<Self>()
                .extends::<Self, Base>(|d| &d.base, |d| &mut d.base)
                .hide("base")
                .field(FieldDecl::new::<Self, String>("name", |d| &d.name, |d| &mut d.name))
        }
    }

    #[test]
    fn superclass_members_act_on_derived() {
        let decl = Derived::class_decl();
        let base = decl.superclass().unwrap();
        assert!(base.info().type_is::<Base>());
        assert_eq!(decl.hidden(), &["base"]);

        let mut value = Derived::default();
        let id = &base.declared_fields()[0];
        (id.setter())(&mut value, Box::new(9_u64)).unwrap();
        assert_eq!(value.base.id, 9);

        let read = (id.getter())(&value).unwrap().unwrap();
        assert_eq!(read.downcast_ref::<u64>(), Some(&9));

        // An unlifted accessor rejects the derived receiver.
        let base_decl = Base::class_decl();
        let raw = &base_decl.declared_fields()[0];
        assert!((raw.getter())(&value).is_err());

        let Invoker::Ref(label) = base.declared_methods()[0].invoker() else {
            panic!("getter takes &self");
        };
        let label = label(&value, alloc::vec::Vec::new()).unwrap().unwrap();
        assert_eq!(label.downcast_ref::<String>().unwrap(), "#9");
    }
}
