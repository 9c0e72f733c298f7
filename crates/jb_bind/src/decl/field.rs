use alloc::boxed::Box;
use core::any::type_name;

use crate::Reflect;
use crate::decl::access::{
    Projection, field_clearer, field_getter, field_setter, receiver_error,
};
use crate::decl::{Annotations, FieldClearer, FieldGetter, FieldSetter, Modifiers};
use crate::error::AccessError;
use crate::info::{TypeInfo, Typed};

/// A declared field.
#[derive(Clone)]
pub struct FieldDecl {
    name: &'static str,
    declared: fn() -> &'static TypeInfo,
    modifiers: Modifiers,
    annotations: Annotations,
    getter: FieldGetter,
    setter: FieldSetter,
    clearer: Option<FieldClearer>,
}

impl FieldDecl {
    /// A field of type `F` stored directly in `T`.
    pub fn new<T, F>(name: &'static str, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self
    where
        T: Typed,
        F: Typed + Send + Sync,
    {
        Self {
            name,
            declared: F::type_info,
            modifiers: Modifiers::empty(),
            annotations: Annotations::new(),
            getter: field_getter(move |obj| match obj.downcast_ref::<T>() {
                Some(this) => Ok(Some(get(this) as &dyn Reflect)),
                None => Err(receiver_error::<T>()),
            }),
            setter: field_setter(move |obj, value| {
                let this = obj.downcast_mut::<T>().ok_or_else(receiver_error::<T>)?;
                *get_mut(this) = value.take::<F>().map_err(|value| AccessError::Value {
                    expected: type_name::<F>(),
                    found: value.reflect_type_info().type_path(),
                })?;
                Ok(())
            }),
            clearer: None,
        }
    }

    /// A field holding a value of any runtime type behind `dyn Reflect`.
    ///
    /// `declared` is the type decoding converts to. Encoding dispatches on the
    /// runtime type of the stored value.
    pub fn dynamic<T: Typed>(
        name: &'static str,
        declared: fn() -> &'static TypeInfo,
        get: fn(&T) -> Option<&dyn Reflect>,
        set: fn(&mut T, Box<dyn Reflect>),
    ) -> Self {
        Self {
            name,
            declared,
            modifiers: Modifiers::empty(),
            annotations: Annotations::new(),
            getter: field_getter(move |obj| match obj.downcast_ref::<T>() {
                Some(this) => Ok(get(this)),
                None => Err(receiver_error::<T>()),
            }),
            setter: field_setter(move |obj, value| {
                let this = obj.downcast_mut::<T>().ok_or_else(receiver_error::<T>)?;
                set(this, value);
                Ok(())
            }),
            clearer: None,
        }
    }

    /// A dynamic field that may be empty.
    ///
    /// A JSON `null` empties the field instead of being decoded as `declared`.
    pub fn dynamic_optional<T: Typed>(
        name: &'static str,
        declared: fn() -> &'static TypeInfo,
        get: fn(&T) -> Option<&dyn Reflect>,
        set: fn(&mut T, Option<Box<dyn Reflect>>),
    ) -> Self {
        let mut field = Self::dynamic::<T>(name, declared, get, |_, _| {});
        field.setter = field_setter(move |obj, value| {
            let this = obj.downcast_mut::<T>().ok_or_else(receiver_error::<T>)?;
            set(this, Some(value));
            Ok(())
        });
        field.clearer = Some(field_clearer(move |obj| {
            let this = obj.downcast_mut::<T>().ok_or_else(receiver_error::<T>)?;
            set(this, None);
            Ok(())
        }));
        field
    }

    #[inline]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[inline]
    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }

    /// Shortcut for adding [`Modifiers::PUBLIC`].
    #[inline]
    pub fn public(mut self) -> Self {
        self.modifiers |= Modifiers::PUBLIC;
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn declared(&self) -> &'static TypeInfo {
        (self.declared)()
    }

    pub(crate) fn declared_fn(&self) -> fn() -> &'static TypeInfo {
        self.declared
    }

    #[inline]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[inline]
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    #[inline]
    pub fn getter(&self) -> &FieldGetter {
        &self.getter
    }

    #[inline]
    pub fn setter(&self) -> &FieldSetter {
        &self.setter
    }

    /// Empties the field, `None` if it cannot be empty.
    #[inline]
    pub fn clearer(&self) -> Option<&FieldClearer> {
        self.clearer.as_ref()
    }

    pub(crate) fn lift(mut self, projection: &Projection) -> Self {
        self.getter = projection.lift_getter(self.getter);
        self.setter = projection.lift_setter(self.setter);
        self.clearer = self.clearer.map(|clearer| projection.lift_clearer(clearer));
        self
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::FieldDecl;
    use crate::Reflect;
    use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};

    struct Pair {
        left: String,
        right: Option<Box<dyn Reflect>>,
    }

    impl Typed for Pair {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Opaque))
        }
    }

    fn pair() -> Pair {
        Pair {
            left: String::from("l"),
            right: None,
        }
    }

    #[test]
    fn typed_field_access() {
        let field = FieldDecl::new::<Pair, String>("left", |p| &p.left, |p| &mut p.left);
        let mut value = pair();

        let read = (field.getter())(&value).unwrap().unwrap();
        assert_eq!(read.downcast_ref::<String>().unwrap(), "l");

        (field.setter())(&mut value, Box::new(String::from("x"))).unwrap();
        assert_eq!(value.left, "x");

        assert!((field.setter())(&mut value, Box::new(1_u8)).is_err());
        assert!((field.getter())(&1_u8).is_err());
    }

    #[test]
    fn dynamic_field_access() {
        let field = FieldDecl::dynamic::<Pair>(
            "right",
            <u32 as Typed>::type_info,
            |p| p.right.as_deref(),
            |p, v| p.right = Some(v),
        );
        let mut value = pair();
        assert!((field.getter())(&value).unwrap().is_none());

        (field.setter())(&mut value, Box::new(5_u64)).unwrap();
        let read = (field.getter())(&value).unwrap().unwrap();
        assert!(read.is::<u64>());
        assert!(field.declared().type_is::<u32>());
        assert!(field.clearer().is_none());
    }

    #[test]
    fn optional_dynamic_field_clears() {
        let field = FieldDecl::dynamic_optional::<Pair>(
            "right",
            <u32 as Typed>::type_info,
            |p| p.right.as_deref(),
            |p, v| p.right = v,
        );
        let mut value = pair();

        (field.setter())(&mut value, Box::new(5_u32)).unwrap();
        assert!(value.right.is_some());

        (field.clearer().unwrap())(&mut value).unwrap();
        assert!(value.right.is_none());
        assert!((field.clearer().unwrap())(&mut 1_u8).is_err());
    }
}
