use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::info::{TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Reflect

/// A value whose concrete type can be inspected at runtime.
///
/// Implemented for every [`Typed`] type that is `Send + Sync`. Codecs take
/// `&dyn Reflect` so that encoding can dispatch on the runtime type of a
/// value rather than its declared type.
///
/// # Examples
///
/// ```
/// use jb_bind::Reflect;
///
/// let value: Box<dyn Reflect> = Box::new(10_i32);
/// assert_eq!(value.reflect_type_info().type_path(), "i32");
/// assert_eq!(value.take::<i32>().unwrap(), 10);
/// ```
pub trait Reflect: Any + Send + Sync {
    /// Returns the [`TypeInfo`] of the underlying concrete type.
    fn reflect_type_info(&self) -> &'static TypeInfo;

    /// Casts this value to a reflected value.
    fn as_reflect(&self) -> &dyn Reflect;

    /// Boxes this value as a reflected value.
    fn into_boxed_reflect(self: Box<Self>) -> Box<dyn Reflect>;
}

impl<T: Typed + Send + Sync> Reflect for T {
    #[inline]
    fn reflect_type_info(&self) -> &'static TypeInfo {
        T::type_info()
    }

    #[inline]
    fn as_reflect(&self) -> &dyn Reflect {
        self
    }

    #[inline]
    fn into_boxed_reflect(self: Box<Self>) -> Box<dyn Reflect> {
        self
    }
}

impl dyn Reflect {
    /// Returns the [`TypeId`] of the underlying value.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        let any: &dyn Any = self;
        any.type_id()
    }

    /// Returns `true` if the underlying value is of type `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    pub fn take<T: Any>(self: Box<dyn Reflect>) -> Result<T, Box<dyn Reflect>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match <Box<dyn Any>>::downcast::<T>(self) {
            Ok(value) => Ok(*value),
            Err(_) => unreachable!("type is already checked"),
        }
    }
}

impl fmt::Debug for dyn Reflect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Reflect({})", self.reflect_type_info().type_path())
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::Reflect;

    #[test]
    fn take_checks_type() {
        let value: Box<dyn Reflect> = Box::new(String::from("a"));
        let value = value.take::<i32>().unwrap_err();
        assert!(value.is::<String>());
        assert_eq!(value.take::<String>().unwrap(), "a");
    }

    #[test]
    fn runtime_info_follows_value() {
        let value: &dyn Reflect = &7_u8;
        assert!(value.reflect_type_info().type_is::<u8>());
        assert_eq!(value.downcast_ref::<u8>(), Some(&7));
    }
}
