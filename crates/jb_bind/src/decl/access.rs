use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::{self, Vec};
use core::any::{Any, type_name};
use core::ops::Deref;

use crate::Reflect;
use crate::error::AccessError;

// -----------------------------------------------------------------------------
// Erased accessors

/// Reads a field from an erased receiver. `Ok(None)` means the field is empty.
pub type FieldGetter = Arc<
    dyn for<'a> Fn(&'a dyn Any) -> Result<Option<&'a dyn Reflect>, AccessError> + Send + Sync,
>;

/// Assigns a field on an erased receiver.
pub type FieldSetter =
    Arc<dyn Fn(&mut dyn Any, Box<dyn Reflect>) -> Result<(), AccessError> + Send + Sync>;

/// Empties an optional field on an erased receiver.
pub type FieldClearer = Arc<dyn Fn(&mut dyn Any) -> Result<(), AccessError> + Send + Sync>;

/// Calls a `&self` method on an erased receiver.
pub type RefInvoke = Arc<
    dyn for<'a> Fn(&'a dyn Any, Vec<Box<dyn Reflect>>) -> Result<Option<ValueRef<'a>>, AccessError>
        + Send
        + Sync,
>;

/// Calls a `&mut self` method on an erased receiver.
pub type MutInvoke = Arc<
    dyn Fn(&mut dyn Any, Vec<Box<dyn Reflect>>) -> Result<Option<Box<dyn Reflect>>, AccessError>
        + Send
        + Sync,
>;

/// A method body, by receiver kind.
#[derive(Clone)]
pub enum Invoker {
    Ref(RefInvoke),
    Mut(MutInvoke),
}

// Funnel closures through these so their higher-ranked signatures are inferred.

#[inline]
pub(crate) fn field_getter<F>(f: F) -> FieldGetter
where
    F: for<'a> Fn(&'a dyn Any) -> Result<Option<&'a dyn Reflect>, AccessError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

#[inline]
pub(crate) fn field_setter<F>(f: F) -> FieldSetter
where
    F: Fn(&mut dyn Any, Box<dyn Reflect>) -> Result<(), AccessError> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[inline]
pub(crate) fn field_clearer<F>(f: F) -> FieldClearer
where
    F: Fn(&mut dyn Any) -> Result<(), AccessError> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[inline]
pub(crate) fn ref_invoke<F>(f: F) -> RefInvoke
where
    F: for<'a> Fn(&'a dyn Any, Vec<Box<dyn Reflect>>) -> Result<Option<ValueRef<'a>>, AccessError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

#[inline]
pub(crate) fn mut_invoke<F>(f: F) -> MutInvoke
where
    F: Fn(&mut dyn Any, Vec<Box<dyn Reflect>>) -> Result<Option<Box<dyn Reflect>>, AccessError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

/// Error for a receiver that is not a `T`.
#[inline]
pub(crate) fn receiver_error<T: ?Sized>() -> AccessError {
    AccessError::Receiver {
        expected: type_name::<T>(),
    }
}

// -----------------------------------------------------------------------------
// ValueRef

/// A value produced by a getter, borrowed from the receiver or owned.
#[derive(Debug)]
pub enum ValueRef<'a> {
    Borrowed(&'a dyn Reflect),
    Owned(Box<dyn Reflect>),
}

impl Deref for ValueRef<'_> {
    type Target = dyn Reflect;

    #[inline]
    fn deref(&self) -> &dyn Reflect {
        match self {
            ValueRef::Borrowed(value) => *value,
            ValueRef::Owned(value) => &**value,
        }
    }
}

// -----------------------------------------------------------------------------
// Args

/// Typed access to the arguments of an erased method call.
///
/// ```
/// use jb_bind::Reflect;
/// use jb_bind::decl::Args;
///
/// let raw: Vec<Box<dyn Reflect>> = vec![Box::new(String::from("k")), Box::new(3_i32)];
/// let mut args = Args::new(raw, 2).unwrap();
/// assert_eq!(args.arg::<String>().unwrap(), "k");
/// assert!(args.arg::<u8>().is_err());
/// ```
pub struct Args {
    iter: vec::IntoIter<Box<dyn Reflect>>,
    expected: usize,
    index: usize,
}

impl Args {
    /// Checks the argument count.
    pub fn new(args: Vec<Box<dyn Reflect>>, expected: usize) -> Result<Self, AccessError> {
        if args.len() != expected {
            return Err(AccessError::Arity {
                expected,
                found: args.len(),
            });
        }
        Ok(Self {
            iter: args.into_iter(),
            expected,
            index: 0,
        })
    }

    /// Takes the next argument as a `P`.
    pub fn arg<P: Any>(&mut self) -> Result<P, AccessError> {
        let index = self.index;
        self.index += 1;
        let Some(arg) = self.iter.next() else {
            return Err(AccessError::Arity {
                expected: self.expected,
                found: index,
            });
        };
        arg.take::<P>().map_err(|arg| AccessError::Argument {
            index,
            expected: type_name::<P>(),
            found: arg.reflect_type_info().type_path(),
        })
    }
}

// -----------------------------------------------------------------------------
// Projection

type Upcast = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;
type UpcastMut = Arc<dyn for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync>;

#[inline]
fn upcast<F>(f: F) -> Upcast
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[inline]
fn upcast_mut<F>(f: F) -> UpcastMut
where
    F: for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Maps a derived receiver to its embedded base value.
///
/// Lifting an accessor declared on the base through a projection makes it
/// callable on the derived type.
#[derive(Clone)]
pub(crate) struct Projection {
    derived: &'static str,
    get: Upcast,
    get_mut: UpcastMut,
}

impl Projection {
    pub(crate) fn new<D: Any, B: Any>(get: fn(&D) -> &B, get_mut: fn(&mut D) -> &mut B) -> Self {
        Self {
            derived: type_name::<D>(),
            get: upcast(move |obj| obj.downcast_ref::<D>().map(|val| get(val) as &dyn Any)),
            get_mut: upcast_mut(move |obj| {
                obj.downcast_mut::<D>()
                    .map(|val| get_mut(val) as &mut dyn Any)
            }),
        }
    }

    fn error(&self) -> AccessError {
        AccessError::Receiver {
            expected: self.derived,
        }
    }

    pub(crate) fn lift_getter(&self, inner: FieldGetter) -> FieldGetter {
        let this = self.clone();
        field_getter(move |obj| match (this.get)(obj) {
            Some(base) => inner(base),
            None => Err(this.error()),
        })
    }

    pub(crate) fn lift_setter(&self, inner: FieldSetter) -> FieldSetter {
        let this = self.clone();
        field_setter(move |obj, value| match (this.get_mut)(obj) {
            Some(base) => inner(base, value),
            None => Err(this.error()),
        })
    }

    pub(crate) fn lift_clearer(&self, inner: FieldClearer) -> FieldClearer {
        let this = self.clone();
        field_clearer(move |obj| match (this.get_mut)(obj) {
            Some(base) => inner(base),
            None => Err(this.error()),
        })
    }

    pub(crate) fn lift_invoker(&self, inner: Invoker) -> Invoker {
        let this = self.clone();
        match inner {
            Invoker::Ref(inner) => Invoker::Ref(ref_invoke(move |obj, args| {
                match (this.get)(obj) {
                    Some(base) => inner(base, args),
                    None => Err(this.error()),
                }
            })),
            Invoker::Mut(inner) => Invoker::Mut(mut_invoke(move |obj, args| {
                match (this.get_mut)(obj) {
                    Some(base) => inner(base, args),
                    None => Err(this.error()),
                }
            })),
        }
    }
}
