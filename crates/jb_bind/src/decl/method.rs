use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::Reflect;
use crate::decl::access::{Projection, mut_invoke, receiver_error, ref_invoke};
use crate::decl::{Annotations, Args, Invoker, Modifiers, ValueRef};
use crate::error::AccessError;
use crate::info::{TypeInfo, Typed};

/// How a method takes its receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// `&self`
    Ref,
    /// `&mut self`
    Mut,
}

/// A declared method.
///
/// The parameter and return types are recorded separately from the erased
/// body so shape rules can be checked without calling it.
#[derive(Clone)]
pub struct MethodDecl {
    name: &'static str,
    params: Vec<fn() -> &'static TypeInfo>,
    ret: Option<fn() -> &'static TypeInfo>,
    modifiers: Modifiers,
    annotations: Annotations,
    invoker: Invoker,
}

impl MethodDecl {
    /// A `&self` method with an arbitrary signature.
    pub fn by_ref<T, F>(
        name: &'static str,
        params: Vec<fn() -> &'static TypeInfo>,
        ret: Option<fn() -> &'static TypeInfo>,
        body: F,
    ) -> Self
    where
        T: Typed,
        F: for<'a> Fn(&'a T, Vec<Box<dyn Reflect>>) -> Result<Option<ValueRef<'a>>, AccessError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            params,
            ret,
            modifiers: Modifiers::empty(),
            annotations: Annotations::new(),
            invoker: Invoker::Ref(ref_invoke(move |obj, args| {
                match obj.downcast_ref::<T>() {
                    Some(this) => body(this, args),
                    None => Err(receiver_error::<T>()),
                }
            })),
        }
    }

    /// A `&mut self` method with an arbitrary signature.
    pub fn by_mut<T, F>(
        name: &'static str,
        params: Vec<fn() -> &'static TypeInfo>,
        ret: Option<fn() -> &'static TypeInfo>,
        body: F,
    ) -> Self
    where
        T: Typed,
        F: Fn(&mut T, Vec<Box<dyn Reflect>>) -> Result<Option<Box<dyn Reflect>>, AccessError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name,
            params,
            ret,
            modifiers: Modifiers::empty(),
            annotations: Annotations::new(),
            invoker: Invoker::Mut(mut_invoke(move |obj, args| {
                match obj.downcast_mut::<T>() {
                    Some(this) => body(this, args),
                    None => Err(receiver_error::<T>()),
                }
            })),
        }
    }

    /// `fn name(&self) -> R`
    pub fn getter<T, R>(name: &'static str, f: fn(&T) -> R) -> Self
    where
        T: Typed,
        R: Typed + Send + Sync,
    {
        Self::by_ref::<T, _>(name, Vec::new(), Some(R::type_info), move |this, args| {
            Args::new(args, 0)?;
            Ok(Some(ValueRef::Owned(Box::new(f(this)))))
        })
    }

    /// `fn name(&mut self, value: P)`
    pub fn setter<T, P>(name: &'static str, f: fn(&mut T, P)) -> Self
    where
        T: Typed,
        P: Typed + Send + Sync,
    {
        Self::by_mut::<T, _>(name, vec![P::type_info], None, move |this, args| {
            let mut args = Args::new(args, 1)?;
            f(this, args.arg::<P>()?);
            Ok(None)
        })
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
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Declared type of parameter `index`.
    pub fn param(&self, index: usize) -> Option<&'static TypeInfo> {
        self.params.get(index).map(|info| info())
    }

    pub(crate) fn param_fn(&self, index: usize) -> Option<fn() -> &'static TypeInfo> {
        self.params.get(index).copied()
    }

    /// Declared return type, `None` for `()`.
    pub fn ret(&self) -> Option<&'static TypeInfo> {
        self.ret.map(|info| info())
    }

    pub(crate) fn ret_fn(&self) -> Option<fn() -> &'static TypeInfo> {
        self.ret
    }

    #[inline]
    pub fn receiver(&self) -> Receiver {
        match self.invoker {
            Invoker::Ref(_) => Receiver::Ref,
            Invoker::Mut(_) => Receiver::Mut,
        }
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
    pub fn invoker(&self) -> &Invoker {
        &self.invoker
    }

    pub(crate) fn lift(mut self, projection: &Projection) -> Self {
        self.invoker = projection.lift_invoker(self.invoker);
        self
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;
    use alloc::vec;

    use super::{MethodDecl, Receiver};
    use crate::Reflect;
    use crate::decl::Invoker;
    use crate::error::AccessError;
    use crate::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};

    #[derive(Default)]
    struct Counter {
        hits: u32,
    }

    impl Typed for Counter {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::new::<Self>(TypeKind::Opaque))
        }
    }

    #[test]
    fn getter_and_setter_shapes() {
        let get = MethodDecl::getter::<Counter, u32>("get_hits", |c| c.hits);
        let set = MethodDecl::setter::<Counter, u32>("set_hits", |c, v| c.hits = v);

        assert_eq!(get.receiver(), Receiver::Ref);
        assert_eq!(get.param_count(), 0);
        assert!(get.ret().unwrap().type_is::<u32>());

        assert_eq!(set.receiver(), Receiver::Mut);
        assert!(set.param(0).unwrap().type_is::<u32>());
        assert!(set.ret().is_none());
    }

    #[test]
    fn invoke_round_trip() {
        let get = MethodDecl::getter::<Counter, u32>("get_hits", |c| c.hits);
        let set = MethodDecl::setter::<Counter, u32>("set_hits", |c, v| c.hits = v);
        let mut counter = Counter::default();

        let Invoker::Mut(body) = set.invoker() else {
            panic!("setter takes &mut self");
        };
        body(&mut counter, vec![Box::new(4_u32) as Box<dyn Reflect>]).unwrap();
        assert_eq!(counter.hits, 4);

        let wrong: Box<dyn Reflect> = Box::new(String::from("4"));
        let err = body(&mut counter, vec![wrong]).unwrap_err();
        assert!(matches!(err, AccessError::Argument { index: 0, .. }));

        let Invoker::Ref(body) = get.invoker() else {
            panic!("getter takes &self");
        };
        let value = body(&counter, vec![]).unwrap().unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&4));

        let err = body(&counter, vec![Box::new(1_u8) as Box<dyn Reflect>]).unwrap_err();
        assert_eq!(err, AccessError::Arity { expected: 0, found: 1 });
    }
}
