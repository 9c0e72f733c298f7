use core::any::{Any, TypeId};
use core::fmt;

use crate::decl::ClassDecl;
use crate::delegate::DelegateCodec;
use crate::info::ContainerOps;

// -----------------------------------------------------------------------------
// TypeKind

/// Coarse classification of a type.
///
/// Drives [`is_managed`](crate::model::is_managed): only `Struct`,
/// `Interface` and `Opaque` types take part in the binding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// `bool`, `char` and the numeric types.
    Primitive,
    /// `String`.
    Str,
    /// Enums, encoded by their delegate.
    Enum,
    /// `[T; N]`.
    Array,
    /// `Vec<T>`, `VecDeque<T>`.
    List,
    /// `HashSet<T>`, `BTreeSet<T>`.
    Set,
    /// String-keyed maps.
    Map,
    /// `Option<T>`.
    Optional,
    /// The generic tree nodes: `serde_json::Value` and [`Untyped`](crate::value::Untyped).
    Tree,
    /// Structs with declared members.
    Struct,
    /// `dyn Trait` for a trait declared with `#[bind_interface]`.
    Interface,
    /// Anything else.
    Opaque,
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Compile-time information about a type.
///
/// Usually obtained through [`Typed::type_info`](crate::info::Typed::type_info)
/// or, for a value, [`Reflect::reflect_type_info`](crate::Reflect::reflect_type_info).
#[derive(Clone)]
pub struct TypeInfo {
    ty_id: TypeId,
    type_path: &'static str,
    type_name: &'static str,
    kind: TypeKind,
    delegate: Option<DelegateCodec>,
    class: Option<fn() -> ClassDecl>,
    container: Option<ContainerOps>,
}

impl TypeInfo {
    /// Creates a new info for `T` with no delegate, class or container hooks.
    pub fn new<T: ?Sized + Any>(kind: TypeKind) -> Self {
        let type_path = core::any::type_name::<T>();
        Self {
            ty_id: TypeId::of::<T>(),
            type_path,
            type_name: short_name(type_path),
            kind,
            delegate: None,
            class: None,
            container: None,
        }
    }

    /// Sets the plain-shape codec.
    #[inline]
    pub fn with_delegate(mut self, delegate: DelegateCodec) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Sets the class declaration provider.
    #[inline]
    pub fn with_class(mut self, class: fn() -> ClassDecl) -> Self {
        self.class = Some(class);
        self
    }

    /// Sets the container operations.
    #[inline]
    pub fn with_container(mut self, container: ContainerOps) -> Self {
        self.container = Some(container);
        self
    }

    /// Overrides the path reported by [`TypeInfo::type_path`].
    ///
    /// `type_name` is recomputed from the new path.
    pub fn with_type_path(mut self, type_path: &'static str) -> Self {
        self.type_path = type_path;
        self.type_name = short_name(type_path);
        self
    }

    /// Returns the [`TypeId`] of the type.
    #[inline]
    pub fn ty_id(&self) -> TypeId {
        self.ty_id
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn type_is<T: ?Sized + Any>(&self) -> bool {
        self.ty_id == TypeId::of::<T>()
    }

    /// Full path, e.g. `alloc::vec::Vec<u8>`.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Last path segment without generics, e.g. `Vec`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    #[inline]
    pub fn delegate(&self) -> Option<&DelegateCodec> {
        self.delegate.as_ref()
    }

    #[inline]
    pub fn class(&self) -> Option<fn() -> ClassDecl> {
        self.class
    }

    #[inline]
    pub fn container(&self) -> Option<&ContainerOps> {
        self.container.as_ref()
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type_path", &self.type_path)
            .field("kind", &self.kind)
            .field("delegate", &self.delegate.is_some())
            .field("class", &self.class.is_some())
            .finish()
    }
}

// `alloc::vec::Vec<u8>` -> `Vec`, `dyn app::Named` -> `Named`.
fn short_name(path: &'static str) -> &'static str {
    let head = match path.find('<') {
        Some(index) => &path[..index],
        None => path,
    };
    let head = head.rsplit("::").next().unwrap_or(head);
    head.strip_prefix("dyn ").unwrap_or(head)
}
