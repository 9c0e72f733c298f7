//! Explicit member declarations.
//!
//! A [`ClassDecl`] lists what a type declares: fields, methods, the
//! interfaces it implements and the base it extends. Accessors are stored
//! type-erased so a model built from the declarations never needs to name
//! the concrete type.
//!
//! Declarations are normally generated by
//! [`#[derive(Bind)]`](crate::derive::Bind),
//! [`#[bind_methods]`](crate::derive::bind_methods) and
//! [`#[bind_interface]`](crate::derive::bind_interface), but can be written
//! by hand:
//!
//! ```
//! use jb_bind::decl::{Annotations, Class, ClassDecl, FieldDecl, MethodDecl, Modifiers};
//! use jb_bind::delegate::DelegateCodec;
//! use jb_bind::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};
//!
//! #[derive(Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Point {
//!     fn get_sum(&self) -> i32 {
//!         self.x + self.y
//!     }
//! }
//!
//! impl Typed for Point {
//!     fn type_info() -> &'static TypeInfo {
//!         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
//!         CELL.get_or_init(|| {
//!             TypeInfo::new::<Self>(TypeKind::Struct)
//!                 .with_delegate(DelegateCodec::skeleton::<Self>())
//!                 .with_class(<Self as Class>::class_decl)
//!         })
//!     }
//! }
//!
//! impl Class for Point {
//!     fn class_decl() -> ClassDecl {
//!         ClassDecl::new::<Self>()
//!             .field(FieldDecl::new::<Self, i32>("x", |p| &p.x, |p| &mut p.x).public())
//!             .field(
//!                 FieldDecl::new::<Self, i32>("y", |p| &p.y, |p| &mut p.y)
//!                     .with_annotations(Annotations::new().rename("vertical")),
//!             )
//!             .method(MethodDecl::getter::<Self, i32>("get_sum", Point::get_sum).public())
//!     }
//! }
//!
//! let decl = Point::class_decl();
//! assert_eq!(decl.declared_fields().len(), 2);
//! assert!(decl.declared_fields()[0].modifiers().contains(Modifiers::PUBLIC));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod access;
mod annotations;
mod class;
mod field;
mod method;

// -----------------------------------------------------------------------------
// Exports

pub use access::{
    Args, FieldClearer, FieldGetter, FieldSetter, Invoker, MutInvoke, RefInvoke, ValueRef,
};
pub use annotations::{Annotations, Modifiers};
pub use class::{Class, ClassDecl};
pub use field::FieldDecl;
pub use method::{MethodDecl, Receiver};

pub(crate) use access::Projection;
