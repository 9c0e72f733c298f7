//! Static type information.
//!
//! Every type that can flow through a codec exposes one `'static`
//! [`TypeInfo`] through [`Typed`]. It names the type, classifies it with a
//! [`TypeKind`], and carries the hooks the codec needs:
//!
//! - a [`DelegateCodec`](crate::delegate::DelegateCodec) for the plain declared shape;
//! - a class declaration for types with bindings;
//! - [`ContainerOps`] for sequences, optionals and string-keyed maps.

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod container;
mod type_info;
mod typed;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use container::{ContainerOps, MapOps, OptionalOps, SequenceOps};
pub use type_info::{TypeInfo, TypeKind};
pub use typed::Typed;
