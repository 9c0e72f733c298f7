use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to a type's [`TypeInfo`].
///
/// Implemented by [`#[derive(Bind)]`](crate::derive::Bind) for structs and
/// enums, by [`#[bind_interface]`](crate::derive::bind_interface) for
/// `dyn Trait`, and by this crate for primitives and std containers.
///
/// # Manually Impl
///
/// Use [`NonGenericTypeInfoCell`] or [`GenericTypeInfoCell`] so the info is
/// created once:
///
/// ```
/// use jb_bind::delegate::DelegateCodec;
/// use jb_bind::info::{NonGenericTypeInfoCell, TypeInfo, TypeKind, Typed};
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// struct Meters(f64);
///
/// impl Typed for Meters {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| {
///             TypeInfo::new::<Self>(TypeKind::Opaque).with_delegate(DelegateCodec::serde::<Self>())
///         })
///     }
/// }
///
/// assert_eq!(Meters::type_info().type_name(), "Meters");
/// ```
///
/// [`NonGenericTypeInfoCell`]: crate::info::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::info::GenericTypeInfoCell
pub trait Typed: 'static {
    /// Returns the compile-time info for the underlying type.
    fn type_info() -> &'static TypeInfo;
}
