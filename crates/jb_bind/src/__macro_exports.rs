//! Items referenced by the derive macros. Not public API.

pub use alloc::boxed::Box;
pub use alloc::string::String;
pub use alloc::vec::Vec;
pub use core::default::Default;

pub use serde_core::Serialize;
pub use serde_core::de::DeserializeOwned;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    pub use inventory;

    use crate::info::TypeInfo;

    /// A type submitted by `#[bind(auto_register)]`.
    pub struct AutoRegistration(pub fn() -> &'static TypeInfo);

    inventory::collect!(AutoRegistration);
}
