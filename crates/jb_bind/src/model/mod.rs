//! Per-type binding models.
//!
//! [`is_managed`] decides which types get a model, [`naming`] computes wire
//! names, and the builder merges a type's declared hierarchy into a
//! [`ClassModel`].

// -----------------------------------------------------------------------------
// Modules

mod builder;
mod class_model;
mod predicate;

pub mod naming;

// -----------------------------------------------------------------------------
// Exports

pub use class_model::{ClassModel, Slot};
pub use predicate::is_managed;

pub(crate) use builder::build;
