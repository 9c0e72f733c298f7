//! Generic decoded values.
//!
//! [`Untyped`] is what a binding declared with no concrete shape decodes to.
//! Unlike [`serde_json::Value`], numbers come back as the narrowest exact
//! integer when they are integral, see [`normalize`].

// -----------------------------------------------------------------------------
// Modules

mod normalize;
mod untyped;

// -----------------------------------------------------------------------------
// Exports

pub use normalize::{normalize, normalize_float};
pub use untyped::Untyped;
