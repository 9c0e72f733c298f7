//! [`Typed`](crate::info::Typed) for foreign types.
//!
//! ## Implemented Menu
//!
//! - leaves (serde delegate):
//!     - `bool`, `char`, `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//!     - `String`
//!     - `serde_json::Value`, [`Untyped`](crate::value::Untyped)
//!     - `core::time::Duration`
//! - containers (element-wise through the codec factory):
//!     - `Option<T>`, `[T; N]`
//!     - `Vec<T>`, `VecDeque<T>`, `BTreeSet<T>`, `HashSet<T>`
//!     - `BTreeMap<String, V>`, `HashMap<String, V>`, `IndexMap<String, V>`
//!
//! Container element types must be `Typed + Send + Sync`.

// -----------------------------------------------------------------------------
// Modules

mod collections;
mod leaf;
mod utils;
