#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Derive macros emit `jb_bind::..` paths. This alias makes them resolve
// inside the crate itself, including its unit tests.
extern crate self as jb_bind;

// -----------------------------------------------------------------------------
// Extern Crates

extern crate alloc;
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod impls;
mod reflection;

pub mod binding;
pub mod codec;
pub mod convert;
pub mod decl;
pub mod delegate;
pub mod error;
pub mod info;
pub mod model;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use codec::{Codec, CodecFactory};
pub use jb_bind_derive as derive;
pub use reflection::Reflect;
