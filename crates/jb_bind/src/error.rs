//! Error types.
//!
//! - [`ConfigError`]: a type's binding declarations are malformed. Raised once,
//!   when the type's model is first built, and memoized afterwards.
//! - [`EncodeError`] / [`DecodeError`]: per-call failures. They never affect
//!   cached models or converters.
//! - [`AccessError`]: a type-erased accessor was handed the wrong receiver,
//!   argument or value type.

use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// AccessError

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("receiver mismatch: expected `{expected}`")]
    Receiver { expected: &'static str },

    #[error("argument {index} mismatch: expected `{expected}`, found `{found}`")]
    Argument {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("arity mismatch: expected {expected} arguments, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("value mismatch: expected `{expected}`, found `{found}`")]
    Value {
        expected: &'static str,
        found: &'static str,
    },
}

// -----------------------------------------------------------------------------
// ConfigError

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid any-getter `{method}`: {reason}")]
    AnyGetterSignature { method: String, reason: &'static str },

    #[error("invalid any-setter `{method}`: {reason}")]
    AnySetterSignature { method: String, reason: &'static str },

    #[error("`{type_path}` declares more than one any-getter: `{first}` and `{second}`")]
    DuplicateAnyGetter {
        type_path: &'static str,
        first: String,
        second: String,
    },

    #[error("`{type_path}` declares more than one any-setter: `{first}` and `{second}`")]
    DuplicateAnySetter {
        type_path: &'static str,
        first: String,
        second: String,
    },

    #[error("`{type_path}` has neither a delegate codec nor container support")]
    Unsupported { type_path: &'static str },
}

// -----------------------------------------------------------------------------
// EncodeError

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("delegate codec of `{type_path}` failed: {source}")]
    Delegate {
        type_path: &'static str,
        source: serde_json::Error,
    },

    #[error("delegate codec of `{type_path}` did not produce a JSON object")]
    NotAnObject { type_path: &'static str },

    #[error("cannot read `{member}`: {source}")]
    Access { member: String, source: AccessError },

    #[error("cannot encode `{binding}`: {source}")]
    Binding {
        binding: String,
        source: Box<EncodeError>,
    },

    #[error("cannot encode element `{at}` of `{type_path}`: {source}")]
    Element {
        type_path: &'static str,
        at: String,
        source: Box<EncodeError>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot write JSON text: {0}")]
    Write(serde_json::Error),
}

// -----------------------------------------------------------------------------
// DecodeError

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("delegate codec of `{type_path}` failed: {source}")]
    Delegate {
        type_path: &'static str,
        source: serde_json::Error,
    },

    #[error("expected a JSON {expected} for `{type_path}`, found {found}")]
    Shape {
        type_path: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("cannot decode `{binding}`: {source}")]
    Binding {
        binding: String,
        source: Box<DecodeError>,
    },

    #[error("cannot decode element `{at}` of `{type_path}`: {source}")]
    Element {
        type_path: &'static str,
        at: String,
        source: Box<DecodeError>,
    },

    #[error("cannot write `{member}`: {source}")]
    Access { member: String, source: AccessError },

    #[error("`{type_path}` has no delegate codec to build an instance from")]
    NoDelegate { type_path: &'static str },

    #[error("decoded `{found}` where `{expected}` was requested")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl DecodeError {
    /// Name of the JSON node kind, for [`DecodeError::Shape`].
    pub(crate) fn node_kind(node: &serde_json::Value) -> &'static str {
        use serde_json::Value;
        match node {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}
