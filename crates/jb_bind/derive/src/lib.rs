//! Procedural macros of `jb_bind`.
//!
//! - [`Bind`]
//! - [`bind_methods`]
//! - [`bind_interface`]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemImpl, ItemTrait, parse_macro_input};

static BIND_ATTRIBUTE_NAME: &str = "bind";

// -----------------------------------------------------------------------------
// Modules

mod attrs;
mod auto_register;
mod derive_data;
mod interface;
mod methods;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Bindable Type Derivation
///
/// `#[derive(Bind)]` implements `Typed` and, for structs, `Class`.
///
/// Every named field is declared. Whether a declared field becomes a JSON
/// property is decided when the model is built: public fields and fields
/// carrying an annotation are bound, the rest stay in the delegate's output.
///
/// ## Type Attributes
///
/// - `skeleton`: the delegate writes `{}` and decodes through `Default`,
///   so only bindings carry data. Without it the type's own `serde`
///   implementations are the delegate.
/// - `methods`: include the declarations generated by `#[bind_methods]`
///   on an inherent impl of this type.
/// - `implements(Trait, ..)`: inherit the bindings of interfaces declared
///   with `#[bind_interface]`.
/// - `auto_register`: submit the type to `CodecFactory::auto_register`.
///   Ignored for generic types.
///
/// ```rust, ignore
/// #[derive(Bind, Default)]
/// #[bind(skeleton, methods, implements(Named))]
/// struct User { /* ... */ }
/// ```
///
/// ## Field Attributes
///
/// - `rename = "name"`: bind under exactly this name.
/// - `property`: bind a non-public field under its own name.
/// - `ignore`: never bind the name, even when another declaration exposes it.
/// - `transient`: skip the field unless it also carries an exposing annotation.
/// - `extends`: the field is the embedded base; its declarations are
///   inherited and the field itself is hidden.
/// - `declared = Type`: the field holds a `Box<dyn Reflect>` or an
///   `Option<Box<dyn Reflect>>` whose declared type is `Type`.
/// - `skip`: do not declare the field at all. Required for fields whose
///   type does not implement `Typed`.
///
/// ## Enums
///
/// Enums implement `Typed` only and are encoded by their `serde` delegate.
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::impl_bind(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Declares the methods of an inherent impl block.
///
/// Generates a hidden `__bind_methods` function that `#[bind(methods)]`
/// on the type picks up. Methods taking `&self` or `&mut self` with owned
/// parameters are declared; others are skipped, or rejected if they carry
/// a `#[bind(..)]` attribute.
///
/// ## Method Attributes
///
/// - `rename = "name"`, `property`, `ignore`: as on fields.
/// - `any_getter`: a `&self` method without parameters returning a
///   string-keyed map, whose entries are written as extra properties.
/// - `any_setter`: a `&mut self` method taking a `String` key and a value,
///   called for every unknown property.
///
/// ```rust, ignore
/// #[bind_methods]
/// impl User {
///     pub fn get_initial(&self) -> String { /* ... */ }
///
///     #[bind(any_setter)]
///     fn put_extra(&mut self, key: String, value: String) { /* ... */ }
/// }
/// ```
#[proc_macro_attribute]
pub fn bind_methods(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "`#[bind_methods]` takes no arguments",
        )
        .into_compile_error()
        .into();
    }
    let item = parse_macro_input!(item as ItemImpl);

    match methods::impl_bind_methods(item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Declares a trait as a bindable interface.
///
/// Implements `Typed` for `dyn Trait` and generates a hidden
/// `<dyn Trait>::bind_interface::<T>()` used by `implements(..)`. Trait
/// methods are declared the same way as with [`bind_methods`](macro@bind_methods)
/// and are always public.
///
/// `#[bind_interface(implements(Super))]` inherits another interface.
///
/// ```rust, ignore
/// #[bind_interface]
/// trait Named {
///     fn get_name(&self) -> String;
/// }
/// ```
#[proc_macro_attribute]
pub fn bind_interface(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut attrs = attrs::InterfaceAttrs::default();
    let parser = syn::meta::parser(|meta| attrs.parse_meta(meta));
    parse_macro_input!(attr with parser);
    let item = parse_macro_input!(item as ItemTrait);

    match interface::impl_bind_interface(attrs, item) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
