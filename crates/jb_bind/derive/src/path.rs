//! Paths into `jb_bind` used by generated code.
//!
//! Kept in one place so a layout change in `jb_bind` only touches this file.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `jb_bind` crate.
///
/// 1. For crates that depend on `jb_bind`, `::jb_bind` is returned.
/// 2. For crates that depend on `jsonbind`, `::jsonbind::bind` is returned.
/// 3. Otherwise `::jb_bind`, which also covers `jb_bind` itself through
///    its `extern crate self` alias.
///
/// Reads the caller's manifest, so resolve once per expansion and pass the
/// path down.
pub(crate) fn jb_bind() -> syn::Path {
    jb_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("jb_bind"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn macro_exports_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::__macro_exports }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::__macro_exports::auto_register }
}

#[inline(always)]
pub(crate) fn reflect_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::Reflect }
}

#[inline(always)]
pub(crate) fn typed_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::info::Typed }
}

#[inline(always)]
pub(crate) fn type_info_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::info::TypeInfo }
}

#[inline(always)]
pub(crate) fn type_kind_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::info::TypeKind }
}

#[inline(always)]
pub(crate) fn non_generic_type_info_cell_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::info::NonGenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn generic_type_info_cell_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::info::GenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn delegate_codec_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::delegate::DelegateCodec }
}

#[inline(always)]
pub(crate) fn class_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::decl::Class }
}

#[inline(always)]
pub(crate) fn class_decl_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::decl::ClassDecl }
}

#[inline(always)]
pub(crate) fn field_decl_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::decl::FieldDecl }
}

#[inline(always)]
pub(crate) fn method_decl_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::decl::MethodDecl }
}

#[inline(always)]
pub(crate) fn modifiers_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::decl::Modifiers }
}

#[inline(always)]
pub(crate) fn annotations_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::decl::Annotations }
}

#[inline(always)]
pub(crate) fn args_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::decl::Args }
}

#[inline(always)]
pub(crate) fn value_ref_(jb_bind_path: &syn::Path) -> TokenStream {
    quote! { #jb_bind_path::decl::ValueRef }
}

// -----------------------------------------------------------------------------
// Fully qualified std items

pub(crate) mod fp {
    use proc_macro2::TokenStream;
    use quote::quote;

    #[inline(always)]
    pub(crate) fn option_() -> TokenStream {
        quote! { ::core::option::Option }
    }

    #[inline(always)]
    pub(crate) fn result_() -> TokenStream {
        quote! { ::core::result::Result }
    }

    #[inline(always)]
    pub(crate) fn send_() -> TokenStream {
        quote! { ::core::marker::Send }
    }

    #[inline(always)]
    pub(crate) fn sync_() -> TokenStream {
        quote! { ::core::marker::Sync }
    }
}
