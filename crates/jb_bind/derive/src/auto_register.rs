use proc_macro2::TokenStream;
use syn::DeriveInput;

use crate::attrs::TypeAttrs;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(
    ast: &DeriveInput,
    type_attrs: &TypeAttrs,
    jb_bind_path: &syn::Path,
) -> TokenStream {
    let Some(span) = type_attrs.auto_register else {
        return TokenStream::new();
    };
    // Invalid for generic types.
    if ast.generics.type_params().next().is_some() {
        return TokenStream::new();
    }

    let auto_register_ = crate::path::auto_register_(jb_bind_path);
    let typed_ = crate::path::typed_(jb_bind_path);
    let ident = &ast.ident;

    quote::quote_spanned! { span =>
        #auto_register_::inventory::submit!{
            #auto_register_::AutoRegistration(<#ident as #typed_>::type_info)
        }
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &DeriveInput, _: &TypeAttrs, _: &syn::Path) -> TokenStream {
    TokenStream::new()
}
