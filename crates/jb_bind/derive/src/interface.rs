//! `#[bind_interface]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{ItemTrait, TraitItem};

use crate::attrs::{InterfaceAttrs, MethodAttrs, has_bind_attrs, strip_bind_attrs};
use crate::methods::{Target, method_decl};
use crate::path::{self, fp};

pub(crate) fn impl_bind_interface(
    attrs: InterfaceAttrs,
    mut item: ItemTrait,
) -> syn::Result<TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "`#[bind_interface]` does not support generic traits",
        ));
    }

    let jb_bind_path = path::jb_bind();
    let typed_ = path::typed_(&jb_bind_path);
    let type_info_ = path::type_info_(&jb_bind_path);
    let type_kind_ = path::type_kind_(&jb_bind_path);
    let cell_ = path::non_generic_type_info_cell_(&jb_bind_path);
    let class_decl_ = path::class_decl_(&jb_bind_path);
    let send_ = fp::send_();
    let sync_ = fp::sync_();

    let trait_ident = &item.ident;
    let receiver = quote! { __T };
    let call = quote! { <__T as #trait_ident> };
    let target = Target {
        receiver: &receiver,
        call: &call,
    };

    let mut decls = Vec::new();
    let mut errors: Option<syn::Error> = None;

    for trait_item in item.items.iter_mut() {
        let TraitItem::Fn(method) = trait_item else {
            continue;
        };
        let annotated = has_bind_attrs(&method.attrs);
        let result = MethodAttrs::parse_attrs(&method.attrs)
            .and_then(|attrs| method_decl(&jb_bind_path, &target, &method.sig, true, &attrs));
        strip_bind_attrs(&mut method.attrs);

        match result {
            Ok(decl) => decls.push(decl),
            Err(_) if !annotated => {}
            Err(err) => match &mut errors {
                Some(errors) => errors.combine(err),
                None => errors = Some(err),
            },
        }
    }

    if let Some(errors) = errors {
        return Err(errors);
    }

    let implements = attrs.implements.iter().map(|interface| {
        quote! { .implements(<dyn #interface>::bind_interface::<__T>()) }
    });

    Ok(quote! {
        #item

        impl #typed_ for dyn #trait_ident {
            fn type_info() -> &'static #type_info_ {
                static CELL: #cell_ = #cell_::new();
                CELL.get_or_init(|| #type_info_::new::<Self>(#type_kind_::Interface))
            }
        }

        impl dyn #trait_ident {
            /// Declarations of this interface, bound to the implementor `__T`.
            #[doc(hidden)]
            pub fn bind_interface<__T>() -> #class_decl_
            where
                __T: #trait_ident + #typed_ + #send_ + #sync_,
            {
                #class_decl_::new::<dyn #trait_ident>()
                    #(#implements)*
                    #(.method(#decls))*
            }
        }
    })
}
