//! `#[derive(Bind)]` for structs and enums.

use proc_macro2::{Span, TokenStream};
use quote::{quote, quote_spanned};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields, Generics, Type, Visibility, WhereClause};

use crate::attrs::{FieldAttrs, TypeAttrs, has_bind_attrs};
use crate::auto_register::get_auto_register_impl;
use crate::path::{self, fp};

// -----------------------------------------------------------------------------
// Entry

pub(crate) fn impl_bind(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let type_attrs = TypeAttrs::parse_attrs(&ast.attrs)?;
    let jb_bind_path = path::jb_bind();

    match &ast.data {
        Data::Struct(data) => impl_struct(ast, &type_attrs, &data.fields, &jb_bind_path),
        Data::Enum(_) => impl_enum(ast, &type_attrs, &jb_bind_path),
        Data::Union(data) => Err(syn::Error::new(
            data.union_token.span(),
            "`#[derive(Bind)]` does not support unions",
        )),
    }
}

// -----------------------------------------------------------------------------
// Shared pieces

/// Adds `Typed + Send + Sync` to every type parameter and the delegate's
/// requirements to the type itself.
fn where_clause_with_bounds(
    ast: &DeriveInput,
    delegate_bound: &TokenStream,
    jb_bind_path: &syn::Path,
) -> Option<WhereClause> {
    let generics: &Generics = &ast.generics;
    if generics.type_params().next().is_none() {
        return generics.where_clause.clone();
    }

    let typed_ = path::typed_(jb_bind_path);
    let send_ = fp::send_();
    let sync_ = fp::sync_();
    let ident = &ast.ident;
    let (_, ty_generics, _) = generics.split_for_impl();

    let mut where_clause = generics.where_clause.clone().unwrap_or_else(|| WhereClause {
        where_token: Default::default(),
        predicates: Default::default(),
    });
    for param in generics.type_params() {
        let param = &param.ident;
        where_clause
            .predicates
            .push(syn::parse_quote! { #param: #typed_ + #send_ + #sync_ });
    }
    where_clause
        .predicates
        .push(syn::parse_quote! { #ident #ty_generics: #delegate_bound });
    Some(where_clause)
}

fn delegate(
    type_attrs: &TypeAttrs,
    jb_bind_path: &syn::Path,
) -> (TokenStream, TokenStream) {
    let delegate_codec_ = path::delegate_codec_(jb_bind_path);
    let macro_exports_ = path::macro_exports_(jb_bind_path);

    if type_attrs.skeleton.is_some() {
        (
            quote! { #delegate_codec_::skeleton::<Self>() },
            quote! { #macro_exports_::Default },
        )
    } else {
        (
            quote! { #delegate_codec_::serde::<Self>() },
            quote! { #macro_exports_::Serialize + #macro_exports_::DeserializeOwned },
        )
    }
}

fn typed_impl(
    ast: &DeriveInput,
    where_clause: Option<&WhereClause>,
    info: TokenStream,
    jb_bind_path: &syn::Path,
) -> TokenStream {
    let typed_ = path::typed_(jb_bind_path);
    let type_info_ = path::type_info_(jb_bind_path);
    let ident = &ast.ident;
    let (impl_generics, ty_generics, _) = ast.generics.split_for_impl();

    let body = if ast.generics.type_params().next().is_none() {
        let cell_ = path::non_generic_type_info_cell_(jb_bind_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_init(|| #info)
        }
    } else {
        let cell_ = path::generic_type_info_cell_(jb_bind_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_insert::<Self>(|| #info)
        }
    };

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #type_info_ {
                #body
            }
        }
    }
}

fn reject_attr(span: Span, what: &str) -> syn::Error {
    syn::Error::new(span, format!("`{what}` is only supported on structs"))
}

// -----------------------------------------------------------------------------
// Enum

fn impl_enum(
    ast: &DeriveInput,
    type_attrs: &TypeAttrs,
    jb_bind_path: &syn::Path,
) -> syn::Result<TokenStream> {
    if let Some(span) = type_attrs.skeleton {
        return Err(reject_attr(span, "skeleton"));
    }
    if let Some(span) = type_attrs.methods {
        return Err(reject_attr(span, "methods"));
    }
    if let Some(interface) = type_attrs.implements.first() {
        return Err(reject_attr(interface.span(), "implements"));
    }

    let type_info_ = path::type_info_(jb_bind_path);
    let type_kind_ = path::type_kind_(jb_bind_path);
    let (delegate, delegate_bound) = delegate(type_attrs, jb_bind_path);
    let where_clause = where_clause_with_bounds(ast, &delegate_bound, jb_bind_path);

    let info = quote! {
        #type_info_::new::<Self>(#type_kind_::Enum).with_delegate(#delegate)
    };
    let typed_impl = typed_impl(ast, where_clause.as_ref(), info, jb_bind_path);
    let auto_register = get_auto_register_impl(ast, type_attrs, jb_bind_path);

    Ok(quote! {
        const _: () = {
            #typed_impl
            #auto_register
        };
    })
}

// -----------------------------------------------------------------------------
// Struct

/// Constructor and accessors for a `declared = Type` field holding
/// `Box<dyn Reflect>` or `Option<Box<dyn Reflect>>`.
fn dynamic_accessors(
    field: &Field,
    ident: &syn::Ident,
) -> (TokenStream, TokenStream, TokenStream) {
    let option_ = fp::option_();
    let optional = matches!(
        &field.ty,
        Type::Path(path) if path.path.segments.last().is_some_and(|seg| seg.ident == "Option")
    );

    if optional {
        (
            quote! { dynamic_optional },
            quote! { |__this| __this.#ident.as_deref() },
            quote! { |__this, __value| __this.#ident = __value },
        )
    } else {
        (
            quote! { dynamic },
            quote! { |__this| #option_::Some(&*__this.#ident) },
            quote! { |__this, __value| __this.#ident = __value },
        )
    }
}

fn impl_struct(
    ast: &DeriveInput,
    type_attrs: &TypeAttrs,
    fields: &Fields,
    jb_bind_path: &syn::Path,
) -> syn::Result<TokenStream> {
    let typed_ = path::typed_(jb_bind_path);
    let type_info_ = path::type_info_(jb_bind_path);
    let type_kind_ = path::type_kind_(jb_bind_path);
    let class_ = path::class_(jb_bind_path);
    let class_decl_ = path::class_decl_(jb_bind_path);
    let field_decl_ = path::field_decl_(jb_bind_path);
    let modifiers_ = path::modifiers_(jb_bind_path);

    let mut field_decls = Vec::new();
    let mut extends: Option<TokenStream> = None;

    for field in fields.iter() {
        let Some(ident) = &field.ident else {
            if has_bind_attrs(&field.attrs) {
                return Err(syn::Error::new(
                    field.span(),
                    "bind attributes require named fields",
                ));
            }
            continue;
        };
        let attrs = FieldAttrs::parse_attrs(&field.attrs)?;
        if attrs.skip.is_some() {
            continue;
        }

        let name = ident.unraw().to_string();
        let ty = &field.ty;

        if let Some(span) = attrs.extends {
            if extends.is_some() {
                return Err(syn::Error::new(span, "only one field can be marked `extends`"));
            }
            extends = Some(quote_spanned! { span =>
                .extends::<Self, #ty>(|__this| &__this.#ident, |__this| &mut __this.#ident)
                .hide(#name)
            });
            continue;
        }

        let mut modifiers = Vec::new();
        if matches!(field.vis, Visibility::Public(_)) {
            modifiers.push(quote! { .union(#modifiers_::PUBLIC) });
        }
        if attrs.transient.is_some() {
            modifiers.push(quote! { .union(#modifiers_::TRANSIENT) });
        }
        let annotations = attrs.annotations.to_tokens(jb_bind_path);

        let decl = match &attrs.declared {
            Some(declared) => {
                let (constructor, get, set) = dynamic_accessors(field, ident);
                quote_spanned! { field.span() =>
                    #field_decl_::#constructor::<Self>(
                        #name,
                        <#declared as #typed_>::type_info,
                        #get,
                        #set,
                    )
                }
            }
            None => quote_spanned! { field.span() =>
                #field_decl_::new::<Self, #ty>(
                    #name,
                    |__this| &__this.#ident,
                    |__this| &mut __this.#ident,
                )
            },
        };

        field_decls.push(quote! {
            #decl
                .with_modifiers(#modifiers_::empty() #(#modifiers)*)
                .with_annotations(#annotations)
        });
    }

    let interfaces = type_attrs.implements.iter().map(|interface| {
        quote! { .implements(<dyn #interface>::bind_interface::<Self>()) }
    });
    let methods = type_attrs
        .methods
        .map(|span| quote_spanned! { span => .methods(Self::__bind_methods()) });

    let (delegate, delegate_bound) = delegate(type_attrs, jb_bind_path);
    let where_clause = where_clause_with_bounds(ast, &delegate_bound, jb_bind_path);

    let info = quote! {
        #type_info_::new::<Self>(#type_kind_::Struct)
            .with_delegate(#delegate)
            .with_class(<Self as #class_>::class_decl)
    };
    let typed_impl = typed_impl(ast, where_clause.as_ref(), info, jb_bind_path);
    let auto_register = get_auto_register_impl(ast, type_attrs, jb_bind_path);

    let ident = &ast.ident;
    let (impl_generics, ty_generics, _) = ast.generics.split_for_impl();

    Ok(quote! {
        const _: () = {
            #typed_impl

            impl #impl_generics #class_ for #ident #ty_generics #where_clause {
                fn class_decl() -> #class_decl_ {
                    #class_decl_::new::<Self>()
                        #(#interfaces)*
                        #extends
                        #(.field(#field_decls))*
                        #methods
                }
            }

            #auto_register
        };
    })
}
