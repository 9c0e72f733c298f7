//! `#[bind_methods]` and the method declarations shared with `#[bind_interface]`.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, quote_spanned};
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{FnArg, GenericParam, ImplItem, ItemImpl, ReturnType, Signature, Type, Visibility};

use crate::attrs::{MethodAttrs, has_bind_attrs, strip_bind_attrs};
use crate::path::{self, fp};

// -----------------------------------------------------------------------------
// Signature shape

enum Ret {
    Unit,
    Owned(Type),
    Borrowed(Type),
    Str,
}

struct Shape {
    mutable: bool,
    params: Vec<Type>,
    ret: Ret,
}

fn is_str(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.qself.is_none() && path.path.is_ident("str"))
}

fn unsupported(span: Span, reason: &str) -> syn::Error {
    syn::Error::new(span, format!("method cannot be bound: {reason}"))
}

fn shape(sig: &Signature) -> syn::Result<Shape> {
    if sig.asyncness.is_some() {
        return Err(unsupported(sig.asyncness.span(), "`async` methods are not supported"));
    }
    if let Some(variadic) = &sig.variadic {
        return Err(unsupported(variadic.span(), "variadic methods are not supported"));
    }
    if let Some(param) = sig
        .generics
        .params
        .iter()
        .find(|param| !matches!(param, GenericParam::Lifetime(_)))
    {
        return Err(unsupported(param.span(), "generic methods are not supported"));
    }

    let Some(receiver) = sig.receiver() else {
        return Err(unsupported(sig.ident.span(), "static methods are never bound"));
    };
    if receiver.reference.is_none() || receiver.colon_token.is_some() {
        return Err(unsupported(receiver.span(), "expected `&self` or `&mut self`"));
    }
    let mutable = receiver.mutability.is_some();

    let mut params = Vec::new();
    for input in sig.inputs.iter().skip(1) {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        match &*pat_type.ty {
            Type::Reference(_) | Type::ImplTrait(_) => {
                return Err(unsupported(pat_type.ty.span(), "parameters must be owned"));
            }
            ty => params.push(ty.clone()),
        }
    }

    let ret = match &sig.output {
        ReturnType::Default => Ret::Unit,
        ReturnType::Type(_, ty) => match &**ty {
            Type::Tuple(tuple) if tuple.elems.is_empty() => Ret::Unit,
            Type::ImplTrait(_) => {
                return Err(unsupported(ty.span(), "`impl Trait` return types are not supported"));
            }
            Type::Reference(reference) if reference.mutability.is_some() => {
                return Err(unsupported(ty.span(), "cannot return `&mut`"));
            }
            Type::Reference(reference) if is_str(&reference.elem) => Ret::Str,
            Type::Reference(_) if mutable => {
                return Err(unsupported(ty.span(), "`&mut self` methods must return owned values"));
            }
            Type::Reference(reference) => Ret::Borrowed((*reference.elem).clone()),
            ty => Ret::Owned(ty.clone()),
        },
    };

    Ok(Shape { mutable, params, ret })
}

// -----------------------------------------------------------------------------
// MethodDecl

/// Where a declaration points.
pub(crate) struct Target<'a> {
    /// The receiver type passed to `MethodDecl::by_ref`/`by_mut`.
    pub receiver: &'a TokenStream,
    /// The path the method is called through, e.g. `Self` or `<T as Trait>`.
    pub call: &'a TokenStream,
}

/// Builds a `MethodDecl` expression for one method.
pub(crate) fn method_decl(
    jb_bind_path: &syn::Path,
    target: &Target,
    sig: &Signature,
    public: bool,
    attrs: &MethodAttrs,
) -> syn::Result<TokenStream> {
    let shape = shape(sig)?;

    let typed_ = path::typed_(jb_bind_path);
    let type_info_ = path::type_info_(jb_bind_path);
    let method_decl_ = path::method_decl_(jb_bind_path);
    let args_ = path::args_(jb_bind_path);
    let value_ref_ = path::value_ref_(jb_bind_path);
    let reflect_ = path::reflect_(jb_bind_path);
    let macro_exports_ = path::macro_exports_(jb_bind_path);
    let option_ = fp::option_();
    let result_ = fp::result_();

    let receiver = target.receiver;
    let call = target.call;
    let ident = &sig.ident;
    let name = ident.unraw().to_string();

    let param_infos = shape.params.iter().map(|ty| {
        quote! { <#ty as #typed_>::type_info as fn() -> &'static #type_info_ }
    });
    let arg_idents: Vec<_> = (0..shape.params.len())
        .map(|index| format_ident!("__arg{}", index))
        .collect();
    let arg_types = &shape.params;
    let count = shape.params.len();

    let take_args = if count == 0 {
        quote! { #args_::new(__args, 0)?; }
    } else {
        quote! {
            let mut __args = #args_::new(__args, #count)?;
            #(let #arg_idents = __args.arg::<#arg_types>()?;)*
        }
    };

    let ret_info = match &shape.ret {
        Ret::Unit => quote! { #option_::None },
        Ret::Owned(ty) | Ret::Borrowed(ty) => quote! { #option_::Some(<#ty as #typed_>::type_info) },
        Ret::Str => quote! { #option_::Some(<#macro_exports_::String as #typed_>::type_info) },
    };

    let invoke = quote! { #call::#ident(__this, #(#arg_idents),*) };
    let body = match (&shape.ret, shape.mutable) {
        (Ret::Unit, _) => quote! {
            #invoke;
            #result_::Ok(#option_::None)
        },
        (Ret::Owned(_), false) => quote! {
            #result_::Ok(#option_::Some(#value_ref_::Owned(#macro_exports_::Box::new(#invoke))))
        },
        (Ret::Str, false) => quote! {
            #result_::Ok(#option_::Some(#value_ref_::Owned(#macro_exports_::Box::new(
                #macro_exports_::String::from(#invoke),
            ))))
        },
        (Ret::Borrowed(_), false) => quote! {
            #result_::Ok(#option_::Some(#value_ref_::Borrowed(#invoke)))
        },
        (Ret::Owned(_), true) => quote! {
            let __ret: #macro_exports_::Box<dyn #reflect_> = #macro_exports_::Box::new(#invoke);
            #result_::Ok(#option_::Some(__ret))
        },
        (Ret::Str, true) => quote! {
            let __ret: #macro_exports_::Box<dyn #reflect_> =
                #macro_exports_::Box::new(#macro_exports_::String::from(#invoke));
            #result_::Ok(#option_::Some(__ret))
        },
        // Rejected by `shape`.
        (Ret::Borrowed(_), true) => unreachable!(),
    };

    let constructor = if shape.mutable {
        quote! { by_mut }
    } else {
        quote! { by_ref }
    };
    let public = public.then(|| quote! { .public() });
    let annotations = attrs.annotations.to_tokens(jb_bind_path);

    Ok(quote_spanned! { sig.span() =>
        #method_decl_::#constructor::<#receiver, _>(
            #name,
            <#macro_exports_::Vec<fn() -> &'static #type_info_>>::from([#(#param_infos),*]),
            #ret_info,
            |__this, __args| {
                #take_args
                #body
            },
        )
        #public
        .with_annotations(#annotations)
    })
}

// -----------------------------------------------------------------------------
// #[bind_methods]

pub(crate) fn impl_bind_methods(mut item: ItemImpl) -> syn::Result<TokenStream> {
    if let Some((_, trait_path, _)) = &item.trait_ {
        return Err(syn::Error::new(
            trait_path.span(),
            "`#[bind_methods]` expects an inherent impl block",
        ));
    }

    let jb_bind_path = path::jb_bind();
    let macro_exports_ = path::macro_exports_(&jb_bind_path);
    let method_decl_ = path::method_decl_(&jb_bind_path);

    let receiver = quote! { Self };
    let call = quote! { Self };
    let target = Target {
        receiver: &receiver,
        call: &call,
    };

    let mut decls = Vec::new();
    let mut errors: Option<syn::Error> = None;

    for impl_item in item.items.iter_mut() {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        let annotated = has_bind_attrs(&method.attrs);
        let result = MethodAttrs::parse_attrs(&method.attrs).and_then(|attrs| {
            let public = matches!(method.vis, Visibility::Public(_));
            method_decl(&jb_bind_path, &target, &method.sig, public, &attrs)
        });
        strip_bind_attrs(&mut method.attrs);

        match result {
            Ok(decl) => decls.push(decl),
            // Unannotated methods that cannot be bound are left alone.
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

    let self_ty = &item.self_ty;
    let (impl_generics, _, where_clause) = item.generics.split_for_impl();

    Ok(quote! {
        #item

        impl #impl_generics #self_ty #where_clause {
            #[doc(hidden)]
            pub fn __bind_methods() -> #macro_exports_::Vec<#method_decl_> {
                <#macro_exports_::Vec<#method_decl_>>::from([#(#decls),*])
            }
        }
    })
}
