//! Parsing of `#[bind(..)]` attributes.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr, Path, Type};

use crate::BIND_ATTRIBUTE_NAME;
use crate::path::annotations_;

fn set_flag(flag: &mut Option<Span>, meta: &ParseNestedMeta) -> syn::Result<()> {
    if flag.is_some() {
        return Err(meta.error("duplicate bind attribute"));
    }
    *flag = Some(meta.path.span());
    Ok(())
}

fn set_value<T>(slot: &mut Option<T>, meta: &ParseNestedMeta, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(meta.error("duplicate bind attribute"));
    }
    *slot = Some(value);
    Ok(())
}

fn bind_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident(BIND_ATTRIBUTE_NAME))
}

/// Removes every `#[bind(..)]` attribute.
pub(crate) fn strip_bind_attrs(attrs: &mut Vec<Attribute>) {
    attrs.retain(|attr| !attr.path().is_ident(BIND_ATTRIBUTE_NAME));
}

/// Returns `true` if `attrs` holds a `#[bind(..)]` attribute.
pub(crate) fn has_bind_attrs(attrs: &[Attribute]) -> bool {
    bind_attrs(attrs).next().is_some()
}

// -----------------------------------------------------------------------------
// Member annotations

/// Annotations shared by fields and methods.
#[derive(Default)]
pub(crate) struct MemberAnnotations {
    pub rename: Option<LitStr>,
    pub property: Option<Span>,
    pub ignore: Option<Span>,
    pub any_getter: Option<Span>,
    pub any_setter: Option<Span>,
}

impl MemberAnnotations {
    /// Parses one annotation. Returns `false` if `meta` is not an annotation.
    fn parse_meta(&mut self, meta: &ParseNestedMeta, methods: bool) -> syn::Result<bool> {
        if meta.path.is_ident("rename") {
            let lit: LitStr = meta.value()?.parse()?;
            if lit.value().is_empty() {
                return Err(syn::Error::new(lit.span(), "`rename` must not be empty"));
            }
            set_value(&mut self.rename, meta, lit)?;
        } else if meta.path.is_ident("property") {
            set_flag(&mut self.property, meta)?;
        } else if meta.path.is_ident("ignore") {
            set_flag(&mut self.ignore, meta)?;
        } else if methods && meta.path.is_ident("any_getter") {
            set_flag(&mut self.any_getter, meta)?;
        } else if methods && meta.path.is_ident("any_setter") {
            set_flag(&mut self.any_setter, meta)?;
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    pub fn is_empty(&self) -> bool {
        self.rename.is_none()
            && self.property.is_none()
            && self.ignore.is_none()
            && self.any_getter.is_none()
            && self.any_setter.is_none()
    }

    /// Builds the `Annotations` expression.
    pub fn to_tokens(&self, jb_bind_path: &Path) -> TokenStream {
        let annotations_ = annotations_(jb_bind_path);

        let rename = self.rename.as_ref().map(|lit| quote! { .rename(#lit) });
        let property = self.property.map(|_| quote! { .property() });
        let ignore = self.ignore.map(|_| quote! { .ignore() });
        let any_getter = self.any_getter.map(|_| quote! { .any_getter() });
        let any_setter = self.any_setter.map(|_| quote! { .any_setter() });

        quote! {
            #annotations_::new() #rename #property #ignore #any_getter #any_setter
        }
    }
}

// -----------------------------------------------------------------------------
// Type attributes

/// `#[bind(..)]` on a struct or enum.
#[derive(Default)]
pub(crate) struct TypeAttrs {
    pub skeleton: Option<Span>,
    pub methods: Option<Span>,
    pub auto_register: Option<Span>,
    pub implements: Vec<Path>,
}

impl TypeAttrs {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in bind_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skeleton") {
                    set_flag(&mut this.skeleton, &meta)
                } else if meta.path.is_ident("methods") {
                    set_flag(&mut this.methods, &meta)
                } else if meta.path.is_ident("auto_register") {
                    set_flag(&mut this.auto_register, &meta)
                } else if meta.path.is_ident("implements") {
                    meta.parse_nested_meta(|inner| {
                        this.implements.push(inner.path);
                        Ok(())
                    })
                } else {
                    Err(meta.error(
                        "unsupported type attribute, expected `skeleton`, `methods`, `implements(..)` or `auto_register`",
                    ))
                }
            })?;
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Field attributes

/// `#[bind(..)]` on a struct field.
#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub annotations: MemberAnnotations,
    pub transient: Option<Span>,
    pub extends: Option<Span>,
    pub skip: Option<Span>,
    pub declared: Option<Type>,
}

impl FieldAttrs {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in bind_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if this.annotations.parse_meta(&meta, false)? {
                    Ok(())
                } else if meta.path.is_ident("transient") {
                    set_flag(&mut this.transient, &meta)
                } else if meta.path.is_ident("extends") {
                    set_flag(&mut this.extends, &meta)
                } else if meta.path.is_ident("skip") {
                    set_flag(&mut this.skip, &meta)
                } else if meta.path.is_ident("declared") {
                    let ty: Type = meta.value()?.parse()?;
                    set_value(&mut this.declared, &meta, ty)
                } else {
                    Err(meta.error(
                        "unsupported field attribute, expected `rename = \"..\"`, `property`, `ignore`, `transient`, `extends`, `skip` or `declared = Type`",
                    ))
                }
            })?;
        }
        this.validate()?;
        Ok(this)
    }

    fn validate(&self) -> syn::Result<()> {
        let others = !self.annotations.is_empty()
            || self.transient.is_some()
            || self.declared.is_some();
        if let Some(span) = self.skip
            && (others || self.extends.is_some())
        {
            return Err(syn::Error::new(span, "`skip` cannot be combined with other attributes"));
        }
        if let Some(span) = self.extends
            && others
        {
            return Err(syn::Error::new(span, "`extends` cannot be combined with other attributes"));
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Method attributes

/// `#[bind(..)]` on a method inside `#[bind_methods]` or `#[bind_interface]`.
#[derive(Default)]
pub(crate) struct MethodAttrs {
    pub annotations: MemberAnnotations,
}

impl MethodAttrs {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in bind_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if this.annotations.parse_meta(&meta, true)? {
                    Ok(())
                } else {
                    Err(meta.error(
                        "unsupported method attribute, expected `rename = \"..\"`, `property`, `ignore`, `any_getter` or `any_setter`",
                    ))
                }
            })?;
        }
        Ok(this)
    }
}

// -----------------------------------------------------------------------------
// Interface attributes

/// `#[bind_interface(..)]` arguments.
#[derive(Default)]
pub(crate) struct InterfaceAttrs {
    pub implements: Vec<Path>,
}

impl InterfaceAttrs {
    pub fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("implements") {
            meta.parse_nested_meta(|inner| {
                self.implements.push(inner.path);
                Ok(())
            })
        } else {
            Err(meta.error("unsupported interface attribute, expected `implements(..)`"))
        }
    }
}
