use quote::quote;
use syn::punctuated::Punctuated;
use syn::{Data, DeriveInput, Fields, Generics, Ident, LitStr, Meta, Token, Type, Visibility};

pub struct ParsedField {
    pub name: Ident,
    pub ty: Type,
    pub vis: Visibility,
    /// Name the field is looked up by; the identifier unless renamed.
    pub lookup_name: String,
    pub volatile: bool,
}

pub struct ParsedStruct {
    pub name: Ident,
    pub generics: Generics,
    /// Recorded fields only; `#[updater(skip)]` fields are dropped here.
    pub fields: Vec<ParsedField>,
}

impl ParsedStruct {
    pub fn has_generics(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// Where clause for the generated impls.
    ///
    /// Generic structs get `Self: 'static` plus `'static` bounds on every
    /// recorded field type, since field metadata is keyed by `TypeId`.
    /// Non-generic structs keep their own where clause (if any).
    pub fn where_clause(&self) -> proc_macro2::TokenStream {
        let existing = self
            .generics
            .where_clause
            .as_ref()
            .map(|w| {
                let predicates = w.predicates.iter();
                quote! { #(#predicates,)* }
            })
            .unwrap_or_default();

        if !self.has_generics() {
            return if existing.is_empty() {
                quote!()
            } else {
                quote! { where #existing }
            };
        }

        let field_bounds: Vec<proc_macro2::TokenStream> = self
            .fields
            .iter()
            .map(|field| {
                let ty = &field.ty;
                quote! { #ty: 'static }
            })
            .collect();

        quote! {
            where
                #existing
                Self: 'static,
                #(#field_bounds),*
        }
    }
}

#[derive(Default)]
struct FieldOptions {
    skip: bool,
    rename: Option<LitStr>,
}

fn field_options(field: &syn::Field) -> syn::Result<FieldOptions> {
    let mut options = FieldOptions::default();
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("updater")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                options.rename = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unknown updater option. Expected `skip` or `rename = \"...\"`"))
            }
        })?;
    }
    if options.skip && options.rename.is_some() {
        return Err(syn::Error::new_spanned(
            field,
            "`skip` and `rename` cannot be combined on one field",
        ));
    }
    Ok(options)
}

/// A field type is volatile when its last path segment is `Volatile`. The
/// generated code also requires `VolatileField`, so a look-alike type fails
/// to compile instead of being treated as atomic.
fn is_volatile(ty: &Type) -> bool {
    match ty {
        Type::Path(tp) if tp.qself.is_none() => tp
            .path
            .segments
            .last()
            .is_some_and(|seg| seg.ident == "Volatile"),
        Type::Group(g) => is_volatile(&g.elem),
        Type::Paren(p) => is_volatile(&p.elem),
        _ => false,
    }
}

/// Reject `#[repr(packed)]` and `#[repr(packed(N))]`: fields of a packed
/// struct may sit at offsets their atomic cells cannot be addressed at.
fn reject_packed(input: &DeriveInput) -> syn::Result<()> {
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("repr")) {
        let hints = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        if let Some(packed) = hints.iter().find(|m| m.path().is_ident("packed")) {
            return Err(syn::Error::new_spanned(
                packed,
                "FieldUpdaters cannot be derived for packed structs: atomic fields must be aligned",
            ));
        }
    }
    Ok(())
}

pub fn parse(input: &DeriveInput) -> syn::Result<ParsedStruct> {
    reject_packed(input)?;

    let data = match &input.data {
        Data::Struct(data) => data,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "FieldUpdaters can only be derived for structs with named fields",
            ));
        }
    };

    let named_fields = match &data.fields {
        Fields::Named(named) => &named.named,
        Fields::Unnamed(_) | Fields::Unit => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "FieldUpdaters can only be derived for structs with named fields",
            ));
        }
    };

    let mut fields: Vec<ParsedField> = Vec::with_capacity(named_fields.len());
    for f in named_fields {
        let options = field_options(f)?;
        if options.skip {
            continue;
        }
        let Some(name) = f.ident.clone() else {
            continue;
        };
        let lookup_name = match &options.rename {
            Some(lit) => lit.value(),
            None => name.to_string(),
        };
        if let Some(previous) = fields.iter().find(|p| p.lookup_name == lookup_name) {
            let span = options
                .rename
                .as_ref()
                .map(|lit| lit.span())
                .unwrap_or_else(|| name.span());
            return Err(syn::Error::new(
                span,
                format!(
                    "lookup name `{}` is already used by field `{}`",
                    lookup_name, previous.name
                ),
            ));
        }
        fields.push(ParsedField {
            volatile: is_volatile(&f.ty),
            name,
            ty: f.ty.clone(),
            vis: f.vis.clone(),
            lookup_name,
        });
    }

    Ok(ParsedStruct {
        name: input.ident.clone(),
        generics: input.generics.clone(),
        fields,
    })
}
