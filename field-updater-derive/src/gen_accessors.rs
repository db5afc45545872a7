use crate::parse::ParsedStruct;
use quote::{format_ident, quote};

pub fn generate(parsed: &ParsedStruct) -> proc_macro2::TokenStream {
    let struct_name = &parsed.name;
    let (impl_generics, ty_generics, _) = parsed.generics.split_for_impl();
    let where_clause = parsed.where_clause();

    let accessors: Vec<proc_macro2::TokenStream> = parsed
        .fields
        .iter()
        .filter(|field| field.volatile)
        .map(|field| {
            let ident = &field.name;
            let ty = &field.ty;
            let vis = &field.vis;
            let lookup = &field.lookup_name;
            let method = format_ident!("{}_updater", ident);
            let doc = format!(
                "Updater for the volatile field `{}`.\n\n\
                 Equivalent to `AtomicFieldUpdater::new(\"{}\")` but needs no lookup \
                 and cannot fail.",
                ident, lookup
            );
            quote! {
                #[doc = #doc]
                #[inline]
                #vis fn #method() -> field_updater::AtomicFieldUpdater<
                    Self,
                    <#ty as field_updater::VolatileField>::Value,
                > {
                    // SAFETY: the field at this offset is declared `Volatile`.
                    unsafe {
                        field_updater::AtomicFieldUpdater::from_volatile_field(
                            #lookup,
                            ::core::mem::offset_of!(Self, #ident),
                        )
                    }
                }
            }
        })
        .collect();

    if accessors.is_empty() {
        return quote!();
    }

    quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#accessors)*
        }
    }
}
