use crate::parse::ParsedStruct;
use quote::quote;

pub fn generate(parsed: &ParsedStruct) -> proc_macro2::TokenStream {
    let struct_name = &parsed.name;
    let (impl_generics, ty_generics, _) = parsed.generics.split_for_impl();
    let where_clause = parsed.where_clause();

    let lookup_names: Vec<&String> = parsed.fields.iter().map(|f| &f.lookup_name).collect();

    let arms: Vec<proc_macro2::TokenStream> = parsed
        .fields
        .iter()
        .map(|field| {
            let ident = &field.name;
            let ty = &field.ty;
            let lookup = &field.lookup_name;
            let meta = if field.volatile {
                quote!(field_updater::FieldMeta::volatile::<#ty>)
            } else {
                quote!(field_updater::FieldMeta::plain::<#ty>)
            };
            quote! {
                #lookup => ::core::result::Result::Ok(
                    #meta(#lookup, ::core::mem::offset_of!(Self, #ident))
                ),
            }
        })
        .collect();

    let alignment_checks: Vec<proc_macro2::TokenStream> = parsed
        .fields
        .iter()
        .filter(|field| field.volatile)
        .map(|field| {
            let ident = &field.name;
            let ty = &field.ty;
            let message = format!("volatile field `{}` is not aligned for atomic access", ident);
            quote! {
                ::core::assert!(
                    ::core::mem::offset_of!(Self, #ident) % ::core::mem::align_of::<#ty>() == 0,
                    #message
                );
            }
        })
        .collect();

    quote! {
        // SAFETY: every offset comes from `offset_of!` on the field it names,
        // and volatile metas are built from the field's own declared type.
        unsafe impl #impl_generics field_updater::FieldTable for #struct_name #ty_generics #where_clause {
            const FIELD_NAMES: &'static [&'static str] = &[#(#lookup_names),*];

            const VOLATILE_FIELDS_ALIGNED: () = {
                #(#alignment_checks)*
            };

            fn lookup_field(
                name: &str,
            ) -> ::core::result::Result<field_updater::FieldMeta, field_updater::LookupError> {
                match name {
                    #(#arms)*
                    _ => ::core::result::Result::Err(
                        field_updater::LookupError::missing::<Self>(name)
                    ),
                }
            }
        }
    }
}
