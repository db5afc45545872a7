use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod gen_accessors;
mod gen_table;
mod parse;

/// Record a struct's fields for lock-free access through `AtomicFieldUpdater`.
///
/// Generates an `unsafe impl FieldTable` (name lookup) and, for every field
/// declared as `Volatile<V>`, a `<field>_updater()` constructor with the
/// field's visibility.
///
/// Field options:
///
/// - `#[updater(skip)]`: leave the field out of the table.
/// - `#[updater(rename = "name")]`: look the field up by `name`.
#[proc_macro_derive(FieldUpdaters, attributes(updater))]
pub fn derive_field_updaters(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);

    let parsed = match parse::parse(&input) {
        Ok(p) => p,
        Err(e) => return e.to_compile_error().into(),
    };

    let table = gen_table::generate(&parsed);
    let accessors = gen_accessors::generate(&parsed);

    let expanded = quote::quote! {
        #table
        #accessors
    };

    expanded.into()
}
