extern crate proc_macro;

use proc_macro::TokenStream;

/// Derive row scanning for a struct with named fields.
///
/// Field attributes:
///
/// * `#[column("name")]` maps the field to a column.
/// * `#[db("...")]` and `#[sql("...")]` accept the tag syntax used by other
///   mappers: `column:name;...` or `name,options`.
/// * `#[embed]` promotes the fields of an inner `Record` into this one.
#[proc_macro_derive(Record, attributes(column, db, sql, embed))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    match batis_codegen::generate(input.into()) {
        Ok(output) => output.into(),
        Err(e) => e.to_compile_error().into(),
    }
}
