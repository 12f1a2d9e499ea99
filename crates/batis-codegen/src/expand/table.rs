use super::{util, Expand};
use crate::schema::FieldTy;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    /// Builds the `RecordTable` expression. Fields register under both their
    /// name and their column; embedded records are spliced in place.
    pub(super) fn expand_table(&self) -> TokenStream {
        let batis = &self.batis;

        let entries = self.record.fields.iter().map(|field| {
            let index = util::int(field.index);

            match &field.ty {
                FieldTy::Primitive(ty) => {
                    let name = &field.name;
                    let column = &field.column;
                    quote! {
                        .field(#index, #name, #column, <#ty as #batis::FromValue>::scan_type())
                    }
                }
                FieldTy::Embed(ty) => quote! {
                    .embed(#index, <#ty as #batis::Record>::table())
                },
            }
        });

        quote! {
            #batis::RecordTable::builder()
                #( #entries )*
                .build()
        }
    }
}
