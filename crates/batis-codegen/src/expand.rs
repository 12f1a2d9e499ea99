mod assign;
mod table;
mod util;

use crate::schema::Record;

use proc_macro2::TokenStream;
use quote::quote;

struct Expand<'a> {
    /// The record being expanded
    record: &'a Record,

    /// Path prefix for batis types
    batis: TokenStream,
}

impl Expand<'_> {
    fn expand(&self) -> TokenStream {
        let batis = &self.batis;
        let ident = &self.record.ident;
        let table = self.expand_table();
        let assign = self.expand_assign();

        wrap_in_const(quote! {
            impl #batis::Record for #ident {
                fn table() -> &'static #batis::RecordTable {
                    static TABLE: std::sync::OnceLock<#batis::RecordTable> = std::sync::OnceLock::new();
                    TABLE.get_or_init(|| { #table })
                }

                fn assign(&mut self, path: &[usize], value: #batis::Value) -> #batis::Result<()> {
                    #assign
                }
            }

            impl #batis::FromRow for #ident {
                fn plan(columns: &[#batis::Column]) -> #batis::Result<#batis::Plan> {
                    #batis::record_plan::<Self>(columns)
                }

                fn from_row(plan: &#batis::Plan, row: Vec<#batis::Value>) -> #batis::Result<Self> {
                    #batis::record_from_row::<Self>(plan, row)
                }
            }
        })
    }
}

pub(super) fn record(record: &Record) -> TokenStream {
    Expand {
        record,
        batis: quote!(_batis::codegen_support),
    }
    .expand()
}

fn wrap_in_const(code: TokenStream) -> TokenStream {
    quote! {
        const _: () = {
            use batis as _batis;
            #code
        };
    }
}
