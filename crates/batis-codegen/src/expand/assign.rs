use super::{util, Expand};
use crate::schema::FieldTy;

use proc_macro2::TokenStream;
use quote::quote;

impl Expand<'_> {
    pub(super) fn expand_assign(&self) -> TokenStream {
        let batis = &self.batis;
        let record_name = self.record.ident.to_string();

        let arms = self.record.fields.iter().map(|field| {
            let index = util::int(field.index);
            let ident = &field.ident;

            match &field.ty {
                FieldTy::Primitive(ty) => {
                    let context = format!("field `{}`", field.name);
                    quote! {
                        [#index] => {
                            self.#ident = <#ty as #batis::FromValue>::from_value(value)
                                .map_err(|err| err.context(#context))?;
                            Ok(())
                        }
                    }
                }
                FieldTy::Embed(ty) => quote! {
                    [#index, rest @ ..] => <#ty as #batis::Record>::assign(&mut self.#ident, rest, value),
                },
            }
        });

        quote! {
            match path {
                #( #arms )*
                _ => Err(#batis::Error::invalid_destination(format!(
                    "`{}` has no field at {:?}",
                    #record_name,
                    path,
                ))),
            }
        }
    }
}
