use super::{Column, ErrorSet};

use syn::ext::IdentExt;

#[derive(Debug)]
pub(crate) struct Field {
    /// Index of field in the containing record
    pub(crate) index: usize,

    /// Field identifier
    pub(crate) ident: syn::Ident,

    /// Field name without any `r#` prefix
    pub(crate) name: String,

    /// Column the field reads from
    pub(crate) column: String,

    /// Field type
    pub(crate) ty: FieldTy,
}

#[derive(Debug)]
pub(crate) enum FieldTy {
    /// Filled from a single column through `FromValue`
    Primitive(syn::Type),

    /// A nested `Record` whose fields are promoted into the parent
    Embed(syn::Type),
}

impl Field {
    pub(super) fn from_ast(field: &syn::Field, index: usize) -> syn::Result<Self> {
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new_spanned(field, "record fields must be named"));
        };

        let name = ident.unraw().to_string();

        let mut errs = ErrorSet::new();
        let mut seen = [false; Column::ATTRS.len()];
        let mut column: Option<Column> = None;
        let mut embed = None;

        for attr in &field.attrs {
            if let Some(rank) = Column::ATTRS
                .iter()
                .position(|name| attr.path().is_ident(name))
            {
                if seen[rank] {
                    errs.push(syn::Error::new_spanned(
                        attr,
                        format!("duplicate #[{}] attribute", Column::ATTRS[rank]),
                    ));
                    continue;
                }
                seen[rank] = true;

                let parsed = Column::from_ast(attr, rank as u8)?;
                if parsed.name.is_empty() {
                    continue;
                }
                if column.as_ref().is_none_or(|c| parsed.rank < c.rank) {
                    column = Some(parsed);
                }
            } else if attr.path().is_ident("embed") {
                if embed.is_some() {
                    errs.push(syn::Error::new_spanned(
                        attr,
                        "duplicate #[embed] attribute",
                    ));
                } else {
                    attr.meta.require_path_only()?;
                    embed = Some(attr);
                }
            }
        }

        if let (Some(attr), true) = (embed, seen.iter().any(|seen| *seen)) {
            errs.push(syn::Error::new_spanned(
                attr,
                "embedded fields cannot have a column name",
            ));
        }

        if let Some(err) = errs.collect() {
            return Err(err);
        }

        let column = match column {
            Some(column) => column.name,
            None => name.to_lowercase(),
        };

        let ty = match embed {
            Some(_) => FieldTy::Embed(field.ty.clone()),
            None => FieldTy::Primitive(field.ty.clone()),
        };

        Ok(Self {
            index,
            ident: ident.clone(),
            name,
            column,
            ty,
        })
    }
}
