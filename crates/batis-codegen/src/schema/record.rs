use super::{ErrorSet, Field};

#[derive(Debug)]
pub(crate) struct Record {
    /// Type identifier
    pub(crate) ident: syn::Ident,

    /// Record fields, in declaration order
    pub(crate) fields: Vec<Field>,
}

impl Record {
    pub(crate) fn from_ast(ast: &syn::ItemStruct) -> syn::Result<Self> {
        let syn::Fields::Named(node) = &ast.fields else {
            return Err(syn::Error::new_spanned(
                &ast.fields,
                "record fields must be named",
            ));
        };

        // The field table is cached in a static, which generic types cannot have
        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.generics,
                "generic records are not supported",
            ));
        }

        let mut errs = ErrorSet::new();
        let mut fields = vec![];

        for (index, node) in node.named.iter().enumerate() {
            match Field::from_ast(node, index) {
                Ok(field) => fields.push(field),
                Err(err) => errs.push(err),
            }
        }

        if let Some(err) = errs.collect() {
            return Err(err);
        }

        Ok(Self {
            ident: ast.ident.clone(),
            fields,
        })
    }
}
