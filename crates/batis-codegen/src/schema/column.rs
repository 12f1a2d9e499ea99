/// Column name taken from a field attribute.
#[derive(Debug)]
pub(crate) struct Column {
    /// Which attribute the name came from; lower ranks win.
    pub(crate) rank: u8,

    pub(crate) name: String,
}

impl Column {
    /// Attributes that name a column, in order of precedence.
    pub(crate) const ATTRS: [&'static str; 3] = ["column", "db", "sql"];

    pub(super) fn from_ast(attr: &syn::Attribute, rank: u8) -> syn::Result<Column> {
        let lit: syn::LitStr = attr.parse_args()?;
        let value = lit.value();

        // `#[column("name")]` is taken verbatim, the others use tag syntax
        let name = if rank == 0 {
            value.trim().to_string()
        } else {
            name_from_tag(&value)
        };

        // An empty tag name, as in `#[db(",omitempty")]`, keeps the default
        if name.is_empty() && rank == 0 {
            return Err(syn::Error::new_spanned(lit, "empty column name"));
        }

        Ok(Column { rank, name })
    }
}

/// Extract the column name from a tag value.
///
/// A `;` separated list may carry a `column:<name>` piece. Otherwise a `,`
/// separated list starts with the name, and anything else is the name itself.
pub(crate) fn name_from_tag(tag: &str) -> String {
    for piece in tag.split(';') {
        let piece = piece.trim();
        if piece.starts_with("column") {
            if let Some((_, name)) = piece.split_once(':') {
                return name.trim().to_string();
            }
        }
    }

    match tag.split_once(',') {
        Some((name, _)) => name.trim().to_string(),
        None => tag.trim().to_string(),
    }
}
