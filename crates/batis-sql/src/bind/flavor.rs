/// Placeholder syntax of the target backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flavor {
    /// `$1, $2, ...`
    Postgresql,
    /// `@p1, @p2, ...`
    SqlServer,
    /// `:1, :2, ...`
    Oracle,
    /// `?` for every parameter (MySQL, SQLite, and anything unrecognized)
    #[default]
    Question,
}

impl Flavor {
    /// Pick the flavor for a backend type name, case-insensitively.
    pub fn from_dialect(dialect: &str) -> Flavor {
        match dialect.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" | "pgx" | "pgx/v5" => Flavor::Postgresql,
            "sqlserver" | "mssql" => Flavor::SqlServer,
            "godror" | "goracle" => Flavor::Oracle,
            _ => Flavor::Question,
        }
    }
}
