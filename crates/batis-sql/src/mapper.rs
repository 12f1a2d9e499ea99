//! Loading mapper files: markup with `select`, `insert`, `update`, `delete`
//! and `sql` elements.
//!
//! ```
//! use batis_sql::MapperFile;
//!
//! let mapper = MapperFile::parse(r#"
//!     <mapper type="postgres">
//!         <select id="user">
//!             SELECT * FROM users <where><if test="id > 0">AND id = #{id}</if></where>
//!         </select>
//!     </mapper>
//! "#).unwrap();
//!
//! assert_eq!(mapper.statements[0].id, "user");
//! assert_eq!(mapper.statements[0].dialect(), Some("postgres"));
//! ```

mod builder;

mod preprocess;
pub use preprocess::preprocess;

use crate::stmt::{SqlFragment, Statement, TYPE_ATTR};

use batis_core::Result;
use indexmap::IndexMap;
use std::path::Path;

/// The contents of one mapper document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapperFile {
    /// Attributes of the root element, keys lowercased.
    pub attrs: IndexMap<String, String>,

    /// Statements in document order.
    pub statements: Vec<Statement>,

    /// Top-level `<sql>` fragments.
    pub fragments: Vec<SqlFragment>,
}

impl MapperFile {
    /// Parse a mapper document. Statements inherit the root `type` attribute
    /// unless they declare their own.
    pub fn parse(src: &str) -> Result<MapperFile> {
        let src = preprocess(src);
        let mut mapper = builder::parse(&src)?;
        mapper.propagate_dialect();
        Ok(mapper)
    }

    /// Read and parse the mapper file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<MapperFile> {
        let path = path.as_ref();
        log::debug!("loading mapper file {}", path.display());

        let src = std::fs::read_to_string(path)
            .map_err(|err| batis_core::Error::from(err).context(format!("reading {}", path.display())))?;

        MapperFile::parse(&src).map_err(|err| err.context(format!("parsing {}", path.display())))
    }

    /// The root `type` attribute.
    pub fn dialect(&self) -> Option<&str> {
        self.attrs
            .get(TYPE_ATTR)
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    /// Use `dialect` for the root, and every statement without a `type`,
    /// unless the root already names one.
    pub fn inherit_dialect(&mut self, dialect: &str) {
        if self.dialect().is_none() {
            self.attrs.insert(TYPE_ATTR.to_string(), dialect.to_string());
        }
        self.propagate_dialect();
    }

    fn propagate_dialect(&mut self) {
        let Some(dialect) = self.dialect().map(str::to_string) else {
            return;
        };
        for stmt in &mut self.statements {
            stmt.inherit_dialect(&dialect);
        }
    }
}
