use super::{Db, Pool, Shared};
use crate::{db::ConnectionType, Registry};

use batis_core::{driver::Driver, expr::Engine, Error, Evaluate, Result};
use batis_sql::{Fragments, MapperFile};

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

/// Configures and opens a [`Db`].
///
/// Mapper sources are only read when [`Builder::connect`] runs, so every
/// markup error and duplicate statement id surfaces from there.
#[derive(Default)]
pub struct Builder {
    /// Mapper documents in the order they were added
    sources: Vec<Source>,

    /// Backend type for mappers that do not declare one
    dialect: Option<String>,

    /// Expression engine; the default [`Engine`] when unset
    evaluator: Option<Arc<dyn Evaluate>>,

    /// Upper bound on each driver call
    query_timeout: Option<Duration>,
}

enum Source {
    Str(String),
    File(PathBuf),
    Dir(PathBuf),
}

impl Builder {
    /// Add a mapper document held in memory.
    pub fn mapper_str(&mut self, src: impl Into<String>) -> &mut Self {
        self.sources.push(Source::Str(src.into()));
        self
    }

    /// Add the mapper document at `path`.
    pub fn mapper_file(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.sources.push(Source::File(path.as_ref().to_path_buf()));
        self
    }

    /// Add every `*.xml` file directly inside `path`, in file name order.
    pub fn mapper_dir(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.sources.push(Source::Dir(path.as_ref().to_path_buf()));
        self
    }

    /// Backend type inherited by mapper documents without a `type`
    /// attribute. Defaults to the driver's dialect.
    pub fn dialect(&mut self, dialect: impl Into<String>) -> &mut Self {
        self.dialect = Some(dialect.into());
        self
    }

    /// Replace the expression engine used by `test` attributes and markers.
    pub fn evaluator(&mut self, evaluator: Arc<dyn Evaluate>) -> &mut Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Fail any single driver call that takes longer than `duration`.
    pub fn query_timeout(&mut self, duration: Duration) -> &mut Self {
        self.query_timeout = Some(duration);
        self
    }

    /// Load the mappers, then open a connection pool on `driver`.
    pub async fn connect(&mut self, driver: impl Driver) -> Result<Db> {
        let dialect = self
            .dialect
            .clone()
            .unwrap_or_else(|| driver.dialect().to_string());

        let fragments = Fragments::new();
        let registry = self.load(&dialect, &fragments)?;
        let pool = Pool::new(driver).await?;

        Ok(Db {
            shared: Arc::new(Shared {
                registry,
                fragments,
                engine: self
                    .evaluator
                    .clone()
                    .unwrap_or_else(|| Arc::new(Engine::new())),
                pool,
                query_timeout: self.query_timeout,
            }),
            connection: ConnectionType::Pool,
        })
    }

    fn load(&self, dialect: &str, fragments: &Fragments) -> Result<Registry> {
        let mut registry = Registry::default();

        for source in &self.sources {
            let mappers = match source {
                Source::Str(src) => vec![MapperFile::parse(src)?],
                Source::File(path) => vec![MapperFile::load(path)?],
                Source::Dir(path) => mapper_files(path)?
                    .iter()
                    .map(MapperFile::load)
                    .collect::<Result<Vec<_>>>()?,
            };

            for mut mapper in mappers {
                mapper.inherit_dialect(dialect);

                for fragment in mapper.fragments {
                    fragments.insert(fragment.id, fragment.text);
                }

                for stmt in mapper.statements {
                    registry.insert(stmt)?;
                }
            }
        }

        log::debug!("loaded {} statements", registry.len());
        Ok(registry)
    }
}

/// `*.xml` files directly inside `dir`, sorted by path.
fn mapper_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let context = || format!("reading {}", dir.display());

    let mut paths = vec![];
    for entry in std::fs::read_dir(dir).map_err(|err| Error::from(err).context(context()))? {
        let path = entry.map_err(|err| Error::from(err).context(context()))?.path();

        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if is_xml && path.is_file() {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}
