use crate::file::FileRepository;
use crate::memory::InMemoryRepository;
use crate::postgres::PostgresRepository;
use clipper_core::repository::Result;
use clipper_core::Repository;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Which backend to construct, with its connection parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    File { path: PathBuf },
    Postgres { dsn: String },
}

impl StorageConfig {
    /// Picks a backend from optional settings.
    ///
    /// A database DSN wins over a file path, which wins over in-memory.
    /// Empty values count as unset.
    pub fn from_options(database_dsn: Option<String>, file_path: Option<PathBuf>) -> Self {
        if let Some(dsn) = database_dsn.filter(|dsn| !dsn.trim().is_empty()) {
            return Self::Postgres { dsn };
        }
        if let Some(path) = file_path.filter(|path| !path.as_os_str().is_empty()) {
            return Self::File { path };
        }
        Self::InMemory
    }
}

impl Display for StorageConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageConfig::InMemory => write!(f, "in-memory"),
            StorageConfig::File { path } => write!(f, "file ({})", path.display()),
            // the dsn may carry credentials
            StorageConfig::Postgres { .. } => write!(f, "postgres"),
        }
    }
}

/// Constructs the configured backend.
pub async fn open(config: &StorageConfig) -> Result<Arc<dyn Repository>> {
    info!(backend = %config, "opening storage backend");

    let repository: Arc<dyn Repository> = match config {
        StorageConfig::InMemory => Arc::new(InMemoryRepository::new()),
        StorageConfig::File { path } => Arc::new(FileRepository::open(path).await?),
        StorageConfig::Postgres { dsn } => Arc::new(PostgresRepository::connect(dsn).await?),
    };
    Ok(repository)
}
