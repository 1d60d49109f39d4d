use clap::builder::TypedValueParser;
use clap::{Parser, ValueEnum};
use clipper_storage::StorageConfig;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const SERVER_ADDRESS_ENV: &str = "SERVER_ADDRESS";
pub const BASE_URL_ENV: &str = "BASE_URL";
pub const FILE_STORAGE_PATH_ENV: &str = "FILE_STORAGE_PATH";
pub const DATABASE_DSN_ENV: &str = "DATABASE_DSN";
pub const SLUG_LENGTH_ENV: &str = "SLUG_LENGTH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_SLUG_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "clipper-gateway")]
pub struct CLI {
    #[arg(short = 'a', long, env = SERVER_ADDRESS_ENV, default_value = DEFAULT_SERVER_ADDRESS)]
    pub server_address: SocketAddr,

    /// Prefix of every short URL handed out.
    #[arg(short = 'b', long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(short = 'f', long, env = FILE_STORAGE_PATH_ENV)]
    pub file_storage_path: Option<PathBuf>,

    /// Takes priority over the file storage path.
    #[arg(short = 'd', long, env = DATABASE_DSN_ENV)]
    pub database_dsn: Option<String>,

    #[arg(
        long,
        env = SLUG_LENGTH_ENV,
        default_value_t = DEFAULT_SLUG_LENGTH,
        value_parser = clap::value_parser!(u8).range(1..=64).map(usize::from),
    )]
    pub slug_length: usize,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl CLI {
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig::from_options(self.database_dsn.clone(), self.file_storage_path.clone())
    }
}
