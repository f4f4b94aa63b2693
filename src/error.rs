use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("fetch failed for {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("source not found: {0}")]
    SourceNotFound(String),

    #[error("no table matching anchor {0:?} found in document")]
    TableNotFound(String),

    #[error("unexpected table schema, missing columns: {missing:?}")]
    SchemaMismatch { missing: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("query {title:?} failed: {message}")]
    Query { title: String, message: String },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, EtlError>;
