//! Source reader: materializes raw content from a URL or filesystem path.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{EtlError, Result};

/// Where a pipeline reads its raw content from.
#[derive(Debug, Clone)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    pub fn describe(&self) -> String {
        match self {
            Source::Url(url) => url.clone(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

/// Raw fetched payload plus provenance. Immutable once fetched.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub body: String,
    pub provenance: String,
    pub fetched_at: DateTime<Utc>,
}

/// Blocking reader with an identifying client header and a bounded wait on
/// HTTP calls. Any non-success status is fatal for the run; no retries,
/// no partial reads.
pub struct SourceReader {
    client: reqwest::blocking::Client,
}

impl SourceReader {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    pub fn read(&self, source: &Source) -> Result<RawDocument> {
        let body = match source {
            Source::Url(url) => {
                debug!(%url, "fetching source");
                let response = self.client.get(url).send()?;
                let status = response.status();
                if !status.is_success() {
                    return Err(EtlError::HttpStatus {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response.text()?
            }
            Source::File(path) => {
                if !path.is_file() {
                    return Err(EtlError::SourceNotFound(path.display().to_string()));
                }
                fs::read_to_string(path)?
            }
        };

        info!(source = %source.describe(), bytes = body.len(), "source read");
        Ok(RawDocument {
            body,
            provenance: source.describe(),
            fetched_at: Utc::now(),
        })
    }
}
