use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },
}

impl ScrapeError {
    /// The HTTP status carried by this error, when one exists.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ScrapeError::Http { source, .. } => source.status().map(|s| s.as_u16()),
            ScrapeError::HttpStatus { status, .. } => Some(*status),
        }
    }
}
