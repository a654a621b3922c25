//! Retrieval of the raw call sheet from a URL or a local file.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::error::PipelineError;

/// Where the call sheet lives. The display form doubles as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl Source {
    /// `http://` and `https://` sources are fetched over the network, everything else is a path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Source::Url(raw.to_string())
        } else {
            Source::File(PathBuf::from(raw))
        }
    }

    pub fn id(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => f.write_str(url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// GETs `url` and returns the body. Non-success statuses are treated as an unavailable source.
pub async fn fetch_bytes<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Vec<u8>, PipelineError> {
    let parsed = url
        .parse::<reqwest::Url>()
        .map_err(|e| PipelineError::source_unavailable(url, format!("invalid url: {e}")))?;
    let req = reqwest::Request::new(reqwest::Method::GET, parsed);

    let resp = client
        .execute(req)
        .await
        .map_err(|e| PipelineError::source_unavailable(url, e))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(PipelineError::source_unavailable(
            url,
            format!("server returned status {status}"),
        ));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| PipelineError::source_unavailable(url, e))?;
    debug!(bytes = bytes.len(), "Call sheet body received");
    Ok(bytes.to_vec())
}

/// Loads the raw bytes for `source`, over HTTP or from disk.
#[tracing::instrument(skip(client, source), fields(source = %source))]
pub async fn read_source<C: HttpClient + ?Sized>(
    client: &C,
    source: &Source,
) -> Result<Vec<u8>, PipelineError> {
    match source {
        Source::Url(url) => fetch_bytes(client, url).await,
        Source::File(path) => tokio::fs::read(path)
            .await
            .map_err(|e| PipelineError::source_unavailable(source.id(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_source() {
        let source = Source::parse("https://example.com/sheet.csv");
        assert_eq!(source, Source::Url("https://example.com/sheet.csv".to_string()));
    }

    #[test]
    fn test_parse_http_named_file_is_a_path() {
        let source = Source::parse("httpdata.csv");
        assert_eq!(source, Source::File(PathBuf::from("httpdata.csv")));
    }

    #[test]
    fn test_parse_file_source() {
        let source = Source::parse(" data/calls.csv ");
        assert_eq!(source, Source::File(PathBuf::from("data/calls.csv")));
        assert_eq!(source.id(), "data/calls.csv");
    }

    #[tokio::test]
    async fn test_missing_file_is_source_unavailable() {
        let source = Source::parse("/definitely/not/here/calls.csv");
        let err = read_source(&BasicClient::new(), &source).await.unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_invalid_url_is_source_unavailable() {
        let err = fetch_bytes(&BasicClient::new(), "http://").await.unwrap_err();
        assert!(err.to_string().contains("source unavailable"));
    }
}
