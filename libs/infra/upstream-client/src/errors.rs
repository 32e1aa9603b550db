// [libs/infra/upstream-client/src/errors.rs]
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("[UP-HTTP] request to upstream failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("[UP-TIMEOUT] version probe timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("[UP-STATUS] upstream returned {0}")]
    Status(reqwest::StatusCode),

    #[error("[UP-DECODE] could not parse streamed row: {0}")]
    Decode(String),
}
