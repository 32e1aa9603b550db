// [libs/infra/upstream-client/src/probe.rs]
use std::time::Duration;

use reqwest::Client;
use tracing::{instrument, warn};

use crate::errors::UpstreamError;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Checks the upstream's `X-Data-Version` header for a given file-type
/// without downloading the body. The scheduler compares this against the
/// version recorded on the tenant/category's last successful job to decide
/// whether a sync is worth running at all.
///
/// Header parsing is deliberately tolerant: upstream systems have shipped
/// the version quoted, unquoted, and with incidental surrounding
/// whitespace, and none of those variations should fail the probe. A
/// missing or non-integer header is not an error either (spec.md §9, Open
/// Question) — it just means "no version information available", and the
/// caller treats `None` as "always sync".
#[instrument(skip(client, api_key))]
pub async fn probe_version(
    client: &Client,
    base_url: &str,
    api_key: Option<&str>,
    tenant_id: &str,
    file_type: &str,
) -> Result<Option<i64>, UpstreamError> {
    let mut request = client
        .head(base_url)
        .query(&[("file_type", file_type), ("tenant", tenant_id)])
        .timeout(PROBE_TIMEOUT);
    if let Some(api_key) = api_key {
        request = request.bearer_auth(api_key);
    }
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            UpstreamError::Timeout(PROBE_TIMEOUT)
        } else {
            UpstreamError::Http(e)
        }
    })?;

    if !response.status().is_success() {
        return Err(UpstreamError::Status(response.status()));
    }

    let version = response
        .headers()
        .get("x-data-version")
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| raw.trim().trim_matches('"').parse::<i64>().ok());

    if version.is_none() {
        warn!(file_type, "upstream omitted or mangled X-Data-Version, treating as always-changed");
    }

    Ok(version)
}

#[cfg(test)]
mod tests {
    fn parse_header(raw: &str) -> Option<i64> {
        raw.trim().trim_matches('"').parse::<i64>().ok()
    }

    #[test]
    fn tolerates_quotes_and_whitespace() {
        assert_eq!(parse_header(" \"3\" "), Some(3));
        assert_eq!(parse_header("3"), Some(3));
        assert_eq!(parse_header(""), None);
    }

    #[test]
    fn non_integer_version_is_treated_as_absent_not_an_error() {
        assert_eq!(parse_header("v3-beta"), None);
    }
}
