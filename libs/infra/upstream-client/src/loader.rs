// [libs/infra/upstream-client/src/loader.rs]
use futures_util::StreamExt;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{instrument, warn};

use crate::errors::UpstreamError;

/// Scans a top-level JSON array byte-by-byte and yields each element's raw
/// text as soon as its closing brace is seen, without ever buffering more
/// than one in-flight element. This is what keeps memory bounded to
/// roughly `channel_capacity * row_size` regardless of how large the
/// upstream array is: the parser never holds the whole response, and the
/// bounded channel applies backpressure all the way back to the HTTP read.
struct ArrayScanner {
    buffer: String,
    element_start: Option<usize>,
    depth: i32,
    in_string: bool,
    escape_next: bool,
}

impl ArrayScanner {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            element_start: None,
            depth: 0,
            in_string: false,
            escape_next: false,
        }
    }

    /// Feeds one chunk of response text in, returning every complete
    /// top-level array element discovered so far and compacting the
    /// internal buffer down to whatever is still in-flight.
    fn feed(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);
        let mut completed = Vec::new();
        let mut consumed_up_to = 0;

        let bytes: Vec<char> = self.buffer.chars().collect();
        for (i, &c) in bytes.iter().enumerate() {
            if self.in_string {
                if self.escape_next {
                    self.escape_next = false;
                } else if c == '\\' {
                    self.escape_next = true;
                } else if c == '"' {
                    self.in_string = false;
                }
                continue;
            }

            match c {
                '"' => self.in_string = true,
                '{' | '[' => {
                    if self.depth == 0 && c == '{' {
                        self.element_start = Some(i);
                    }
                    if c == '{' {
                        self.depth += 1;
                    }
                }
                '}' => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        if let Some(start) = self.element_start.take() {
                            let element: String = bytes[start..=i].iter().collect();
                            completed.push(element);
                            consumed_up_to = i + 1;
                        }
                    }
                }
                _ => {}
            }
        }

        if consumed_up_to > 0 {
            self.buffer = bytes[consumed_up_to..].iter().collect();
        }
        completed
    }
}

/// Streams a `{category}_credit` or `{category}_payment` upstream payload,
/// parsing array elements incrementally and forwarding each one through
/// `tx`. `tx`'s channel capacity is the memory bound: the producer stalls
/// on a full channel exactly as long as the consumer takes to drain it.
#[instrument(skip(client, api_key, tx))]
pub async fn stream_rows(
    client: &Client,
    base_url: &str,
    api_key: Option<&str>,
    tenant_id: &str,
    file_type: &str,
    tx: mpsc::Sender<Result<Value, UpstreamError>>,
) -> Result<(), UpstreamError> {
    let mut request = client
        .get(base_url)
        .query(&[("file_type", file_type), ("tenant", tenant_id)]);
    if let Some(api_key) = api_key {
        request = request.bearer_auth(api_key);
    }
    let response = request.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let _ = tx.send(Err(UpstreamError::Status(status))).await;
        return Err(UpstreamError::Status(status));
    }

    let mut scanner = ArrayScanner::new();
    let mut byte_stream = response.bytes_stream();

    while let Some(chunk) = byte_stream.next().await {
        let chunk = chunk?;
        let text = String::from_utf8_lossy(&chunk);
        for element in scanner.feed(&text) {
            let parsed = serde_json::from_str::<Value>(&element)
                .map_err(|e| UpstreamError::Decode(e.to_string()));
            if tx.send(parsed).await.is_err() {
                warn!(file_type, "row consumer dropped, stopping stream early");
                return Ok(());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_complete_objects_as_they_close() {
        let mut scanner = ArrayScanner::new();
        let found = scanner.feed(r#"[{"a": 1}, {"b": 2}]"#);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], r#"{"a": 1}"#);
        assert_eq!(found[1], r#"{"b": 2}"#);
    }

    #[test]
    fn handles_objects_split_across_chunks() {
        let mut scanner = ArrayScanner::new();
        let mut found = scanner.feed(r#"[{"a": "hello, "#);
        assert!(found.is_empty());
        found.extend(scanner.feed(r#"world"}, {"b": 2}]"#));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], r#"{"a": "hello, world"}"#);
    }

    #[test]
    fn ignores_braces_inside_string_values() {
        let mut scanner = ArrayScanner::new();
        let found = scanner.feed(r#"[{"note": "uses { and } in text"}]"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0], r#"{"note": "uses { and } in text"}"#);
    }
}
