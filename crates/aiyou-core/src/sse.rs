//! SSE (Server-Sent Events) reader for streamed chat completions
//!
//! Framing is line oriented: `data: <json>` lines carry fragments, blank lines
//! separate events, and `[DONE]` ends the stream. Comment lines and other
//! fields are ignored.

use futures::stream::{self, Stream, TryStreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::ChatCompletionResponse;

const DONE_MARKER: &str = "[DONE]";

/// Longest accepted line, newline included
const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Forward-only reader of chat completion fragments
///
/// Dropping the reader releases the underlying response body.
pub struct StreamReader {
    reader: Box<dyn AsyncBufRead + Send + Unpin>,
    line: Vec<u8>,
    finished: bool,
    fragments: usize,
}

impl std::fmt::Debug for StreamReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamReader")
            .field("finished", &self.finished)
            .field("fragments", &self.fragments)
            .finish_non_exhaustive()
    }
}

impl StreamReader {
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        Self {
            reader: Box::new(reader),
            line: Vec::with_capacity(1024),
            finished: false,
            fragments: 0,
        }
    }

    /// Read from a live HTTP response body
    pub fn from_response(response: reqwest::Response) -> Self {
        let body = Box::pin(response.bytes_stream().map_err(std::io::Error::other));
        Self::new(tokio_util::io::StreamReader::new(body))
    }

    /// Next fragment, or `None` once the stream is over
    ///
    /// End of input and the `[DONE]` marker both end the stream. Fragments
    /// that fail to parse are logged and skipped.
    pub async fn read_chunk(&mut self) -> Result<Option<ChatCompletionResponse>> {
        while !self.finished {
            self.line.clear();
            let read = (&mut self.reader)
                .take(MAX_LINE_BYTES as u64)
                .read_until(b'\n', &mut self.line)
                .await
                .map_err(Error::network)?;
            if read >= MAX_LINE_BYTES && !self.line.ends_with(b"\n") {
                warn!("SSE line exceeds {} bytes, aborting stream", MAX_LINE_BYTES);
                self.finished = true;
                return Err(Error::InvalidInput(format!(
                    "SSE line exceeds {MAX_LINE_BYTES} bytes"
                )));
            }
            if read == 0 {
                debug!("SSE stream ended after {} fragments", self.fragments);
                self.finished = true;
                break;
            }

            let line = String::from_utf8_lossy(&self.line);
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }
            if line.trim() == DONE_MARKER {
                info!("SSE [DONE] received after {} fragments", self.fragments);
                self.finished = true;
                break;
            }

            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let data = data.strip_prefix(' ').unwrap_or(data);
            if data.trim() == DONE_MARKER {
                info!("SSE [DONE] received after {} fragments", self.fragments);
                self.finished = true;
                break;
            }

            match serde_json::from_str::<ChatCompletionResponse>(data) {
                Ok(fragment) => {
                    self.fragments += 1;
                    return Ok(Some(fragment));
                }
                Err(e) => {
                    warn!("Skipping malformed SSE fragment: {}", e);
                }
            }
        }
        Ok(None)
    }

    /// Release the underlying body
    pub fn close(self) {
        debug!("SSE stream closed");
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Adapt into a lazy `Stream` of fragments
    pub fn into_stream(self) -> impl Stream<Item = Result<ChatCompletionResponse>> + Send {
        stream::unfold(Some(self), |state| async move {
            let mut reader = state?;
            match reader.read_chunk().await {
                Ok(Some(fragment)) => Some((Ok(fragment), Some(reader))),
                Ok(None) => None,
                Err(e) => Some((Err(e), None)),
            }
        })
    }

    /// Concatenate the delta content of every remaining fragment
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(fragment) = self.read_chunk().await? {
            text.push_str(&fragment.delta_text());
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn reader(input: impl Into<String>) -> StreamReader {
        StreamReader::new(std::io::Cursor::new(input.into().into_bytes()))
    }

    #[tokio::test]
    async fn test_single_fragment_then_done() {
        let mut stream = reader(
            "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\ndata: [DONE]\n\n",
        );

        let fragment = stream.read_chunk().await.unwrap().unwrap();
        assert_eq!(fragment.delta_text(), "Hi");
        assert!(stream.read_chunk().await.unwrap().is_none());
        // Stays finished
        assert!(stream.read_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_oversized_line_is_rejected() {
        let mut stream = reader("x".repeat(MAX_LINE_BYTES + 10));

        let err = stream.read_chunk().await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(stream.is_finished());
        assert!(stream.read_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_data_prefix_strips_one_space() {
        let mut stream = reader(
            "data:{\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\
             data:  {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\
             data:  [DONE]\n",
        );

        assert_eq!(stream.read_chunk().await.unwrap().unwrap().delta_text(), "a");
        assert_eq!(stream.read_chunk().await.unwrap().unwrap().delta_text(), "b");
        assert!(stream.read_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_done_and_eof_are_equivalent() {
        let body = "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n\n\
                    data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}\n\n";
        let with_done = format!("{body}data: [DONE]\n\n");

        let a = reader(body).collect_text().await.unwrap();
        let b = reader(with_done).collect_text().await.unwrap();
        assert_eq!(a, "ab");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_bare_done_and_trailing_data_ignored() {
        let mut stream = reader(
            "data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n[DONE]\ndata: {\"choices\":[{\"delta\":{\"content\":\"y\"}}]}\n",
        );
        assert_eq!(stream.read_chunk().await.unwrap().unwrap().delta_text(), "x");
        assert!(stream.read_chunk().await.unwrap().is_none());
        assert!(stream.is_finished());
    }

    #[tokio::test]
    async fn test_skips_comments_fields_and_bad_json() {
        let mut stream = reader(
            ": keep-alive\r\n\
             event: message\r\n\
             data: {not json}\r\n\
             \r\n\
             data:{\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\r\n",
        );
        let fragment = stream.read_chunk().await.unwrap().unwrap();
        assert_eq!(fragment.delta_text(), "ok");
        assert!(stream.read_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let mut stream = reader("data: {\"id\":\"c1\",\"choices\":[]}");
        assert_eq!(stream.read_chunk().await.unwrap().unwrap().id, "c1");
        assert!(stream.read_chunk().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_into_stream_yields_all_fragments() {
        let stream = reader(
            "data: {\"choices\":[{\"delta\":{\"content\":\"1\"}}]}\n\n\
             data: {\"choices\":[{\"delta\":{\"content\":\"2\"}}]}\n\n\
             data: [DONE]\n\n",
        )
        .into_stream();
        let fragments: Vec<_> = stream.collect().await;
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1].as_ref().unwrap().delta_text(), "2");
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut stream = reader("");
        assert!(stream.read_chunk().await.unwrap().is_none());
        stream.close();
    }
}
