use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ChessError, Result};
use crate::transport::Transport;

/// Incremental newline-delimited JSON splitter.
///
/// Bytes are pushed in whatever chunks the connection delivers; complete
/// records come out one at a time. A record may span many chunks and a chunk
/// may hold many records. Blank lines (keep-alives) are dropped.
#[derive(Debug, Default)]
pub(crate) struct NdjsonDecoder {
    buffer: Vec<u8>,
    /// Bytes of `buffer` already scanned without finding a newline.
    scanned: usize,
}

impl NdjsonDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, chunk: &[u8]) {
        self.buffer.extend_from_slice(chunk);
    }

    /// The next complete record, if one has fully arrived.
    pub(crate) fn next_record(&mut self) -> Option<Vec<u8>> {
        loop {
            let offset = self.buffer[self.scanned..].iter().position(|&b| b == b'\n');
            let Some(offset) = offset else {
                self.scanned = self.buffer.len();
                return None;
            };
            let end = self.scanned + offset;
            let mut line: Vec<u8> = self.buffer.drain(..=end).collect();
            self.scanned = 0;
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if !is_blank(&line) {
                return Some(line);
            }
        }
    }

    /// Whatever is left once the stream has ended, if it is a record.
    pub(crate) fn finish(&mut self) -> Option<Vec<u8>> {
        self.scanned = 0;
        let rest = std::mem::take(&mut self.buffer);
        (!is_blank(&rest)).then_some(rest)
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

/// A single-pass sequence of records decoded from a streaming response.
///
/// Ends exactly when the connection closes. Not restartable.
pub(crate) struct NdjsonStream<'a> {
    transport: &'a Transport,
    url: String,
    response: reqwest::Response,
    decoder: NdjsonDecoder,
    finished: bool,
    records: usize,
}

impl<'a> NdjsonStream<'a> {
    pub(crate) fn new(transport: &'a Transport, url: String, response: reqwest::Response) -> Self {
        Self {
            transport,
            url,
            response,
            decoder: NdjsonDecoder::new(),
            finished: false,
            records: 0,
        }
    }

    /// Decode the next record, reading more of the body only when needed.
    pub(crate) async fn next<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(line) = self.decoder.next_record() {
                return self.decode(&line).map(Some);
            }
            if self.finished {
                return match self.decoder.finish() {
                    Some(line) => self.decode(&line).map(Some),
                    None => {
                        debug!(url = %self.url, records = self.records, "stream ended");
                        Ok(None)
                    }
                };
            }

            let url = self.url.clone();
            let chunk = self
                .transport
                .cancellable(&url, self.response.chunk())
                .await?
                .map_err(|e| ChessError::ResponseBody {
                    url: url.clone(),
                    source: e,
                })?;
            match chunk {
                Some(bytes) => self.decoder.push(&bytes),
                None => self.finished = true,
            }
        }
    }

    fn decode<T: DeserializeOwned>(&mut self, line: &[u8]) -> Result<T> {
        self.records += 1;
        serde_json::from_slice(line).map_err(|e| ChessError::Json {
            url: self.url.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_str(record: Option<Vec<u8>>) -> Option<String> {
        record.map(|bytes| String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn test_record_split_across_chunks() {
        let mut decoder = NdjsonDecoder::new();
        decoder.push(br#"{"id":"ab"#);
        assert_eq!(decoder.next_record(), None);
        decoder.push(br#"c"}"#);
        assert_eq!(decoder.next_record(), None);
        decoder.push(b"\n");
        assert_eq!(as_str(decoder.next_record()).as_deref(), Some(r#"{"id":"abc"}"#));
        assert_eq!(decoder.next_record(), None);
    }

    #[test]
    fn test_many_records_in_one_chunk() {
        let mut decoder = NdjsonDecoder::new();
        decoder.push(b"{\"n\":1}\n{\"n\":2}\n\n{\"n\":3}\n{\"n\":");
        assert_eq!(as_str(decoder.next_record()).as_deref(), Some(r#"{"n":1}"#));
        assert_eq!(as_str(decoder.next_record()).as_deref(), Some(r#"{"n":2}"#));
        assert_eq!(as_str(decoder.next_record()).as_deref(), Some(r#"{"n":3}"#));
        assert_eq!(decoder.next_record(), None);
        decoder.push(b"4}");
        assert_eq!(decoder.next_record(), None);
        assert_eq!(as_str(decoder.finish()).as_deref(), Some(r#"{"n":4}"#));
        assert_eq!(decoder.finish(), None);
    }

    #[test]
    fn test_trailing_whitespace_is_not_a_record() {
        let mut decoder = NdjsonDecoder::new();
        decoder.push(b"{}\r\n  \n");
        assert_eq!(as_str(decoder.next_record()).as_deref(), Some("{}"));
        assert_eq!(decoder.next_record(), None);
        assert_eq!(decoder.finish(), None);
    }
}
