//! Newline-delimited body decoding
//!
//! Splits a streamed byte body into text lines without buffering the whole
//! body. Invalid UTF-8 is replaced instead of failing, so a single corrupt
//! record cannot abort a long result stream; the decoder above decides what
//! to do with it.

use std::pin::Pin;

use futures_util::{Stream, StreamExt, TryStreamExt};
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead};
use tokio_util::io::StreamReader;

use crate::defaults::http::MAX_RESULT_LINE_BYTES;
use crate::error::LlmError;
use crate::execution::http::transport::HttpTransportStreamBody;

pub type LineStream = Pin<Box<dyn Stream<Item = Result<String, LlmError>> + Send>>;

/// Turn a streamed body into a stream of lines.
///
/// - Lines are split on `\n`; a trailing `\r` is stripped.
/// - A final line without a terminating newline is still yielded.
/// - Blank lines are yielded as-is; filtering is up to the caller.
/// - Transport errors end the stream after being yielded once.
/// - A line longer than [`MAX_RESULT_LINE_BYTES`] ends the stream with an error.
pub fn body_lines(body: HttpTransportStreamBody) -> LineStream {
    body_lines_with_max_length(body, MAX_RESULT_LINE_BYTES)
}

/// [`body_lines`] with an explicit line-length limit.
pub fn body_lines_with_max_length(body: HttpTransportStreamBody, max_length: usize) -> LineStream {
    let reader = StreamReader::new(body.map_err(|e| std::io::Error::other(e.to_string())));
    let codec = AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), max_length);
    let frames = FramedRead::new(reader, codec);

    let out = async_stream::stream! {
        futures_util::pin_mut!(frames);
        while let Some(frame) = frames.next().await {
            match frame {
                Ok(bytes) => yield Ok(decode_line(&bytes)),
                Err(e) => {
                    yield Err(codec_error(e));
                    return;
                }
            }
        }
    };
    Box::pin(out)
}

/// Whether a line carries no record.
pub fn is_blank_line(line: &str) -> bool {
    line.trim().is_empty()
}

fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

fn codec_error(e: AnyDelimiterCodecError) -> LlmError {
    LlmError::StreamError(format!("failed to read result line: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn body(chunks: Vec<&'static [u8]>) -> HttpTransportStreamBody {
        HttpTransportStreamBody::from_stream(futures::stream::iter(
            chunks.into_iter().map(|c| Ok(Bytes::from_static(c))),
        ))
    }

    async fn collect(body: HttpTransportStreamBody) -> Vec<Result<String, LlmError>> {
        body_lines(body).collect().await
    }

    #[tokio::test]
    async fn splits_across_chunk_boundaries() {
        let lines = collect(body(vec![
            &b"{\"a\":1}\n{\"b\""[..],
            &b":2}\r\n"[..],
            &b"\n{\"c\":3}"[..],
        ]))
        .await;
        let lines: Vec<String> = lines.into_iter().map(Result::unwrap).collect();
        assert_eq!(lines, vec!["{\"a\":1}", "{\"b\":2}", "", "{\"c\":3}"]);
        assert!(is_blank_line(&lines[2]));
    }

    #[tokio::test]
    async fn invalid_utf8_does_not_fail_the_stream() {
        let lines = collect(body(vec![&b"ok\n\xff\xfe\nafter\n"[..]])).await;
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(Result::is_ok));
        assert_eq!(lines[2].as_ref().unwrap(), "after");
    }

    #[tokio::test]
    async fn transport_error_is_yielded_then_stream_ends() {
        let chunks: Vec<Result<Bytes, LlmError>> = vec![
            Ok(Bytes::from_static(b"one\n")),
            Err(LlmError::ConnectionError("reset".into())),
            Ok(Bytes::from_static(b"never\n")),
        ];
        let body = HttpTransportStreamBody::from_stream(futures::stream::iter(chunks));
        let lines = collect(body).await;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_ref().unwrap(), "one");
        assert!(matches!(lines[1], Err(LlmError::StreamError(ref m)) if m.contains("reset")));
    }

    #[tokio::test]
    async fn overlong_line_fails_instead_of_buffering() {
        let body = body(vec![&b"short
"[..], &b"0123456789abcdef"[..], &b"more
"[..]]);
        let lines: Vec<_> = body_lines_with_max_length(body, 8).collect().await;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].as_ref().unwrap(), "short");
        assert!(matches!(lines[1], Err(LlmError::StreamError(_))));
    }
}
