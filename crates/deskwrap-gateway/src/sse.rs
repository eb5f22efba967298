//! Line-buffered decoding of chat-completions Server-Sent Events.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;

const DATA_PREFIX: &str = "data: ";
const DONE_MARKER: &str = "[DONE]";

/// Longest line kept in the buffer; anything longer is dropped.
const MAX_LINE_BYTES: usize = 256 * 1024;

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    delta: Option<Delta>,
}

#[derive(Debug, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Incremental decoder for an OpenAI-style token stream.
///
/// Bytes are buffered until a full line is available, so chunks may split
/// lines or UTF-8 sequences anywhere.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    done: bool,
    /// Inside an oversized line whose head was already dropped.
    skipping: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `data: [DONE]` has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Feed a chunk and return the content deltas of every completed line.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        if self.done {
            return Vec::new();
        }

        self.buffer.extend_from_slice(chunk);

        let mut deltas = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if std::mem::take(&mut self.skipping) {
                continue;
            }
            if line.len() > MAX_LINE_BYTES {
                tracing::debug!("Dropping SSE line longer than {} bytes", MAX_LINE_BYTES);
                continue;
            }
            if let Some(delta) = self.decode_line(&line[..line.len() - 1]) {
                deltas.push(delta);
            }
            if self.done {
                self.buffer.clear();
                break;
            }
        }

        if self.buffer.len() > MAX_LINE_BYTES {
            tracing::debug!("Dropping SSE line longer than {} bytes", MAX_LINE_BYTES);
            self.skipping = true;
        }
        if self.skipping {
            self.buffer.clear();
        }

        deltas
    }

    /// Decode whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Vec<String> {
        let rest = std::mem::take(&mut self.buffer);
        if self.done || std::mem::take(&mut self.skipping) || rest.is_empty() {
            return Vec::new();
        }
        self.decode_line(&rest).into_iter().collect()
    }

    fn decode_line(&mut self, raw: &[u8]) -> Option<String> {
        let line = String::from_utf8_lossy(raw);
        let line = line.strip_suffix('\r').unwrap_or(&line);

        if line.starts_with(':') || line.trim().is_empty() {
            return None;
        }

        let payload = line.strip_prefix(DATA_PREFIX)?.trim();
        if payload == DONE_MARKER {
            self.done = true;
            return None;
        }

        match serde_json::from_str::<ChatChunk>(payload) {
            Ok(chunk) => chunk
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.delta)
                .and_then(|delta| delta.content)
                .filter(|content| !content.is_empty()),
            Err(e) => {
                tracing::debug!("Skipping malformed SSE payload: {}", e);
                None
            }
        }
    }
}

/// Drive a byte stream through an [`SseDecoder`], reporting each delta.
///
/// Returns the concatenated text once the stream ends or sends `[DONE]`.
pub async fn collect_deltas<S, E, F>(stream: S, mut on_delta: F) -> Result<String, E>
where
    S: Stream<Item = Result<Bytes, E>>,
    F: FnMut(&str),
{
    let mut stream = std::pin::pin!(stream);
    let mut decoder = SseDecoder::new();
    let mut text = String::new();

    while let Some(chunk) = stream.next().await {
        for delta in decoder.push(&chunk?) {
            on_delta(&delta);
            text.push_str(&delta);
        }
        if decoder.is_done() {
            break;
        }
    }

    for delta in decoder.finish() {
        on_delta(&delta);
        text.push_str(&delta);
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn event(content: &str) -> String {
        format!(
            "data: {}\n\n",
            serde_json::json!({ "choices": [{ "delta": { "content": content } }] })
        )
    }

    #[test]
    fn decodes_content_deltas() {
        let mut decoder = SseDecoder::new();
        let input = format!("{}{}", event("<button>"), event("Click</button>"));

        assert_eq!(decoder.push(input.as_bytes()), vec!["<button>", "Click</button>"]);
    }

    #[test]
    fn buffers_partial_lines() {
        let mut decoder = SseDecoder::new();
        let input = event("hello");
        let (a, b) = input.split_at(12);

        assert!(decoder.push(a.as_bytes()).is_empty());
        assert_eq!(decoder.push(b.as_bytes()), vec!["hello"]);
    }

    #[test]
    fn handles_utf8_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let input = event("olá ✨");
        let bytes = input.as_bytes();
        let split = input.find('✨').unwrap() + 1;

        let mut out = decoder.push(&bytes[..split]);
        out.extend(decoder.push(&bytes[split..]));

        assert_eq!(out, vec!["olá ✨"]);
    }

    #[test]
    fn skips_comments_blank_and_foreign_lines() {
        let mut decoder = SseDecoder::new();
        let input = format!(
            ": keep-alive\r\n\r\nevent: message\nid: 7\n{}",
            event("ok").replace('\n', "\r\n")
        );

        assert_eq!(decoder.push(input.as_bytes()), vec!["ok"]);
    }

    #[test]
    fn ignores_malformed_json() {
        let mut decoder = SseDecoder::new();
        let input = format!(
            "data: {{not json\ndata: {{\"choices\": 5}}\n{}",
            event("still here")
        );

        assert_eq!(decoder.push(input.as_bytes()), vec!["still here"]);
        assert!(!decoder.is_done());
    }

    #[test]
    fn ignores_chunks_without_content() {
        let mut decoder = SseDecoder::new();
        let input = "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\
                     data: {\"choices\":[]}\n\
                     data: {\"choices\":[{\"delta\":null}]}\n\
                     data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n";

        assert!(decoder.push(input.as_bytes()).is_empty());
    }

    #[test]
    fn stops_at_done() {
        let mut decoder = SseDecoder::new();
        let input = format!("{}data: [DONE]\n{}", event("a"), event("b"));

        assert_eq!(decoder.push(input.as_bytes()), vec!["a"]);
        assert!(decoder.is_done());
        assert!(decoder.push(event("c").as_bytes()).is_empty());
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn flushes_unterminated_final_line() {
        let mut decoder = SseDecoder::new();
        let input = event("tail");

        assert!(decoder.push(input.trim_end().as_bytes()).is_empty());
        assert_eq!(decoder.finish(), vec!["tail"]);
    }

    #[test]
    fn drops_oversized_lines() {
        let mut decoder = SseDecoder::new();
        let huge = format!("data: {}", "x".repeat(MAX_LINE_BYTES));

        assert!(decoder.push(huge.as_bytes()).is_empty());
        assert!(decoder.buffer.is_empty());
        assert!(decoder.push(b"still the same line").is_empty());
        assert!(decoder.buffer.is_empty());

        let rest = format!("\n{}", event("after"));
        assert_eq!(decoder.push(rest.as_bytes()), vec!["after"]);
    }

    #[test]
    fn drops_oversized_complete_line() {
        let mut decoder = SseDecoder::new();
        let huge = event(&"x".repeat(MAX_LINE_BYTES));
        let input = format!("{}{}", huge, event("next"));

        assert_eq!(decoder.push(input.as_bytes()), vec!["next"]);
    }

    #[test]
    fn oversized_tail_is_not_flushed() {
        let mut decoder = SseDecoder::new();
        let huge = format!("data: {}", "x".repeat(MAX_LINE_BYTES));

        decoder.push(huge.as_bytes());

        assert!(decoder.finish().is_empty());
    }

    #[tokio::test]
    async fn collects_a_stream() {
        let chunks = vec![
            Ok::<_, std::io::Error>(Bytes::from(event("<svg>"))),
            Ok(Bytes::from("data: garbage\n")),
            Ok(Bytes::from(event("</svg>"))),
            Ok(Bytes::from("data: [DONE]\n")),
        ];
        let mut seen = Vec::new();

        let text = collect_deltas(futures_util::stream::iter(chunks), |d| {
            seen.push(d.to_string())
        })
        .await
        .unwrap();

        assert_eq!(text, "<svg></svg>");
        assert_eq!(seen, vec!["<svg>", "</svg>"]);
    }

    #[tokio::test]
    async fn propagates_stream_errors() {
        let chunks = vec![
            Ok(Bytes::from(event("a"))),
            Err(std::io::Error::other("reset")),
        ];

        let result = collect_deltas(futures_util::stream::iter(chunks), |_| {}).await;

        assert!(result.is_err());
    }
}
