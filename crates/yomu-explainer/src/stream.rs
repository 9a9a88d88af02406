use serde_json::Value;

/// End-of-stream marker sent as `data: [DONE]`
pub const DONE_SENTINEL: &str = "[DONE]";

/// Incremental decoder for a `data:` framed completion stream.
///
/// Bytes may arrive split at any position, including inside a UTF-8
/// sequence. Incomplete lines and sequences are kept until the rest arrives.
#[derive(Debug, Default)]
pub struct StreamState {
    accumulated: String,
    line_buffer: String,
    utf8_tail: Vec<u8>,
    finished: bool,
}

impl StreamState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one network chunk. Returns `true` once the sentinel was seen.
    pub fn feed<F>(&mut self, chunk: &[u8], on_partial: &mut F) -> bool
    where
        F: FnMut(&str) + ?Sized,
    {
        if self.finished {
            return true;
        }

        self.decode(chunk);

        while let Some(pos) = self.line_buffer.find('\n') {
            let line: String = self.line_buffer.drain(..=pos).collect();
            let line = line.trim_end_matches(['\n', '\r']);

            if self.process_line(line, &mut *on_partial) {
                self.finished = true;
                return true;
            }
        }

        false
    }

    /// Text collected so far, for a stream that ended with the sentinel
    pub fn into_text(self) -> String {
        self.accumulated
    }

    /// Finish a stream that ended without the sentinel.
    ///
    /// The trailing unterminated line is processed like any other line. The
    /// result is the accumulated text or, if nothing was accumulated, the raw
    /// trailing buffer, even when that buffer is a cut-off `data:` line.
    /// `on_partial` sees the result once more if non-empty.
    pub fn finish<F>(mut self, on_partial: &mut F) -> String
    where
        F: FnMut(&str) + ?Sized,
    {
        if self.finished {
            return self.accumulated;
        }

        if !self.utf8_tail.is_empty() {
            let tail = std::mem::take(&mut self.utf8_tail);
            self.line_buffer.push_str(&String::from_utf8_lossy(&tail));
        }

        let trailing = std::mem::take(&mut self.line_buffer);
        let trailing_line = trailing.trim_end_matches('\r');
        if self.process_line(trailing_line, &mut *on_partial) {
            return self.accumulated;
        }

        let final_text = if !self.accumulated.is_empty() {
            self.accumulated
        } else {
            trailing.trim().to_string()
        };

        if !final_text.is_empty() {
            on_partial(&final_text);
        }

        final_text
    }

    fn decode(&mut self, chunk: &[u8]) {
        let mut bytes = std::mem::take(&mut self.utf8_tail);
        bytes.extend_from_slice(chunk);

        let mut start = 0;
        while start < bytes.len() {
            match std::str::from_utf8(&bytes[start..]) {
                Ok(text) => {
                    self.line_buffer.push_str(text);
                    return;
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    self.line_buffer
                        .push_str(&String::from_utf8_lossy(&bytes[start..valid_end]));

                    match e.error_len() {
                        Some(len) => {
                            self.line_buffer.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + len;
                        }
                        None => {
                            // Incomplete sequence at the end, wait for more bytes
                            self.utf8_tail = bytes[valid_end..].to_vec();
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Returns `true` on the sentinel
    fn process_line<F>(&mut self, line: &str, on_partial: &mut F) -> bool
    where
        F: FnMut(&str) + ?Sized,
    {
        let Some(payload) = line.trim_start().strip_prefix("data:") else {
            // keep-alive, comments, event names
            return false;
        };

        let payload = payload.trim();
        if payload == DONE_SENTINEL {
            tracing::debug!("[STREAM] Sentinel received");
            return true;
        }

        if payload.is_empty() {
            return false;
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(chunk) => {
                if let Some(delta) = delta_content(&chunk)
                    && !delta.is_empty()
                {
                    self.accumulated.push_str(delta);
                    on_partial(&self.accumulated);
                }
            }
            Err(e) => {
                tracing::debug!("[STREAM] Skipping malformed chunk: {}", e);
            }
        }

        false
    }
}

/// Delta text of a streamed chunk, or the message text of a whole one
pub fn delta_content(chunk: &Value) -> Option<&str> {
    chunk
        .pointer("/choices/0/delta/content")
        .and_then(Value::as_str)
        .or_else(|| {
            chunk
                .pointer("/choices/0/message/content")
                .and_then(Value::as_str)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::try_parse;

    const PAYLOAD: &str = concat!(
        ": keep-alive\r\n",
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\r\n\r\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"{\\\"title\\\":\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"\\\"走る: to run\\\",\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"\\\"meaning\\\":\\\"move fast\\\"}\"}}]}\n\n",
        "data: [DONE]\n\n",
    );

    fn run(chunks: &[&[u8]]) -> (String, Vec<String>) {
        let mut state = StreamState::new();
        let mut partials = Vec::new();
        let mut on_partial = |text: &str| partials.push(text.to_string());

        for chunk in chunks {
            if state.feed(chunk, &mut on_partial) {
                return (state.into_text(), partials);
            }
        }

        let text = state.finish(&mut on_partial);
        (text, partials)
    }

    #[test]
    fn whole_payload_yields_concatenated_deltas() {
        let (text, partials) = run(&[PAYLOAD.as_bytes()]);

        assert_eq!(text, r#"{"title":"走る: to run","meaning":"move fast"}"#);
        assert_eq!(partials.len(), 3);
        assert_eq!(partials.last().unwrap(), &text);
    }

    #[test]
    fn reassembly_is_split_invariant() {
        let bytes = PAYLOAD.as_bytes();
        let (expected, _) = run(&[bytes]);
        let expected_object = try_parse(&expected).expect("complete object");

        for split in 0..=bytes.len() {
            let (head, tail) = bytes.split_at(split);
            let (text, _) = run(&[head, tail]);
            assert_eq!(text, expected, "split at byte {split}");
            assert_eq!(try_parse(&text).as_ref(), Some(&expected_object));
        }

        let single_bytes: Vec<&[u8]> = bytes.chunks(1).collect();
        let (text, _) = run(&single_bytes);
        assert_eq!(text, expected);
    }

    #[test]
    fn sentinel_stops_processing() {
        let payload = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n\n",
            "data: [DONE]\n\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"y\"}}]}\n\n",
        );
        let mut state = StreamState::new();

        assert!(state.feed(payload.as_bytes(), &mut |_: &str| {}));
        assert!(state.is_finished());
        assert_eq!(state.into_text(), "x");
    }

    #[test]
    fn malformed_line_is_skipped() {
        let payload = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"foo\"}}]}\n",
            "data: not-json\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"bar\"}}]}\n",
        );
        let (text, _) = run(&[payload.as_bytes()]);

        assert_eq!(text, "foobar");
    }

    #[test]
    fn message_content_is_used_without_delta() {
        let payload = "data: {\"choices\":[{\"message\":{\"content\":\"whole\"}}]}\n";
        let (text, _) = run(&[payload.as_bytes()]);

        assert_eq!(text, "whole");
    }

    #[test]
    fn trailing_line_without_newline_is_processed() {
        let payload = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"a\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"content\":\"b\"}}]}",
        );
        let (text, partials) = run(&[payload.as_bytes()]);

        assert_eq!(text, "ab");
        // one per delta plus the final call
        assert_eq!(partials, vec!["a", "ab", "ab"]);
    }

    #[test]
    fn raw_trailing_buffer_is_returned_without_deltas() {
        let (text, partials) = run(&[b"plain answer"]);

        assert_eq!(text, "plain answer");
        assert_eq!(partials, vec!["plain answer"]);
    }

    #[test]
    fn cut_off_data_line_is_returned_raw() {
        let cut = r#"data: {"choices":[{"delta":{"content":"hel"#;
        let (text, partials) = run(&[cut.as_bytes()]);

        assert_eq!(text, cut);
        assert_eq!(partials, vec![cut]);
    }

    #[test]
    fn cut_off_data_line_after_deltas_keeps_accumulated_text() {
        let payload = concat!(
            "data: {\"choices\":[{\"delta\":{\"content\":\"ab\"}}]}\n",
            "data: {\"choices\":[{\"delta\":{\"con",
        );
        let (text, partials) = run(&[payload.as_bytes()]);

        assert_eq!(text, "ab");
        assert_eq!(partials, vec!["ab", "ab"]);
    }

    #[test]
    fn empty_stream_yields_empty_text() {
        let (text, partials) = run(&[b": ping\n\n"]);

        assert!(text.is_empty());
        assert!(partials.is_empty());
    }
}
