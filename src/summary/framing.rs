use crate::summary::bridge::{Bridge, error_response};
use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::io::{self, BufRead, Read, Write};

/// Browsers accept at most 64 MiB in one native-messaging frame.
pub const MAX_FRAME_BYTES: u32 = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// 4-byte native-endian length prefix, then UTF-8 JSON.
    Native,
    /// One JSON object per line.
    JsonLines,
}

/// Read one length-prefixed frame. `Ok(None)` on clean EOF.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    match reader.read_exact(&mut len_buf) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err).context("failed to read frame length"),
    }
    let len = u32::from_ne_bytes(len_buf);
    if len > MAX_FRAME_BYTES {
        bail!("frame of {len} bytes exceeds limit of {MAX_FRAME_BYTES}");
    }
    let mut body = vec![0u8; len as usize];
    reader
        .read_exact(&mut body)
        .context("truncated frame body")?;
    Ok(Some(body))
}

pub fn write_frame<W: Write>(writer: &mut W, value: &Value) -> Result<()> {
    let body = serde_json::to_vec(value)?;
    let len = u32::try_from(body.len()).context("response too large for one frame")?;
    writer.write_all(&len.to_ne_bytes())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

fn respond(bridge: &mut Bridge<'_>, raw: &[u8]) -> Value {
    match serde_json::from_slice::<Value>(raw) {
        Ok(msg) => bridge.handle(&msg),
        Err(err) => error_response(&format!("malformed message: {err}")),
    }
}

/// Serve requests until EOF, one reply per request, in order. Returns the
/// number of requests answered.
pub fn serve<R: BufRead, W: Write>(
    bridge: &mut Bridge<'_>,
    framing: Framing,
    mut reader: R,
    mut writer: W,
) -> Result<usize> {
    let mut handled = 0usize;
    match framing {
        Framing::Native => {
            while let Some(frame) = read_frame(&mut reader)? {
                let reply = respond(bridge, &frame);
                write_frame(&mut writer, &reply)?;
                handled += 1;
            }
        }
        Framing::JsonLines => {
            // Raw bytes: a line that is not UTF-8 still gets its own error reply.
            let mut line = Vec::new();
            loop {
                line.clear();
                let read = reader
                    .read_until(b'\n', &mut line)
                    .context("failed to read request line")?;
                if read == 0 {
                    break;
                }
                if line.trim_ascii().is_empty() {
                    continue;
                }
                let reply = respond(bridge, &line);
                writeln!(writer, "{reply}")?;
                writer.flush()?;
                handled += 1;
            }
        }
    }
    tracing::debug!(handled, "bridge input closed");
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::{Framing, read_frame, serve, write_frame};
    use crate::summary::bridge::Bridge;
    use crate::summary::config::MemoryConfigStore;
    use crate::summary::pipeline::tests::RecordingSummarizer;
    use serde_json::{Value, json};
    use std::io::Cursor;

    fn frame(value: &Value) -> Vec<u8> {
        let mut out = Vec::new();
        write_frame(&mut out, value).expect("frame");
        out
    }

    #[test]
    fn native_framing_answers_each_request_in_order() {
        let store = MemoryConfigStore::default();
        let fake = RecordingSummarizer::default();
        let mut bridge = Bridge::new(&store, &fake);

        let mut input = frame(&json!({"type": "PING"}));
        input.extend(frame(&json!({"type": "BOGUS"})));
        let mut output = Vec::new();
        let handled =
            serve(&mut bridge, Framing::Native, Cursor::new(input), &mut output).expect("serve");
        assert_eq!(handled, 2);

        let mut reader = Cursor::new(output);
        let first = read_frame(&mut reader).expect("read").expect("frame 1");
        let second = read_frame(&mut reader).expect("read").expect("frame 2");
        assert!(read_frame(&mut reader).expect("read").is_none());
        assert_eq!(
            serde_json::from_slice::<Value>(&first).expect("json"),
            json!({"ok": true})
        );
        assert_eq!(
            serde_json::from_slice::<Value>(&second).expect("json"),
            json!({"ok": false, "error": "Unknown message type"})
        );
    }

    #[test]
    fn json_lines_skip_blanks_and_report_bad_json() {
        let store = MemoryConfigStore::default();
        let fake = RecordingSummarizer::default();
        let mut bridge = Bridge::new(&store, &fake);
        let input = "{\"type\":\"PING\"}\n\nnot json\n";
        let mut output = Vec::new();
        let handled = serve(
            &mut bridge,
            Framing::JsonLines,
            Cursor::new(input),
            &mut output,
        )
        .expect("serve");
        assert_eq!(handled, 2);

        let text = String::from_utf8(output).expect("utf8");
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).expect("json line"))
            .collect();
        assert_eq!(lines[0], json!({"ok": true}));
        assert_eq!(lines[1]["ok"], false);
        assert!(
            lines[1]["error"]
                .as_str()
                .is_some_and(|e| e.starts_with("malformed message"))
        );
    }

    #[test]
    fn json_lines_survive_a_line_that_is_not_utf8() {
        let store = MemoryConfigStore::default();
        let fake = RecordingSummarizer::default();
        let mut bridge = Bridge::new(&store, &fake);
        let mut input = b"{\"type\":\"PING\"}\n".to_vec();
        input.extend_from_slice(b"\xff\xfe bad\r\n");
        input.extend_from_slice(b"{\"type\":\"PING\"}");
        let mut output = Vec::new();
        let handled = serve(
            &mut bridge,
            Framing::JsonLines,
            Cursor::new(input),
            &mut output,
        )
        .expect("serve keeps going");
        assert_eq!(handled, 3);

        let text = String::from_utf8(output).expect("utf8");
        let lines: Vec<Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).expect("json line"))
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], json!({"ok": true}));
        assert_eq!(lines[1]["ok"], false);
        assert!(
            lines[1]["error"]
                .as_str()
                .is_some_and(|e| e.starts_with("malformed message"))
        );
        assert_eq!(lines[2], json!({"ok": true}));
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let mut input = (super::MAX_FRAME_BYTES + 1).to_ne_bytes().to_vec();
        input.extend_from_slice(b"{}");
        assert!(read_frame(&mut Cursor::new(input)).is_err());
    }

    #[test]
    fn truncated_body_is_an_error() {
        let mut input = 10u32.to_ne_bytes().to_vec();
        input.extend_from_slice(b"{}");
        assert!(read_frame(&mut Cursor::new(input)).is_err());
    }
}
