//! Optional JSONL telemetry: one timestamped JSON object per line,
//! appended to a configured file. Disabled (a no-op) when no path is set.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Telemetry sink of a server. Events carry a monotonically increasing
/// sequence number so interleaved writers can be untangled offline.
pub struct TelemetrySink {
    file: Option<File>,
    seq: u64,
}

impl TelemetrySink {
    /// Opens (appending) the telemetry file, or a disabled sink for `None`.
    pub fn new(path: Option<&Path>) -> io::Result<TelemetrySink> {
        let file = match path {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };
        Ok(TelemetrySink { file, seq: 0 })
    }

    /// A disabled sink.
    #[must_use]
    pub fn disabled() -> TelemetrySink {
        TelemetrySink {
            file: None,
            seq: 0,
        }
    }

    /// Appends one event line. No-op when disabled.
    pub fn write(&mut self, event: &str, payload: Value) -> io::Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };

        let line = json!({
            "event": event,
            "ts": now_iso8601(),
            "seq": self.seq,
            "payload": payload,
        });
        self.seq = self.seq.saturating_add(1);
        writeln!(file, "{line}")?;
        file.flush()
    }
}

fn now_iso8601() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_sink_is_a_noop() {
        let mut sink = TelemetrySink::disabled();
        sink.write("x", json!({})).unwrap();
        sink.write("y", json!({"a": 1})).unwrap();
    }

    #[test]
    fn writes_jsonl_with_increasing_seq() {
        let dir = std::env::temp_dir().join(format!("gwu-telemetry-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("t.jsonl");

        {
            let mut sink = TelemetrySink::new(Some(&path)).unwrap();
            sink.write("session_created", json!({"sess_id": "abc"})).unwrap();
            sink.write("session_removed", json!({"sess_id": "abc"})).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "session_created");
        assert_eq!(lines[0]["seq"], 0);
        assert_eq!(lines[1]["seq"], 1);
        assert_eq!(lines[1]["payload"]["sess_id"], "abc");

        std::fs::remove_dir_all(&dir).ok();
    }
}
