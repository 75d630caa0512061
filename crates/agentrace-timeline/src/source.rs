//! Loading event logs from disk or the wire.
//!
//! Two encodings are accepted: a single JSON array of events (the retrieval
//! API's response shape) and JSONL with one event per line (the on-disk log
//! shape). Malformed JSONL lines are skipped with a warning rather than
//! failing the whole load — a session being written while we read it, or a
//! future record shape, should not make the rest unviewable.

use crate::{SessionEvent, TimelineError, TimelineResult};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// Read an event log from a path. The encoding is sniffed from the first
/// non-whitespace byte: `[` means a JSON array, anything else JSONL.
pub fn read_events_from_path<P: AsRef<Path>>(path: P) -> TimelineResult<Vec<SessionEvent>> {
    let mut content = String::new();
    BufReader::new(File::open(path)?).read_to_string(&mut content)?;
    read_events_from_str(&content)
}

/// Read an event log from an in-memory string. Same encoding sniffing as
/// [`read_events_from_path`].
pub fn read_events_from_str(content: &str) -> TimelineResult<Vec<SessionEvent>> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).map_err(|e| TimelineError::Json {
            line: e.line(),
            message: e.to_string(),
            source: e,
        });
    }
    read_events_jsonl(content.as_bytes())
}

fn read_events_jsonl<R: BufRead>(reader: R) -> TimelineResult<Vec<SessionEvent>> {
    let mut events = Vec::new();
    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        let line_num = line_num + 1; // 1-indexed

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<SessionEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                // Log but don't fail - forward compatibility
                tracing::warn!(line = line_num, error = %e, "skipping unparsable event line");
            }
        }
    }
    Ok(events)
}
