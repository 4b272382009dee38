//! Timeline artifact: when each step was displayed during playback.

use serde::{Deserialize, Serialize};
use serde::ser::Serializer as _;

use std::path::Path;

use crate::{StepKind, StepwiseResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub index: usize,
    pub cursor: usize,
    pub time_ms: u64,
    pub kind: StepKind,
    pub description: String,
}

pub fn write_timeline(entries: &[TimelineEntry], out_path: &Path) -> StepwiseResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut buf = Vec::with_capacity(entries.len().saturating_mul(96));
    {
        let mut ser = serde_json::Serializer::new(&mut buf);
        use serde::ser::SerializeSeq as _;
        let mut seq = ser.serialize_seq(Some(entries.len()))?;
        for entry in entries {
            seq.serialize_element(entry)?;
        }
        seq.end()?;
    }
    std::fs::write(out_path, buf)?;
    Ok(())
}

pub fn read_timeline(path: &Path) -> StepwiseResult<Vec<TimelineEntry>> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_file_round_trip() {
        let dir = std::env::temp_dir().join(format!("stepwise-timeline-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("timeline.json");
        let entries = vec![
            TimelineEntry {
                index: 0,
                cursor: 0,
                time_ms: 0,
                kind: StepKind::Start,
                description: "begin".to_string(),
            },
            TimelineEntry {
                index: 1,
                cursor: 1,
                time_ms: 800,
                kind: StepKind::Done,
                description: "end".to_string(),
            },
        ];
        write_timeline(&entries, &path).expect("write");
        assert_eq!(read_timeline(&path).expect("read"), entries);
        let raw = std::fs::read_to_string(&path).expect("raw");
        assert!(raw.starts_with('['));
        assert!(raw.contains("\"kind\":\"done\""));
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}
