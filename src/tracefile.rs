//! Trace file format (`.stepwise.json`) read/write.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use std::path::Path;

use crate::{ProblemId, Snapshot, StepwiseError, StepwiseResult, Trace, catalog};

pub const TRACE_FORMAT: &str = "stepwise-trace";
pub const TRACE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceFile {
    pub format: String,
    pub version: u32,
    pub problem: ProblemId,
    pub input: Value,
    /// blake3 of the canonical step JSON.
    pub digest: String,
    pub generated_at: String,
    pub steps: Trace<Snapshot>,
}

impl TraceFile {
    pub fn new(problem: ProblemId, input: Value, steps: Trace<Snapshot>) -> StepwiseResult<Self> {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| StepwiseError::Trace(format!("timestamp: {e}")))?;
        Ok(Self {
            format: TRACE_FORMAT.to_string(),
            version: TRACE_VERSION,
            problem,
            input,
            digest: steps.digest()?,
            generated_at,
            steps,
        })
    }

    /// Checks the header, recomputes the digest, and confirms that every step
    /// belongs to `problem`.
    pub fn verify(&self) -> StepwiseResult<()> {
        if self.format != TRACE_FORMAT {
            return Err(StepwiseError::Trace(format!(
                "unexpected format {:?} (expected {TRACE_FORMAT:?})",
                self.format
            )));
        }
        if self.version != TRACE_VERSION {
            return Err(StepwiseError::Trace(format!(
                "unsupported trace version {} (expected {TRACE_VERSION})",
                self.version
            )));
        }
        let actual = self.steps.digest()?;
        if actual != self.digest {
            return Err(StepwiseError::Trace(format!(
                "digest mismatch: file says {}, steps hash to {actual}",
                self.digest
            )));
        }
        if let Some((i, step)) = self
            .steps
            .iter()
            .enumerate()
            .find(|(_, s)| s.state.problem() != self.problem)
        {
            return Err(StepwiseError::Trace(format!(
                "step {i} holds {} state in a {} trace",
                step.state.problem(),
                self.problem
            )));
        }
        Ok(())
    }

    /// Regenerates the trace from the stored input and compares digests.
    pub fn replay_matches(&self, max_steps: usize) -> StepwiseResult<bool> {
        let fresh = catalog::generate(self.problem, &self.input, max_steps)?;
        Ok(fresh.digest()? == self.digest)
    }

    pub fn write_json(&self, path: &Path) -> StepwiseResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    pub fn read_json(path: &Path) -> StepwiseResult<Self> {
        let bytes = std::fs::read(path)?;
        let t: TraceFile = serde_json::from_slice(&bytes)?;
        Ok(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MAX_STEPS;

    fn sample(problem: ProblemId) -> TraceFile {
        let input = catalog::sample_input(problem).expect("sample");
        let steps = catalog::generate(problem, &input, DEFAULT_MAX_STEPS).expect("trace");
        TraceFile::new(problem, input, steps).expect("trace file")
    }

    #[test]
    fn write_read_verify() {
        let dir = std::env::temp_dir().join(format!("stepwise-trace-{}", uuid::Uuid::new_v4()));
        let path = dir.join("two_sum.stepwise.json");
        let file = sample(ProblemId::TwoSum);
        file.write_json(&path).expect("write");

        let back = TraceFile::read_json(&path).expect("read");
        back.verify().expect("verify");
        assert_eq!(back.steps, file.steps);
        assert!(back.replay_matches(DEFAULT_MAX_STEPS).expect("replay"));
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn tampered_description_is_detected() {
        let file = sample(ProblemId::ClimbingStairs);
        let mut json = serde_json::to_value(&file).expect("encode");
        json["steps"][0]["description"] = Value::String("edited".to_string());
        let tampered: TraceFile = serde_json::from_value(json).expect("decode");
        let err = tampered.verify().expect_err("tampered");
        assert!(err.to_string().contains("digest mismatch"));
    }

    #[test]
    fn wrong_header_is_rejected() {
        let mut file = sample(ProblemId::BinarySearch);
        file.version = 2;
        assert!(file.verify().is_err());
        let mut file = sample(ProblemId::BinarySearch);
        file.format = "other".to_string();
        assert!(file.verify().is_err());
    }

    #[test]
    fn mixed_problem_states_are_rejected() {
        let mut file = sample(ProblemId::Subsets);
        file.problem = ProblemId::TwoSum;
        let err = file.verify().expect_err("mismatch");
        assert!(err.to_string().contains("subsets"));
    }

    #[test]
    fn empty_steps_do_not_decode() {
        let mut json = serde_json::to_value(sample(ProblemId::TwoSum)).expect("encode");
        json["steps"] = serde_json::json!([]);
        assert!(serde_json::from_value::<TraceFile>(json).is_err());
    }
}
