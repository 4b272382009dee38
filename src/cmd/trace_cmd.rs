//! Trace commands (`stepwise list|trace|show`).

use clap::Args;
use serde_json::Value;

use std::path::Path;

use crate::{
    Config, InputRng, ProblemId, ProblemMeta, StepwiseError, StepwiseResult, TraceFile, catalog,
};

/// Where a command's input comes from. With none of the flags set the
/// problem's sample input is used.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Input as inline JSON, e.g. '{"nums":[2,7,11,15],"target":9}'.
    #[arg(long, conflicts_with_all = ["seed", "random"])]
    pub input: Option<String>,
    /// Generate a random input from this seed.
    #[arg(long, conflicts_with = "random")]
    pub seed: Option<u64>,
    /// Generate a random input from a fresh seed (printed in the output).
    #[arg(long)]
    pub random: bool,
}

#[derive(Debug, Clone)]
pub struct ResolvedInput {
    pub input: Value,
    pub seed: Option<u64>,
}

impl InputArgs {
    pub fn resolve(&self, problem: ProblemId) -> StepwiseResult<ResolvedInput> {
        if let Some(raw) = &self.input {
            let input = serde_json::from_str(raw)
                .map_err(|e| StepwiseError::InvalidInput(format!("--input is not JSON: {e}")))?;
            return Ok(ResolvedInput { input, seed: None });
        }
        let seed = match (self.seed, self.random) {
            (Some(seed), _) => Some(seed),
            (None, true) => Some(InputRng::fresh_seed()),
            (None, false) => None,
        };
        let input = match seed {
            Some(seed) => catalog::random_input(problem, seed)?,
            None => catalog::sample_input(problem)?,
        };
        Ok(ResolvedInput { input, seed })
    }
}

pub fn list_command() -> Vec<ProblemMeta> {
    ProblemId::ALL.into_iter().map(ProblemId::meta).collect()
}

pub fn trace_command(
    config: &Config,
    problem: ProblemId,
    input: &InputArgs,
    out: Option<&Path>,
    all: bool,
) -> StepwiseResult<Value> {
    let resolved = input.resolve(problem)?;
    let steps = catalog::generate(problem, &resolved.input, config.max_steps)?;
    let file = TraceFile::new(problem, resolved.input, steps)?;
    if let Some(path) = out {
        file.write_json(path)?;
        tracing::info!("wrote trace {}", path.display());
    }
    if all {
        return Ok(serde_json::to_value(&file)?);
    }

    let last = file.steps.last();
    Ok(serde_json::json!({
        "problem": problem,
        "input": file.input,
        "seed": resolved.seed,
        "steps": file.steps.len(),
        "digest": file.digest,
        "last": {
            "kind": last.kind,
            "description": last.description,
        },
        "out": out.map(|p| p.display().to_string()),
    }))
}

/// Reads and verifies a trace file. `replayMatches` is false when the stored
/// input now generates a different trace, and null when it no longer
/// generates at all.
pub fn show_command(path: &Path, at: Option<usize>, max_steps: usize) -> StepwiseResult<Value> {
    let file = TraceFile::read_json(path)?;
    file.verify()?;
    let replay_matches = match file.replay_matches(max_steps) {
        Ok(matches) => Some(matches),
        Err(err) => {
            tracing::warn!("stored input for {} no longer generates: {err}", file.problem);
            None
        }
    };
    let index = at.unwrap_or_else(|| file.steps.last_index());
    let step = file.steps.get(index).ok_or_else(|| {
        StepwiseError::Trace(format!(
            "step {index} is out of range (trace has {} steps)",
            file.steps.len()
        ))
    })?;
    Ok(serde_json::json!({
        "problem": file.problem,
        "digest": file.digest,
        "generatedAt": file.generated_at,
        "steps": file.steps.len(),
        "replayMatches": replay_matches,
        "at": index,
        "step": step,
    }))
}
