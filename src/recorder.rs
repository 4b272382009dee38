//! Trace recording.
//!
//! Each problem runs an instrumented copy of its algorithm against a
//! [`Recorder`], handing it an owned snapshot at every meaningful operation.
//! Generation is all-or-nothing: [`generate_trace`] either returns a complete,
//! non-empty [`Trace`] or an error, and the half-filled recorder is dropped.

use serde::Serialize;
use serde::de::DeserializeOwned;

use std::fmt::Debug;
use std::time::Duration;

use crate::{InputRng, Step, StepKind, StepwiseError, StepwiseResult, Trace};

/// Upper bound on steps per trace unless the caller overrides it.
pub const DEFAULT_MAX_STEPS: usize = 10_000;

#[derive(Debug)]
pub struct Recorder<S> {
    steps: Vec<Step<S>>,
    limit: usize,
}

impl<S> Default for Recorder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Recorder<S> {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_STEPS)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            steps: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Appends one step. `state` is taken by value, so the recorder owns a
    /// copy the algorithm can no longer reach.
    pub fn record(
        &mut self,
        kind: StepKind,
        description: impl Into<String>,
        state: S,
    ) -> StepwiseResult<()> {
        if self.steps.len() >= self.limit {
            return Err(StepwiseError::TraceLimit { limit: self.limit });
        }
        self.steps.push(Step::new(kind, description, state));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn finish(self) -> StepwiseResult<Trace<S>> {
        Trace::try_from(self.steps)
    }
}

/// Broad technique family, used for listing and grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    Hashing,
    BinarySearch,
    TwoPointers,
    SlidingWindow,
    Stack,
    Heap,
    TreeRecursion,
    GraphSearch,
    Backtracking,
    DynamicProgramming,
    LinkedList,
    Intervals,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProblemMeta {
    pub id: &'static str,
    pub title: &'static str,
    pub technique: Technique,
    /// Time one step stays on screen at 1x speed.
    #[serde(rename = "baseIntervalMs", serialize_with = "serialize_ms")]
    pub base_interval: Duration,
    /// Human-readable input bound, e.g. "at most 20 numbers".
    pub limits: &'static str,
}

fn serialize_ms<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

pub trait Problem {
    type Input: Serialize + DeserializeOwned + Clone + Debug;
    type State: Serialize + DeserializeOwned + Clone + Debug + PartialEq;

    fn meta() -> ProblemMeta;

    /// Rejects inputs the algorithm cannot run on. Nothing is recorded for a
    /// rejected input.
    fn validate(input: &Self::Input) -> StepwiseResult<()>;

    /// Runs the instrumented algorithm. Degenerate inputs record a single
    /// terminal step instead of failing.
    fn record(input: &Self::Input, rec: &mut Recorder<Self::State>) -> StepwiseResult<()>;

    fn sample_input() -> Self::Input;

    fn random_input(rng: &mut InputRng) -> Self::Input;
}

pub fn generate_trace<P: Problem>(input: &P::Input) -> StepwiseResult<Trace<P::State>> {
    generate_trace_with_limit::<P>(input, DEFAULT_MAX_STEPS)
}

pub fn generate_trace_with_limit<P: Problem>(
    input: &P::Input,
    max_steps: usize,
) -> StepwiseResult<Trace<P::State>> {
    let meta = P::meta();
    P::validate(input)?;
    let mut rec = Recorder::with_limit(max_steps);
    P::record(input, &mut rec)?;
    let trace = rec.finish()?;
    tracing::debug!(problem = meta.id, steps = trace.len(), "trace generated");
    Ok(trace)
}

/// Shared bound check for list-shaped inputs.
pub(crate) fn check_len(what: &str, len: usize, max: usize) -> StepwiseResult<()> {
    if len > max {
        return Err(StepwiseError::invalid(format!(
            "{what} has {len} elements (at most {max} allowed)"
        )));
    }
    Ok(())
}

/// Values are kept small so narration stays readable and arithmetic cannot
/// overflow.
pub(crate) const VALUE_BOUND: i64 = 1_000_000;

/// `i64::MIN` has no positive counterpart, so the range is checked directly.
pub(crate) fn within_bound(v: i64) -> bool {
    (-VALUE_BOUND..=VALUE_BOUND).contains(&v)
}

pub(crate) fn check_values(what: &str, values: &[i64]) -> StepwiseResult<()> {
    if let Some(v) = values.iter().find(|v| !within_bound(**v)) {
        return Err(StepwiseError::invalid(format!(
            "{what} contains {v} (values must be within ±{VALUE_BOUND})"
        )));
    }
    Ok(())
}

/// Renders a list the way narration prints them: `[1, 2, 3]`.
pub(crate) fn fmt_list<T: std::fmt::Display>(items: &[T]) -> String {
    let inner: Vec<String> = items.iter().map(|v| v.to_string()).collect();
    format!("[{}]", inner.join(", "))
}
