//! Step snapshots and the non-empty traces built from them.
//!
//! A [`Step`] is the unit of replay: a classification of what just happened,
//! a finished sentence describing it, and an owned copy of every value a
//! renderer needs. Steps are never mutated once they are part of a [`Trace`].

use serde::{Deserialize, Serialize};

use crate::{StepwiseError, StepwiseResult};

/// Operation category of a step. Presentation picks colors and labels from it;
/// recorders never branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Start,
    Comparing,
    Checking,
    Storing,
    Moving,
    Expanding,
    Shrinking,
    Pushing,
    Popping,
    Swapping,
    Visiting,
    Returning,
    Descending,
    Backtracking,
    Recording,
    Computing,
    Merging,
    Found,
    NotFound,
    Invalid,
    Done,
    Empty,
}

impl StepKind {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Found | Self::NotFound | Self::Invalid | Self::Done | Self::Empty
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Comparing => "comparing",
            Self::Checking => "checking",
            Self::Storing => "storing",
            Self::Moving => "moving",
            Self::Expanding => "expanding",
            Self::Shrinking => "shrinking",
            Self::Pushing => "pushing",
            Self::Popping => "popping",
            Self::Swapping => "swapping",
            Self::Visiting => "visiting",
            Self::Returning => "returning",
            Self::Descending => "descending",
            Self::Backtracking => "backtracking",
            Self::Recording => "recording",
            Self::Computing => "computing",
            Self::Merging => "merging",
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::Invalid => "invalid",
            Self::Done => "done",
            Self::Empty => "empty",
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step<S> {
    pub kind: StepKind,
    pub description: String,
    pub state: S,
}

impl<S> Step<S> {
    pub fn new(kind: StepKind, description: impl Into<String>, state: S) -> Self {
        Self {
            kind,
            description: description.into(),
            state,
        }
    }

    pub fn map<T>(self, f: impl FnOnce(S) -> T) -> Step<T> {
        Step {
            kind: self.kind,
            description: self.description,
            state: f(self.state),
        }
    }
}

/// An ordered, non-empty sequence of steps for one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Step<S>>", into = "Vec<Step<S>>")]
#[serde(bound(
    serialize = "S: Serialize + Clone",
    deserialize = "S: Deserialize<'de>"
))]
pub struct Trace<S> {
    steps: Vec<Step<S>>,
}

impl<S> TryFrom<Vec<Step<S>>> for Trace<S> {
    type Error = StepwiseError;

    fn try_from(steps: Vec<Step<S>>) -> StepwiseResult<Self> {
        if steps.is_empty() {
            return Err(StepwiseError::EmptyTrace);
        }
        Ok(Self { steps })
    }
}

impl<S> From<Trace<S>> for Vec<Step<S>> {
    fn from(trace: Trace<S>) -> Self {
        trace.steps
    }
}

impl<S> Trace<S> {
    /// Single-step trace, used for degenerate inputs.
    pub fn single(step: Step<S>) -> Self {
        Self { steps: vec![step] }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step<S>> {
        self.steps.get(index)
    }

    pub fn first(&self) -> &Step<S> {
        &self.steps[0]
    }

    pub fn last(&self) -> &Step<S> {
        &self.steps[self.steps.len() - 1]
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn steps(&self) -> &[Step<S>] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step<S>> {
        self.steps.iter()
    }

    pub fn map<T>(self, mut f: impl FnMut(S) -> T) -> Trace<T> {
        Trace {
            steps: self.steps.into_iter().map(|s| s.map(&mut f)).collect(),
        }
    }
}

impl<S: Serialize> Trace<S> {
    /// blake3 hex digest of the canonical JSON encoding. Two traces with the
    /// same digest are byte-for-byte identical.
    pub fn digest(&self) -> StepwiseResult<String> {
        let bytes = serde_json::to_vec(&self.steps)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }
}

impl<'a, S> IntoIterator for &'a Trace<S> {
    type Item = &'a Step<S>;
    type IntoIter = std::slice::Iter<'a, Step<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
