//! Problem registry and dynamic dispatch.
//!
//! Callers that only know a problem id and a JSON input (the CLI, scripts,
//! trace files) go through here. Every problem's state is wrapped in the
//! [`Snapshot`] variant for that problem, so one controller type can play any
//! trace.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use std::str::FromStr;

use crate::problems::*;
use crate::{
    InputRng, Problem, ProblemMeta, StepwiseError, StepwiseResult, Trace,
    generate_trace_with_limit,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum ProblemId {
    TwoSum,
    BinarySearch,
    ContainerWithMostWater,
    BestTimeToBuySell,
    LongestUniqueSubstring,
    ValidParentheses,
    EvalRpn,
    KthLargest,
    MaxDepth,
    NumberOfIslands,
    Subsets,
    LargestRectangle,
    ClimbingStairs,
    ReverseLinkedList,
    MergeIntervals,
}

/// Binds `$p` to the problem type behind `$id` and evaluates `$body`.
macro_rules! with_problem {
    ($id:expr, $p:ident => $body:expr) => {
        match $id {
            ProblemId::TwoSum => {
                type $p = TwoSum;
                $body
            }
            ProblemId::BinarySearch => {
                type $p = BinarySearch;
                $body
            }
            ProblemId::ContainerWithMostWater => {
                type $p = ContainerWithMostWater;
                $body
            }
            ProblemId::BestTimeToBuySell => {
                type $p = BestTimeToBuySell;
                $body
            }
            ProblemId::LongestUniqueSubstring => {
                type $p = LongestUniqueSubstring;
                $body
            }
            ProblemId::ValidParentheses => {
                type $p = ValidParentheses;
                $body
            }
            ProblemId::EvalRpn => {
                type $p = EvalRpn;
                $body
            }
            ProblemId::KthLargest => {
                type $p = KthLargest;
                $body
            }
            ProblemId::MaxDepth => {
                type $p = MaxDepth;
                $body
            }
            ProblemId::NumberOfIslands => {
                type $p = NumberOfIslands;
                $body
            }
            ProblemId::Subsets => {
                type $p = Subsets;
                $body
            }
            ProblemId::LargestRectangle => {
                type $p = LargestRectangle;
                $body
            }
            ProblemId::ClimbingStairs => {
                type $p = ClimbingStairs;
                $body
            }
            ProblemId::ReverseLinkedList => {
                type $p = ReverseLinkedList;
                $body
            }
            ProblemId::MergeIntervals => {
                type $p = MergeIntervals;
                $body
            }
        }
    };
}

impl ProblemId {
    pub const ALL: [ProblemId; 15] = [
        ProblemId::TwoSum,
        ProblemId::BinarySearch,
        ProblemId::ContainerWithMostWater,
        ProblemId::BestTimeToBuySell,
        ProblemId::LongestUniqueSubstring,
        ProblemId::ValidParentheses,
        ProblemId::EvalRpn,
        ProblemId::KthLargest,
        ProblemId::MaxDepth,
        ProblemId::NumberOfIslands,
        ProblemId::Subsets,
        ProblemId::LargestRectangle,
        ProblemId::ClimbingStairs,
        ProblemId::ReverseLinkedList,
        ProblemId::MergeIntervals,
    ];

    pub fn meta(self) -> ProblemMeta {
        with_problem!(self, P => P::meta())
    }

    pub fn as_str(self) -> &'static str {
        self.meta().id
    }
}

impl std::fmt::Display for ProblemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProblemId {
    type Err = StepwiseError;

    fn from_str(s: &str) -> StepwiseResult<Self> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| StepwiseError::UnknownProblem(s.to_string()))
    }
}

/// State payload of one step, tagged with the problem that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "problem", content = "state", rename_all = "snake_case")]
pub enum Snapshot {
    TwoSum(TwoSumState),
    BinarySearch(BinarySearchState),
    ContainerWithMostWater(ContainerState),
    BestTimeToBuySell(StockState),
    LongestUniqueSubstring(UniqueSubstringState),
    ValidParentheses(ParenthesesState),
    EvalRpn(RpnState),
    KthLargest(KthLargestState),
    MaxDepth(MaxDepthState),
    NumberOfIslands(IslandsState),
    Subsets(SubsetsState),
    LargestRectangle(HistogramState),
    ClimbingStairs(StairsState),
    ReverseLinkedList(ReverseListState),
    MergeIntervals(IntervalsState),
}

macro_rules! snapshot_from {
    ($($variant:ident($state:ty)),* $(,)?) => {
        $(
            impl From<$state> for Snapshot {
                fn from(state: $state) -> Self {
                    Snapshot::$variant(state)
                }
            }
        )*

        impl Snapshot {
            pub fn problem(&self) -> ProblemId {
                match self {
                    $(Snapshot::$variant(_) => ProblemId::$variant,)*
                }
            }
        }
    };
}

snapshot_from! {
    TwoSum(TwoSumState),
    BinarySearch(BinarySearchState),
    ContainerWithMostWater(ContainerState),
    BestTimeToBuySell(StockState),
    LongestUniqueSubstring(UniqueSubstringState),
    ValidParentheses(ParenthesesState),
    EvalRpn(RpnState),
    KthLargest(KthLargestState),
    MaxDepth(MaxDepthState),
    NumberOfIslands(IslandsState),
    Subsets(SubsetsState),
    LargestRectangle(HistogramState),
    ClimbingStairs(StairsState),
    ReverseLinkedList(ReverseListState),
    MergeIntervals(IntervalsState),
}

fn decode_input<P: Problem>(input: &Value) -> StepwiseResult<P::Input> {
    serde_json::from_value(input.clone())
        .map_err(|e| StepwiseError::invalid(format!("{} input: {e}", P::meta().id)))
}

fn generate_as<P: Problem>(input: &Value, max_steps: usize) -> StepwiseResult<Trace<Snapshot>>
where
    Snapshot: From<P::State>,
{
    let input = decode_input::<P>(input)?;
    Ok(generate_trace_with_limit::<P>(&input, max_steps)?.map(Snapshot::from))
}

/// Generates the trace for `id` from a JSON input.
pub fn generate(id: ProblemId, input: &Value, max_steps: usize) -> StepwiseResult<Trace<Snapshot>> {
    with_problem!(id, P => generate_as::<P>(input, max_steps))
}

/// Checks a JSON input without recording anything.
pub fn validate_input(id: ProblemId, input: &Value) -> StepwiseResult<()> {
    with_problem!(id, P => {
        let decoded = decode_input::<P>(input)?;
        P::validate(&decoded)
    })
}

pub fn sample_input(id: ProblemId) -> StepwiseResult<Value> {
    with_problem!(id, P => Ok(serde_json::to_value(P::sample_input())?))
}

pub fn random_input(id: ProblemId, seed: u64) -> StepwiseResult<Value> {
    let mut rng = InputRng::from_seed(seed);
    with_problem!(id, P => Ok(serde_json::to_value(P::random_input(&mut rng))?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_MAX_STEPS;

    #[test]
    fn ids_round_trip_through_strings() {
        for id in ProblemId::ALL {
            assert_eq!(id.as_str().parse::<ProblemId>().expect("parse"), id);
            let json = serde_json::to_value(id).expect("encode");
            assert_eq!(json, Value::String(id.as_str().to_string()));
        }
        assert_eq!("two-sum".parse::<ProblemId>().expect("dash form"), ProblemId::TwoSum);
        assert!("bogo_sort".parse::<ProblemId>().is_err());
    }

    #[test]
    fn every_sample_is_deterministic_and_terminal() {
        for id in ProblemId::ALL {
            let input = sample_input(id).expect("sample");
            let a = generate(id, &input, DEFAULT_MAX_STEPS).expect("first run");
            let b = generate(id, &input, DEFAULT_MAX_STEPS).expect("second run");
            assert_eq!(a, b, "{id}");
            assert_eq!(a.digest().expect("digest"), b.digest().expect("digest"));
            assert!(a.last().kind.is_terminal(), "{id} ends with {}", a.last().kind);
            assert!(a.iter().all(|s| s.state.problem() == id));
        }
    }

    #[test]
    fn random_inputs_are_reproducible_and_accepted() {
        for id in ProblemId::ALL {
            for seed in 0..25 {
                let a = random_input(id, seed).expect("random");
                let b = random_input(id, seed).expect("random");
                assert_eq!(a, b);
                let trace = generate(id, &a, DEFAULT_MAX_STEPS)
                    .unwrap_or_else(|e| panic!("{id} seed {seed} input {a}: {e}"));
                assert!(trace.len() >= 1);
            }
        }
    }

    #[test]
    fn only_terminal_step_is_last() {
        for id in ProblemId::ALL {
            let trace = generate(id, &sample_input(id).expect("sample"), DEFAULT_MAX_STEPS)
                .expect("trace");
            let terminal = trace.iter().filter(|s| s.kind.is_terminal()).count();
            assert_eq!(terminal, 1, "{id}");
            assert!(trace.last().kind.is_terminal(), "{id}");
        }
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        let err = generate(ProblemId::TwoSum, &serde_json::json!({"nums": "x"}), DEFAULT_MAX_STEPS)
            .expect_err("bad shape");
        assert!(matches!(err, StepwiseError::InvalidInput(_)));
    }

    #[test]
    fn step_limit_aborts_generation() {
        let input = serde_json::json!({"nums": [1, 2, 3, 4, 5, 6]});
        let err = generate(ProblemId::Subsets, &input, 10).expect_err("limit");
        assert!(matches!(err, StepwiseError::TraceLimit { limit: 10 }));
    }

    #[test]
    fn snapshot_is_tagged_by_problem() {
        let trace = generate(
            ProblemId::ClimbingStairs,
            &serde_json::json!({"n": 3}),
            DEFAULT_MAX_STEPS,
        )
        .expect("trace");
        let json = serde_json::to_value(trace.first()).expect("encode");
        assert_eq!(json["state"]["problem"], "climbing_stairs");
        assert!(json["state"]["state"]["dp"].is_array());
    }
}
