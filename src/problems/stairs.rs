//! Climbing Stairs, bottom-up DP.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_N: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StairsInput {
    pub n: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StairsState {
    pub n: usize,
    /// `dp[i]` = ways to reach step `i`; `None` until computed.
    pub dp: Vec<Option<u64>>,
    pub index: Option<usize>,
}

pub struct ClimbingStairs;

impl Problem for ClimbingStairs {
    type Input = StairsInput;
    type State = StairsState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "climbing_stairs",
            title: "Climbing Stairs",
            technique: Technique::DynamicProgramming,
            base_interval: Duration::from_millis(800),
            limits: "0 <= n <= 20",
        }
    }

    fn validate(input: &StairsInput) -> StepwiseResult<()> {
        if input.n > MAX_N {
            return Err(StepwiseError::invalid(format!(
                "n = {} is too large (at most {MAX_N})",
                input.n
            )));
        }
        Ok(())
    }

    fn record(input: &StairsInput, rec: &mut Recorder<StairsState>) -> StepwiseResult<()> {
        let n = input.n;
        let mut state = StairsState {
            n,
            dp: vec![None; n + 1],
            index: None,
        };

        if n <= 1 {
            state.dp.iter_mut().for_each(|d| *d = Some(1));
            return rec.record(
                StepKind::Done,
                format!("With {n} stair(s) there is exactly 1 way to climb"),
                state,
            );
        }

        state.dp[0] = Some(1);
        state.dp[1] = Some(1);
        rec.record(
            StepKind::Storing,
            "Base cases: 1 way to stand at step 0, 1 way to reach step 1",
            state.clone(),
        )?;

        for i in 2..=n {
            state.index = Some(i);
            let a = state.dp[i - 1].unwrap_or_default();
            let b = state.dp[i - 2].unwrap_or_default();
            state.dp[i] = Some(a + b);
            rec.record(
                StepKind::Computing,
                format!(
                    "Step {i} is reached from step {} or step {}: dp[{i}] = {a} + {b} = {}",
                    i - 1,
                    i - 2,
                    a + b
                ),
                state.clone(),
            )?;
        }

        state.index = None;
        let ways = state.dp[n].unwrap_or_default();
        rec.record(
            StepKind::Done,
            format!("There are {ways} distinct ways to climb {n} stairs"),
            state,
        )
    }

    fn sample_input() -> StairsInput {
        StairsInput { n: 5 }
    }

    fn random_input(rng: &mut InputRng) -> StairsInput {
        StairsInput {
            n: rng.range_usize(2, 12),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_trace;

    #[test]
    fn fibonacci_values() {
        let trace = generate_trace::<ClimbingStairs>(&StairsInput { n: 5 }).expect("trace");
        assert_eq!(trace.last().state.dp[5], Some(8));
        let trace = generate_trace::<ClimbingStairs>(&StairsInput { n: 20 }).expect("trace");
        assert_eq!(trace.last().state.dp[20], Some(10946));
    }

    #[test]
    fn table_fills_left_to_right() {
        let trace = generate_trace::<ClimbingStairs>(&StairsInput { n: 6 }).expect("trace");
        for (k, step) in trace.iter().enumerate() {
            let filled = step.state.dp.iter().filter(|d| d.is_some()).count();
            if k + 1 < trace.len() {
                assert_eq!(filled, k + 2);
            }
        }
    }

    #[test]
    fn tiny_inputs_are_single_step() {
        for n in [0, 1] {
            let trace = generate_trace::<ClimbingStairs>(&StairsInput { n }).expect("trace");
            assert_eq!(trace.len(), 1);
            assert!(trace.first().kind.is_terminal());
        }
    }

    #[test]
    fn too_many_stairs_rejected() {
        assert!(generate_trace::<ClimbingStairs>(&StairsInput { n: 21 }).is_err());
    }
}
