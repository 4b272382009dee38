//! Two Sum, one pass with a complement map.
//!
//! The map is keyed by the value an earlier index is still waiting for, so a
//! hit names both halves of the pair directly. When two indices need the same
//! complement the earlier one is kept.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::time::Duration;

use crate::recorder::{check_len, check_values};
use crate::{InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseResult, Technique};

const MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoSumInput {
    pub nums: Vec<i64>,
    pub target: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoSumState {
    pub nums: Vec<i64>,
    pub target: i64,
    pub index: Option<usize>,
    /// complement -> index waiting for it
    pub complements: BTreeMap<i64, usize>,
    pub pair: Option<(usize, usize)>,
}

pub struct TwoSum;

impl Problem for TwoSum {
    type Input = TwoSumInput;
    type State = TwoSumState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "two_sum",
            title: "Two Sum",
            technique: Technique::Hashing,
            base_interval: Duration::from_millis(1000),
            limits: "at most 20 numbers",
        }
    }

    fn validate(input: &TwoSumInput) -> StepwiseResult<()> {
        check_len("nums", input.nums.len(), MAX_LEN)?;
        check_values("nums", &input.nums)?;
        check_values("target", &[input.target])
    }

    fn record(input: &TwoSumInput, rec: &mut Recorder<TwoSumState>) -> StepwiseResult<()> {
        let nums = &input.nums;
        let target = input.target;
        let mut state = TwoSumState {
            nums: nums.clone(),
            target,
            index: None,
            complements: BTreeMap::new(),
            pair: None,
        };

        if nums.len() < 2 {
            return rec.record(
                StepKind::Empty,
                format!(
                    "Only {} number(s) given; a pair needs at least two, so there is nothing to search",
                    nums.len()
                ),
                state,
            );
        }

        rec.record(
            StepKind::Start,
            format!(
                "Scan left to right, remembering which complement each number needs to reach {target}"
            ),
            state.clone(),
        )?;

        for (i, &v) in nums.iter().enumerate() {
            state.index = Some(i);
            if let Some(&j) = state.complements.get(&v) {
                rec.record(
                    StepKind::Checking,
                    format!(
                        "Checking index {i} (value {v}): index {j} is waiting for complement {v} ({target} - {} = {v})",
                        nums[j]
                    ),
                    state.clone(),
                )?;
                state.pair = Some((j, i));
                return rec.record(
                    StepKind::Found,
                    format!(
                        "Found it: nums[{j}] + nums[{i}] = {} + {v} = {target}, answer is indices ({j}, {i})",
                        nums[j]
                    ),
                    state,
                );
            }

            rec.record(
                StepKind::Checking,
                format!("Checking index {i} (value {v}): no earlier index needs {v}"),
                state.clone(),
            )?;

            let complement = target - v;
            match state.complements.get(&complement) {
                Some(&k) => {
                    rec.record(
                        StepKind::Storing,
                        format!(
                            "Complement {complement} is already wanted by index {k}; keeping the earlier index"
                        ),
                        state.clone(),
                    )?;
                }
                None => {
                    state.complements.insert(complement, i);
                    rec.record(
                        StepKind::Storing,
                        format!(
                            "Remember that index {i} needs complement {complement} ({target} - {v})"
                        ),
                        state.clone(),
                    )?;
                }
            }
        }

        state.index = None;
        rec.record(
            StepKind::NotFound,
            format!(
                "Scanned all {} numbers; no two of them add up to {target}",
                nums.len()
            ),
            state,
        )
    }

    fn sample_input() -> TwoSumInput {
        TwoSumInput {
            nums: vec![2, 7, 11, 15],
            target: 9,
        }
    }

    fn random_input(rng: &mut InputRng) -> TwoSumInput {
        let len = rng.range_usize(2, 8);
        let nums = rng.vec_i64(len, -10, 20);
        let target = if rng.chance(3, 4) {
            let a = rng.below(len as u64) as usize;
            let mut b = rng.below(len as u64 - 1) as usize;
            if b >= a {
                b += 1;
            }
            nums[a] + nums[b]
        } else {
            rng.range_i64(-20, 40)
        };
        TwoSumInput { nums, target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StepwiseError, generate_trace};

    fn input(nums: &[i64], target: i64) -> TwoSumInput {
        TwoSumInput {
            nums: nums.to_vec(),
            target,
        }
    }

    #[test]
    fn classic_pair_is_found_at_zero_one() {
        let trace = generate_trace::<TwoSum>(&input(&[2, 7, 11, 15], 9)).expect("trace");
        let last = trace.last();
        assert_eq!(last.kind, StepKind::Found);
        assert_eq!(last.state.pair, Some((0, 1)));

        let before = trace.get(trace.last_index() - 1).expect("previous step");
        assert!(before.description.contains("index 0"), "{}", before.description);
        assert!(before.description.contains("complement 7"), "{}", before.description);
    }

    #[test]
    fn no_solution_keeps_full_map() {
        let trace = generate_trace::<TwoSum>(&input(&[1, 2, 3], 100)).expect("trace");
        let last = trace.last();
        assert_eq!(last.kind, StepKind::NotFound);
        assert_eq!(last.state.pair, None);
        let expected: BTreeMap<i64, usize> = [(99, 0), (98, 1), (97, 2)].into_iter().collect();
        assert_eq!(last.state.complements, expected);
    }

    #[test]
    fn earlier_index_wins_duplicate_complement() {
        let trace = generate_trace::<TwoSum>(&input(&[3, 3, 5], 20)).expect("trace");
        assert_eq!(trace.last().state.complements.get(&17), Some(&0));
    }

    #[test]
    fn single_number_is_degenerate() {
        let trace = generate_trace::<TwoSum>(&input(&[4], 8)).expect("trace");
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.first().kind, StepKind::Empty);
    }

    #[test]
    fn oversized_input_is_rejected() {
        let nums: Vec<i64> = (0..21).collect();
        let err = generate_trace::<TwoSum>(&input(&nums, 3)).expect_err("too long");
        assert!(err.is_input_rejection());
    }

    #[test]
    fn extreme_values_are_rejected() {
        for bad in [input(&[i64::MIN, 1], 0), input(&[1, 2], i64::MIN)] {
            let err = generate_trace::<TwoSum>(&bad).expect_err("out of range");
            assert!(matches!(err, StepwiseError::InvalidInput(_)), "{err}");
        }
    }
}
