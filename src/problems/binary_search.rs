//! Binary search over a sorted array with a half-open window `[lo, hi)`.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::recorder::{check_len, check_values};
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySearchInput {
    pub nums: Vec<i64>,
    pub target: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySearchState {
    pub nums: Vec<i64>,
    pub target: i64,
    pub lo: usize,
    /// Exclusive.
    pub hi: usize,
    pub mid: Option<usize>,
    pub found: Option<usize>,
}

pub struct BinarySearch;

impl Problem for BinarySearch {
    type Input = BinarySearchInput;
    type State = BinarySearchState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "binary_search",
            title: "Binary Search",
            technique: Technique::BinarySearch,
            base_interval: Duration::from_millis(1200),
            limits: "at most 20 numbers, sorted ascending",
        }
    }

    fn validate(input: &BinarySearchInput) -> StepwiseResult<()> {
        check_len("nums", input.nums.len(), MAX_LEN)?;
        check_values("nums", &input.nums)?;
        if let Some(i) = input.nums.windows(2).position(|w| w[0] > w[1]) {
            return Err(StepwiseError::invalid(format!(
                "nums must be sorted ascending (nums[{i}] = {} > nums[{}] = {})",
                input.nums[i],
                i + 1,
                input.nums[i + 1]
            )));
        }
        Ok(())
    }

    fn record(
        input: &BinarySearchInput,
        rec: &mut Recorder<BinarySearchState>,
    ) -> StepwiseResult<()> {
        let nums = &input.nums;
        let target = input.target;
        let mut state = BinarySearchState {
            nums: nums.clone(),
            target,
            lo: 0,
            hi: nums.len(),
            mid: None,
            found: None,
        };

        if nums.is_empty() {
            return rec.record(
                StepKind::Empty,
                format!("The array is empty, so {target} cannot be in it"),
                state,
            );
        }

        rec.record(
            StepKind::Start,
            format!(
                "Search for {target} in indices 0..{}; the window shrinks by half each round",
                nums.len()
            ),
            state.clone(),
        )?;

        while state.lo < state.hi {
            let mid = state.lo + (state.hi - state.lo) / 2;
            state.mid = Some(mid);
            let v = nums[mid];
            rec.record(
                StepKind::Comparing,
                format!(
                    "Middle of [{}, {}) is index {mid}: compare nums[{mid}] = {v} with {target}",
                    state.lo, state.hi
                ),
                state.clone(),
            )?;

            if v == target {
                state.found = Some(mid);
                return rec.record(
                    StepKind::Found,
                    format!("nums[{mid}] = {target}: found at index {mid}"),
                    state,
                );
            }

            if v < target {
                state.lo = mid + 1;
                rec.record(
                    StepKind::Shrinking,
                    format!(
                        "{v} < {target}, so everything up to index {mid} is too small: lo = {}",
                        state.lo
                    ),
                    state.clone(),
                )?;
            } else {
                state.hi = mid;
                rec.record(
                    StepKind::Shrinking,
                    format!(
                        "{v} > {target}, so everything from index {mid} on is too large: hi = {mid}"
                    ),
                    state.clone(),
                )?;
            }
        }

        state.mid = None;
        rec.record(
            StepKind::NotFound,
            format!(
                "The window [{}, {}) is empty: {target} is not in the array",
                state.lo, state.hi
            ),
            state,
        )
    }

    fn sample_input() -> BinarySearchInput {
        BinarySearchInput {
            nums: vec![-1, 0, 3, 5, 9, 12],
            target: 9,
        }
    }

    fn random_input(rng: &mut InputRng) -> BinarySearchInput {
        let len = rng.range_usize(1, 15);
        let mut nums = rng.vec_i64(len, -20, 40);
        nums.sort();
        let target = if rng.chance(2, 3) {
            *rng.pick(&nums)
        } else {
            rng.range_i64(-20, 40)
        };
        BinarySearchInput { nums, target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_trace;

    fn run(nums: &[i64], target: i64) -> crate::Trace<BinarySearchState> {
        generate_trace::<BinarySearch>(&BinarySearchInput {
            nums: nums.to_vec(),
            target,
        })
        .expect("trace")
    }

    #[test]
    fn finds_sample_target() {
        let trace = run(&[-1, 0, 3, 5, 9, 12], 9);
        assert_eq!(trace.last().kind, StepKind::Found);
        assert_eq!(trace.last().state.found, Some(4));
    }

    #[test]
    fn missing_target_ends_with_empty_window() {
        let trace = run(&[-1, 0, 3, 5, 9, 12], 2);
        let last = trace.last();
        assert_eq!(last.kind, StepKind::NotFound);
        assert_eq!(last.state.lo, last.state.hi);
    }

    #[test]
    fn window_never_grows() {
        let trace = run(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11], 0);
        let widths: Vec<usize> = trace.iter().map(|s| s.state.hi - s.state.lo).collect();
        assert!(widths.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn unsorted_input_is_rejected() {
        let err = generate_trace::<BinarySearch>(&BinarySearchInput {
            nums: vec![3, 1, 2],
            target: 1,
        })
        .expect_err("unsorted");
        assert!(err.to_string().contains("sorted"));
    }

    #[test]
    fn empty_array_is_one_step() {
        let trace = run(&[], 5);
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.first().kind, StepKind::Empty);
    }
}
