//! Kth Largest Element with a size-k min-heap stored as an array.
//!
//! Sift operations compare strictly, so equal values never swap. When both
//! children tie during sift-down the left child is chosen.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::recorder::{check_len, check_values, fmt_list};
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KthLargestInput {
    pub nums: Vec<i64>,
    pub k: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KthLargestState {
    pub nums: Vec<i64>,
    pub k: usize,
    pub index: Option<usize>,
    /// Min-heap in array layout: children of `i` are `2i+1` and `2i+2`.
    pub heap: Vec<i64>,
    /// Heap slots involved in the current operation.
    pub highlight: Vec<usize>,
    pub result: Option<i64>,
}

pub struct KthLargest;

fn sift_up(
    state: &mut KthLargestState,
    mut pos: usize,
    rec: &mut Recorder<KthLargestState>,
) -> StepwiseResult<()> {
    while pos > 0 {
        let parent = (pos - 1) / 2;
        if state.heap[pos] >= state.heap[parent] {
            break;
        }
        state.heap.swap(pos, parent);
        state.highlight = vec![parent, pos];
        rec.record(
            StepKind::Swapping,
            format!(
                "{} is smaller than its parent {}: swap slots {pos} and {parent}",
                state.heap[parent], state.heap[pos]
            ),
            state.clone(),
        )?;
        pos = parent;
    }
    Ok(())
}

fn sift_down(
    state: &mut KthLargestState,
    mut pos: usize,
    rec: &mut Recorder<KthLargestState>,
) -> StepwiseResult<()> {
    let len = state.heap.len();
    loop {
        let left = 2 * pos + 1;
        let right = left + 1;
        if left >= len {
            break;
        }
        let child = if right < len && state.heap[right] < state.heap[left] {
            right
        } else {
            left
        };
        if state.heap[child] >= state.heap[pos] {
            break;
        }
        state.heap.swap(pos, child);
        state.highlight = vec![pos, child];
        rec.record(
            StepKind::Swapping,
            format!(
                "{} is larger than its smaller child {}: swap slots {pos} and {child}",
                state.heap[child], state.heap[pos]
            ),
            state.clone(),
        )?;
        pos = child;
    }
    Ok(())
}

impl Problem for KthLargest {
    type Input = KthLargestInput;
    type State = KthLargestState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "kth_largest",
            title: "Kth Largest Element in an Array",
            technique: Technique::Heap,
            base_interval: Duration::from_millis(1100),
            limits: "at most 20 numbers, 1 <= k <= len",
        }
    }

    fn validate(input: &KthLargestInput) -> StepwiseResult<()> {
        check_len("nums", input.nums.len(), MAX_LEN)?;
        check_values("nums", &input.nums)?;
        if input.k == 0 || input.k > input.nums.len() {
            return Err(StepwiseError::invalid(format!(
                "k must be between 1 and {} (got {})",
                input.nums.len(),
                input.k
            )));
        }
        Ok(())
    }

    fn record(input: &KthLargestInput, rec: &mut Recorder<KthLargestState>) -> StepwiseResult<()> {
        let k = input.k;
        let mut state = KthLargestState {
            nums: input.nums.clone(),
            k,
            index: None,
            heap: Vec::with_capacity(k),
            highlight: Vec::new(),
            result: None,
        };

        rec.record(
            StepKind::Start,
            format!("Keep the {k} largest values seen so far in a min-heap; its root is the answer"),
            state.clone(),
        )?;

        for (i, &v) in input.nums.iter().enumerate() {
            state.index = Some(i);
            if state.heap.len() < k {
                state.heap.push(v);
                let pos = state.heap.len() - 1;
                state.highlight = vec![pos];
                rec.record(
                    StepKind::Pushing,
                    format!("Heap has room: push {v} into slot {pos}"),
                    state.clone(),
                )?;
                sift_up(&mut state, pos, rec)?;
                continue;
            }

            let root = state.heap[0];
            state.highlight = vec![0];
            if v <= root {
                rec.record(
                    StepKind::Comparing,
                    format!("{v} is not larger than the root {root}: skip it"),
                    state.clone(),
                )?;
                continue;
            }

            state.heap[0] = v;
            rec.record(
                StepKind::Popping,
                format!("{v} beats the root {root}: evict {root} and put {v} at the root"),
                state.clone(),
            )?;
            sift_down(&mut state, 0, rec)?;
        }

        state.index = None;
        state.highlight = vec![0];
        let result = state.heap[0];
        state.result = Some(result);
        rec.record(
            StepKind::Done,
            format!(
                "Heap holds the {k} largest values {}; the root {result} is the {k}th largest",
                fmt_list(&state.heap)
            ),
            state,
        )
    }

    fn sample_input() -> KthLargestInput {
        KthLargestInput {
            nums: vec![3, 2, 1, 5, 6, 4],
            k: 2,
        }
    }

    fn random_input(rng: &mut InputRng) -> KthLargestInput {
        let len = rng.range_usize(1, 12);
        let nums = rng.vec_i64(len, 0, 30);
        let k = rng.range_usize(1, len);
        KthLargestInput { nums, k }
    }
}
