//! Container With Most Water: two pointers closing in from both ends.
//!
//! The shorter line limits every wider container, so it is the one that moves.
//! When both lines are equally tall the left pointer moves.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::recorder::{check_len, check_values};
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInput {
    pub heights: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerState {
    pub heights: Vec<i64>,
    pub left: usize,
    pub right: usize,
    pub area: Option<i64>,
    pub best: i64,
    pub best_pair: Option<(usize, usize)>,
}

pub struct ContainerWithMostWater;

impl Problem for ContainerWithMostWater {
    type Input = ContainerInput;
    type State = ContainerState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "container_with_most_water",
            title: "Container With Most Water",
            technique: Technique::TwoPointers,
            base_interval: Duration::from_millis(900),
            limits: "at most 20 non-negative heights",
        }
    }

    fn validate(input: &ContainerInput) -> StepwiseResult<()> {
        check_len("heights", input.heights.len(), MAX_LEN)?;
        check_values("heights", &input.heights)?;
        if input.heights.iter().any(|h| *h < 0) {
            return Err(StepwiseError::invalid("heights must be non-negative"));
        }
        Ok(())
    }

    fn record(input: &ContainerInput, rec: &mut Recorder<ContainerState>) -> StepwiseResult<()> {
        let heights = &input.heights;
        let mut state = ContainerState {
            heights: heights.clone(),
            left: 0,
            right: heights.len().saturating_sub(1),
            area: None,
            best: 0,
            best_pair: None,
        };

        if heights.len() < 2 {
            return rec.record(
                StepKind::Empty,
                "A container needs two lines; with fewer the best area is 0",
                state,
            );
        }

        rec.record(
            StepKind::Start,
            format!(
                "Start with the widest container: left = 0, right = {}",
                state.right
            ),
            state.clone(),
        )?;

        while state.left < state.right {
            let (l, r) = (state.left, state.right);
            let h = heights[l].min(heights[r]);
            let width = (r - l) as i64;
            let area = h * width;
            state.area = Some(area);
            let improved = area > state.best;
            if improved {
                state.best = area;
                state.best_pair = Some((l, r));
            }
            rec.record(
                StepKind::Computing,
                format!(
                    "Lines {l} and {r}: min({}, {}) × {width} = {area}{}",
                    heights[l],
                    heights[r],
                    if improved {
                        " (new best)".to_string()
                    } else {
                        format!(" (best stays {})", state.best)
                    }
                ),
                state.clone(),
            )?;

            if heights[l] <= heights[r] {
                state.left += 1;
                if state.left < state.right {
                    rec.record(
                        StepKind::Moving,
                        format!(
                            "Left line ({}) is not taller than the right ({}), move left to {}",
                            heights[l], heights[r], state.left
                        ),
                        state.clone(),
                    )?;
                }
            } else {
                state.right -= 1;
                if state.left < state.right {
                    rec.record(
                        StepKind::Moving,
                        format!(
                            "Right line ({}) is shorter than the left ({}), move right to {}",
                            heights[r], heights[l], state.right
                        ),
                        state.clone(),
                    )?;
                }
            }
        }

        state.area = None;
        let summary = match state.best_pair {
            Some((l, r)) => format!(
                "Pointers met. Most water is {} between lines {l} and {r}",
                state.best
            ),
            None => "Pointers met. Every container holds 0 water".to_string(),
        };
        rec.record(StepKind::Done, summary, state)
    }

    fn sample_input() -> ContainerInput {
        ContainerInput {
            heights: vec![1, 8, 6, 2, 5, 4, 8, 3, 7],
        }
    }

    fn random_input(rng: &mut InputRng) -> ContainerInput {
        let len = rng.range_usize(2, 12);
        ContainerInput {
            heights: rng.vec_i64(len, 0, 10),
        }
    }
}
