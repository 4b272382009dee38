//! Largest Rectangle in Histogram with a monotonic stack of bar indices.
//!
//! A bar is popped while the bar on top of the stack is at least as tall as
//! the current one, so among equal-height bars the later bar ends up carrying
//! the full width. A zero-height sentinel at index `n` flushes the stack.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::recorder::{check_len, check_values};
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramInput {
    pub heights: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramState {
    pub heights: Vec<i64>,
    /// `heights.len()` while flushing.
    pub index: Option<usize>,
    pub stack: Vec<usize>,
    pub popped: Option<usize>,
    /// Bars spanned by the rectangle being measured, inclusive.
    pub span: Option<(usize, usize)>,
    pub area: Option<i64>,
    pub best: i64,
    pub best_span: Option<(usize, usize)>,
}

pub struct LargestRectangle;

impl Problem for LargestRectangle {
    type Input = HistogramInput;
    type State = HistogramState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "largest_rectangle",
            title: "Largest Rectangle in Histogram",
            technique: Technique::Stack,
            base_interval: Duration::from_millis(1300),
            limits: "at most 20 non-negative heights",
        }
    }

    fn validate(input: &HistogramInput) -> StepwiseResult<()> {
        check_len("heights", input.heights.len(), MAX_LEN)?;
        check_values("heights", &input.heights)?;
        if input.heights.iter().any(|h| *h < 0) {
            return Err(StepwiseError::invalid("heights must be non-negative"));
        }
        Ok(())
    }

    fn record(input: &HistogramInput, rec: &mut Recorder<HistogramState>) -> StepwiseResult<()> {
        let heights = &input.heights;
        let n = heights.len();
        let mut state = HistogramState {
            heights: heights.clone(),
            index: None,
            stack: Vec::new(),
            popped: None,
            span: None,
            area: None,
            best: 0,
            best_span: None,
        };

        if n == 0 {
            return rec.record(
                StepKind::Empty,
                "No bars, so the largest rectangle has area 0",
                state,
            );
        }

        rec.record(
            StepKind::Start,
            "Keep bar indices on a stack with non-decreasing heights; popping a bar measures the widest rectangle it can span",
            state.clone(),
        )?;

        for i in 0..=n {
            let h = if i < n { heights[i] } else { 0 };
            state.index = Some(i);

            while let Some(&top) = state.stack.last() {
                if heights[top] < h {
                    break;
                }
                state.stack.pop();
                let left = state.stack.last().map_or(0, |&l| l + 1);
                let width = (i - left) as i64;
                let area = heights[top] * width;
                state.popped = Some(top);
                state.span = Some((left, i - 1));
                state.area = Some(area);
                let improved = area > state.best;
                if improved {
                    state.best = area;
                    state.best_span = Some((left, i - 1));
                }
                let reason = if i == n {
                    "end of bars".to_string()
                } else {
                    format!("bar {i} (height {h}) is not taller")
                };
                rec.record(
                    StepKind::Popping,
                    format!(
                        "Pop bar {top} ({reason}): height {} × width {width} over bars {left}..{} = {area}{}",
                        heights[top],
                        i - 1,
                        if improved { ", new best" } else { "" }
                    ),
                    state.clone(),
                )?;
            }

            state.popped = None;
            state.span = None;
            state.area = None;
            if i < n {
                state.stack.push(i);
                rec.record(
                    StepKind::Pushing,
                    format!("Push bar {i} (height {h})"),
                    state.clone(),
                )?;
            }
        }

        state.index = None;
        let summary = match state.best_span {
            Some((l, r)) => format!(
                "Stack flushed. Largest rectangle has area {} over bars {l}..{r}",
                state.best
            ),
            None => "Stack flushed. Every bar is empty, so the largest area is 0".to_string(),
        };
        rec.record(StepKind::Done, summary, state)
    }

    fn sample_input() -> HistogramInput {
        HistogramInput {
            heights: vec![2, 1, 5, 6, 2, 3],
        }
    }

    fn random_input(rng: &mut InputRng) -> HistogramInput {
        let len = rng.range_usize(1, 10);
        HistogramInput {
            heights: rng.vec_i64(len, 0, 8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_trace;

    fn brute_force(heights: &[i64]) -> i64 {
        let mut best = 0;
        for l in 0..heights.len() {
            let mut low = i64::MAX;
            for r in l..heights.len() {
                low = low.min(heights[r]);
                best = best.max(low * (r - l + 1) as i64);
            }
        }
        best
    }

    #[test]
    fn sample_area_is_ten() {
        let trace =
            generate_trace::<LargestRectangle>(&LargestRectangle::sample_input()).expect("trace");
        assert_eq!(trace.last().state.best, 10);
        assert_eq!(trace.last().state.best_span, Some((2, 3)));
    }

    #[test]
    fn equal_bars_resolved_by_later_bar() {
        let trace = generate_trace::<LargestRectangle>(&HistogramInput {
            heights: vec![3, 3],
        })
        .expect("trace");
        let pops: Vec<(usize, (usize, usize))> = trace
            .iter()
            .filter(|s| s.kind == StepKind::Popping)
            .map(|s| (s.state.popped.expect("popped"), s.state.span.expect("span")))
            .collect();
        assert_eq!(pops, vec![(0, (0, 0)), (1, (0, 1))]);
        assert_eq!(trace.last().state.best, 6);
    }

    #[test]
    fn stack_heights_stay_monotonic() {
        let trace = generate_trace::<LargestRectangle>(&HistogramInput {
            heights: vec![4, 2, 0, 3, 2, 5, 5, 1],
        })
        .expect("trace");
        for step in trace.iter() {
            let hs: Vec<i64> = step.state.stack.iter().map(|&i| step.state.heights[i]).collect();
            assert!(hs.windows(2).all(|w| w[0] < w[1]), "{hs:?}");
        }
    }

    #[test]
    fn agrees_with_brute_force() {
        for seed in 0..40 {
            let mut rng = InputRng::from_seed(seed);
            let input = LargestRectangle::random_input(&mut rng);
            let trace = generate_trace::<LargestRectangle>(&input).expect("trace");
            assert_eq!(trace.last().state.best, brute_force(&input.heights));
        }
    }
}
