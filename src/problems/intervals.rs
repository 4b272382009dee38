//! Merge Intervals: sort by (start, end), then sweep.
//!
//! Touching intervals (`[1, 2]` and `[2, 3]`) overlap and are merged.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::recorder::{VALUE_BOUND, check_len, within_bound};
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalsInput {
    pub intervals: Vec<(i64, i64)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalsState {
    pub sorted: Vec<(i64, i64)>,
    pub index: Option<usize>,
    pub merged: Vec<(i64, i64)>,
}

pub struct MergeIntervals;

fn show(iv: (i64, i64)) -> String {
    format!("[{}, {}]", iv.0, iv.1)
}

fn show_all(ivs: &[(i64, i64)]) -> String {
    let parts: Vec<String> = ivs.iter().map(|iv| show(*iv)).collect();
    format!("[{}]", parts.join(", "))
}

impl Problem for MergeIntervals {
    type Input = IntervalsInput;
    type State = IntervalsState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "merge_intervals",
            title: "Merge Intervals",
            technique: Technique::Intervals,
            base_interval: Duration::from_millis(1000),
            limits: "at most 20 intervals with start <= end",
        }
    }

    fn validate(input: &IntervalsInput) -> StepwiseResult<()> {
        check_len("intervals", input.intervals.len(), MAX_LEN)?;
        for (i, &(s, e)) in input.intervals.iter().enumerate() {
            if s > e {
                return Err(StepwiseError::invalid(format!(
                    "interval {i} {} has start after end",
                    show((s, e))
                )));
            }
            if !within_bound(s) || !within_bound(e) {
                return Err(StepwiseError::invalid(format!(
                    "interval {i} is outside ±{VALUE_BOUND}"
                )));
            }
        }
        Ok(())
    }

    fn record(input: &IntervalsInput, rec: &mut Recorder<IntervalsState>) -> StepwiseResult<()> {
        let mut sorted = input.intervals.clone();
        sorted.sort();
        let mut state = IntervalsState {
            sorted,
            index: None,
            merged: Vec::new(),
        };

        if state.sorted.is_empty() {
            return rec.record(StepKind::Empty, "No intervals to merge", state);
        }

        rec.record(
            StepKind::Start,
            format!(
                "Sort by start (then end): {}",
                show_all(&state.sorted)
            ),
            state.clone(),
        )?;

        for i in 0..state.sorted.len() {
            let iv = state.sorted[i];
            state.index = Some(i);
            match state.merged.last().copied() {
                Some(before) if before.1 >= iv.0 => {
                    let after = (before.0, before.1.max(iv.1));
                    if let Some(last) = state.merged.last_mut() {
                        *last = after;
                    }
                    rec.record(
                        StepKind::Merging,
                        format!(
                            "{} overlaps {}: merge into {}",
                            show(iv),
                            show(before),
                            show(after)
                        ),
                        state.clone(),
                    )?;
                }
                Some(prev) => {
                    state.merged.push(iv);
                    rec.record(
                        StepKind::Pushing,
                        format!(
                            "{} starts after {} ends: start a new interval",
                            show(iv),
                            show(prev)
                        ),
                        state.clone(),
                    )?;
                }
                None => {
                    state.merged.push(iv);
                    rec.record(
                        StepKind::Pushing,
                        format!("{} opens the first merged interval", show(iv)),
                        state.clone(),
                    )?;
                }
            }
        }

        state.index = None;
        let summary = format!(
            "Merged {} interval(s) into {}: {}",
            state.sorted.len(),
            state.merged.len(),
            show_all(&state.merged)
        );
        rec.record(StepKind::Done, summary, state)
    }

    fn sample_input() -> IntervalsInput {
        IntervalsInput {
            intervals: vec![(1, 3), (8, 10), (2, 6), (15, 18)],
        }
    }

    fn random_input(rng: &mut InputRng) -> IntervalsInput {
        let len = rng.range_usize(1, 8);
        let intervals = (0..len)
            .map(|_| {
                let s = rng.range_i64(0, 20);
                (s, s + rng.range_i64(0, 5))
            })
            .collect();
        IntervalsInput { intervals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_trace;

    #[test]
    fn sample_merges_first_two() {
        let trace = generate_trace::<MergeIntervals>(&MergeIntervals::sample_input()).expect("trace");
        assert_eq!(trace.last().state.merged, vec![(1, 6), (8, 10), (15, 18)]);
    }

    #[test]
    fn touching_intervals_merge() {
        let trace = generate_trace::<MergeIntervals>(&IntervalsInput {
            intervals: vec![(1, 2), (2, 3)],
        })
        .expect("trace");
        assert_eq!(trace.last().state.merged, vec![(1, 3)]);
    }

    #[test]
    fn earlier_steps_are_not_affected_by_later_merges() {
        let trace = generate_trace::<MergeIntervals>(&IntervalsInput {
            intervals: vec![(1, 4), (2, 9)],
        })
        .expect("trace");
        let first_push = trace
            .iter()
            .find(|s| s.kind == StepKind::Pushing)
            .expect("push");
        assert_eq!(first_push.state.merged, vec![(1, 4)]);
        assert_eq!(trace.last().state.merged, vec![(1, 9)]);
    }

    #[test]
    fn reversed_interval_rejected() {
        assert!(
            generate_trace::<MergeIntervals>(&IntervalsInput {
                intervals: vec![(5, 1)]
            })
            .is_err()
        );
    }
}
