//! Subsets by backtracking.
//!
//! `bt(start)` records the current path, then for each `i >= start` adds
//! `nums[i]`, descends, and removes it again. Descend and backtrack are
//! separate steps carrying the depth, so the search tree is visible in the
//! flat trace.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::recorder::{check_len, check_values, fmt_list};
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetsInput {
    pub nums: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetsState {
    pub nums: Vec<i64>,
    pub path: Vec<i64>,
    pub depth: usize,
    /// First index the current call may still choose from.
    pub start: usize,
    pub subsets: Vec<Vec<i64>>,
}

pub struct Subsets;

struct Backtrack<'a> {
    rec: &'a mut Recorder<SubsetsState>,
    state: SubsetsState,
}

impl Backtrack<'_> {
    fn search(&mut self, start: usize) -> StepwiseResult<()> {
        self.state.start = start;
        self.state.subsets.push(self.state.path.clone());
        self.rec.record(
            StepKind::Recording,
            format!(
                "Depth {}: record subset {} (#{})",
                self.state.depth,
                fmt_list(&self.state.path),
                self.state.subsets.len()
            ),
            self.state.clone(),
        )?;

        for i in start..self.state.nums.len() {
            let v = self.state.nums[i];
            self.state.path.push(v);
            self.state.depth += 1;
            self.state.start = i + 1;
            self.rec.record(
                StepKind::Descending,
                format!(
                    "Choose {v} (index {i}) and go to depth {}: path {}",
                    self.state.depth,
                    fmt_list(&self.state.path)
                ),
                self.state.clone(),
            )?;

            self.search(i + 1)?;

            self.state.path.pop();
            self.state.depth -= 1;
            self.state.start = start;
            self.rec.record(
                StepKind::Backtracking,
                format!(
                    "Undo {v} and back up to depth {}: path {}",
                    self.state.depth,
                    fmt_list(&self.state.path)
                ),
                self.state.clone(),
            )?;
        }
        Ok(())
    }
}

impl Problem for Subsets {
    type Input = SubsetsInput;
    type State = SubsetsState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "subsets",
            title: "Subsets",
            technique: Technique::Backtracking,
            base_interval: Duration::from_millis(500),
            limits: "at most 6 distinct numbers",
        }
    }

    fn validate(input: &SubsetsInput) -> StepwiseResult<()> {
        check_len("nums", input.nums.len(), MAX_LEN)?;
        check_values("nums", &input.nums)?;
        for (i, v) in input.nums.iter().enumerate() {
            if input.nums[..i].contains(v) {
                return Err(StepwiseError::invalid(format!(
                    "nums must be distinct ({v} appears more than once)"
                )));
            }
        }
        Ok(())
    }

    fn record(input: &SubsetsInput, rec: &mut Recorder<SubsetsState>) -> StepwiseResult<()> {
        let mut state = SubsetsState {
            nums: input.nums.clone(),
            path: Vec::new(),
            depth: 0,
            start: 0,
            subsets: Vec::new(),
        };

        if input.nums.is_empty() {
            state.subsets.push(Vec::new());
            return rec.record(
                StepKind::Empty,
                "No numbers: the only subset is [] (2^0 = 1)",
                state,
            );
        }

        rec.record(
            StepKind::Start,
            format!(
                "Build every subset of {} by choosing or skipping each number in order",
                fmt_list(&input.nums)
            ),
            state.clone(),
        )?;

        let mut bt = Backtrack {
            rec: &mut *rec,
            state,
        };
        bt.search(0)?;

        let state = bt.state;
        let count = state.subsets.len();
        rec.record(
            StepKind::Done,
            format!("Search finished: {count} subsets (2^{})", input.nums.len()),
            state,
        )
    }

    fn sample_input() -> SubsetsInput {
        SubsetsInput {
            nums: vec![1, 2, 3],
        }
    }

    fn random_input(rng: &mut InputRng) -> SubsetsInput {
        let len = rng.range_usize(1, 4);
        SubsetsInput {
            nums: rng.distinct_i64(len, 1, 9),
        }
    }
}
