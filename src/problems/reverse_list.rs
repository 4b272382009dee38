//! Reverse a singly linked list in place with `prev` / `curr` / `next`.
//!
//! Nodes live in an arena; `links[i]` is the successor of node `i`.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::recorder::{check_len, check_values, fmt_list};
use crate::{InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseResult, Technique};

const MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseListInput {
    pub values: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReverseListState {
    pub values: Vec<i64>,
    pub links: Vec<Option<usize>>,
    pub head: Option<usize>,
    pub prev: Option<usize>,
    pub curr: Option<usize>,
    pub next: Option<usize>,
}

impl ReverseListState {
    /// Values reachable from `head`, in order.
    pub fn walk(&self) -> Vec<i64> {
        let mut out = Vec::new();
        let mut at = self.head;
        while let Some(i) = at {
            if out.len() > self.values.len() {
                break;
            }
            out.push(self.values[i]);
            at = self.links[i];
        }
        out
    }

    fn label(&self, node: Option<usize>) -> String {
        node.map_or_else(|| "null".to_string(), |i| self.values[i].to_string())
    }
}

pub struct ReverseLinkedList;

impl Problem for ReverseLinkedList {
    type Input = ReverseListInput;
    type State = ReverseListState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "reverse_linked_list",
            title: "Reverse Linked List",
            technique: Technique::LinkedList,
            base_interval: Duration::from_millis(1400),
            limits: "at most 20 nodes",
        }
    }

    fn validate(input: &ReverseListInput) -> StepwiseResult<()> {
        check_len("values", input.values.len(), MAX_LEN)?;
        check_values("values", &input.values)
    }

    fn record(input: &ReverseListInput, rec: &mut Recorder<ReverseListState>) -> StepwiseResult<()> {
        let n = input.values.len();
        let links = (0..n).map(|i| (i + 1 < n).then_some(i + 1)).collect();
        let head = (n > 0).then_some(0);
        let mut state = ReverseListState {
            values: input.values.clone(),
            links,
            head,
            prev: None,
            curr: head,
            next: None,
        };

        if n == 0 {
            return rec.record(StepKind::Empty, "The list is empty; nothing to reverse", state);
        }

        rec.record(
            StepKind::Start,
            format!(
                "List {}: start with prev = null, curr = {}",
                fmt_list(&state.walk()),
                state.label(state.curr)
            ),
            state.clone(),
        )?;

        while let Some(curr) = state.curr {
            state.next = state.links[curr];
            state.links[curr] = state.prev;
            rec.record(
                StepKind::Moving,
                format!(
                    "Save next = {}, then point {} back at {}",
                    state.label(state.next),
                    state.values[curr],
                    state.label(state.prev)
                ),
                state.clone(),
            )?;

            state.prev = Some(curr);
            state.curr = state.next;
            state.next = None;
            rec.record(
                StepKind::Moving,
                format!(
                    "Advance: prev = {}, curr = {}",
                    state.label(state.prev),
                    state.label(state.curr)
                ),
                state.clone(),
            )?;
        }

        state.head = state.prev;
        let reversed = state.walk();
        rec.record(
            StepKind::Done,
            format!(
                "curr is null, so prev ({}) is the new head: {}",
                state.label(state.head),
                fmt_list(&reversed)
            ),
            state,
        )
    }

    fn sample_input() -> ReverseListInput {
        ReverseListInput {
            values: vec![1, 2, 3, 4, 5],
        }
    }

    fn random_input(rng: &mut InputRng) -> ReverseListInput {
        let len = rng.range_usize(1, 8);
        ReverseListInput {
            values: rng.vec_i64(len, 0, 50),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_trace;

    #[test]
    fn sample_reverses() {
        let trace =
            generate_trace::<ReverseLinkedList>(&ReverseLinkedList::sample_input()).expect("trace");
        assert_eq!(trace.last().state.walk(), vec![5, 4, 3, 2, 1]);
        assert_eq!(trace.first().state.walk(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn two_moves_per_node() {
        let trace =
            generate_trace::<ReverseLinkedList>(&ReverseLinkedList::sample_input()).expect("trace");
        let moves = trace.iter().filter(|s| s.kind == StepKind::Moving).count();
        assert_eq!(moves, 10);
    }

    #[test]
    fn empty_list_is_one_step() {
        let trace = generate_trace::<ReverseLinkedList>(&ReverseListInput { values: vec![] })
            .expect("trace");
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.first().kind, StepKind::Empty);
    }
}
