//! Maximum Depth of a Binary Tree, recursive.
//!
//! Every call records an entry step (pre-order) and a return step
//! (post-order). The `path` in each state is the call stack from the root, so
//! the recursion tree can be rebuilt from the flat trace. Left subtrees are
//! explored before right subtrees; empty children return 0 without a step.

use serde::{Deserialize, Serialize};

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use crate::recorder::{check_len, check_values};
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_ENTRIES: usize = 20;

/// Level-order tree, `null` for missing children (LeetCode layout).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxDepthInput {
    pub tree: Vec<Option<i64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub value: i64,
    pub left: Option<usize>,
    pub right: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxDepthState {
    /// Node 0 is the root when present.
    pub nodes: Vec<TreeNode>,
    pub current: Option<usize>,
    /// Node ids from the root down to `current`.
    pub path: Vec<usize>,
    pub depth: usize,
    /// Depth computed for each finished subtree, by node id.
    pub results: BTreeMap<usize, usize>,
    pub answer: Option<usize>,
}

pub struct MaxDepth;

/// Builds nodes from level order. Children are assigned to parents in queue
/// order; entries with no parent left make the layout malformed.
pub(crate) fn build_tree(tree: &[Option<i64>]) -> StepwiseResult<Vec<TreeNode>> {
    let mut nodes = Vec::new();
    let mut entries = tree.iter();
    match entries.next() {
        None | Some(None) => {
            if tree.iter().any(Option::is_some) {
                return Err(StepwiseError::invalid(
                    "tree has values after an empty root",
                ));
            }
            return Ok(nodes);
        }
        Some(Some(v)) => nodes.push(TreeNode {
            value: *v,
            left: None,
            right: None,
        }),
    }

    let mut queue = VecDeque::from([0usize]);
    let mut remaining = entries.peekable();
    while remaining.peek().is_some() {
        let Some(parent) = queue.pop_front() else {
            return Err(StepwiseError::invalid(
                "tree has entries with no parent to attach to",
            ));
        };
        for side in 0..2 {
            let Some(entry) = remaining.next() else {
                break;
            };
            if let Some(v) = entry {
                let id = nodes.len();
                nodes.push(TreeNode {
                    value: *v,
                    left: None,
                    right: None,
                });
                if side == 0 {
                    nodes[parent].left = Some(id);
                } else {
                    nodes[parent].right = Some(id);
                }
                queue.push_back(id);
            }
        }
    }
    Ok(nodes)
}

struct DepthWalk<'a> {
    rec: &'a mut Recorder<MaxDepthState>,
    state: MaxDepthState,
}

impl DepthWalk<'_> {
    fn visit(&mut self, id: usize) -> StepwiseResult<usize> {
        let node = self.state.nodes[id].clone();
        self.state.path.push(id);
        self.state.depth = self.state.path.len();
        self.state.current = Some(id);
        self.rec.record(
            StepKind::Visiting,
            format!(
                "Enter node {} at depth {}",
                node.value, self.state.depth
            ),
            self.state.clone(),
        )?;

        let left = match node.left {
            Some(child) => self.visit(child)?,
            None => 0,
        };
        let right = match node.right {
            Some(child) => self.visit(child)?,
            None => 0,
        };

        let depth = left.max(right) + 1;
        self.state.current = Some(id);
        self.state.depth = self.state.path.len();
        self.state.results.insert(id, depth);
        self.rec.record(
            StepKind::Returning,
            format!(
                "Node {}: max(left {left}, right {right}) + 1 = {depth}, return to {}",
                node.value,
                match self.state.path.len() {
                    1 => "the caller".to_string(),
                    n => format!("node {}", self.state.nodes[self.state.path[n - 2]].value),
                }
            ),
            self.state.clone(),
        )?;
        self.state.path.pop();
        Ok(depth)
    }
}

impl Problem for MaxDepth {
    type Input = MaxDepthInput;
    type State = MaxDepthState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "max_depth",
            title: "Maximum Depth of Binary Tree",
            technique: Technique::TreeRecursion,
            base_interval: Duration::from_millis(1200),
            limits: "at most 20 level-order entries",
        }
    }

    fn validate(input: &MaxDepthInput) -> StepwiseResult<()> {
        check_len("tree", input.tree.len(), MAX_ENTRIES)?;
        let values: Vec<i64> = input.tree.iter().flatten().copied().collect();
        check_values("tree", &values)?;
        build_tree(&input.tree).map(|_| ())
    }

    fn record(input: &MaxDepthInput, rec: &mut Recorder<MaxDepthState>) -> StepwiseResult<()> {
        let nodes = build_tree(&input.tree)?;
        let state = MaxDepthState {
            nodes,
            current: None,
            path: Vec::new(),
            depth: 0,
            results: BTreeMap::new(),
            answer: None,
        };

        if state.nodes.is_empty() {
            let mut state = state;
            state.answer = Some(0);
            return rec.record(StepKind::Empty, "The tree is empty, so its depth is 0", state);
        }

        let mut walk = DepthWalk {
            rec: &mut *rec,
            state,
        };
        let depth = walk.visit(0)?;
        let mut state = walk.state;
        state.current = None;
        state.depth = 0;
        state.answer = Some(depth);
        rec.record(
            StepKind::Done,
            format!("The root returned {depth}: the tree is {depth} levels deep"),
            state,
        )
    }

    fn sample_input() -> MaxDepthInput {
        MaxDepthInput {
            tree: vec![Some(3), Some(9), Some(20), None, None, Some(15), Some(7)],
        }
    }

    fn random_input(rng: &mut InputRng) -> MaxDepthInput {
        let target = rng.range_usize(1, 12);
        let mut tree = vec![Some(rng.range_i64(1, 99))];
        let mut open = 1usize;
        let mut placed = 1usize;
        while open > 0 && tree.len() + 2 <= MAX_ENTRIES {
            open -= 1;
            for _ in 0..2 {
                if placed < target && rng.chance(2, 3) {
                    tree.push(Some(rng.range_i64(1, 99)));
                    placed += 1;
                    open += 1;
                } else {
                    tree.push(None);
                }
            }
        }
        while tree.last() == Some(&None) {
            tree.pop();
        }
        MaxDepthInput { tree }
    }
}
