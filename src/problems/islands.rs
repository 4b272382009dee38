//! Number of Islands, recursive flood fill.
//!
//! The grid is scanned row by row. From each unvisited land cell a DFS visits
//! neighbors in the fixed order up, right, down, left. Each DFS call records
//! an entry step and a return step; `stack` is the live call stack.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_SIDE: usize = 6;

/// Neighbor order: up, right, down, left.
const DIRECTIONS: [(isize, isize, &str); 4] =
    [(-1, 0, "up"), (0, 1, "right"), (1, 0, "down"), (0, -1, "left")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslandsInput {
    /// Rows of 0 (water) and 1 (land).
    pub grid: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslandsState {
    pub grid: Vec<Vec<u8>>,
    pub visited: Vec<Vec<bool>>,
    /// DFS call stack, outermost first.
    pub stack: Vec<(usize, usize)>,
    pub current: Option<(usize, usize)>,
    /// Island id per visited land cell, 0 for unassigned.
    pub labels: Vec<Vec<usize>>,
    pub islands: usize,
}

pub struct NumberOfIslands;

struct FloodFill<'a> {
    rec: &'a mut Recorder<IslandsState>,
    state: IslandsState,
    rows: usize,
    cols: usize,
}

impl FloodFill<'_> {
    fn neighbor(&self, r: usize, c: usize, dr: isize, dc: isize) -> Option<(usize, usize)> {
        let nr = r.checked_add_signed(dr)?;
        let nc = c.checked_add_signed(dc)?;
        (nr < self.rows && nc < self.cols).then_some((nr, nc))
    }

    fn dfs(&mut self, r: usize, c: usize) -> StepwiseResult<()> {
        let island = self.state.islands;
        self.state.visited[r][c] = true;
        self.state.labels[r][c] = island;
        self.state.stack.push((r, c));
        self.state.current = Some((r, c));
        self.rec.record(
            StepKind::Visiting,
            format!(
                "Visit ({r}, {c}) at depth {}: mark it as part of island {island}",
                self.state.stack.len()
            ),
            self.state.clone(),
        )?;

        for (dr, dc, name) in DIRECTIONS {
            let Some((nr, nc)) = self.neighbor(r, c, dr, dc) else {
                continue;
            };
            if self.state.grid[nr][nc] == 1 && !self.state.visited[nr][nc] {
                self.rec.record(
                    StepKind::Descending,
                    format!("({nr}, {nc}) {name} of ({r}, {c}) is unvisited land: go there"),
                    self.state.clone(),
                )?;
                self.dfs(nr, nc)?;
                self.state.current = Some((r, c));
            }
        }

        self.state.current = Some((r, c));
        self.rec.record(
            StepKind::Returning,
            format!("Every neighbor of ({r}, {c}) is water or visited: return"),
            self.state.clone(),
        )?;
        self.state.stack.pop();
        Ok(())
    }
}

impl Problem for NumberOfIslands {
    type Input = IslandsInput;
    type State = IslandsState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "number_of_islands",
            title: "Number of Islands",
            technique: Technique::GraphSearch,
            base_interval: Duration::from_millis(600),
            limits: "rectangular grid of 0/1, at most 6 x 6",
        }
    }

    fn validate(input: &IslandsInput) -> StepwiseResult<()> {
        let rows = input.grid.len();
        if rows > MAX_SIDE {
            return Err(StepwiseError::invalid(format!(
                "grid has {rows} rows (at most {MAX_SIDE})"
            )));
        }
        let cols = input.grid.first().map_or(0, Vec::len);
        if cols > MAX_SIDE {
            return Err(StepwiseError::invalid(format!(
                "grid has {cols} columns (at most {MAX_SIDE})"
            )));
        }
        for (r, row) in input.grid.iter().enumerate() {
            if row.len() != cols {
                return Err(StepwiseError::invalid(format!(
                    "row {r} has {} cells but row 0 has {cols}",
                    row.len()
                )));
            }
            if let Some(v) = row.iter().find(|v| **v > 1) {
                return Err(StepwiseError::invalid(format!(
                    "row {r} contains {v}; cells must be 0 or 1"
                )));
            }
        }
        Ok(())
    }

    fn record(input: &IslandsInput, rec: &mut Recorder<IslandsState>) -> StepwiseResult<()> {
        let rows = input.grid.len();
        let cols = input.grid.first().map_or(0, Vec::len);
        let state = IslandsState {
            grid: input.grid.clone(),
            visited: vec![vec![false; cols]; rows],
            stack: Vec::new(),
            current: None,
            labels: vec![vec![0; cols]; rows],
            islands: 0,
        };

        if rows == 0 || cols == 0 {
            return rec.record(StepKind::Empty, "The grid is empty: 0 islands", state);
        }

        rec.record(
            StepKind::Start,
            "Scan row by row; each unvisited land cell starts a new island",
            state.clone(),
        )?;

        let mut fill = FloodFill {
            rec: &mut *rec,
            state,
            rows,
            cols,
        };
        for r in 0..rows {
            for c in 0..cols {
                if fill.state.grid[r][c] != 1 || fill.state.visited[r][c] {
                    continue;
                }
                fill.state.islands += 1;
                fill.state.current = Some((r, c));
                let island = fill.state.islands;
                fill.rec.record(
                    StepKind::Recording,
                    format!("({r}, {c}) is land nobody has visited: island {island} starts here"),
                    fill.state.clone(),
                )?;
                fill.dfs(r, c)?;
            }
        }

        let mut state = fill.state;
        state.current = None;
        let islands = state.islands;
        rec.record(
            StepKind::Done,
            format!("Scan finished: {islands} island(s)"),
            state,
        )
    }

    fn sample_input() -> IslandsInput {
        IslandsInput {
            grid: vec![
                vec![1, 1, 0, 0, 0],
                vec![1, 1, 0, 0, 0],
                vec![0, 0, 1, 0, 0],
                vec![0, 0, 0, 1, 1],
            ],
        }
    }

    fn random_input(rng: &mut InputRng) -> IslandsInput {
        let rows = rng.range_usize(2, MAX_SIDE);
        let cols = rng.range_usize(2, MAX_SIDE);
        let grid = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| u8::from(rng.chance(2, 5)))
                    .collect()
            })
            .collect();
        IslandsInput { grid }
    }
}
