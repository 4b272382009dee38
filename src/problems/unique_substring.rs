//! Longest Substring Without Repeating Characters, sliding window with a
//! last-seen map.

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::time::Duration;

use crate::recorder::check_len;
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueSubstringInput {
    pub s: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueSubstringState {
    pub chars: Vec<char>,
    pub left: usize,
    pub right: Option<usize>,
    pub last_seen: BTreeMap<char, usize>,
    pub best_start: usize,
    pub best_len: usize,
}

pub struct LongestUniqueSubstring;

impl Problem for LongestUniqueSubstring {
    type Input = UniqueSubstringInput;
    type State = UniqueSubstringState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "longest_unique_substring",
            title: "Longest Substring Without Repeating Characters",
            technique: Technique::SlidingWindow,
            base_interval: Duration::from_millis(900),
            limits: "at most 20 printable ASCII characters",
        }
    }

    fn validate(input: &UniqueSubstringInput) -> StepwiseResult<()> {
        check_len("s", input.s.chars().count(), MAX_LEN)?;
        if let Some(c) = input.s.chars().find(|c| !c.is_ascii_graphic() && *c != ' ') {
            return Err(StepwiseError::invalid(format!(
                "s contains {c:?}; only printable ASCII is supported"
            )));
        }
        Ok(())
    }

    fn record(
        input: &UniqueSubstringInput,
        rec: &mut Recorder<UniqueSubstringState>,
    ) -> StepwiseResult<()> {
        let chars: Vec<char> = input.s.chars().collect();
        let mut state = UniqueSubstringState {
            chars: chars.clone(),
            left: 0,
            right: None,
            last_seen: BTreeMap::new(),
            best_start: 0,
            best_len: 0,
        };

        if chars.is_empty() {
            return rec.record(
                StepKind::Empty,
                "The string is empty; the longest substring has length 0",
                state,
            );
        }

        rec.record(
            StepKind::Start,
            "Grow a window to the right; shrink it from the left whenever a character repeats",
            state.clone(),
        )?;

        for (r, &c) in chars.iter().enumerate() {
            state.right = Some(r);
            if let Some(&prev) = state.last_seen.get(&c)
                && prev >= state.left
            {
                state.left = prev + 1;
                rec.record(
                    StepKind::Shrinking,
                    format!(
                        "'{c}' at index {r} repeats index {prev} inside the window; move left to {}",
                        state.left
                    ),
                    state.clone(),
                )?;
            }

            state.last_seen.insert(c, r);
            let len = r - state.left + 1;
            let improved = len > state.best_len;
            if improved {
                state.best_len = len;
                state.best_start = state.left;
            }
            let window: String = chars[state.left..=r].iter().collect();
            rec.record(
                StepKind::Expanding,
                format!(
                    "Window [{}, {r}] = \"{window}\" has length {len}{}",
                    state.left,
                    if improved {
                        " (new best)".to_string()
                    } else {
                        format!(" (best stays {})", state.best_len)
                    }
                ),
                state.clone(),
            )?;
        }

        state.right = None;
        let best: String = chars[state.best_start..state.best_start + state.best_len]
            .iter()
            .collect();
        let summary = format!(
            "Longest substring without repeats is \"{best}\" (length {})",
            state.best_len
        );
        rec.record(StepKind::Done, summary, state)
    }

    fn sample_input() -> UniqueSubstringInput {
        UniqueSubstringInput {
            s: "abcabcbb".to_string(),
        }
    }

    fn random_input(rng: &mut InputRng) -> UniqueSubstringInput {
        let alphabet = ['a', 'b', 'c', 'd', 'e', 'f'];
        let len = rng.range_usize(1, 14);
        let s = (0..len).map(|_| *rng.pick(&alphabet)).collect();
        UniqueSubstringInput { s }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_trace;

    fn run(s: &str) -> crate::Trace<UniqueSubstringState> {
        generate_trace::<LongestUniqueSubstring>(&UniqueSubstringInput { s: s.to_string() })
            .expect("trace")
    }

    #[test]
    fn classic_cases() {
        assert_eq!(run("abcabcbb").last().state.best_len, 3);
        assert_eq!(run("bbbbb").last().state.best_len, 1);
        let pwwkew = run("pwwkew");
        assert_eq!(pwwkew.last().state.best_len, 3);
        assert!(pwwkew.last().description.contains("\"wke\""));
    }

    #[test]
    fn left_pointer_never_moves_back() {
        let trace = run("abba");
        let lefts: Vec<usize> = trace.iter().map(|s| s.state.left).collect();
        assert!(lefts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(trace.last().state.best_len, 2);
    }

    #[test]
    fn control_characters_rejected() {
        let err = generate_trace::<LongestUniqueSubstring>(&UniqueSubstringInput {
            s: "a\tb".to_string(),
        })
        .expect_err("tab");
        assert!(err.is_input_rejection());
    }
}
