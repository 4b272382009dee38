//! Valid Parentheses with an explicit stack of open brackets.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::recorder::check_len;
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParenthesesInput {
    pub s: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParenthesesState {
    pub chars: Vec<char>,
    pub index: Option<usize>,
    pub stack: Vec<char>,
    pub valid: Option<bool>,
}

pub struct ValidParentheses;

fn opener_for(close: char) -> Option<char> {
    match close {
        ')' => Some('('),
        ']' => Some('['),
        '}' => Some('{'),
        _ => None,
    }
}

impl Problem for ValidParentheses {
    type Input = ParenthesesInput;
    type State = ParenthesesState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "valid_parentheses",
            title: "Valid Parentheses",
            technique: Technique::Stack,
            base_interval: Duration::from_millis(700),
            limits: "at most 20 characters from ()[]{}",
        }
    }

    fn validate(input: &ParenthesesInput) -> StepwiseResult<()> {
        check_len("s", input.s.chars().count(), MAX_LEN)?;
        if let Some(c) = input.s.chars().find(|c| !"()[]{}".contains(*c)) {
            return Err(StepwiseError::invalid(format!(
                "s contains {c:?}; only ()[]{{}} are allowed"
            )));
        }
        Ok(())
    }

    fn record(input: &ParenthesesInput, rec: &mut Recorder<ParenthesesState>) -> StepwiseResult<()> {
        let chars: Vec<char> = input.s.chars().collect();
        let mut state = ParenthesesState {
            chars: chars.clone(),
            index: None,
            stack: Vec::new(),
            valid: None,
        };

        if chars.is_empty() {
            state.valid = Some(true);
            return rec.record(StepKind::Empty, "An empty string is trivially valid", state);
        }

        rec.record(
            StepKind::Start,
            "Push every opening bracket; each closing bracket must match the top of the stack",
            state.clone(),
        )?;

        for (i, &c) in chars.iter().enumerate() {
            state.index = Some(i);
            let Some(open) = opener_for(c) else {
                state.stack.push(c);
                rec.record(
                    StepKind::Pushing,
                    format!("'{c}' at index {i} opens a group: push it"),
                    state.clone(),
                )?;
                continue;
            };

            match state.stack.last().copied() {
                Some(top) if top == open => {
                    state.stack.pop();
                    rec.record(
                        StepKind::Popping,
                        format!("'{c}' at index {i} closes the '{top}' on top: pop it"),
                        state.clone(),
                    )?;
                }
                Some(top) => {
                    state.valid = Some(false);
                    return rec.record(
                        StepKind::Invalid,
                        format!("'{c}' at index {i} cannot close '{top}': the string is invalid"),
                        state,
                    );
                }
                None => {
                    state.valid = Some(false);
                    return rec.record(
                        StepKind::Invalid,
                        format!("'{c}' at index {i} has nothing to close: the string is invalid"),
                        state,
                    );
                }
            }
        }

        state.index = None;
        if state.stack.is_empty() {
            state.valid = Some(true);
            rec.record(
                StepKind::Done,
                "Every bracket was matched and the stack is empty: the string is valid",
                state,
            )
        } else {
            state.valid = Some(false);
            let left: String = state.stack.iter().collect();
            rec.record(
                StepKind::Invalid,
                format!("Reached the end with \"{left}\" still open: the string is invalid"),
                state,
            )
        }
    }

    fn sample_input() -> ParenthesesInput {
        ParenthesesInput {
            s: "{[()]}()".to_string(),
        }
    }

    fn random_input(rng: &mut InputRng) -> ParenthesesInput {
        let pairs = [('(', ')'), ('[', ']'), ('{', '}')];
        let mut s = String::new();
        let mut open = Vec::new();
        let len = rng.range_usize(2, 12);
        for _ in 0..len {
            if !open.is_empty() && rng.chance(1, 2) {
                if let Some(close) = open.pop() {
                    s.push(close);
                }
            } else {
                let (o, c) = *rng.pick(&pairs);
                s.push(o);
                open.push(c);
            }
        }
        // Close the rest most of the time so both outcomes show up.
        if rng.chance(3, 4) {
            while let Some(c) = open.pop() {
                s.push(c);
            }
        }
        ParenthesesInput { s }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_trace;

    fn run(s: &str) -> crate::Trace<ParenthesesState> {
        generate_trace::<ValidParentheses>(&ParenthesesInput { s: s.to_string() }).expect("trace")
    }

    #[test]
    fn balanced_string_is_valid() {
        let trace = run("{[()]}()");
        assert_eq!(trace.last().kind, StepKind::Done);
        assert_eq!(trace.last().state.valid, Some(true));
        let max_stack = trace.iter().map(|s| s.state.stack.len()).max();
        assert_eq!(max_stack, Some(3));
    }

    #[test]
    fn mismatch_stops_early() {
        let trace = run("(]()");
        assert_eq!(trace.last().kind, StepKind::Invalid);
        assert_eq!(trace.last().state.index, Some(1));
    }

    #[test]
    fn leftover_openers_are_invalid() {
        let trace = run("((");
        assert_eq!(trace.last().state.valid, Some(false));
        assert_eq!(trace.last().state.stack, vec!['(', '(']);
    }

    #[test]
    fn other_characters_rejected() {
        assert!(generate_trace::<ValidParentheses>(&ParenthesesInput { s: "(a)".to_string() }).is_err());
    }
}
