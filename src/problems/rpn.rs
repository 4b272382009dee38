//! Evaluate Reverse Polish Notation.
//!
//! Token problems are only discovered while evaluating, so they abort the
//! whole recording with [`StepwiseError::Precondition`] instead of producing
//! a partial trace.

use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::recorder::{VALUE_BOUND, check_len, within_bound};
use crate::{
    InputRng, Problem, ProblemMeta, Recorder, StepKind, StepwiseError, StepwiseResult, Technique,
};

const MAX_TOKENS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpnInput {
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpnState {
    pub tokens: Vec<String>,
    pub index: Option<usize>,
    pub stack: Vec<i64>,
    /// Operands popped for the operator at `index`.
    pub operands: Option<(i64, i64)>,
    pub result: Option<i64>,
}

pub struct EvalRpn;

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Add),
            "-" => Some(Self::Sub),
            "*" => Some(Self::Mul),
            "/" => Some(Self::Div),
            _ => None,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }

    fn apply(self, a: i64, b: i64) -> StepwiseResult<i64> {
        let out = match self {
            Self::Add => a.checked_add(b),
            Self::Sub => a.checked_sub(b),
            Self::Mul => a.checked_mul(b),
            Self::Div => {
                if b == 0 {
                    return Err(StepwiseError::Precondition(format!(
                        "division by zero in {a} / {b}"
                    )));
                }
                a.checked_div(b)
            }
        };
        out.ok_or_else(|| {
            StepwiseError::Precondition(format!("{a} {} {b} overflows", self.symbol()))
        })
    }
}

impl Problem for EvalRpn {
    type Input = RpnInput;
    type State = RpnState;

    fn meta() -> ProblemMeta {
        ProblemMeta {
            id: "eval_rpn",
            title: "Evaluate Reverse Polish Notation",
            technique: Technique::Stack,
            base_interval: Duration::from_millis(1000),
            limits: "at most 20 tokens: integers and + - * /",
        }
    }

    fn validate(input: &RpnInput) -> StepwiseResult<()> {
        check_len("tokens", input.tokens.len(), MAX_TOKENS)
    }

    fn record(input: &RpnInput, rec: &mut Recorder<RpnState>) -> StepwiseResult<()> {
        let tokens = &input.tokens;
        let mut state = RpnState {
            tokens: tokens.clone(),
            index: None,
            stack: Vec::new(),
            operands: None,
            result: None,
        };

        if tokens.is_empty() {
            return rec.record(StepKind::Empty, "No tokens, nothing to evaluate", state);
        }

        rec.record(
            StepKind::Start,
            "Read tokens left to right: numbers are pushed, operators pop two and push the result",
            state.clone(),
        )?;

        for (i, token) in tokens.iter().enumerate() {
            state.index = Some(i);
            state.operands = None;

            if let Some(op) = Op::parse(token) {
                let (Some(b), Some(a)) = (state.stack.pop(), state.stack.pop()) else {
                    return Err(StepwiseError::Precondition(format!(
                        "operator '{token}' at index {i} needs two operands"
                    )));
                };
                state.operands = Some((a, b));
                rec.record(
                    StepKind::Popping,
                    format!("'{token}' at index {i}: pop {b}, then {a}"),
                    state.clone(),
                )?;
                let value = op.apply(a, b)?;
                state.stack.push(value);
                rec.record(
                    StepKind::Pushing,
                    format!("{a} {} {b} = {value}, push it", op.symbol()),
                    state.clone(),
                )?;
                continue;
            }

            let value: i64 = token.trim().parse().map_err(|_| {
                StepwiseError::Precondition(format!("token {token:?} at index {i} is not a number"))
            })?;
            if !within_bound(value) {
                return Err(StepwiseError::Precondition(format!(
                    "token {value} at index {i} is outside ±{VALUE_BOUND}"
                )));
            }
            state.stack.push(value);
            rec.record(
                StepKind::Pushing,
                format!("{value} is a number: push it"),
                state.clone(),
            )?;
        }

        state.index = None;
        state.operands = None;
        if state.stack.len() != 1 {
            return Err(StepwiseError::Precondition(format!(
                "expression leaves {} values on the stack (expected 1)",
                state.stack.len()
            )));
        }
        let result = state.stack[0];
        state.result = Some(result);
        rec.record(
            StepKind::Done,
            format!("All tokens consumed; the expression evaluates to {result}"),
            state,
        )
    }

    fn sample_input() -> RpnInput {
        RpnInput {
            tokens: ["2", "1", "+", "3", "*"].map(String::from).to_vec(),
        }
    }

    fn random_input(rng: &mut InputRng) -> RpnInput {
        let ops = ["+", "-", "*"];
        let operands = rng.range_usize(2, 6);
        let mut tokens = vec![rng.range_i64(1, 9).to_string()];
        for _ in 1..operands {
            tokens.push(rng.range_i64(1, 9).to_string());
            tokens.push(rng.pick(&ops).to_string());
        }
        RpnInput { tokens }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_trace;

    fn tokens(ts: &[&str]) -> RpnInput {
        RpnInput {
            tokens: ts.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn sample_evaluates_to_nine() {
        let trace = generate_trace::<EvalRpn>(&EvalRpn::sample_input()).expect("trace");
        assert_eq!(trace.last().state.result, Some(9));
        assert_eq!(trace.last().kind, StepKind::Done);
    }

    #[test]
    fn division_truncates_toward_zero() {
        let trace = generate_trace::<EvalRpn>(&tokens(&["4", "13", "5", "/", "+"])).expect("trace");
        assert_eq!(trace.last().state.result, Some(6));
        let trace = generate_trace::<EvalRpn>(&tokens(&["-7", "2", "/"])).expect("trace");
        assert_eq!(trace.last().state.result, Some(-3));
    }

    #[test]
    fn malformed_tokens_abort_without_trace() {
        for bad in [
            tokens(&["1", "x", "+"]),
            tokens(&["+"]),
            tokens(&["1", "0", "/"]),
            tokens(&["1", "2"]),
        ] {
            let err = generate_trace::<EvalRpn>(&bad).expect_err("must abort");
            assert!(matches!(err, StepwiseError::Precondition(_)), "{err}");
        }
    }

    #[test]
    fn out_of_range_number_aborts() {
        for bad in [tokens(&["-9223372036854775808"]), tokens(&["1000001", "1", "+"])] {
            let err = generate_trace::<EvalRpn>(&bad).expect_err("must abort");
            assert!(matches!(err, StepwiseError::Precondition(_)), "{err}");
        }
    }

    #[test]
    fn random_inputs_always_evaluate() {
        for seed in 0..50 {
            let mut rng = InputRng::from_seed(seed);
            let input = EvalRpn::random_input(&mut rng);
            generate_trace::<EvalRpn>(&input).expect("well formed");
        }
    }
}
