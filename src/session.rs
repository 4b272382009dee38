//! One problem view: the current input, its trace, and the controller
//! playing it.
//!
//! Input changes are all-or-nothing. A new trace is generated first; only if
//! that succeeds are the input, trace, cursor and pending tick swapped out
//! together. A rejected input leaves every one of them as it was.

use serde_json::Value;

use crate::{
    Config, InputRng, PlaybackController, ProblemId, Snapshot, StepwiseResult, Trace, catalog,
};

#[derive(Debug, Clone)]
pub struct Session {
    problem: ProblemId,
    input: Value,
    max_steps: usize,
    controller: PlaybackController<Snapshot>,
}

impl Session {
    pub fn open(problem: ProblemId, input: Value, config: &Config) -> StepwiseResult<Self> {
        let trace = catalog::generate(problem, &input, config.max_steps)?;
        let controller = PlaybackController::new(trace, config.base_interval(problem))
            .with_speed(config.default_speed);
        Ok(Self {
            problem,
            input,
            max_steps: config.max_steps,
            controller,
        })
    }

    /// Opens on the problem's built-in sample input.
    pub fn open_sample(problem: ProblemId, config: &Config) -> StepwiseResult<Self> {
        Self::open(problem, catalog::sample_input(problem)?, config)
    }

    pub fn problem(&self) -> ProblemId {
        self.problem
    }

    pub fn input(&self) -> &Value {
        &self.input
    }

    pub fn trace(&self) -> &Trace<Snapshot> {
        self.controller.trace()
    }

    pub fn controller(&self) -> &PlaybackController<Snapshot> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<Snapshot> {
        &mut self.controller
    }

    pub fn set_input(&mut self, input: Value) -> StepwiseResult<()> {
        let trace = match catalog::generate(self.problem, &input, self.max_steps) {
            Ok(trace) => trace,
            Err(err) => {
                tracing::warn!(
                    problem = %self.problem,
                    "input rejected, keeping the previous trace: {err}"
                );
                return Err(err);
            }
        };
        tracing::debug!(problem = %self.problem, steps = trace.len(), "input replaced");
        self.input = input;
        self.controller.replace(trace);
        Ok(())
    }

    /// Replaces the input with a seeded random one. Returns the seed used.
    pub fn randomize(&mut self, seed: Option<u64>) -> StepwiseResult<u64> {
        let seed = seed.unwrap_or_else(InputRng::fresh_seed);
        let input = catalog::random_input(self.problem, seed)?;
        self.set_input(input)?;
        Ok(seed)
    }
}
