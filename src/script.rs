//! Scripted playback sessions: a JSON command list run on a virtual clock.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{
    Config, PlaybackStatus, Player, ProblemId, Session, Speed, StepKind, StepwiseError,
    StepwiseResult, TimelineEntry, VirtualClock,
};

#[derive(Debug, Clone)]
pub struct ScriptPath {
    path: PathBuf,
}

impl ScriptPath {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn as_path(&self) -> &Path {
        &self.path
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptV1 {
    pub version: u32,
    pub name: String,
    pub problem: ProblemId,
    /// Initial input; the problem's sample when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Value>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Play,
    Pause,
    StepForward,
    StepBack,
    Seek { index: usize },
    Reset,
    SetSpeed { speed: Speed },
    /// Lets virtual time pass, firing every tick that falls due.
    Advance { ms: u64 },
    RunToEnd,
    SetInput {
        input: Value,
        #[serde(default)]
        expect_rejected: bool,
    },
    Randomize { #[serde(default)] seed: Option<u64> },
    AssertCursor { equals: usize },
    AssertStatus { equals: PlaybackStatus },
    AssertKind { equals: StepKind },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::StepForward => "step_forward",
            Self::StepBack => "step_back",
            Self::Seek { .. } => "seek",
            Self::Reset => "reset",
            Self::SetSpeed { .. } => "set_speed",
            Self::Advance { .. } => "advance",
            Self::RunToEnd => "run_to_end",
            Self::SetInput { .. } => "set_input",
            Self::Randomize { .. } => "randomize",
            Self::AssertCursor { .. } => "assert_cursor",
            Self::AssertStatus { .. } => "assert_status",
            Self::AssertKind { .. } => "assert_kind",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStatus {
    Pass,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptFailure {
    pub index: usize,
    pub command: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptReport {
    pub name: String,
    pub problem: ProblemId,
    pub status: ScriptStatus,
    pub commands_run: usize,
    pub final_cursor: usize,
    pub final_status: PlaybackStatus,
    pub elapsed_ms: u64,
    pub digest: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ScriptFailure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone)]
pub struct Script {
    pub name: String,
    pub problem: ProblemId,
    pub input: Option<Value>,
    pub commands: Vec<Command>,
}

impl Script {
    pub fn load(path: &ScriptPath) -> StepwiseResult<Self> {
        let bytes = std::fs::read(path.as_path())?;
        let file: ScriptV1 = serde_json::from_slice(&bytes)?;
        Self::from_file(file)
    }

    pub fn from_file(file: ScriptV1) -> StepwiseResult<Self> {
        if file.version != 1 {
            return Err(StepwiseError::Script(format!(
                "unsupported script version {} (expected 1)",
                file.version
            )));
        }
        let script = Self {
            name: file.name,
            problem: file.problem,
            input: file.input,
            commands: file.commands,
        };
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> StepwiseResult<()> {
        if self.commands.is_empty() {
            return Err(StepwiseError::Script(format!(
                "script {:?} has no commands",
                self.name
            )));
        }
        for (i, command) in self.commands.iter().enumerate() {
            if let Command::Advance { ms: 0 } = command {
                return Err(StepwiseError::Script(format!(
                    "command {i}: advance needs ms > 0"
                )));
            }
        }
        Ok(())
    }

    /// Runs every command in order. Assertion failures end the run with a
    /// `fail` report; setup errors (bad initial input) are returned as `Err`.
    pub fn run(&self, config: &Config, collect_timeline: bool) -> StepwiseResult<ScriptReport> {
        let mut session = match &self.input {
            Some(input) => Session::open(self.problem, input.clone(), config)?,
            None => Session::open_sample(self.problem, config)?,
        };
        let mut player = Player::new(VirtualClock::new());
        if collect_timeline {
            player = player.with_timeline();
        }
        player.mark(session.controller());

        let mut failure = None;
        let mut commands_run = 0;
        for (index, command) in self.commands.iter().enumerate() {
            commands_run += 1;
            if let Err(message) = apply(&mut session, &mut player, command) {
                tracing::debug!(script = %self.name, index, "script command failed: {message}");
                failure = Some(ScriptFailure {
                    index,
                    command: command.name().to_string(),
                    message,
                });
                break;
            }
            player.sync(session.controller());
        }

        let ctl = session.controller();
        Ok(ScriptReport {
            name: self.name.clone(),
            problem: self.problem,
            status: if failure.is_some() {
                ScriptStatus::Fail
            } else {
                ScriptStatus::Pass
            },
            commands_run,
            final_cursor: ctl.cursor(),
            final_status: ctl.status(),
            elapsed_ms: player.now().as_millis() as u64,
            digest: session.trace().digest()?,
            failure,
            timeline: player.take_timeline(),
        })
    }

    pub fn example() -> ScriptV1 {
        ScriptV1 {
            version: 1,
            name: "two-sum-walkthrough".to_string(),
            problem: ProblemId::TwoSum,
            input: Some(serde_json::json!({"nums": [2, 7, 11, 15], "target": 9})),
            commands: vec![
                Command::Play,
                Command::Advance { ms: 1000 },
                Command::AssertStatus {
                    equals: PlaybackStatus::Playing,
                },
                Command::RunToEnd,
                Command::AssertKind {
                    equals: StepKind::Found,
                },
                Command::SetInput {
                    input: serde_json::json!({"nums": [1, 2, 3], "target": 100}),
                    expect_rejected: false,
                },
                Command::AssertCursor { equals: 0 },
            ],
        }
    }
}

fn apply(
    session: &mut Session,
    player: &mut Player<VirtualClock>,
    command: &Command,
) -> Result<(), String> {
    let moved_by_hand = match command {
        Command::Play => {
            session.controller_mut().play();
            false
        }
        Command::Pause => {
            session.controller_mut().pause();
            false
        }
        Command::StepForward => session.controller_mut().step_forward(),
        Command::StepBack => session.controller_mut().step_back(),
        Command::Seek { index } => session.controller_mut().seek(*index),
        Command::Reset => {
            session.controller_mut().reset();
            true
        }
        Command::SetSpeed { speed } => {
            session.controller_mut().set_speed(*speed);
            false
        }
        Command::Advance { ms } => {
            player.sync(session.controller());
            player.advance(
                session.controller_mut(),
                Duration::from_millis(*ms),
                |_, _| {},
            );
            false
        }
        Command::RunToEnd => {
            player.sync(session.controller());
            let ctl = session.controller_mut();
            ctl.play();
            loop {
                player.sync(ctl);
                let Some(pending) = ctl.pending() else {
                    break;
                };
                player.advance(ctl, pending.delay, |_, _| {});
            }
            false
        }
        Command::SetInput {
            input,
            expect_rejected,
        } => {
            let result = session.set_input(input.clone());
            match (result, *expect_rejected) {
                (Ok(()), false) => true,
                (Err(err), true) if err.is_input_rejection() => false,
                (Ok(()), true) => return Err("input was accepted but expected rejection".to_string()),
                (Err(err), _) => return Err(format!("input rejected: {err}")),
            }
        }
        Command::Randomize { seed } => {
            session.randomize(*seed).map_err(|e| format!("randomize: {e}"))?;
            true
        }
        Command::AssertCursor { equals } => {
            let cursor = session.controller().cursor();
            if cursor != *equals {
                return Err(format!("cursor is {cursor}, expected {equals}"));
            }
            false
        }
        Command::AssertStatus { equals } => {
            let status = session.controller().status();
            if status != *equals {
                return Err(format!("status is {status}, expected {equals}"));
            }
            false
        }
        Command::AssertKind { equals } => {
            let kind = session.controller().current().kind;
            if kind != *equals {
                return Err(format!("current step is {kind}, expected {equals}"));
            }
            false
        }
    };
    if moved_by_hand {
        player.mark(session.controller());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn script(commands: serde_json::Value) -> Script {
        let file: ScriptV1 = serde_json::from_value(json!({
            "version": 1,
            "name": "t",
            "problem": "two_sum",
            "input": {"nums": [2, 7, 11, 15], "target": 9},
            "commands": commands,
        }))
        .expect("script json");
        Script::from_file(file).expect("valid script")
    }

    #[test]
    fn example_passes() {
        let report = Script::from_file(Script::example())
            .expect("valid")
            .run(&Config::default(), false)
            .expect("run");
        assert_eq!(report.status, ScriptStatus::Pass, "{:?}", report.failure);
        assert_eq!(report.commands_run, 7);
        assert_eq!(report.final_cursor, 0);
    }

    #[test]
    fn advance_fires_due_ticks_only() {
        let base = ProblemId::TwoSum.meta().base_interval.as_millis() as u64;
        let report = script(json!([
            {"type": "play"},
            {"type": "advance", "ms": base - 1},
            {"type": "assert_cursor", "equals": 0},
            {"type": "advance", "ms": 1},
            {"type": "assert_cursor", "equals": 1},
            {"type": "pause"},
            {"type": "advance", "ms": base * 10},
            {"type": "assert_cursor", "equals": 1},
            {"type": "assert_status", "equals": "paused"}
        ]))
        .run(&Config::default(), false)
        .expect("run");
        assert_eq!(report.status, ScriptStatus::Pass, "{:?}", report.failure);
    }

    #[test]
    fn run_to_end_stops_paused_on_terminal_step() {
        let report = script(json!([
            {"type": "set_speed", "speed": 2.0},
            {"type": "run_to_end"},
            {"type": "assert_status", "equals": "paused"},
            {"type": "assert_kind", "equals": "found"}
        ]))
        .run(&Config::default(), true)
        .expect("run");
        assert_eq!(report.status, ScriptStatus::Pass, "{:?}", report.failure);
        assert!(report.timeline.len() >= 2);
        assert_eq!(report.timeline[0].time_ms, 0);
    }

    #[test]
    fn rejected_input_is_reported_and_state_kept() {
        let report = script(json!([
            {"type": "step_forward"},
            {"type": "set_input", "input": {"nums": "bad"}, "expect_rejected": true},
            {"type": "assert_cursor", "equals": 1}
        ]))
        .run(&Config::default(), false)
        .expect("run");
        assert_eq!(report.status, ScriptStatus::Pass, "{:?}", report.failure);

        let report = script(json!([
            {"type": "set_input", "input": {"nums": "bad"}}
        ]))
        .run(&Config::default(), false)
        .expect("run");
        assert_eq!(report.status, ScriptStatus::Fail);
        let failure = report.failure.expect("failure");
        assert_eq!(failure.command, "set_input");
    }

    #[test]
    fn failed_assertion_stops_the_run() {
        let report = script(json!([
            {"type": "assert_cursor", "equals": 3},
            {"type": "step_forward"}
        ]))
        .run(&Config::default(), false)
        .expect("run");
        assert_eq!(report.status, ScriptStatus::Fail);
        assert_eq!(report.commands_run, 1);
        assert_eq!(report.final_cursor, 0);
    }

    #[test]
    fn bad_version_and_zero_advance_are_rejected() {
        let mut file = Script::example();
        file.version = 2;
        assert!(Script::from_file(file).is_err());

        let mut file = Script::example();
        file.commands = vec![Command::Advance { ms: 0 }];
        assert!(Script::from_file(file).is_err());
    }

    #[test]
    fn load_from_disk() {
        let dir = std::env::temp_dir().join(format!("stepwise-script-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("mkdir");
        let path = dir.join("script.json");
        std::fs::write(&path, serde_json::to_vec(&Script::example()).expect("encode"))
            .expect("write");
        let script = Script::load(&ScriptPath::new(path)).expect("load");
        assert_eq!(script.problem, ProblemId::TwoSum);
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}
