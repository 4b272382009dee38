//! Playback commands (`stepwise play|script`).

use serde_json::Value;

use std::path::Path;

use crate::{
    Clock, Config, InputArgs, PlaybackRun, Player, ProblemId, Script, ScriptPath, ScriptReport,
    Session, Snapshot, Speed, Step, StepwiseResult, SystemClock, VirtualClock, write_timeline,
};

#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub speed: Option<Speed>,
    pub from: Option<usize>,
    /// Sleep on the wall clock between steps instead of virtual time.
    pub realtime: bool,
    pub timeline: Option<std::path::PathBuf>,
}

/// Auto-plays a trace to its last step, calling `on_step(cursor, len, step)`
/// for every step as it is displayed.
pub fn play_command(
    config: &Config,
    problem: ProblemId,
    input: &InputArgs,
    options: &PlayOptions,
    mut on_step: impl FnMut(usize, usize, &Step<Snapshot>),
) -> StepwiseResult<Value> {
    let resolved = input.resolve(problem)?;
    let mut session = Session::open(problem, resolved.input, config)?;
    if let Some(speed) = options.speed {
        session.controller_mut().set_speed(speed);
    }
    if let Some(from) = options.from
        && !session.controller_mut().seek(from)
    {
        tracing::warn!(
            "--from {from} is past the last step ({}); starting at 0",
            session.controller().len() - 1
        );
    }

    let len = session.trace().len();
    let show = |cursor: usize, step: &Step<Snapshot>| on_step(cursor, len, step);
    let run = if options.realtime {
        drive(Player::new(SystemClock::new()), &mut session, options, show)?
    } else {
        drive(Player::new(VirtualClock::new()), &mut session, options, show)?
    };

    Ok(serde_json::json!({
        "problem": problem,
        "seed": resolved.seed,
        "speed": session.controller().speed(),
        "intervalMs": session.controller().interval().as_millis() as u64,
        "steps": session.trace().len(),
        "run": run,
        "timeline": options.timeline.as_ref().map(|p| p.display().to_string()),
    }))
}

fn drive<C: Clock>(
    player: Player<C>,
    session: &mut Session,
    options: &PlayOptions,
    on_step: impl FnMut(usize, &Step<Snapshot>),
) -> StepwiseResult<PlaybackRun> {
    let mut player = if options.timeline.is_some() {
        player.with_timeline()
    } else {
        player
    };
    let run = player.run_to_end(session.controller_mut(), on_step);
    if let Some(path) = &options.timeline {
        write_timeline(&player.take_timeline(), path)?;
    }
    Ok(run)
}

pub fn script_command(
    config: &Config,
    path: &Path,
    timeline: bool,
) -> StepwiseResult<ScriptReport> {
    let script = Script::load(&ScriptPath::new(path.to_path_buf()))?;
    script.run(config, timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_timeline;

    #[test]
    fn plays_every_step_in_order() {
        let mut cursors = Vec::new();
        let out = play_command(
            &Config::default(),
            ProblemId::ClimbingStairs,
            &InputArgs::default(),
            &PlayOptions::default(),
            |i, _, _| cursors.push(i),
        )
        .expect("play");
        let steps = out["steps"].as_u64().expect("steps") as usize;
        assert_eq!(cursors, (0..steps).collect::<Vec<_>>());
        assert_eq!(out["run"]["finalCursor"], steps - 1);
    }

    #[test]
    fn from_and_speed_shape_the_run() {
        let dir = std::env::temp_dir().join(format!("stepwise-play-{}", uuid::Uuid::new_v4()));
        let timeline = dir.join("timeline.json");
        let options = PlayOptions {
            speed: Some(Speed::MAX),
            from: Some(2),
            realtime: false,
            timeline: Some(timeline.clone()),
        };
        let mut first = None;
        play_command(
            &Config::default(),
            ProblemId::TwoSum,
            &InputArgs::default(),
            &options,
            |i, _, _| {
                first.get_or_insert(i);
            },
        )
        .expect("play");
        assert_eq!(first, Some(2));

        let entries = read_timeline(&timeline).expect("timeline");
        let base = ProblemId::TwoSum.meta().base_interval.as_millis() as u64;
        assert_eq!(entries[0].cursor, 2);
        assert_eq!(entries[1].time_ms, base / 2);
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}
