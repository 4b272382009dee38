//! Problem/script schema introspection for automation and authoring.

use serde::Serialize;

use crate::{ProblemId, Script, StepKind, StepwiseResult, Technique, catalog};

#[derive(Debug, Clone, Serialize)]
pub struct SchemaDoc {
    #[serde(rename = "schemaVersion")]
    pub schema_version: String,
    pub problems: Vec<ProblemDoc>,
    #[serde(rename = "stepKinds")]
    pub step_kinds: Vec<&'static str>,
    #[serde(rename = "terminalKinds")]
    pub terminal_kinds: Vec<&'static str>,
    #[serde(rename = "scriptCommandTypes")]
    pub script_command_types: Vec<&'static str>,
    #[serde(rename = "scriptExample")]
    pub script_example: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProblemDoc {
    pub id: &'static str,
    pub title: &'static str,
    pub technique: Technique,
    #[serde(rename = "baseIntervalMs")]
    pub base_interval_ms: u64,
    pub limits: &'static str,
    #[serde(rename = "sampleInput")]
    pub sample_input: serde_json::Value,
}

const STEP_KINDS: [StepKind; 22] = [
    StepKind::Start,
    StepKind::Comparing,
    StepKind::Checking,
    StepKind::Storing,
    StepKind::Moving,
    StepKind::Expanding,
    StepKind::Shrinking,
    StepKind::Pushing,
    StepKind::Popping,
    StepKind::Swapping,
    StepKind::Visiting,
    StepKind::Returning,
    StepKind::Descending,
    StepKind::Backtracking,
    StepKind::Recording,
    StepKind::Computing,
    StepKind::Merging,
    StepKind::Found,
    StepKind::NotFound,
    StepKind::Invalid,
    StepKind::Done,
    StepKind::Empty,
];

pub fn problem_docs() -> StepwiseResult<Vec<ProblemDoc>> {
    ProblemId::ALL
        .into_iter()
        .map(|id| {
            let meta = id.meta();
            Ok(ProblemDoc {
                id: meta.id,
                title: meta.title,
                technique: meta.technique,
                base_interval_ms: meta.base_interval.as_millis() as u64,
                limits: meta.limits,
                sample_input: catalog::sample_input(id)?,
            })
        })
        .collect()
}

pub fn schema_doc() -> StepwiseResult<SchemaDoc> {
    Ok(SchemaDoc {
        schema_version: "stepwise.schema_doc.v1".to_string(),
        problems: problem_docs()?,
        step_kinds: STEP_KINDS.iter().map(|k| k.as_str()).collect(),
        terminal_kinds: STEP_KINDS
            .iter()
            .filter(|k| k.is_terminal())
            .map(|k| k.as_str())
            .collect(),
        script_command_types: vec![
            "play",
            "pause",
            "step_forward",
            "step_back",
            "seek",
            "reset",
            "set_speed",
            "advance",
            "run_to_end",
            "set_input",
            "randomize",
            "assert_cursor",
            "assert_status",
            "assert_kind",
        ],
        script_example: serde_json::to_value(Script::example())?,
    })
}
