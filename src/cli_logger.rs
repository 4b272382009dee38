use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use stepwise::{ScriptReport, ScriptStatus, Snapshot, Step, StepKind};

pub struct CliLogger {
    json: bool,
    no_color: bool,
}

impl CliLogger {
    pub fn new(json: bool, no_color: bool) -> Self {
        Self { json, no_color }
    }

    pub fn print_serialized<T: Serialize>(&self, value: &T) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(value)?);
            return Ok(());
        }

        let rendered = render_value(&serde_json::to_value(value)?, 0);
        println!("{rendered}");
        Ok(())
    }

    /// One line per displayed step; JSON mode emits one object per line.
    pub fn print_step(&self, cursor: usize, total: usize, step: &Step<Snapshot>) -> Result<()> {
        if self.json {
            let out = serde_json::json!({
                "cursor": cursor,
                "kind": step.kind,
                "description": step.description,
            });
            println!("{out}");
            return Ok(());
        }

        let width = total.to_string().len();
        println!(
            "{} {} {}",
            self.style(&format!("[{:>width$}/{total}]", cursor + 1), "90"),
            self.style(&format!("{:<12}", step.kind.as_str()), kind_color(step.kind)),
            step.description
        );
        Ok(())
    }

    pub fn print_script_report(&self, report: &ScriptReport) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(report)?);
            return Ok(());
        }

        let status_style = match report.status {
            ScriptStatus::Pass => self.style("PASS", "32;1"),
            ScriptStatus::Fail => self.style("FAIL", "31;1"),
        };

        let mut out = String::new();
        out.push_str(&format!(
            "{} {} {}\n",
            self.style("stepwise", "36;1"),
            self.style(&report.name, "37;1"),
            status_style
        ));
        out.push_str(&format!("{} {}\n", self.style("problem", "90"), report.problem));
        out.push_str(&format!(
            "{} {}\n",
            self.style("commands", "90"),
            report.commands_run
        ));
        out.push_str(&format!(
            "{} {} ({})\n",
            self.style("cursor", "90"),
            report.final_cursor,
            report.final_status
        ));
        out.push_str(&format!(
            "{} {}ms\n",
            self.style("virtual time", "90"),
            report.elapsed_ms
        ));
        out.push_str(&format!("{} {}\n", self.style("digest", "90"), report.digest));

        if let Some(failure) = &report.failure {
            out.push_str(&format!(
                "{} command {} ({}): {}\n",
                self.style("failure", "33;1"),
                failure.index,
                failure.command,
                failure.message
            ));
        }

        println!("{}", out.trim_end());
        Ok(())
    }

    pub fn print_error(&self, msg: &str) {
        if self.json {
            let out = serde_json::json!({
                "status": "error",
                "code": "error",
                "message": msg,
            });
            println!("{out}");
            return;
        }
        eprintln!("{} {msg}", self.style("error", "31;1"));
    }

    pub fn print_warning(&self, msg: &str) {
        if self.json {
            let out = serde_json::json!({
                "status": "warning",
                "code": "warning",
                "message": msg,
            });
            eprintln!("{out}");
            return;
        }
        eprintln!("{} {msg}", self.style("warn", "33;1"));
    }

    fn style(&self, text: &str, ansi: &str) -> String {
        if self.no_color {
            return text.to_string();
        }
        format!("\x1b[{ansi}m{text}\x1b[0m")
    }
}

fn kind_color(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Found | StepKind::Done => "32;1",
        StepKind::NotFound | StepKind::Invalid | StepKind::Empty => "31;1",
        StepKind::Start => "36",
        StepKind::Backtracking | StepKind::Returning | StepKind::Popping | StepKind::Shrinking => {
            "33"
        }
        _ => "37",
    }
}

/// Short rows of numbers or booleans (inputs, grid rows) stay on one line.
fn is_scalar_row(items: &[Value]) -> bool {
    items.len() <= 16 && items.iter().all(|v| v.is_number() || v.is_boolean())
}

fn render_value(value: &Value, indent: usize) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) => render_array(items, indent),
        Value::Object(map) => render_object(map, indent),
    }
}

fn render_array(items: &[Value], indent: usize) -> String {
    if items.is_empty() {
        return "[]".to_string();
    }
    if is_scalar_row(items) {
        let parts: Vec<String> = items.iter().map(|v| render_value(v, 0)).collect();
        return format!("[{}]", parts.join(", "));
    }

    let pad = " ".repeat(indent);
    let mut out = String::new();
    for item in items {
        match item {
            Value::Object(_) | Value::Array(_) => {
                out.push_str(&format!("{pad}-\n{}\n", render_value(item, indent + 2)));
            }
            _ => out.push_str(&format!("{pad}- {}\n", render_value(item, indent + 2))),
        }
    }
    out.trim_end().to_string()
}

fn render_object(map: &serde_json::Map<String, Value>, indent: usize) -> String {
    if map.is_empty() {
        return "{}".to_string();
    }

    let pad = " ".repeat(indent);
    let mut out = String::new();
    for (key, value) in map {
        match value {
            Value::Array(items) if !items.is_empty() && is_scalar_row(items) => {
                out.push_str(&format!("{pad}{key}: {}\n", render_array(items, indent + 2)));
            }
            Value::Object(_) | Value::Array(_) => {
                out.push_str(&format!(
                    "{pad}{key}:\n{}\n",
                    render_value(value, indent + 2)
                ));
            }
            _ => out.push_str(&format!(
                "{pad}{key}: {}\n",
                render_value(value, indent + 2)
            )),
        }
    }
    out.trim_end().to_string()
}
