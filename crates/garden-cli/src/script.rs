//! Garden scripts.
//!
//! A script is a line-oriented list of commands run against a garden in
//! order. Blank lines and `#` comments are ignored.
//!
//! ```text
//! tool seed corn
//! click 0
//! tool water
//! click 0
//! wait 2000
//! weather
//! show
//! ```

use anyhow::{Context, Result};
use garden_common::PlotId;
use garden_sim::{Command, Garden, Species, Tool};
use std::io::Write;
use thiserror::Error;
use tracing::debug;

/// Script parse errors, tagged with the 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// First word is not a known command.
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand {
        /// Line number
        line: usize,
        /// Offending word
        command: String,
    },
    /// A command is missing its argument.
    #[error("line {line}: `{command}` expects {expected}")]
    MissingArgument {
        /// Line number
        line: usize,
        /// Command name
        command: &'static str,
        /// Description of the argument
        expected: &'static str,
    },
    /// Argument is not a non-negative integer.
    #[error("line {line}: invalid number `{value}`")]
    InvalidNumber {
        /// Line number
        line: usize,
        /// Offending text
        value: String,
    },
    /// Unknown tool name.
    #[error("line {line}: unknown tool `{name}`")]
    UnknownTool {
        /// Line number
        line: usize,
        /// Offending name
        name: String,
    },
    /// Unknown species name.
    #[error("line {line}: unknown species `{name}`")]
    UnknownSpecies {
        /// Line number
        line: usize,
        /// Offending name
        name: String,
    },
    /// Extra words after a complete command.
    #[error("line {line}: unexpected `{value}`")]
    TrailingInput {
        /// Line number
        line: usize,
        /// First extra word
        value: String,
    },
}

/// One script instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Execute a garden command.
    Command(Command),
    /// Advance the model clock.
    Wait(u64),
    /// Print the current snapshot.
    Show,
}

/// A parsed instruction and the line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number
    pub line: usize,
    /// Instruction
    pub step: Step,
}

/// Parse a whole script.
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let step = parse_line(line, text)?;
        lines.push(ScriptLine { line, step });
    }
    Ok(lines)
}

fn parse_line(line: usize, text: &str) -> Result<Step, ScriptError> {
    let mut words = text.split_whitespace();
    let Some(command) = words.next() else {
        return Err(ScriptError::UnknownCommand {
            line,
            command: String::new(),
        });
    };

    let step = match command.to_lowercase().as_str() {
        "tool" => Step::Command(parse_tool(line, &mut words)?),
        "click" => {
            let plot = parse_number(line, words.next(), "click", "a plot id")?;
            Step::Command(Command::ClickPlot(PlotId::new(plot as usize)))
        },
        "wait" => Step::Wait(parse_number(line, words.next(), "wait", "a duration in ms")?),
        "bees" => Step::Command(Command::ToggleManualBees),
        "weather" => Step::Command(Command::AdvanceWeather),
        "dismiss" => Step::Command(Command::DismissNotification),
        "history" => Step::Command(Command::OpenHistory),
        "show" => Step::Show,
        _ => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: command.to_string(),
            })
        },
    };

    if let Some(extra) = words.next() {
        return Err(ScriptError::TrailingInput {
            line,
            value: extra.to_string(),
        });
    }
    Ok(step)
}

fn parse_tool<'a>(
    line: usize,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<Command, ScriptError> {
    let name = words.next().ok_or(ScriptError::MissingArgument {
        line,
        command: "tool",
        expected: "a tool name",
    })?;
    let tool = match name.to_lowercase().as_str() {
        "none" => return Ok(Command::ClearTool),
        "seed" => {
            let species = words.next().ok_or(ScriptError::MissingArgument {
                line,
                command: "tool seed",
                expected: "a species",
            })?;
            let species = Species::from_name(species).ok_or_else(|| ScriptError::UnknownSpecies {
                line,
                name: species.to_string(),
            })?;
            Tool::Seed(species)
        },
        "water" => Tool::WateringCan,
        "organic" => Tool::OrganicFertilizer,
        "chemical" => Tool::ChemicalFertilizer,
        "harvest" => Tool::Harvest,
        "pollinate" => Tool::Pollinate,
        _ => {
            return Err(ScriptError::UnknownTool {
                line,
                name: name.to_string(),
            })
        },
    };
    Ok(Command::SelectTool(tool))
}

fn parse_number(
    line: usize,
    word: Option<&str>,
    command: &'static str,
    expected: &'static str,
) -> Result<u64, ScriptError> {
    let word = word.ok_or(ScriptError::MissingArgument {
        line,
        command,
        expected,
    })?;
    word.parse().map_err(|_| ScriptError::InvalidNumber {
        line,
        value: word.to_string(),
    })
}

/// Run parsed instructions against a garden, writing `show` output to `out`.
pub fn run_script<W: Write>(garden: &mut Garden, script: &[ScriptLine], out: &mut W) -> Result<()> {
    for entry in script {
        debug!(line = entry.line, step = ?entry.step, "script step");
        match entry.step {
            Step::Command(command) => garden
                .execute(command)
                .with_context(|| format!("line {}", entry.line))?,
            Step::Wait(ms) => garden.advance_by(ms),
            Step::Show => {
                let json = serde_json::to_string_pretty(&garden.snapshot())?;
                writeln!(out, "{json}")?;
            },
        }
    }
    Ok(())
}

/// Write the notification history, oldest first.
pub fn write_history<W: Write>(garden: &Garden, out: &mut W) -> Result<()> {
    let mut history: Vec<_> = garden.notifications().history().collect();
    history.reverse();
    for notification in history {
        writeln!(
            out,
            "[{:>7} ms] {}: {}",
            notification.timestamp, notification.title, notification.message
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use garden_sim::{Plant, ScriptedRandom, SimConfig};

    fn garden() -> Garden {
        Garden::with_rng(SimConfig::default(), Box::new(ScriptedRandom::default()))
    }

    #[test]
    fn test_parse_all_commands() {
        let script = "\
# setup
tool seed milho
click 3   # corner-ish
tool water
wait 2000

bees
weather
dismiss
history
tool none
show
";
        let parsed = parse_script(script).expect("parse");
        let steps: Vec<Step> = parsed.iter().map(|l| l.step).collect();
        assert_eq!(
            steps,
            vec![
                Step::Command(Command::SelectTool(Tool::Seed(Species::Corn))),
                Step::Command(Command::ClickPlot(PlotId::new(3))),
                Step::Command(Command::SelectTool(Tool::WateringCan)),
                Step::Wait(2000),
                Step::Command(Command::ToggleManualBees),
                Step::Command(Command::AdvanceWeather),
                Step::Command(Command::DismissNotification),
                Step::Command(Command::OpenHistory),
                Step::Command(Command::ClearTool),
                Step::Show,
            ]
        );
        assert_eq!(parsed[0].line, 2);
        assert_eq!(parsed[3].line, 5);
    }

    #[test]
    fn test_parse_errors_carry_line() {
        assert_eq!(
            parse_script("bees\nplant 3"),
            Err(ScriptError::UnknownCommand {
                line: 2,
                command: "plant".to_string()
            })
        );
        assert_eq!(
            parse_script("\n\nclick"),
            Err(ScriptError::MissingArgument {
                line: 3,
                command: "click",
                expected: "a plot id"
            })
        );
        assert!(matches!(
            parse_script("wait soon"),
            Err(ScriptError::InvalidNumber { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("tool seed cactus"),
            Err(ScriptError::UnknownSpecies { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("tool shovel"),
            Err(ScriptError::UnknownTool { line: 1, .. })
        ));
        assert!(matches!(
            parse_script("bees now"),
            Err(ScriptError::TrailingInput { line: 1, .. })
        ));
    }

    #[test]
    fn test_error_message() {
        let err = parse_script("wait -5").expect_err("negative");
        assert_eq!(err.to_string(), "line 1: invalid number `-5`");
    }

    #[test]
    fn test_run_grows_plant() {
        let script = parse_script("tool seed bean\nclick 5\ntool water\nclick 5\nwait 2000\nshow")
            .expect("parse");
        let mut g = garden();
        let mut out = Vec::new();
        run_script(&mut g, &script, &mut out).expect("run");

        assert!(g.grid().plant(PlotId::new(5)).is_some_and(Plant::is_grown));
        let printed = String::from_utf8(out).expect("utf8");
        assert!(printed.contains("\"now_ms\": 2000"));
    }

    #[test]
    fn test_history_oldest_first() {
        let script = parse_script("tool pollinate\nclick 0\nwait 10\nclick 1").expect("parse");
        let mut g = garden();
        run_script(&mut g, &script, &mut Vec::new()).expect("run");

        let mut out = Vec::new();
        write_history(&g, &mut out).expect("write");
        let printed = String::from_utf8(out).expect("utf8");
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[      0 ms]"));
        assert!(lines[1].starts_with("[     10 ms]"));
    }

    #[test]
    fn test_run_reports_bad_plot() {
        let script = parse_script("tool seed corn\nclick 42").expect("parse");
        let mut g = garden();
        let err = run_script(&mut g, &script, &mut Vec::new()).expect_err("out of bounds");
        assert!(err.to_string().contains("line 2"));
    }
}
