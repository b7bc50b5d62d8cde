use std::io::{BufRead, Write};

use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::{debug, info};

use crate::{diagnostics::Result, parser, value::Number};

pub const DEFAULT_PROMPT: &str = "calc> ";

/// Settings for an interactive session.
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub prompt: String,
    pub history: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history: true,
        }
    }
}

/// What happened to a single line handed to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Skipped,
    Value(Number),
    Failed(String),
}

/// Counts gathered while feeding a stream of lines through the evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub evaluated: usize,
    pub failed: usize,
}

/// Evaluates one line the way every host mode does: empty lines are skipped,
/// everything else goes through the evaluator, and failures come back as a
/// rendered diagnostic.
pub fn process_line(line: &str) -> LineOutcome {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if line.is_empty() {
        return LineOutcome::Skipped;
    }
    debug!(line, "evaluating line");
    match parser::evaluate(line) {
        Ok(value) => LineOutcome::Value(value),
        Err(err) => LineOutcome::Failed(err.diagnostic().render(line)),
    }
}

/// Feeds every line of `input` through [`process_line`], writing results to
/// `out` and diagnostics to `err`.
pub fn run_lines<R, O, E>(input: R, out: &mut O, err: &mut E) -> Result<RunSummary>
where
    R: BufRead,
    O: Write,
    E: Write,
{
    let mut summary = RunSummary::default();
    for line in input.lines() {
        let line = line?;
        match process_line(&line) {
            LineOutcome::Skipped => {}
            LineOutcome::Value(value) => {
                summary.evaluated += 1;
                writeln!(out, "{value}")?;
            }
            LineOutcome::Failed(report) => {
                summary.evaluated += 1;
                summary.failed += 1;
                writeln!(err, "{report}")?;
            }
        }
    }
    info!(
        evaluated = summary.evaluated,
        failed = summary.failed,
        "finished line stream"
    );
    Ok(summary)
}

pub struct Repl {
    config: ReplConfig,
}

impl Repl {
    pub fn new() -> Self {
        Self::with_config(ReplConfig::default())
    }

    pub fn with_config(config: ReplConfig) -> Self {
        Self { config }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        info!(prompt = %self.config.prompt, "starting session");
        loop {
            match editor.readline(&self.config.prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == ":quit" || trimmed == ":exit" {
                        break;
                    }
                    if self.config.history && !trimmed.is_empty() {
                        editor.add_history_entry(trimmed).ok();
                    }
                    match process_line(&line) {
                        LineOutcome::Skipped => {}
                        LineOutcome::Value(value) => println!("{value}"),
                        LineOutcome::Failed(report) => eprintln!("{report}"),
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        info!("session ended");
        Ok(())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lines_are_skipped() {
        assert_eq!(process_line(""), LineOutcome::Skipped);
        assert_eq!(process_line("\r"), LineOutcome::Skipped);
    }

    #[test]
    fn blank_lines_reach_the_evaluator() {
        assert!(matches!(process_line("   "), LineOutcome::Failed(_)));
    }

    #[test]
    fn run_lines_continues_past_errors() {
        let input = "1 + 2\n\n5 / 0\r\n6 * 7\n";
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = run_lines(input.as_bytes(), &mut out, &mut err).expect("io succeeds");
        assert_eq!(
            summary,
            RunSummary {
                evaluated: 3,
                failed: 1
            }
        );
        assert_eq!(String::from_utf8(out).unwrap(), "3\n42\n");
        let err = String::from_utf8(err).unwrap();
        assert!(err.starts_with("Runtime: division by zero"), "{err}");
        assert!(err.contains("  | 5 / 0\n  |     ^"), "{err}");
    }
}
