//! Interactive ask-user dialog on the terminal.
//!
//! # User Interface
//!
//! ```text
//! ═══════════════════════════════════════════════════════════════
//!   ❓ Answer Questions
//! ═══════════════════════════════════════════════════════════════
//!
//! [1/2] Deploy  Deploy to production? (y/n)
//! > y
//! [2/2] Notes   Anything else?
//! > 
//! ```
//!
//! | Input | Effect |
//! |-------|--------|
//! | text | Answer the current question |
//! | empty line | Skip the question |
//! | `/cancel`, `/dismiss` | Dismiss the whole dialog |
//! | EOF (Ctrl-D) | Interrupt the dialog |
//!
//! Yes/no questions accept `y`, `yes`, `n`, `no` and re-prompt otherwise.

use async_trait::async_trait;
use bridge_application::{ConfirmationError, ConfirmationPort, ConfirmationResponse};
use bridge_domain::{AnswerSet, Question, QuestionType};
use colored::Colorize;
use std::io::{self, BufRead, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";

/// Terminal implementation of [`ConfirmationPort`].
///
/// Reads stdin on a blocking thread so the runtime keeps driving other
/// tool calls while a person types.
pub struct ConsoleConfirmation;

impl ConsoleConfirmation {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleConfirmation {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfirmationPort for ConsoleConfirmation {
    async fn request_answers(
        &self,
        title: &str,
        questions: &[Question],
    ) -> Result<ConfirmationResponse, ConfirmationError> {
        let title = title.to_string();
        let questions = questions.to_vec();

        tokio::task::spawn_blocking(move || {
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_dialog(&title, &questions, &mut stdin.lock(), &mut stdout.lock())
        })
        .await
        .map_err(|e| ConfirmationError::Io(format!("dialog task failed: {}", e)))?
    }
}

enum Reply {
    Answer(String),
    Skip,
    Dismiss,
}

/// Drive one dialog over arbitrary input and output streams.
pub fn run_dialog<R: BufRead, W: Write>(
    title: &str,
    questions: &[Question],
    input: &mut R,
    output: &mut W,
) -> Result<ConfirmationResponse, ConfirmationError> {
    let io_err = |e: io::Error| ConfirmationError::Io(e.to_string());

    writeln!(output).map_err(io_err)?;
    writeln!(output, "{}", RULE.cyan().bold()).map_err(io_err)?;
    writeln!(output, "{}", format!("  ❓ {}", title).cyan().bold()).map_err(io_err)?;
    writeln!(output, "{}", RULE.cyan().bold()).map_err(io_err)?;
    writeln!(output, "{}", "(empty line skips, /cancel dismisses)".dimmed()).map_err(io_err)?;

    let mut answers = AnswerSet::new();
    for (index, question) in questions.iter().enumerate() {
        loop {
            write!(output, "\n{} ", prompt_line(index, questions.len(), question)).map_err(io_err)?;
            write!(output, "\n{} ", ">".magenta().bold()).map_err(io_err)?;
            output.flush().map_err(io_err)?;

            let mut line = String::new();
            if input.read_line(&mut line).map_err(io_err)? == 0 {
                writeln!(output).map_err(io_err)?;
                return Err(ConfirmationError::Interrupted);
            }

            match parse_reply(question.kind(), line.trim()) {
                Ok(Reply::Answer(answer)) => {
                    answers.insert(index, answer);
                    break;
                }
                Ok(Reply::Skip) => break,
                Ok(Reply::Dismiss) => {
                    writeln!(output, "{}", "Dialog dismissed.".yellow()).map_err(io_err)?;
                    return Ok(ConfirmationResponse::dismissed());
                }
                Err(hint) => writeln!(output, "{}", hint.red()).map_err(io_err)?,
            }
        }
    }

    Ok(ConfirmationResponse::submitted(answers))
}

fn prompt_line(index: usize, total: usize, question: &Question) -> String {
    let counter = format!("[{}/{}]", index + 1, total).dimmed();
    let label = question.label(index).cyan().bold();
    let mut line = format!("{} {}  {}", counter, label, question.question);
    match question.kind() {
        QuestionType::YesNo => line.push_str(&format!(" {}", "(y/n)".dimmed())),
        QuestionType::Text => {
            if let Some(placeholder) = &question.placeholder {
                line.push_str(&format!(" {}", format!("e.g. {}", placeholder).dimmed()));
            }
        }
    }
    line
}

fn parse_reply(kind: QuestionType, input: &str) -> Result<Reply, &'static str> {
    match input.to_lowercase().as_str() {
        "" => return Ok(Reply::Skip),
        "/cancel" | "/dismiss" => return Ok(Reply::Dismiss),
        _ => {}
    }

    match kind {
        QuestionType::Text => Ok(Reply::Answer(input.to_string())),
        QuestionType::YesNo => match input.to_lowercase().as_str() {
            "y" | "yes" => Ok(Reply::Answer("yes".to_string())),
            "n" | "no" => Ok(Reply::Answer("no".to_string())),
            _ => Err("Please answer y or n."),
        },
    }
}
