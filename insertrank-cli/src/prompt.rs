/// Terminal comparator: shows two items and waits for the user to pick one.
use std::io::{BufRead, Write};

use insertrank_core::{Comparator, Side};
use tracing::{debug, warn};

use crate::error::AdapterError;

/// What a line of user input means.
#[derive(Debug, PartialEq, Eq)]
pub enum Answer {
    Pick(Side),
    Quit,
    Invalid,
}

/// Build the question shown for one comparison.
pub fn build_prompt(incumbent: &str, candidate: &str, question_number: usize) -> String {
    format!(
        "\nQuestion {question_number}: Pick the greater one\n\
         \x20 [1] {incumbent}\n\
         \x20 [2] {candidate}\n\
         Choose 1 or 2 (or type the item, q to stop): "
    )
}

/// Interpret one line of input. Numbers win over labels, so an item literally
/// named "1" is picked with its number.
pub fn parse_answer(line: &str, incumbent: &str, candidate: &str) -> Answer {
    match line.trim() {
        "1" => Answer::Pick(Side::Incumbent),
        "2" => Answer::Pick(Side::Candidate),
        "q" | "Q" | "quit" | "exit" => Answer::Quit,
        text => match Side::from_label(text, incumbent.trim(), candidate.trim()) {
            Some(side) => Answer::Pick(side),
            None => Answer::Invalid,
        },
    }
}

/// Comparator backed by a line reader and a writer (stdin/stderr in the CLI).
pub struct TerminalComparator<R, W> {
    input: R,
    output: W,
    asked: usize,
}

impl<R: BufRead, W: Write> TerminalComparator<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalComparator {
            input,
            output,
            asked: 0,
        }
    }

    /// Questions answered so far.
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl<R: BufRead, W: Write> Comparator for TerminalComparator<R, W> {
    type Error = AdapterError;

    fn ask(&mut self, incumbent: &str, candidate: &str) -> Result<Side, AdapterError> {
        let prompt = build_prompt(incumbent, candidate, self.asked + 1);
        let mut line = String::new();

        loop {
            self.output.write_all(prompt.as_bytes()).map_err(AdapterError::Prompt)?;
            self.output.flush().map_err(AdapterError::Prompt)?;

            line.clear();
            let read = self.input.read_line(&mut line).map_err(AdapterError::Prompt)?;
            if read == 0 {
                debug!("input closed while waiting for an answer");
                return Err(AdapterError::Aborted);
            }

            match parse_answer(&line, incumbent, candidate) {
                Answer::Pick(side) => {
                    self.asked += 1;
                    debug!(incumbent, candidate, ?side, "answered");
                    return Ok(side);
                }
                Answer::Quit => return Err(AdapterError::Aborted),
                Answer::Invalid => {
                    warn!(input = line.trim(), "unrecognized answer");
                    writeln!(self.output, "Please answer 1 or 2.").map_err(AdapterError::Prompt)?;
                }
            }
        }
    }
}
