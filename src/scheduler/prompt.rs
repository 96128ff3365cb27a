//! How a review session talks to the learner.
use std::io::{self, BufRead, Write};

pub trait ReviewPrompt {
    /// Shows a question and blocks until the learner answers.
    fn present_question(&mut self, question: &str) -> io::Result<String>;

    fn report_outcome(&mut self, message: &str);
}

/// Line-based prompt over any reader/writer pair, usually stdin/stdout.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ReviewPrompt for TerminalPrompt<R, W> {
    fn present_question(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "\nQ: {question}\nYour answer: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before the session ended",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn report_outcome(&mut self, message: &str) {
        // Display only; a broken terminal must not abort the session.
        let _ = writeln!(self.output, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_one_line_per_question() {
        let input = "  hello \nthank you\n".as_bytes();
        let mut prompt = TerminalPrompt::new(input, Vec::new());

        assert_eq!(prompt.present_question("cześć").unwrap(), "hello");
        assert_eq!(prompt.present_question("dziękuję").unwrap(), "thank you");

        let shown = String::from_utf8(prompt.output).unwrap();
        assert!(shown.contains("Q: cześć"));
        assert!(shown.contains("Q: dziękuję"));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut prompt = TerminalPrompt::new("".as_bytes(), Vec::new());
        let err = prompt.present_question("cześć").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_outcome_written_on_own_line() {
        let mut prompt = TerminalPrompt::new("".as_bytes(), Vec::new());
        prompt.report_outcome("Correct!");
        assert_eq!(String::from_utf8(prompt.output).unwrap(), "Correct!\n");
    }
}
