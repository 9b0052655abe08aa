use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use tracing::warn;

/// Line-oriented interactive source that menus and choice entry read from.
pub trait Prompter {
    /// Shows `prompt` and reads one line. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;

    fn say(&mut self, message: &str) -> io::Result<()>;

    fn confirm(&mut self, prompt: &str, default: Option<bool>) -> io::Result<bool> {
        loop {
            let question = match default {
                Some(true) => format!("{} (Y/n): ", prompt),
                Some(false) | None => format!("{} (y/N): ", prompt),
            };

            let Some(input) = self.ask(&question)? else {
                return Ok(default.unwrap_or(false));
            };

            match input.trim().to_uppercase().as_str() {
                "Y" | "YES" => return Ok(true),
                "N" | "NO" => return Ok(false),
                "" => match default {
                    Some(default) => return Ok(default),
                    None => continue,
                },
                _ => continue,
            }
        }
    }
}

/// Reads from any `BufRead`, writes prompts to any `Write`.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    /// A line that is not valid UTF-8 is consumed and asked again.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            write!(self.output, "{}", prompt)?;
            self.output.flush()?;

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(line.trim_end_matches(['\r', '\n']).to_string())),
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    warn!("Discarding unreadable input line: {}", err);
                    writeln!(self.output, "That line could not be read, try again.")?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }
}

/// Replays a fixed list of answers and keeps everything that was shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        self.transcript.push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_console_prompter_reads_lines() {
        let mut output = Vec::new();
        {
            let mut prompter = ConsolePrompter::new(Cursor::new("first\r\nsecond\n"), &mut output);
            assert_eq!(prompter.ask("> ").unwrap().as_deref(), Some("first"));
            assert_eq!(prompter.ask("> ").unwrap().as_deref(), Some("second"));
            assert_eq!(prompter.ask("> ").unwrap(), None);
            prompter.say("bye").unwrap();
        }
        assert_eq!(String::from_utf8(output).unwrap(), "> > > bye\n");
    }

    #[test]
    fn test_console_prompter_skips_invalid_utf8() {
        let mut output = Vec::new();
        {
            let input = Cursor::new(b"\xff\xfe\nok\n".to_vec());
            let mut prompter = ConsolePrompter::new(input, &mut output);
            assert_eq!(prompter.ask("> ").unwrap().as_deref(), Some("ok"));
            assert_eq!(prompter.ask("> ").unwrap(), None);
        }
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("could not be read"));
    }

    #[test]
    fn test_confirm_uses_default_on_blank() {
        let mut prompter = ScriptedPrompter::new(["", "maybe", "y"]);
        assert!(!prompter.confirm("Sure?", Some(false)).unwrap());
        assert!(prompter.confirm("Sure?", None).unwrap());
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_confirm_at_end_of_input() {
        let mut prompter = ScriptedPrompter::new(Vec::<String>::new());
        assert!(!prompter.confirm("Sure?", None).unwrap());
        assert!(prompter.saw("(y/N)"));
    }
}
