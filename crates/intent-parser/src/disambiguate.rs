//! Operator-driven choice between several matches

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-based prompt/response channel to a human operator.
pub trait OperatorIo {
    /// Show one line of information.
    fn tell(&mut self, line: &str) -> io::Result<()>;

    /// Show a prompt and block for one reply line. `None` on end of input.
    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Operator on a terminal or any reader/writer pair.
pub struct ConsoleOperator<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl ConsoleOperator<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> OperatorIo for ConsoleOperator<R, W> {
    fn tell(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Operator whose replies are fixed up front; records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    replies: VecDeque<String>,
    transcript: Vec<String>,
    asked: usize,
}

impl ScriptedOperator {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: replies.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
            asked: 0,
        }
    }

    /// Lines and prompts shown so far.
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Number of prompts answered or attempted.
    pub fn asked(&self) -> usize {
        self.asked
    }
}

impl OperatorIo for ScriptedOperator {
    fn tell(&mut self, line: &str) -> io::Result<()> {
        self.transcript.push(line.to_string());
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.asked += 1;
        self.transcript.push(prompt.to_string());
        Ok(self.replies.pop_front())
    }
}

/// Picks one name out of several candidates.
#[derive(Debug, Clone)]
pub struct Disambiguator {
    /// What the candidates are, for the prompt ("mission", "position").
    kind: String,
}

impl Default for Disambiguator {
    fn default() -> Self {
        Self::new("mission")
    }
}

impl Disambiguator {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    /// Choose a candidate.
    ///
    /// A single candidate is returned without touching `io`. With several, an
    /// enumerated list is shown and the operator answers with a zero-based index;
    /// anything that is not an index in range yields `None`.
    pub fn select(&self, candidates: &[String], io: &mut dyn OperatorIo) -> Option<String> {
        match candidates {
            [] => None,
            [only] => Some(only.clone()),
            _ => self.prompt(candidates, io),
        }
    }

    fn show(&self, candidates: &[String], io: &mut dyn OperatorIo) -> io::Result<Option<String>> {
        io.tell(&format!("Several {}s match:", self.kind))?;
        for (i, name) in candidates.iter().enumerate() {
            io.tell(&format!("  {}: {}", i, name))?;
        }
        io.ask(&format!("Select {} number: ", self.kind))
    }

    fn prompt(&self, candidates: &[String], io: &mut dyn OperatorIo) -> Option<String> {
        let reply = match self.show(candidates, io) {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                tracing::warn!("operator input closed during {} selection", self.kind);
                return None;
            }
            Err(e) => {
                tracing::warn!("operator I/O failed: {}", e);
                return None;
            }
        };

        match reply.trim().parse::<usize>() {
            Ok(idx) if idx < candidates.len() => Some(candidates[idx].clone()),
            Ok(idx) => {
                tracing::warn!("selection {} out of range (0..{})", idx, candidates.len());
                None
            }
            Err(_) => {
                tracing::warn!("invalid selection '{}'", reply.trim());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_zero_and_one_candidates_no_io() {
        let d = Disambiguator::default();
        let mut io = ScriptedOperator::new(["0"]);
        assert_eq!(d.select(&[], &mut io), None);
        assert_eq!(d.select(&names(&["footprint"]), &mut io), Some("footprint".to_string()));
        assert_eq!(d.select(&names(&["footprint"]), &mut io), Some("footprint".to_string()));
        assert_eq!(io.asked(), 0);
        assert!(io.transcript().is_empty());
    }

    #[test]
    fn test_zero_based_selection() {
        let d = Disambiguator::default();
        let mut io = ScriptedOperator::new(["1"]);
        let choice = d.select(&names(&["clean_a", "clean_b"]), &mut io);
        assert_eq!(choice, Some("clean_b".to_string()));
        assert_eq!(
            io.transcript(),
            &[
                "Several missions match:".to_string(),
                "  0: clean_a".to_string(),
                "  1: clean_b".to_string(),
                "Select mission number: ".to_string(),
            ]
        );
    }

    #[test]
    fn test_bad_replies() {
        let d = Disambiguator::default();
        let candidates = names(&["clean_a", "clean_b"]);
        assert_eq!(d.select(&candidates, &mut ScriptedOperator::new(["9"])), None);
        assert_eq!(d.select(&candidates, &mut ScriptedOperator::new(["two"])), None);
        assert_eq!(d.select(&candidates, &mut ScriptedOperator::new(["-1"])), None);
        assert_eq!(
            d.select(&candidates, &mut ScriptedOperator::new(Vec::<String>::new())),
            None
        );
    }

    #[test]
    fn test_console_operator() {
        let input = io::Cursor::new(b" 0 \nrest\n".to_vec());
        let mut console = ConsoleOperator::new(input, Vec::new());
        let d = Disambiguator::default();
        let choice = d.select(&names(&["patrol", "footprint"]), &mut console);
        assert_eq!(choice, Some("patrol".to_string()));

        assert_eq!(console.ask("> ").unwrap(), Some("rest".to_string()));
        assert_eq!(console.ask("> ").unwrap(), None);

        let (_, out) = console.into_inner();
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("  1: footprint\n"));
        assert!(shown.contains("Select mission number: "));
    }
}
