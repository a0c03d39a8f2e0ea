use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

use tracing::debug;

use super::{Token, Tokenizer};
use crate::errors::{RaterError, Result};

const END_OF_SENTENCE: &str = "EOS";

/// MeCab's default line buffer; longer input lines are split mid-text.
const DEFAULT_INPUT_BUFFER: usize = 8192;

/// A [`Tokenizer`] backed by the `mecab` command-line analyzer.
///
/// Text is written to the child's stdin and the default output format is
/// parsed: one `surface<TAB>features` line per token, `EOS` after each
/// input line.
#[derive(Debug, Clone)]
pub struct MecabTokenizer {
    binary: PathBuf,
    dicdir: Option<PathBuf>,
}

impl MecabTokenizer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            dicdir: None,
        }
    }

    /// Reads `MECAB_PATH` (default `mecab`) and the optional `MECAB_DICDIR`.
    pub fn from_env() -> Self {
        let binary = std::env::var("MECAB_PATH").unwrap_or_else(|_| "mecab".to_string());
        let tokenizer = Self::new(binary);
        match std::env::var("MECAB_DICDIR") {
            Ok(dir) if !dir.is_empty() => tokenizer.with_dicdir(dir),
            _ => tokenizer,
        }
    }

    pub fn with_dicdir(mut self, dicdir: impl Into<PathBuf>) -> Self {
        self.dicdir = Some(dicdir.into());
        self
    }

    /// Checks that the analyzer can be started.
    pub fn probe(&self) -> Result<()> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(RaterError::TokenizerUnavailable(format!(
                "{} --version exited with {}",
                self.binary.display(),
                output.status
            )));
        }

        debug!(
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "MeCab available"
        );
        Ok(())
    }

    /// Builds the analyzer invocation with an input buffer large enough to
    /// hold `input_len` bytes on one line.
    fn command(&self, input_len: usize) -> Command {
        let mut cmd = Command::new(&self.binary);
        if let Some(dir) = &self.dicdir {
            cmd.arg("-d").arg(dir);
        }
        let buffer = (input_len + 1).max(DEFAULT_INPUT_BUFFER);
        cmd.arg("-b").arg(buffer.to_string());
        cmd
    }

    fn unavailable(&self, err: std::io::Error) -> RaterError {
        RaterError::TokenizerUnavailable(format!("failed to run {}: {err}", self.binary.display()))
    }
}

impl Tokenizer for MecabTokenizer {
    #[tracing::instrument(skip(self, text), fields(binary = %self.binary.display(), bytes = text.len()))]
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let mut input = text.to_string();
        input.push('\n');

        let mut child = self
            .command(input.len())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.unavailable(e))?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            RaterError::TokenizerUnavailable("mecab stdin was not captured".to_string())
        })?;

        // Write stdin from another thread; a full stdout pipe would otherwise block both sides.
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output().map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            return Err(RaterError::TokenizerUnavailable(format!(
                "mecab exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        match writer.join() {
            Ok(result) => result.map_err(|e| self.unavailable(e))?,
            Err(_) => {
                return Err(RaterError::TokenizerUnavailable(
                    "mecab input writer panicked".to_string(),
                ));
            }
        }

        let tokens = parse_output(&String::from_utf8_lossy(&output.stdout));
        debug!(token_count = tokens.len(), "Text tokenized");
        Ok(tokens)
    }
}

/// Parses MeCab's default output format.
fn parse_output(stdout: &str) -> Vec<Token> {
    stdout
        .lines()
        .filter(|line| !line.is_empty() && *line != END_OF_SENTENCE)
        .filter_map(|line| {
            let (surface, features) = line.split_once('\t')?;
            Some(Token::new(surface, features))
        })
        .collect()
}
