// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Line-oriented operator prompts.

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

/// Reads operator answers one line at a time.
pub struct Prompt<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> Prompt<R> {
    /// Creates a prompt reading from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Prints `question` and waits for one answer.
    ///
    /// Returns `None` once input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout or the input cannot be used.
    pub async fn ask(&mut self, question: &str) -> std::io::Result<Option<String>> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{question} ")?;
        stdout.flush()?;
        drop(stdout);

        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    /// Asks a yes/no question. Anything but `y` or `yes` is a no.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout or the input cannot be used.
    pub async fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
        let answer: Option<String> = self.ask(&format!("{question} [y/N]")).await?;
        Ok(answer.is_some_and(|a| matches!(a.to_ascii_lowercase().as_str(), "y" | "yes")))
    }
}

/// Returns a prompt reading from standard input.
pub fn stdin_prompt() -> Prompt<BufReader<Stdin>> {
    Prompt::new(BufReader::new(tokio::io::stdin()))
}
