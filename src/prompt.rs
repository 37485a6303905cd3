//! Line prompts for the interactive intake.

use anyhow::{Context, bail};
use chrono::NaiveDate;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

pub struct Prompter {
    editor: DefaultEditor,
}

impl Prompter {
    pub fn new() -> anyhow::Result<Self> {
        let editor = DefaultEditor::new().context("failed to open terminal for input")?;
        Ok(Self { editor })
    }

    /// Reads one trimmed line with `initial` pre-typed for editing.
    ///
    /// Ctrl-C or end of input cancels the whole command.
    pub fn ask(&mut self, label: &str, initial: &str) -> anyhow::Result<String> {
        match self
            .editor
            .readline_with_initial(&format!("{label}: "), (initial, ""))
        {
            Ok(line) => Ok(line.trim().to_string()),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => bail!("input cancelled"),
            Err(e) => Err(e).context("failed to read input"),
        }
    }

    /// Reads an optional `YYYY-MM-DD` date, asking again until it parses or is left blank.
    pub fn ask_date(
        &mut self,
        label: &str,
        initial: Option<NaiveDate>,
    ) -> anyhow::Result<Option<NaiveDate>> {
        let initial = initial.map(|d| d.to_string()).unwrap_or_default();
        loop {
            let answer = self.ask(&format!("{label} (YYYY-MM-DD)"), &initial)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match NaiveDate::parse_from_str(&answer, "%Y-%m-%d") {
                Ok(date) => return Ok(Some(date)),
                Err(_) => println!("  Enter a date as YYYY-MM-DD"),
            }
        }
    }

    /// Lists `options` as `code = name` and reads a code.
    pub fn choose(
        &mut self,
        label: &str,
        options: &[(String, String)],
        initial: &str,
    ) -> anyhow::Result<String> {
        if !options.is_empty() {
            let listed: Vec<String> = options
                .iter()
                .map(|(code, name)| format!("{code} = {name}"))
                .collect();
            println!("  {}", listed.join(", "));
        }
        self.ask(label, initial)
    }
}
