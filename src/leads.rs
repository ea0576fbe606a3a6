/// Terminal collection of lead lines.
///
/// A lead is one free-text line, typically "Name, Company". Collection stops
/// on the sentinel token or on a blank line once at least one lead has been
/// entered; an empty batch is reported as `None` so callers can exit cleanly.
use anyhow::{Context, Result};
use rustyline::error::ReadlineError;

use crate::theme::{CYAN, DIM, RESET};

pub const LEAD_SENTINEL: &str = "done";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadBatch {
    lines: Vec<String>,
}

impl LeadBatch {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Renders the batch as the `- <lead>` block embedded in the enrichment
    /// request, preserving entry order and exact text.
    pub fn bullet_block(&self) -> String {
        self.lines
            .iter()
            .map(|lead| format!("- {lead}"))
            .collect::<Vec<String>>()
            .join("\n")
    }
}

/// Outcome of feeding one raw input line to the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadInput {
    Continue,
    Submit,
}

#[derive(Debug, Default)]
pub struct LeadCollector {
    lines: Vec<String>,
}

impl LeadCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, raw: &str) -> LeadInput {
        let line = raw.trim();
        if line.eq_ignore_ascii_case(LEAD_SENTINEL) {
            return LeadInput::Submit;
        }
        if line.is_empty() {
            // A blank line only submits once something has been entered.
            return if self.lines.is_empty() {
                LeadInput::Continue
            } else {
                LeadInput::Submit
            };
        }
        self.lines.push(line.to_string());
        LeadInput::Continue
    }

    pub fn finish(self) -> Option<LeadBatch> {
        if self.lines.is_empty() {
            None
        } else {
            Some(LeadBatch { lines: self.lines })
        }
    }
}

pub fn collect_leads<I>(lines: I) -> Option<LeadBatch>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut collector = LeadCollector::new();
    for line in lines {
        if collector.push(line.as_ref()) == LeadInput::Submit {
            break;
        }
    }
    collector.finish()
}

/// Reads lead lines from a file with the same sentinel/blank-line rules as
/// the terminal; EOF with collected lines submits them.
pub fn read_leads_from_file(path: &str) -> Result<Option<LeadBatch>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read leads file '{path}'"))?;
    Ok(collect_leads(content.lines()))
}

pub fn print_lead_entry_help() {
    println!();
    println!("Please provide a list of leads to enrich.");
    println!("Format: Name, Company (one per line)");
    println!("Example: {CYAN}John Doe, Acme Corp{RESET}");
    println!("{DIM}Enter '{LEAD_SENTINEL}' when finished, or submit a blank line after at least one lead.{RESET}");
    println!();
}

/// Interactive lead entry. Ctrl-C aborts with no leads; Ctrl-D submits
/// whatever was collected, matching the leads-file EOF behavior.
pub fn prompt_for_leads() -> Result<Option<LeadBatch>> {
    let mut editor = rustyline::DefaultEditor::new().context("failed to initialize line editor")?;
    let mut collector = LeadCollector::new();
    let prompt = format!("{CYAN}lead>{RESET} ");

    loop {
        match editor.readline(&prompt) {
            Ok(line) => {
                if collector.push(&line) == LeadInput::Submit {
                    break;
                }
            }
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => return Ok(None),
            Err(err) => return Err(err).context("failed to read input line"),
        }
    }

    Ok(collector.finish())
}
