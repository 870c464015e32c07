//! Line-oriented progress output shared by every worker of a run.
use std::io::{self, Write};

use colored::Colorize;
use parking_lot::Mutex;

use crate::{assert::AssertionFailure, diff, suite::Summary};

/// Rendering options for progress output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Colorize pass/fail lines and the summary.
    pub color: bool,
    /// Print a diff under failures that carry expected and actual values.
    pub diff: bool,
}

/// Serializes writes from concurrent workers so that lines never interleave.
pub struct Reporter<W: Write> {
    out: Mutex<W>,
    opts: ReportOptions,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, opts: ReportOptions) -> Self {
        Self {
            out: Mutex::new(out),
            opts,
        }
    }

    /// Write a block of text as a single unit, followed by a newline.
    fn write_block(&self, block: &str) -> io::Result<()> {
        let mut out = self.out.lock();
        writeln!(out, "{}", block)?;
        out.flush()
    }

    pub fn begin(&self, total: usize, label: &str) -> io::Result<()> {
        self.write_block(&format!("Beginning {} tests {}", total, label))
    }

    pub fn executing(&self, name: &str) -> io::Result<()> {
        self.write_block(&format!("Executing {}", name))
    }

    pub fn passed(&self, name: &str) -> io::Result<()> {
        let line = format!("{} passed", name);
        if self.opts.color {
            self.write_block(&line.green().to_string())
        } else {
            self.write_block(&line)
        }
    }

    pub fn failed(
        &self,
        name: &str,
        failure: &AssertionFailure,
    ) -> io::Result<()> {
        let line = format!("{} failed: {}", name, failure);
        let mut buf = if self.opts.color {
            line.red().to_string()
        } else {
            line
        };
        if let (true, Some(mismatch)) = (self.opts.diff, failure.mismatch()) {
            let diff = diff::gen_diff(
                &mismatch.expected,
                &mismatch.actual,
                self.opts.color,
            );
            for diff_line in diff.lines() {
                buf.push_str("\n    ");
                buf.push_str(diff_line);
            }
        }
        self.write_block(&buf)
    }

    pub fn summary(&self, summary: &Summary) -> io::Result<()> {
        let counts = format!(
            "Tests passed: {}/{}",
            summary.passing(),
            summary.total
        );
        let verdict = if summary.passed() {
            "A WINNER IS YOU"
        } else {
            "WOW! YOU LOSE"
        };
        if self.opts.color {
            let verdict = if summary.passed() {
                verdict.green().bold()
            } else {
                verdict.red().bold()
            };
            self.write_block(&format!("{}\n{}", counts.bold(), verdict))
        } else {
            self.write_block(&format!("{}\n{}", counts, verdict))
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}
