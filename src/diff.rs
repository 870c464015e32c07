use colored::Colorize;
use difference::{Changeset, Difference};
use std::fmt;

/// Track the mode of difference printing.
#[derive(PartialEq, Debug)]
enum Mode {
    Same,
    Add,
    Rem,
}

// ======== line number display ==========
#[derive(PartialEq, Debug)]
struct Lineno(Option<usize>);

impl fmt::Display for Lineno {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0 {
            None => f.pad(""),
            Some(lineno) => f.pad(&lineno.to_string()),
        }
    }
}
// =======================================

#[derive(PartialEq, Debug)]
struct PrintInfo<'a>(Mode, Lineno, Lineno, &'a str);

/// Given a changeset, generate a vector with a diff representation that tracks
/// line numbers.
fn diff_with_lineno(changes: &Changeset) -> Vec<PrintInfo<'_>> {
    // Track line number for the expected and actual renderings.
    let mut line_a = 0;
    let mut line_b = 0;

    changes
        .diffs
        .iter()
        .flat_map(|diff| match diff {
            Difference::Same(x) => x
                .split('\n')
                .map(|line| {
                    line_a += 1;
                    line_b += 1;
                    PrintInfo(
                        Mode::Same,
                        Lineno(Some(line_a)),
                        Lineno(Some(line_b)),
                        line.trim_end(),
                    )
                })
                .collect::<Vec<PrintInfo>>(),
            Difference::Add(x) => x
                .split('\n')
                .map(|line| {
                    line_b += 1;
                    PrintInfo(
                        Mode::Add,
                        Lineno(None),
                        Lineno(Some(line_b)),
                        line.trim_end(),
                    )
                })
                .collect::<Vec<PrintInfo>>(),
            Difference::Rem(x) => x
                .split('\n')
                .map(|line| {
                    line_a += 1;
                    PrintInfo(
                        Mode::Rem,
                        Lineno(Some(line_a)),
                        Lineno(None),
                        line.trim_end(),
                    )
                })
                .collect::<Vec<PrintInfo>>(),
        })
        .collect()
}

/// Render the line-numbered diff between the `expected` and `actual`
/// renderings of a failed comparison. Removed lines are expected values that
/// did not show up, added lines are what the test produced instead.
///
/// Colors are only applied when `color` is set.
pub fn gen_diff(expected: &str, actual: &str, color: bool) -> String {
    let changes = &Changeset::new(expected, actual, "\n");
    let mut buf = String::new();

    for PrintInfo(mode, line_a, line_b, line) in diff_with_lineno(changes) {
        let (marker, text) = match (mode, color) {
            (Mode::Add, true) => ("+".green(), line.green()),
            (Mode::Rem, true) => ("-".red(), line.red()),
            (Mode::Same, true) => (" ".normal(), line.dimmed()),
            (Mode::Add, false) => ("+".normal(), line.normal()),
            (Mode::Rem, false) => ("-".normal(), line.normal()),
            (Mode::Same, false) => (" ".normal(), line.normal()),
        };
        buf.push_str(&format!(
            "{:>3} {:>3}│{}{}\n",
            line_a, line_b, marker, text
        ));
    }

    buf.trim_end().to_string()
}
