//! Splits freeform instructions into steps.

use regex::Regex;
use std::str::Lines;
use std::sync::LazyLock;

/// Leading step marker: "1", "2.", "Step 3", "step 4:".
static STEP_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+\.?|Step\s+\d+:?)\s*").expect("Invalid step marker regex")
});

/// Lazy iterator over the steps of an instruction text.
///
/// Blank lines are skipped before markers are stripped, so a line holding only
/// a marker yields an empty step. Cloning restarts from the current position;
/// call [`steps`] again to start over.
#[derive(Debug, Clone)]
pub struct Steps<'a> {
    lines: Lines<'a>,
}

impl<'a> Iterator for Steps<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.by_ref().find(|l| !l.trim().is_empty())?;
        Some(strip_marker(line))
    }
}

pub fn steps(instructions: &str) -> Steps<'_> {
    Steps {
        lines: instructions.lines(),
    }
}

/// Collect steps into owned strings.
pub fn parse_steps(instructions: &str) -> Vec<String> {
    steps(instructions).map(str::to_string).collect()
}

fn strip_marker(line: &str) -> &str {
    let rest = match STEP_MARKER_RE.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    };
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_markers() {
        assert_eq!(
            parse_steps("1. Preheat\n\nStep 2: Mix\n3 Bake"),
            vec!["Preheat", "Mix", "Bake"]
        );
    }

    #[test]
    fn test_no_markers() {
        assert_eq!(
            parse_steps("Boil water\n  Add pasta  "),
            vec!["Boil water", "Add pasta"]
        );
    }

    #[test]
    fn test_case_insensitive_step() {
        assert_eq!(parse_steps("STEP 1 Chop onions"), vec!["Chop onions"]);
        assert_eq!(parse_steps("step 12: Serve"), vec!["Serve"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_steps("").is_empty());
        assert!(parse_steps("\n  \n\t\n").is_empty());
    }

    #[test]
    fn test_marker_only_line_is_empty_step() {
        assert_eq!(parse_steps("1.\n2. Stir"), vec!["", "Stir"]);
    }

    #[test]
    fn test_only_leading_marker_stripped() {
        assert_eq!(parse_steps("2. Bake 45 minutes"), vec!["Bake 45 minutes"]);
        assert_eq!(parse_steps("Stir in 2 eggs"), vec!["Stir in 2 eggs"]);
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(parse_steps("1. Mix\r\n2. Bake\r\n"), vec!["Mix", "Bake"]);
    }

    #[test]
    fn test_restartable() {
        let text = "1. A\n2. B";
        let iter = steps(text);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(steps(text).count(), 2);
    }
}
