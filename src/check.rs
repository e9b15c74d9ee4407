//! Headless mode: parse and merge deck files, then report what was found.

use std::io::{self, Write};
use std::path::PathBuf;

use rust_i18n::t;

use crate::deck::ParseOutcome;
use crate::source::SourceError;
use crate::source::fetch::DisabledFetcher;
use crate::source::loader;
use crate::source::local;

pub struct CheckReport {
    pub files: usize,
    pub parsed: ParseOutcome,
    pub failures: Vec<(String, SourceError)>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.parsed.errors.is_empty() && self.failures.is_empty()
    }

    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        writeln!(
            out,
            "{}",
            t!("check.summary", cards = self.parsed.cards.len(), files = self.files)
        )?;
        for (name, e) in &self.failures {
            writeln!(out, "{name}: {e}")?;
        }
        if !self.parsed.errors.is_empty() {
            writeln!(
                out,
                "{}",
                t!("check.line_errors", count = self.parsed.errors.len())
            )?;
            for e in &self.parsed.errors {
                writeln!(out, "  {e}")?;
            }
        }
        Ok(())
    }
}

pub fn check_files(paths: &[PathBuf]) -> CheckReport {
    let sources = local::sources_from_paths(paths);
    let deck = loader::fetch_all(&DisabledFetcher, &sources);
    log::info!(
        "checked {} file(s): {} cards, {} malformed lines",
        paths.len(),
        deck.parsed.cards.len(),
        deck.parsed.errors.len()
    );
    CheckReport {
        files: deck.loaded,
        parsed: deck.parsed,
        failures: deck.failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_merged_cards_and_line_errors() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "cat - kot\nonlytext\n").unwrap();
        std::fs::write(&b, "# comment\nCat - Kot\ndog - pies\n").unwrap();

        let report = check_files(&[a, b, dir.path().join("missing.txt")]);
        assert!(!report.is_clean());
        assert_eq!(report.files, 2);
        assert_eq!(report.parsed.cards.len(), 2);
        assert_eq!(report.failures.len(), 1);

        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("a.txt:2: onlytext"), "{text}");
        assert!(text.contains("missing.txt"), "{text}");
    }

    #[test]
    fn clean_files_pass() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        std::fs::write(&a, "cat - kot\n").unwrap();
        assert!(check_files(&[a]).is_clean());
    }
}
