// Text formatting conventions and write-up budget validation.

use crate::scouting::writeup::WriteUp;

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// Word count by whitespace splitting.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Line count, ignoring blank lines (sections are separated by blank lines
/// that do not count toward the line budget).
pub fn count_lines(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

// ---------------------------------------------------------------------------
// Metric pair formatting
// ---------------------------------------------------------------------------

/// Renders (average, strike rate) pairs. The first pair in a write-up gets
/// full unit labels; every later pair renders as bare numbers. One formatter
/// is shared across all sections of a write-up so the flag spans sections.
#[derive(Debug, Default)]
pub struct MetricFormatter {
    labels_used: bool,
}

impl MetricFormatter {
    pub fn new() -> Self {
        MetricFormatter::default()
    }

    /// Format an (avg, sr) pair, consuming the first-occurrence slot if it
    /// is still available.
    pub fn pair(&mut self, avg: f64, sr: f64) -> String {
        if self.labels_used {
            format!("({avg:.0}; {sr:.0})")
        } else {
            self.labels_used = true;
            format!("({avg:.0} avg; {sr:.0} SR)")
        }
    }
}

/// Percentage rendering used by the shot and zone sections.
pub fn fmt_pct(value: f64) -> String {
    format!("({value:.0}%)")
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Post-assembly check of a write-up against its budgets. Budget enforcement
/// happens during assembly, so errors here indicate a bug; the warnings
/// (sparse write-ups) are surfaced to the analyst.
#[derive(Debug, Default)]
pub struct Validation {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Expected section count below which a write-up is flagged as sparse.
const EXPECTED_MIN_SECTIONS: usize = 3;

pub fn validate(writeup: &WriteUp, max_words: usize, max_lines: usize) -> Validation {
    let mut validation = Validation::default();

    if writeup.word_count > max_words {
        validation.errors.push(format!(
            "word count ({}) exceeds limit ({max_words})",
            writeup.word_count
        ));
    }
    if writeup.line_count > max_lines {
        validation.warnings.push(format!(
            "line count ({}) exceeds recommended limit ({max_lines})",
            writeup.line_count
        ));
    }
    if writeup.sections.len() < EXPECTED_MIN_SECTIONS {
        validation.warnings.push(format!(
            "only {} section(s) generated (expected 5)",
            writeup.sections.len()
        ));
    }

    validation
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_count_splits_on_whitespace() {
        assert_eq!(count_words("Strong vs full (61 avg; 175 SR)."), 7);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  spaced   out  "), 2);
    }

    #[test]
    fn line_count_ignores_blank_lines() {
        assert_eq!(count_lines("a\n\nb\n   \nc"), 3);
        assert_eq!(count_lines(""), 0);
    }

    #[test]
    fn first_pair_gets_labels_then_bare_numbers() {
        let mut fmt = MetricFormatter::new();
        assert_eq!(fmt.pair(61.0, 175.0), "(61 avg; 175 SR)");
        assert_eq!(fmt.pair(19.0, 112.0), "(19; 112)");
        assert_eq!(fmt.pair(44.0, 156.0), "(44; 156)");
    }

    #[test]
    fn pair_values_round_to_integers() {
        let mut fmt = MetricFormatter::new();
        assert_eq!(fmt.pair(44.56, 155.5), "(45 avg; 156 SR)");
    }

    #[test]
    fn percentage_rendering() {
        assert_eq!(fmt_pct(38.0), "(38%)");
        assert_eq!(fmt_pct(41.5), "(42%)");
    }
}
