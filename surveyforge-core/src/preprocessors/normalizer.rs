// Line normalization
//
// Extracted survey text carries pagination and line-number counters from the
// source rendering: 2-4 digit numbers glued onto the next word ("dhënave91Kjo")
// or floating between words ("pyetje 12 tjetër"). Both are removed here, then
// whitespace is collapsed. The stage is total over any string input.

use crate::types::RawLine;
use regex::Regex;
use std::sync::LazyLock;

static GLUED_COUNTER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\p{L})\s*\d{2,4}(\p{Lu})").unwrap());

const INVISIBLE_CHARS: [char; 4] = ['\u{feff}', '\u{200b}', '\u{200c}', '\u{200d}'];

/// Normalize every line, dropping lines that end up empty. Surviving lines
/// keep their original ordinal.
pub fn normalize_lines(raw_lines: &[String]) -> Vec<RawLine> {
    raw_lines
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let text = normalize_line(raw);
            (!text.is_empty()).then_some(RawLine { index, text })
        })
        .collect()
}

/// Clean a single line until no rule applies any more.
///
/// Every productive pass shortens the string, so the loop terminates, and the
/// result is a fixed point: normalizing it again returns it unchanged.
pub fn normalize_line(raw: &str) -> String {
    let mut current = raw.replace(INVISIBLE_CHARS, "");
    loop {
        let next = clean_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_once(line: &str) -> String {
    let unglued = GLUED_COUNTER_REGEX.replace_all(line, "$1 $2");

    let tokens: Vec<&str> = unglued.split_whitespace().collect();
    let last = tokens.len().saturating_sub(1);
    tokens
        .iter()
        .enumerate()
        .filter(|(i, token)| *i == 0 || *i == last || !is_counter_token(token))
        .map(|(_, token)| *token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A bare 2-4 digit number: the shape of a page or line counter
pub fn is_counter_token(token: &str) -> bool {
    (2..=4).contains(&token.len()) && token.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glued_counter_becomes_a_space() {
        assert_eq!(
            normalize_line("Mbledhja e të dhënave91Kjo pjesë"),
            "Mbledhja e të dhënave Kjo pjesë"
        );
        assert_eq!(normalize_line("question 12Next"), "question Next");
    }

    #[test]
    fn floating_counter_is_removed_but_edges_are_kept() {
        assert_eq!(normalize_line("Sa vjeç 214 jeni?"), "Sa vjeç jeni?");
        assert_eq!(
            normalize_line("3. Mbledhja e të dhënave 91"),
            "3. Mbledhja e të dhënave 91"
        );
        assert_eq!(normalize_line("( ) 5 years"), "( ) 5 years");
    }

    #[test]
    fn whitespace_is_collapsed_and_trimmed() {
        assert_eq!(normalize_line("  (  )   Po \t "), "( ) Po");
        assert_eq!(normalize_line("\u{feff}1.1 Emri"), "1.1 Emri");
    }

    #[test]
    fn empty_lines_are_dropped_without_reusing_ordinals() {
        let raw = vec![
            "1.1 Question".to_string(),
            "   ".to_string(),
            "( ) Po".to_string(),
        ];
        let lines = normalize_lines(&raw);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[1].index, 2);
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "a12B34C end",
            "ab 12 34Cd",
            "  Pyetja 1.2 12 ka 345 numra 9  ",
            "3. Mbledhja e të dhënave 91",
            "x 10 20 30 y",
            "",
            "12",
        ];
        for sample in samples {
            let once = normalize_line(sample);
            assert_eq!(normalize_line(&once), once, "not idempotent for {sample:?}");
        }
    }
}
