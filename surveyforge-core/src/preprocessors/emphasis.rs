//! Emphasis index
//!
//! Built once per document from the HTML rendering. Every emphasized region
//! (`<em>`, `<i>`, `<strong>`, `<b>`, or an inline italic or bold span) becomes one
//! [`EmphasisSpan`] in document order. Spans carry no line positions of their
//! own; they are aligned to the normalized lines by monotone text containment
//! so that the help-text resolver can look them up by proximity.

use super::normalizer::normalize_line;
use crate::types::{EmphasisSpan, RawLine};
use quick_xml::escape::unescape_with;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// Pre-compiled regexes for HTML scanning
static EMPHASIS_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?is)<em\b[^>]*>(.*?)</em\s*>",
        r#"|<i\b[^>]*>(.*?)</i\s*>"#,
        r#"|<strong\b[^>]*>(.*?)</strong\s*>"#,
        r#"|<b\b[^>]*>(.*?)</b\s*>"#,
        r#"|<span\b[^>]*(?:font-style:\s*italic|font-weight:\s*(?:bold|[6-9]00))[^>]*>(.*?)</span\s*>"#,
    ))
    .unwrap()
});

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Alignment of a span to a line needs at least this much text on the shorter side
const MIN_ALIGNMENT_CHARS: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct EmphasisIndex {
    spans: Vec<EmphasisSpan>,
}

impl EmphasisIndex {
    /// Extract emphasized spans from `html` and align them to `lines`
    pub fn build(html: &str, lines: &[RawLine]) -> Self {
        let texts = extract_emphasis_texts(html);
        let spans = align_to_lines(texts, lines);
        tracing::debug!(
            spans = spans.len(),
            anchored = spans.iter().filter(|s| s.anchor.is_some()).count(),
            "built emphasis index"
        );
        Self { spans }
    }

    pub fn spans(&self) -> &[EmphasisSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The anchored span closest to `position` whose anchor lies in
    /// `lower..upper` and which satisfies `accept`. Ties go to the span
    /// that precedes `position`.
    pub fn nearest<F>(
        &self,
        position: usize,
        lower: usize,
        upper: usize,
        accept: F,
    ) -> Option<&EmphasisSpan>
    where
        F: Fn(&EmphasisSpan) -> bool,
    {
        self.spans
            .iter()
            .filter_map(|span| span.anchor.map(|anchor| (anchor, span)))
            .filter(|(anchor, _)| (lower..upper).contains(anchor))
            .filter(|(_, span)| accept(span))
            .min_by_key(|(anchor, _)| {
                let distance = anchor.abs_diff(position);
                // preceding spans sort before following ones at equal distance
                (distance, *anchor > position)
            })
            .map(|(_, span)| span)
    }
}

/// Emphasized text fragments in document order, tags stripped and entities decoded
pub fn extract_emphasis_texts(html: &str) -> Vec<String> {
    EMPHASIS_REGEX
        .captures_iter(html)
        .filter_map(|cap| cap.iter().skip(1).flatten().next())
        .map(|inner| {
            let without_tags = TAG_REGEX.replace_all(inner.as_str(), " ");
            normalize_line(&decode_entities(&without_tags))
        })
        .filter(|text| !text.is_empty())
        .collect()
}

fn decode_entities(raw: &str) -> Cow<'_, str> {
    match unescape_with(raw, resolve_html_entity) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::trace!(error = %err, "leaving undecodable entity text as-is");
            Cow::Borrowed(raw)
        }
    }
}

/// HTML entities beyond the XML predefined set that show up in survey exports
fn resolve_html_entity(entity: &str) -> Option<&'static str> {
    let resolved = match entity {
        "nbsp" => " ",
        "ndash" => "–",
        "mdash" => "—",
        "hellip" => "…",
        "laquo" => "«",
        "raquo" => "»",
        "ldquo" => "“",
        "rdquo" => "”",
        "lsquo" => "‘",
        "rsquo" => "’",
        "euml" => "ë",
        "Euml" => "Ë",
        "ccedil" => "ç",
        "Ccedil" => "Ç",
        "scaron" => "š",
        "Scaron" => "Š",
        "lt" => "<",
        "gt" => ">",
        "amp" => "&",
        "apos" => "'",
        "quot" => "\"",
        _ => return None,
    };
    Some(resolved)
}

fn align_to_lines(texts: Vec<String>, lines: &[RawLine]) -> Vec<EmphasisSpan> {
    let lowered: Vec<String> = lines.iter().map(|l| l.text.to_lowercase()).collect();
    let mut cursor = 0;

    texts
        .into_iter()
        .enumerate()
        .map(|(order, text)| {
            let needle = text.to_lowercase();
            let anchor = (cursor..lowered.len()).find(|&j| matches_line(&needle, &lowered[j]));
            if let Some(j) = anchor {
                // a span covering its whole line consumes it; partial spans may share a line
                cursor = if lowered[j] == needle { j + 1 } else { j };
            }
            EmphasisSpan {
                order,
                text,
                anchor,
            }
        })
        .collect()
}

fn matches_line(span: &str, line: &str) -> bool {
    if span.chars().count() < MIN_ALIGNMENT_CHARS {
        return line == span;
    }
    line.contains(span)
        || (line.chars().count() >= MIN_ALIGNMENT_CHARS && span.starts_with(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessors::normalizer::normalize_lines;

    fn lines(raw: &[&str]) -> Vec<RawLine> {
        normalize_lines(&raw.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn extracts_em_i_and_italic_spans_in_order() {
        let html = r#"<p><em>Zgjidhni vetëm një</em></p><p><i>Second <b>part</b></i></p><p><span style="font-style: italic">Third</span></p><img src="x"/>"#;
        assert_eq!(
            extract_emphasis_texts(html),
            vec!["Zgjidhni vetëm një", "Second part", "Third"]
        );
    }

    #[test]
    fn bold_markup_counts_as_emphasis() {
        let html = r#"<p><strong>Shkruani emrin e plotë</strong></p><br/><p><b>Vetëm një</b></p><body><span style="font-weight: bold">Kujdes</span><span style="font-weight: 400">plain</span></body>"#;
        assert_eq!(
            extract_emphasis_texts(html),
            vec!["Shkruani emrin e plotë", "Vetëm një", "Kujdes"]
        );
        assert!(EmphasisIndex::build("<p>plain</p>", &[]).is_empty());
    }

    #[test]
    fn decodes_html_entities() {
        let html = "<em>P&euml;rzgjidhni nj&euml;&nbsp;p&euml;rgjigje &amp; vazhdoni</em>";
        assert_eq!(
            extract_emphasis_texts(html),
            vec!["Përzgjidhni një përgjigje & vazhdoni"]
        );
    }

    #[test]
    fn unknown_entities_leave_text_untouched() {
        let html = "<em>Fish &unknown; chips</em>";
        assert_eq!(extract_emphasis_texts(html), vec!["Fish &unknown; chips"]);
    }

    #[test]
    fn spans_align_monotonically() {
        let doc = lines(&[
            "1.1 Gjinia",
            "Zgjidhni vetëm një",
            "( ) M",
            "1.2 Mosha",
            "Zgjidhni vetëm një",
        ]);
        let html = "<em>Zgjidhni vetëm një</em><em>Zgjidhni vetëm një</em><em>Not in text</em>";
        let index = EmphasisIndex::build(html, &doc);
        let anchors: Vec<_> = index.spans().iter().map(|s| s.anchor).collect();
        assert_eq!(anchors[0], Some(1));
        assert_eq!(anchors[1], Some(4));
        assert_eq!(anchors[2], None);
    }

    #[test]
    fn nearest_prefers_preceding_span_on_ties() {
        let doc = lines(&["Before note here", "1.1 Question", "After note here"]);
        let html = "<em>Before note here</em><em>After note here</em>";
        let index = EmphasisIndex::build(html, &doc);
        let span = index.nearest(1, 0, 3, |_| true).unwrap();
        assert_eq!(span.text, "Before note here");

        let bounded = index.nearest(1, 1, 3, |_| true).unwrap();
        assert_eq!(bounded.text, "After note here");
    }
}
