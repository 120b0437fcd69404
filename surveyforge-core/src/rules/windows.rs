// Window building: pass 2 of structural parsing.
//
// Consecutive boundaries are zipped into per-question windows. Nothing here
// mutates the boundary list; every window only borrows from the line slice.

use crate::types::{Boundary, BoundaryKind, QuestionNumber, RawLine};

/// The lines between a question boundary and the next boundary of any kind
#[derive(Debug, Clone)]
pub struct Window<'a> {
    /// Position of the question line
    pub position: usize,
    pub number: Option<&'a QuestionNumber>,
    pub question_text: &'a str,
    pub lines: &'a [RawLine],
    /// Lines between the previous boundary and the question line
    pub preceding: &'a [RawLine],
    /// Position of `preceding[0]`: one past the previous boundary, or 0
    pub context_start: usize,
    /// One past the last window line
    pub end: usize,
    /// The window is cut by another question rather than a heading or the end
    pub followed_by_question: bool,
}

impl<'a> Window<'a> {
    pub fn texts(&self) -> Vec<&'a str> {
        self.lines.iter().map(|line| line.text.as_str()).collect()
    }
}

/// One window per `QuestionStart`, in document order, at most `max_lines` long
pub fn build_windows<'a>(
    lines: &'a [RawLine],
    boundaries: &'a [Boundary],
    max_lines: usize,
) -> Vec<Window<'a>> {
    boundaries
        .iter()
        .enumerate()
        .filter_map(|(k, boundary)| {
            let BoundaryKind::QuestionStart { number, raw_text } = &boundary.kind else {
                return None;
            };
            let start = (boundary.position + 1).min(lines.len());
            let following = boundaries.get(k + 1);
            let next = following.map_or(lines.len(), |b| b.position).min(lines.len());
            let end = next.min(start + max_lines).max(start);

            let context_start = k
                .checked_sub(1)
                .map_or(0, |p| boundaries[p].position + 1)
                .min(boundary.position);

            Some(Window {
                position: boundary.position,
                number: number.as_ref(),
                question_text: raw_text.as_str(),
                lines: &lines[start..end],
                preceding: &lines[context_start..boundary.position.min(lines.len())],
                context_start,
                end,
                followed_by_question: following.is_some_and(Boundary::is_question),
            })
        })
        .collect()
}
