use std::ops::Range;

/// The kind of a physical record, selected by its first character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Header,
    OpeningBalance,
    Move(char),
    Information(char),
    FreeCommunication,
    ClosingBalance,
    Trailer,
    Unknown(char),
}

/// One fixed-width line with its terminator removed.
///
/// Columns are counted in characters, not bytes, and ranges running past the
/// end of a short line are clipped the way string slicing is in most
/// scripting languages: the result is shorter or empty, never an error.
#[derive(Clone, Copy, Debug)]
pub struct Record<'a> {
    text: &'a str,
}

impl<'a> Record<'a> {
    pub fn new(line: &'a str) -> Self {
        Record {
            text: line.trim_end_matches(|c: char| c == '\n' || c == '\r'),
        }
    }

    pub fn kind(&self) -> Option<RecordKind> {
        let mut chars = self.text.chars();
        let kind = match chars.next()? {
            '0' => RecordKind::Header,
            '1' => RecordKind::OpeningBalance,
            '2' => RecordKind::Move(chars.next().unwrap_or(' ')),
            '3' => RecordKind::Information(chars.next().unwrap_or(' ')),
            '4' => RecordKind::FreeCommunication,
            '8' => RecordKind::ClosingBalance,
            '9' => RecordKind::Trailer,
            other => RecordKind::Unknown(other),
        };
        Some(kind)
    }

    pub fn slice(&self, range: Range<usize>) -> &'a str {
        columns(self.text, range)
    }
}

/// Half-open character range of `text`, clipped to its length.
pub fn columns(text: &str, range: Range<usize>) -> &str {
    let start = offset(text, range.start);
    let end = offset(text, range.end.max(range.start));
    &text[start..end]
}

/// Everything from character `start` onwards.
pub fn columns_from(text: &str, start: usize) -> &str {
    &text[offset(text, start)..]
}

fn offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map(|(i, _)| i)
        .unwrap_or_else(|| text.len())
}
