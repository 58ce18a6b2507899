//! Line tokenizer shared by the definition formats.

/// One non-trivially split input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source file.
    pub number: usize,

    /// The line with surrounding whitespace removed.
    pub text: &'a str,

    /// Fields in source order, verbatim.
    pub fields: Vec<&'a str>,
}

impl<'a> Line<'a> {
    /// The line-kind tag (first field).
    pub fn kind(&self) -> &'a str {
        self.fields.first().copied().unwrap_or("")
    }

    /// Whether the line carries no text at all.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Split a single line on `delimiter`.
pub fn tokenize(number: usize, raw: &str, delimiter: char) -> Line<'_> {
    let text = raw.trim();
    Line {
        number,
        text,
        fields: text.split(delimiter).collect(),
    }
}

/// Split every line of `content`, numbering from 1.
pub fn tokenize_lines(content: &str, delimiter: char) -> impl Iterator<Item = Line<'_>> {
    content
        .lines()
        .enumerate()
        .map(move |(i, raw)| tokenize(i + 1, raw, delimiter))
}
