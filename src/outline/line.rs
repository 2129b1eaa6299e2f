//! Classification of single outline lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::Tags;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#(.*)$").expect("this must never fail"));

static BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*+)\s*(.*?)(\s+(:[:\S]+:))?$").expect("this must never fail")
});

/// A classified outline line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Line<'a> {
    /// `# text`. Holds the text after the marker and its separating space.
    Comment(&'a str),
    /// A bullet opening a suite, set, case or step.
    Bullet(Bullet<'a>),
    /// Any line that does not start with `*`, trimmed.
    Text(&'a str),
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Bullet<'a> {
    pub depth: usize,
    pub label: &'a str,
    pub tags: Tags,
}

impl<'a> Line<'a> {
    /// Classifies a line, trying comment, text and bullet in that order.
    ///
    /// Returns `None` if the line is none of these.
    pub(crate) fn classify(line: &'a str) -> Option<Self> {
        if let Some(captures) = COMMENT.captures(line) {
            let text = captures.get(1).map_or("", |m| m.as_str());
            return Some(Self::Comment(text.strip_prefix(' ').unwrap_or(text)));
        }

        if !line.starts_with('*') {
            return Some(Self::Text(line.trim()));
        }

        let captures = BULLET.captures(line)?;
        let depth = captures.get(1)?.as_str().len();
        let label = captures.get(2).map_or("", |m| m.as_str().trim());
        let tags = captures
            .get(4)
            .map(|m| Tags::from_block(m.as_str()))
            .unwrap_or_default();

        Some(Self::Bullet(Bullet { depth, label, tags }))
    }
}
