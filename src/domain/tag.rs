use std::fmt;

/// A single tag from the trailing `:TAG:` block of a bullet line.
///
/// Only `AUTO` and `MANUAL` carry meaning; any other tag is preserved
/// verbatim and otherwise ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The element is executed automatically.
    Auto,
    /// The element requires a human to execute it.
    Manual,
    /// Any other tag.
    Other(String),
}

impl Tag {
    /// Returns the tag as it is written in an outline.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Auto => "AUTO",
            Self::Manual => "MANUAL",
            Self::Other(other) => other.as_str(),
        }
    }

    /// Returns the tag for an automation flag: `MANUAL` if `manual`, else
    /// `AUTO`.
    #[must_use]
    pub const fn for_manual(manual: bool) -> Self {
        if manual { Self::Manual } else { Self::Auto }
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        match s {
            "AUTO" => Self::Auto,
            "MANUAL" => Self::Manual,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The ordered tags of a bullet line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<Tag>);

impl Tags {
    /// Parses a colon-delimited tag block such as `:AUTO:SLOW:`.
    ///
    /// The block is split on `:` and the tokens before the first and after
    /// the last colon are dropped.
    #[must_use]
    pub fn from_block(block: &str) -> Self {
        let tokens: Vec<&str> = block.split(':').collect();
        let inner = match tokens.len() {
            0..=2 => &[][..],
            n => &tokens[1..n - 1],
        };
        Self(inner.iter().map(|&token| Tag::from(token)).collect())
    }

    /// Returns `true` if the tag is present.
    #[must_use]
    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    /// Returns `true` if the `AUTO` tag is present.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        self.contains(&Tag::Auto)
    }

    /// Returns `true` if the `MANUAL` tag is present.
    #[must_use]
    pub fn is_manual(&self) -> bool {
        self.contains(&Tag::Manual)
    }

    /// Returns `true` if there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tags in the order they were written.
    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }
}

impl fmt::Display for Tags {
    /// Writes the tags as a block (`:A:B:`), or nothing if there are none.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str(":")?;
        for tag in &self.0 {
            write!(f, "{tag}:")?;
        }
        Ok(())
    }
}
