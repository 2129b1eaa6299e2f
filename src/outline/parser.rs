//! Outline to tree conversion.
//!
//! The parser reads one line at a time and keeps a cursor into the tree it is
//! building: the chain of open bullet nodes (one per depth) and the
//! description that continuation lines are appended to.

use tracing::instrument;

use super::line::{Bullet, Line};
use crate::domain::{Kind, Node, TestDefinition};

/// Errors that abort the conversion of an outline.
///
/// Line numbers are 1-based.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    /// A text line appeared before any bullet.
    #[error("line {line}: text is not allowed before the first bullet")]
    TextBeforeFirstBullet {
        /// The offending line.
        line: usize,
    },

    /// A bullet was more than one level deeper than the previous bullet.
    #[error("line {line}: cannot skip a level (depth {depth} after depth {current})")]
    SkippedLevel {
        /// The offending line.
        line: usize,
        /// The depth of the previous bullet.
        current: usize,
        /// The depth of this bullet.
        depth: usize,
    },

    /// A bullet was deeper than a step.
    #[error("line {line}: bullet depth {depth} is deeper than a step")]
    TooDeep {
        /// The offending line.
        line: usize,
        /// The depth of this bullet.
        depth: usize,
    },

    /// The line is neither a comment, a bullet nor text.
    #[error("line {line}: unexpected line: {content}")]
    UnexpectedLine {
        /// The offending line.
        line: usize,
        /// The line as written.
        content: String,
    },
}

/// Incremental outline parser.
///
/// Feed lines in order with [`Parser::feed`], then call [`Parser::finish`] to
/// obtain the tree.
#[derive(Debug, Default)]
pub struct Parser {
    root: TestDefinition,
    /// Open bullet nodes; the node at depth `n` is at index `n - 1`.
    open: Vec<Node>,
    /// Index of the description that continuation text is appended to,
    /// within the children of the current element.
    description: Option<usize>,
    line: usize,
}

impl Parser {
    /// Creates a parser with an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one line of the outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the line is text before the first bullet, a bullet
    /// that skips a level or is deeper than a step, or an unrecognised line.
    pub fn feed(&mut self, line: &str) -> Result<(), ParseError> {
        self.line += 1;

        match Line::classify(line) {
            Some(Line::Comment(text)) => {
                self.current_children().push(Node::comment(text));
            }
            Some(Line::Text(text)) => self.text(text)?,
            Some(Line::Bullet(bullet)) => self.bullet(bullet)?,
            None => {
                return Err(ParseError::UnexpectedLine {
                    line: self.line,
                    content: line.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Closes all open nodes and returns the finished tree.
    #[must_use]
    pub fn finish(mut self) -> TestDefinition {
        self.close_to(0);
        self.root
    }

    /// The depth of the current element; 0 before the first bullet.
    const fn depth(&self) -> usize {
        self.open.len()
    }

    fn text(&mut self, text: &str) -> Result<(), ParseError> {
        if self.depth() == 0 {
            return Err(ParseError::TextBeforeFirstBullet { line: self.line });
        }

        let pending = self.description;
        let children = self.current_children();

        if let Some(index) = pending {
            if let Some(Node::Description(description)) = children.get_mut(index) {
                if !description.text.is_empty() && !text.is_empty() {
                    description.text.push(' ');
                }
                description.text.push_str(text);
                return Ok(());
            }
        }

        children.push(Node::description(text));
        let index = children.len() - 1;
        self.description = Some(index);

        Ok(())
    }

    fn bullet(&mut self, bullet: Bullet<'_>) -> Result<(), ParseError> {
        let Bullet { depth, label, tags } = bullet;
        let current = self.depth();

        if depth > current + 1 {
            return Err(ParseError::SkippedLevel {
                line: self.line,
                current,
                depth,
            });
        }

        let node = match Kind::from_depth(depth) {
            Some(Kind::Suite) => Node::suite(label),
            Some(Kind::Set) => Node::set(label),
            Some(Kind::Case) => Node::case(label, !tags.is_auto()),
            // Step tags are not mapped to `Step::manual`.
            Some(Kind::Step) => Node::step(label),
            _ => {
                return Err(ParseError::TooDeep {
                    line: self.line,
                    depth,
                });
            }
        };

        tracing::debug!("line {}: {} '{label}'", self.line, node.kind());

        self.close_to(depth - 1);
        self.open.push(node);
        self.description = None;

        Ok(())
    }

    /// Closes open nodes until `depth` remain, attaching each to its parent.
    fn close_to(&mut self, depth: usize) {
        while self.open.len() > depth {
            if let Some(node) = self.open.pop() {
                self.current_children().push(node);
            }
        }
    }

    /// The child list of the current element, or of the root before the first
    /// bullet.
    fn current_children(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut().and_then(Node::children_mut) {
            Some(children) => children,
            None => &mut self.root.children,
        }
    }
}

/// Parses a complete outline into a test definition.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered; no partial tree is returned.
#[instrument(skip_all)]
pub fn parse(input: &str) -> Result<TestDefinition, ParseError> {
    parse_lines(input.lines())
}

/// Parses an outline given as a sequence of lines.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered; no partial tree is returned.
pub fn parse_lines<I, S>(lines: I) -> Result<TestDefinition, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = Parser::new();
    for line in lines {
        parser.feed(line.as_ref())?;
    }
    Ok(parser.finish())
}
