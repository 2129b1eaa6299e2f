//! Reading and writing test definitions as XML.
//!
//! The document root is a `testdefinition` element containing `suite`, `set`,
//! `case`, `step` and `description` elements:
//!
//! ```xml
//! <testdefinition xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" version="1.0" xsi:noNamespaceSchemaLocation="...">
//!   <suite name="Suite1">
//!     <set name="Set1">
//!       <case name="Case1" manual="true">
//!         <step>Press the button</step>
//!       </case>
//!     </set>
//!   </suite>
//! </testdefinition>
//! ```
//!
//! `manual` attributes are converted to booleans on load and only exist as
//! strings in the document. Whitespace-only text between elements is ignored.

use std::{
    io::{self, Read, Write},
    str::Utf8Error,
};

use quick_xml::{
    Reader, Writer,
    escape::partial_escape,
    events::{BytesEnd, BytesStart, BytesText, Event, attributes::AttrError},
};
use tracing::instrument;

use crate::domain::{Config, Description, Node, Step, TestDefinition, Unknown};

const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const SCHEMA_LOCATION: &str = "xsi:noNamespaceSchemaLocation";
const VERSION: &str = "1.0";

/// Options for writing XML documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlOptions {
    /// Schema location for roots that do not carry their own.
    pub schema_location: String,
    /// Number of spaces per nesting level.
    pub indent: usize,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for XmlOptions {
    fn from(config: &Config) -> Self {
        Self {
            schema_location: config.schema_location.clone(),
            indent: config.indent(),
        }
    }
}

/// Errors that can occur when loading a test definition from XML.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The document could not be read.
    #[error("failed to read XML document")]
    Io(#[from] io::Error),
    /// The document is not well-formed XML.
    #[error("malformed XML document")]
    Xml(#[from] quick_xml::Error),
    /// An element has a malformed attribute.
    #[error("malformed XML attribute")]
    Attribute(#[from] AttrError),
    /// A name, comment or text section is not valid UTF-8.
    #[error("XML document is not valid UTF-8")]
    Utf8(#[from] Utf8Error),
    /// A closing tag has no matching opening tag.
    #[error("unexpected closing tag")]
    UnexpectedEnd,
    /// The document ended inside an element.
    #[error("XML document ended before all elements were closed")]
    Unclosed,
    /// The document contains no element.
    #[error("XML document has no root element")]
    NoRoot,
    /// The document contains more than one top-level element.
    #[error("XML document has more than one root element")]
    MultipleRoots,
}

/// Errors that can occur when saving a test definition as XML.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// The output could not be written.
    #[error("failed to write XML document")]
    Io(#[from] io::Error),
    /// The XML writer failed.
    #[error("failed to write XML document")]
    Xml(#[from] quick_xml::Error),
    /// The comment text cannot appear inside an XML comment.
    #[error("comment cannot be written to XML: {0:?}")]
    InvalidComment(String),
}

/// Loads a test definition tree from an XML document.
///
/// The returned node is the document's root element, normally
/// [`Node::Root`].
///
/// # Errors
///
/// Returns an error if the document is not well-formed XML or has no single
/// root element.
#[instrument(skip_all)]
pub fn load(input: &str) -> Result<Node, LoadError> {
    let mut reader = Reader::from_str(input);
    let mut open: Vec<Node> = Vec::new();
    let mut root = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => open.push(element(&start)?),
            Event::Empty(start) => close(element(&start)?, &mut open, &mut root)?,
            Event::End(_) => {
                let node = open.pop().ok_or(LoadError::UnexpectedEnd)?;
                close(node, &mut open, &mut root)?;
            }
            Event::Text(text) => append_text(&mut open, &text.unescape()?),
            Event::CData(data) => append_text(&mut open, std::str::from_utf8(&data)?),
            Event::Comment(comment) => {
                let text = std::str::from_utf8(&comment)?;
                match open.last_mut().and_then(Node::children_mut) {
                    Some(children) => children.push(Node::comment(text)),
                    None => tracing::debug!("Dropping comment outside the root element: {text}"),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(LoadError::Unclosed);
    }
    root.ok_or(LoadError::NoRoot)
}

/// Reads a complete XML document and loads it.
///
/// # Errors
///
/// Returns an error if reading fails or the document cannot be loaded.
pub fn read<R: Read>(mut reader: R) -> Result<Node, LoadError> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    load(&input)
}

/// Writes a tree as a pretty-printed XML document.
///
/// Elements are indented by [`XmlOptions::indent`] spaces per level, except
/// inside elements that also hold text, whose children stay on the same line.
///
/// # Errors
///
/// Returns an error if writing fails or a comment contains `--`.
#[instrument(skip_all)]
pub fn save<W: Write>(node: &Node, writer: W, options: &XmlOptions) -> Result<(), SaveError> {
    let mut serializer = Serializer {
        writer: Writer::new(writer),
        options,
    };
    serializer.node(node, 0, true)
}

/// Serializes a tree into an XML string.
///
/// # Errors
///
/// Returns an error if a comment cannot be represented in XML.
pub fn to_string(node: &Node, options: &XmlOptions) -> Result<String, SaveError> {
    let mut buffer = Vec::new();
    save(node, &mut buffer, options)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Creates the node for an opening or empty-element tag, without children.
fn element(start: &BytesStart<'_>) -> Result<Node, LoadError> {
    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref())?;

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = std::str::from_utf8(attribute.key.as_ref())?.to_string();
        let value = attribute.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    let get = |key: &str| {
        attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    let node = match name {
        "testdefinition" => Node::Root(TestDefinition {
            version: get("version").map(str::to_string),
            schema_location: get(SCHEMA_LOCATION).map(str::to_string),
            children: Vec::new(),
        }),
        "suite" => Node::suite(get("name").unwrap_or_default()),
        "set" => Node::set(get("name").unwrap_or_default()),
        "case" => Node::case(get("name").unwrap_or_default(), get("manual") == Some("true")),
        "step" => Node::Step(Step {
            text: String::new(),
            manual: get("manual").map(|manual| manual == "true"),
            children: Vec::new(),
        }),
        "description" => Node::description(""),
        _ => {
            tracing::debug!("Loading unknown element <{name}>");
            Node::Unknown(Unknown {
                tag: name.to_string(),
                attributes,
                children: Vec::new(),
            })
        }
    };

    Ok(node)
}

/// Attaches a finished node to its parent, or makes it the document root.
fn close(node: Node, open: &mut [Node], root: &mut Option<Node>) -> Result<(), LoadError> {
    match open.last_mut() {
        Some(parent) => {
            if let Some(children) = parent.children_mut() {
                children.push(node);
            }
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(LoadError::MultipleRoots),
    }
}

/// Adds character data to the innermost open element.
///
/// Only steps and descriptions hold text, and only before their first child.
fn append_text(open: &mut [Node], text: &str) {
    if text.trim().is_empty() {
        return;
    }

    match open.last_mut() {
        Some(
            Node::Step(Step {
                text: content,
                children,
                ..
            })
            | Node::Description(Description {
                text: content,
                children,
            }),
        ) if children.is_empty() => content.push_str(text),
        Some(node) => tracing::debug!("Ignoring text inside {} element", node.kind()),
        None => {}
    }
}

struct Serializer<'a, W: Write> {
    writer: Writer<W>,
    options: &'a XmlOptions,
}

impl<W: Write> Serializer<'_, W> {
    fn node(&mut self, node: &Node, level: usize, pretty: bool) -> Result<(), SaveError> {
        if let Node::Comment(comment) = node {
            if comment.text.contains("--") || comment.text.ends_with('-') {
                return Err(SaveError::InvalidComment(comment.text.clone()));
            }
            self.indent(level, pretty)?;
            self.writer
                .write_event(Event::Comment(BytesText::from_escaped(comment.text.as_str())))?;
            return self.newline(pretty);
        }

        let name = element_name(node);
        let text = node.text().unwrap_or_default();
        let children = node.children();

        self.indent(level, pretty)?;
        let start = self.start(node, name);

        if text.is_empty() && children.is_empty() {
            self.writer.write_event(Event::Empty(start))?;
            return self.newline(pretty);
        }

        self.writer.write_event(Event::Start(start))?;
        if !text.is_empty() {
            self.writer
                .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
        }

        // Children of an element with text stay inline so the text is not
        // padded with indentation.
        let nested = pretty && text.is_empty();
        if !children.is_empty() {
            self.newline(nested)?;
            for child in children {
                self.node(child, level + 1, nested)?;
            }
            self.indent(level, nested)?;
        }

        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        self.newline(pretty)
    }

    fn start<'n>(&self, node: &'n Node, name: &'n str) -> BytesStart<'n> {
        let mut start = BytesStart::new(name);

        match node {
            Node::Root(root) => {
                start.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
                start.push_attribute(("version", root.version.as_deref().unwrap_or(VERSION)));
                let schema = root
                    .schema_location
                    .as_deref()
                    .unwrap_or(&self.options.schema_location);
                start.push_attribute((SCHEMA_LOCATION, schema));
            }
            Node::Suite(group) | Node::Set(group) => {
                start.push_attribute(("name", group.name.as_str()));
            }
            Node::Case(case) => {
                start.push_attribute(("name", case.name.as_str()));
                if case.manual {
                    start.push_attribute(("manual", "true"));
                }
            }
            Node::Step(step) => {
                if let Some(manual) = step.manual {
                    start.push_attribute(("manual", if manual { "true" } else { "false" }));
                }
            }
            Node::Unknown(unknown) => {
                for (key, value) in &unknown.attributes {
                    start.push_attribute((key.as_str(), value.as_str()));
                }
            }
            Node::Description(_) | Node::Comment(_) => {}
        }

        start
    }

    fn indent(&mut self, level: usize, pretty: bool) -> io::Result<()> {
        if pretty && level > 0 {
            let padding = " ".repeat(level * self.options.indent);
            self.writer.get_mut().write_all(padding.as_bytes())?;
        }
        Ok(())
    }

    fn newline(&mut self, pretty: bool) -> Result<(), SaveError> {
        if pretty {
            self.writer.get_mut().write_all(b"\n")?;
        }
        Ok(())
    }
}

fn element_name(node: &Node) -> &str {
    match node {
        Node::Unknown(unknown) => unknown.tag.as_str(),
        other => other.kind().element_name().unwrap_or_default(),
    }
}
