use std::fmt;

/// The kind of a [`Node`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The `testdefinition` root element.
    Root,
    /// A test suite (outline depth 1).
    Suite,
    /// A test set (outline depth 2).
    Set,
    /// A test case (outline depth 3).
    Case,
    /// A test step (outline depth 4).
    Step,
    /// Free text attached to the preceding element.
    Description,
    /// A comment line.
    Comment,
    /// An element outside the test definition vocabulary.
    Unknown,
}

impl Kind {
    /// Returns the kind created by a bullet at the given outline depth.
    ///
    /// Only depths 1 through 4 map to a kind.
    #[must_use]
    pub const fn from_depth(depth: usize) -> Option<Self> {
        match depth {
            1 => Some(Self::Suite),
            2 => Some(Self::Set),
            3 => Some(Self::Case),
            4 => Some(Self::Step),
            _ => None,
        }
    }

    /// Returns the XML element name for this kind, if it has one.
    #[must_use]
    pub const fn element_name(self) -> Option<&'static str> {
        match self {
            Self::Root => Some("testdefinition"),
            Self::Suite => Some("suite"),
            Self::Set => Some("set"),
            Self::Case => Some("case"),
            Self::Step => Some("step"),
            Self::Description => Some("description"),
            Self::Comment | Self::Unknown => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Root => "root",
            Self::Suite => "suite",
            Self::Set => "set",
            Self::Case => "case",
            Self::Step => "step",
            Self::Description => "description",
            Self::Comment => "comment",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// The root of a test definition.
///
/// `version` and `schema_location` mirror the attributes of the
/// `testdefinition` element. They are `None` for trees built from an outline
/// and are filled in from the configuration when the tree is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestDefinition {
    /// The `version` attribute.
    pub version: Option<String>,
    /// The `xsi:noNamespaceSchemaLocation` attribute.
    pub schema_location: Option<String>,
    /// Top-level suites and comments.
    pub children: Vec<Node>,
}

/// A named container: a suite or a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// The display label.
    pub name: String,
    /// Child nodes in display order.
    pub children: Vec<Node>,
}

/// A test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    /// The display label.
    pub name: String,
    /// Whether the case requires a human to execute it.
    pub manual: bool,
    /// Steps, descriptions and comments.
    pub children: Vec<Node>,
}

/// A single step of a test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The step text.
    pub text: String,
    /// Explicit manual flag.
    ///
    /// `None` means the step inherits the manual-ness of its case.
    pub manual: Option<bool>,
    /// Descriptions and comments.
    pub children: Vec<Node>,
}

/// Free text describing the element that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    /// The description text.
    pub text: String,
    /// Nested nodes. Only ever populated from a loaded document.
    pub children: Vec<Node>,
}

/// A comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// The comment text, without the leading marker.
    pub text: String,
}

/// An element whose name is not part of the test definition vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unknown {
    /// The element name as it appeared in the document.
    pub tag: String,
    /// Attributes in document order, kept so the element can be written back.
    pub attributes: Vec<(String, String)>,
    /// Child nodes.
    pub children: Vec<Node>,
}

/// A node of the test definition tree.
///
/// Each node exclusively owns its children. Child order is significant: it
/// is both the display order and the execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// The document root.
    Root(TestDefinition),
    /// A test suite.
    Suite(Group),
    /// A test set.
    Set(Group),
    /// A test case.
    Case(Case),
    /// A test step.
    Step(Step),
    /// A description.
    Description(Description),
    /// A comment.
    Comment(Comment),
    /// An unrecognised element.
    Unknown(Unknown),
}

impl Node {
    /// Creates a suite with no children.
    pub fn suite(name: impl Into<String>) -> Self {
        Self::Suite(Group {
            name: name.into(),
            children: Vec::new(),
        })
    }

    /// Creates a set with no children.
    pub fn set(name: impl Into<String>) -> Self {
        Self::Set(Group {
            name: name.into(),
            children: Vec::new(),
        })
    }

    /// Creates a case with no children.
    pub fn case(name: impl Into<String>, manual: bool) -> Self {
        Self::Case(Case {
            name: name.into(),
            manual,
            children: Vec::new(),
        })
    }

    /// Creates a step that inherits the manual-ness of its case.
    pub fn step(text: impl Into<String>) -> Self {
        Self::Step(Step {
            text: text.into(),
            manual: None,
            children: Vec::new(),
        })
    }

    /// Creates a description.
    pub fn description(text: impl Into<String>) -> Self {
        Self::Description(Description {
            text: text.into(),
            children: Vec::new(),
        })
    }

    /// Creates a comment.
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment(Comment { text: text.into() })
    }

    /// Appends a child and returns the node, for building trees inline.
    ///
    /// Comments cannot hold children; the child is dropped.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        if let Some(children) = self.children_mut() {
            children.push(child);
        }
        self
    }

    /// Returns the kind of this node.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Root(_) => Kind::Root,
            Self::Suite(_) => Kind::Suite,
            Self::Set(_) => Kind::Set,
            Self::Case(_) => Kind::Case,
            Self::Step(_) => Kind::Step,
            Self::Description(_) => Kind::Description,
            Self::Comment(_) => Kind::Comment,
            Self::Unknown(_) => Kind::Unknown,
        }
    }

    /// Returns the display label of a suite, set or case.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Suite(group) | Self::Set(group) => Some(group.name.as_str()),
            Self::Case(case) => Some(case.name.as_str()),
            _ => None,
        }
    }

    /// Returns the free-form text of a step, description or comment.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Step(step) => Some(step.text.as_str()),
            Self::Description(description) => Some(description.text.as_str()),
            Self::Comment(comment) => Some(comment.text.as_str()),
            _ => None,
        }
    }

    /// Returns the child nodes. Comments have none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Root(root) => &root.children,
            Self::Suite(group) | Self::Set(group) => &group.children,
            Self::Case(case) => &case.children,
            Self::Step(step) => &step.children,
            Self::Description(description) => &description.children,
            Self::Unknown(unknown) => &unknown.children,
            Self::Comment(_) => &[],
        }
    }

    /// Returns the child list for appending, or `None` for a comment.
    pub const fn children_mut(&mut self) -> Option<&mut Vec<Self>> {
        match self {
            Self::Root(root) => Some(&mut root.children),
            Self::Suite(group) | Self::Set(group) => Some(&mut group.children),
            Self::Case(case) => Some(&mut case.children),
            Self::Step(step) => Some(&mut step.children),
            Self::Description(description) => Some(&mut description.children),
            Self::Unknown(unknown) => Some(&mut unknown.children),
            Self::Comment(_) => None,
        }
    }
}

impl From<TestDefinition> for Node {
    fn from(root: TestDefinition) -> Self {
        Self::Root(root)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(1, Some(Kind::Suite); "depth 1 is a suite")]
    #[test_case(2, Some(Kind::Set); "depth 2 is a set")]
    #[test_case(3, Some(Kind::Case); "depth 3 is a case")]
    #[test_case(4, Some(Kind::Step); "depth 4 is a step")]
    #[test_case(0, None; "depth 0 has no kind")]
    #[test_case(5, None; "depth 5 has no kind")]
    fn kind_from_depth(depth: usize, expected: Option<Kind>) {
        assert_eq!(Kind::from_depth(depth), expected);
    }

    #[test]
    fn with_child_appends_in_order() {
        let suite = Node::suite("S")
            .with_child(Node::set("A"))
            .with_child(Node::set("B"));

        let names: Vec<_> = suite.children().iter().filter_map(Node::name).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn comment_ignores_children() {
        let comment = Node::comment("note").with_child(Node::step("x"));
        assert!(comment.children().is_empty());
    }

    #[test]
    fn accessors_match_kind() {
        let case = Node::case("Login", true);
        assert_eq!(case.kind(), Kind::Case);
        assert_eq!(case.name(), Some("Login"));
        assert_eq!(case.text(), None);

        let step = Node::step("Press enter");
        assert_eq!(step.kind(), Kind::Step);
        assert_eq!(step.name(), None);
        assert_eq!(step.text(), Some("Press enter"));
    }

    #[test]
    fn element_names() {
        assert_eq!(Kind::Root.element_name(), Some("testdefinition"));
        assert_eq!(Kind::Description.element_name(), Some("description"));
        assert_eq!(Kind::Comment.element_name(), None);
    }
}
