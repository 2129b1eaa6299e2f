//! Tree to outline conversion.

use std::io::{self, Write};

use tracing::instrument;

use crate::domain::{Config, Node, Tag};

/// Layout options for generated outlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Width that a name is padded to before a trailing tag block.
    pub tag_column: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EmitOptions {
    fn from(config: &Config) -> Self {
        Self {
            tag_column: config.tag_column(),
        }
    }
}

/// State inherited from the enclosing elements.
///
/// Each element derives the context of its children from its own; siblings
/// never see each other's changes.
#[derive(Debug, Clone, Copy, Default)]
struct Context {
    /// Indentation of description lines.
    depth: usize,
    /// Whether the innermost enclosing case is manual.
    manual_case: bool,
}

struct Emitter<'a> {
    options: &'a EmitOptions,
    lines: Vec<String>,
}

impl Emitter<'_> {
    fn node(&mut self, node: &Node, context: Context) {
        let context = match node {
            Node::Comment(comment) => {
                self.lines.push(format!("# {}", comment.text));
                context
            }
            Node::Root(_) => context,
            Node::Suite(group) => {
                self.lines.push(format!("* {}", group.name));
                Context { depth: 2, ..context }
            }
            Node::Set(group) => {
                self.lines.push(format!("** {}", group.name));
                Context { depth: 3, ..context }
            }
            Node::Case(case) => {
                if case.manual {
                    self.lines.push(format!("*** {}", case.name));
                } else {
                    self.tagged(3, &case.name, &Tag::Auto);
                }
                Context {
                    depth: 4,
                    manual_case: case.manual,
                }
            }
            Node::Step(step) => {
                match step.manual {
                    Some(manual) if manual != context.manual_case => {
                        self.tagged(4, &step.text, &Tag::for_manual(manual));
                    }
                    _ => self.lines.push(format!("**** {}", step.text)),
                }
                Context { depth: 5, ..context }
            }
            Node::Description(description) => {
                self.lines.push(format!(
                    "{:indent$}{}",
                    "",
                    description.text,
                    indent = context.depth
                ));
                Context { depth: 4, ..context }
            }
            Node::Unknown(unknown) => {
                tracing::warn!("Unknown element <{}>", unknown.tag);
                context
            }
        };

        for child in node.children() {
            self.node(child, context);
        }
    }

    /// Writes a bullet whose label is padded to the tag column and followed
    /// by a single tag.
    fn tagged(&mut self, depth: usize, label: &str, tag: &Tag) {
        self.lines.push(format!(
            "{} {label:<width$} :{tag}:",
            "*".repeat(depth),
            width = self.options.tag_column
        ));
    }
}

/// Converts a tree into outline lines, parents before children.
#[must_use]
pub fn emit_lines(node: &Node, options: &EmitOptions) -> Vec<String> {
    let mut emitter = Emitter {
        options,
        lines: Vec::new(),
    };
    emitter.node(node, Context::default());
    emitter.lines
}

/// Writes a tree as an outline, one line per element.
///
/// # Errors
///
/// Returns an error if writing fails.
#[instrument(skip_all)]
pub fn emit<W: Write>(node: &Node, writer: &mut W, options: &EmitOptions) -> io::Result<()> {
    for line in emit_lines(node, options) {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Converts a tree into outline text. Every line, including the last, ends
/// with a newline.
#[must_use]
pub fn to_string(node: &Node, options: &EmitOptions) -> String {
    emit_lines(node, options)
        .into_iter()
        .fold(String::new(), |mut out, line| {
            out.push_str(&line);
            out.push('\n');
            out
        })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{
        domain::{Step, TestDefinition, Unknown},
        outline::parse,
    };

    fn name_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,12}[A-Za-z0-9]"
    }

    fn tag_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just(""),
            Just(" :AUTO:"),
            Just(" :MANUAL:"),
            Just(" :SLOW:AUTO:"),
        ]
    }

    /// Description text, blank lines and comments that may follow a bullet.
    fn body_strategy() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop_oneof![
                3 => " {0,6}[a-z][a-z .]{0,15}",
                1 => Just(String::new()),
                1 => "# [a-z ]{0,10}",
            ],
            0..4,
        )
    }

    /// A bullet at `depth` followed by its body and well-nested children.
    fn element_strategy(depth: usize) -> BoxedStrategy<Vec<String>> {
        let head = (name_strategy(), tag_strategy(), body_strategy()).prop_map(
            move |(name, tag, body)| {
                let mut lines = vec![format!("{} {name}{tag}", "*".repeat(depth))];
                lines.extend(body);
                lines
            },
        );
        if depth == 4 {
            return head.boxed();
        }
        (head, prop::collection::vec(element_strategy(depth + 1), 0..3))
            .prop_map(|(mut lines, children)| {
                lines.extend(children.into_iter().flatten());
                lines
            })
            .boxed()
    }

    fn outline_strategy() -> impl Strategy<Value = String> {
        (
            prop::collection::vec("# [a-z ]{0,10}", 0..2),
            prop::collection::vec(element_strategy(1), 0..3),
        )
            .prop_map(|(header, suites)| {
                header
                    .into_iter()
                    .chain(suites.into_iter().flatten())
                    .fold(String::new(), |mut out, line| {
                        out.push_str(&line);
                        out.push('\n');
                        out
                    })
            })
    }

    fn emit_default(node: &Node) -> Vec<String> {
        emit_lines(node, &EmitOptions::default())
    }

    fn step(text: &str, manual: Option<bool>) -> Node {
        Node::Step(Step {
            text: text.to_string(),
            manual,
            children: Vec::new(),
        })
    }

    #[test]
    fn automated_case_is_padded_and_tagged() {
        let lines = emit_default(&Node::case("Case1", false));
        assert_eq!(lines, [format!("*** {:<50} :AUTO:", "Case1")]);
        assert_eq!(lines[0].len(), 4 + 50 + 7);
    }

    #[test]
    fn manual_case_is_plain() {
        assert_eq!(emit_default(&Node::case("Case1", true)), ["*** Case1"]);
    }

    #[test]
    fn tag_column_is_configurable() {
        let options = EmitOptions { tag_column: 8 };
        let lines = emit_lines(&Node::case("Login", false), &options);
        assert_eq!(lines, ["*** Login    :AUTO:"]);
    }

    #[test]
    fn long_names_are_not_truncated() {
        let options = EmitOptions { tag_column: 3 };
        let lines = emit_lines(&Node::case("Login", false), &options);
        assert_eq!(lines, ["*** Login :AUTO:"]);
    }

    #[test]
    fn step_tags_only_when_overriding_case() {
        let options = EmitOptions { tag_column: 4 };
        let manual_case = Node::case("M", true)
            .with_child(step("inherit", None))
            .with_child(step("same", Some(true)))
            .with_child(step("auto", Some(false)));
        let automated_case = Node::case("A", false)
            .with_child(step("inherit", None))
            .with_child(step("same", Some(false)))
            .with_child(step("hand", Some(true)));

        assert_eq!(
            emit_lines(&manual_case, &options),
            [
                "*** M",
                "**** inherit",
                "**** same",
                "**** auto :AUTO:",
            ]
        );
        assert_eq!(
            emit_lines(&automated_case, &options),
            [
                "*** A    :AUTO:",
                "**** inherit",
                "**** same",
                "**** hand :MANUAL:",
            ]
        );
    }

    #[test]
    fn descriptions_are_indented_by_owner() {
        let tree = Node::Root(TestDefinition {
            children: vec![
                Node::suite("S")
                    .with_child(
                        Node::description("suite").with_child(Node::description("nested")),
                    )
                    .with_child(
                        Node::set("T")
                            .with_child(Node::description("set"))
                            .with_child(
                                Node::case("C", true)
                                    .with_child(Node::description("case"))
                                    .with_child(
                                        Node::step("do").with_child(Node::description("step")),
                                    ),
                            ),
                    ),
            ],
            ..TestDefinition::default()
        });

        assert_eq!(
            emit_default(&tree),
            [
                "* S",
                "  suite",
                "    nested",
                "** T",
                "   set",
                "*** C",
                "    case",
                "**** do",
                "     step",
            ]
        );
    }

    #[test]
    fn comments_keep_their_position() {
        let tree = Node::suite("S")
            .with_child(Node::comment("first"))
            .with_child(Node::set("T"))
            .with_child(Node::comment("last"));

        assert_eq!(emit_default(&tree), ["* S", "# first", "** T", "# last"]);
    }

    #[test]
    fn unknown_elements_are_skipped_but_children_visited() {
        let tree = Node::Unknown(Unknown {
            tag: "wrapper".to_string(),
            attributes: Vec::new(),
            children: vec![Node::suite("S")],
        });

        assert_eq!(emit_default(&tree), ["* S"]);
    }

    #[test]
    fn context_does_not_leak_between_siblings() {
        let tree = Node::set("T")
            .with_child(Node::case("manual", true))
            .with_child(Node::case("auto", false).with_child(step("s", Some(false))));

        let lines = emit_lines(&tree, &EmitOptions { tag_column: 0 });
        assert_eq!(lines, ["** T", "*** manual", "*** auto :AUTO:", "**** s"]);
    }

    #[test]
    fn to_string_terminates_every_line() {
        let text = to_string(&Node::suite("S"), &EmitOptions::default());
        assert_eq!(text, "* S\n");
    }

    #[test]
    fn emit_writes_lines() {
        let mut out = Vec::new();
        emit(&Node::suite("S").with_child(Node::set("T")), &mut out, &EmitOptions::default())
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "* S\n** T\n");
    }

    #[test]
    fn parse_emit_parse_is_stable() {
        let input = "\
# plan
* Suite1
  The first suite.
** Set1
*** Case1 :AUTO:
Some description.
more text.
**** step one
**** step two
     with detail
*** Case2
# todo
** Set2
* Suite2
";
        let first = parse(input).unwrap();
        let text = to_string(&Node::Root(first.clone()), &EmitOptions::default());
        let second = parse(&text).unwrap();

        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn emitted_outlines_parse_back_to_the_same_tree(input in outline_strategy()) {
            let first = parse(&input).unwrap();
            let text = to_string(&Node::Root(first.clone()), &EmitOptions::default());
            let second = parse(&text).unwrap();

            prop_assert_eq!(first, second, "emitted:\n{}", text);
        }
    }
}
