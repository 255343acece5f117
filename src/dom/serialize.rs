//! Markup output
//!
//! Renders a completed tree back to text, one element per line, children
//! indented with one tab per level. Attribute values and data are written as
//! stored; nothing is escaped.

use std::fmt;

use super::document::{Document, NodeRef};
use super::node::Shape;

/// Prologue written by `Document::to_document_string`
pub const XML_PROLOGUE: &str = "<?xml version='1.0' encoding='ISO-8859-1' standalone='yes'?>";

const LINE_SEP: &str = "\n";
const INDENT: char = '\t';

impl NodeRef<'_> {
    /// Render this element as if it sat `level` elements deep
    pub fn to_markup(&self, level: usize) -> String {
        let mut out = String::with_capacity(64);
        self.write_markup(&mut out, level);
        out
    }

    /// Uses an explicit stack so nesting depth never grows the call stack
    fn write_markup(&self, out: &mut String, level: usize) {
        enum Step<'d> {
            Enter(NodeRef<'d>, usize),
            Close(NodeRef<'d>, usize),
        }

        let start = out.len();
        let mut steps = vec![Step::Enter(*self, level)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Close(node, level) => {
                    out.push_str(LINE_SEP);
                    push_indent(out, level);
                    push_close(out, node.name());
                }
                Step::Enter(node, level) => {
                    if out.len() > start {
                        out.push_str(LINE_SEP);
                    }
                    push_open(out, node, level);
                    match node.shape() {
                        Shape::Empty => out.push_str("/>"),
                        Shape::Data => {
                            out.push('>');
                            out.push_str(node.data().unwrap_or_default());
                            push_close(out, node.name());
                        }
                        Shape::Parent => {
                            out.push('>');
                            steps.push(Step::Close(node, level));
                            let children: Vec<_> = node.children().collect();
                            steps.extend(
                                children
                                    .into_iter()
                                    .rev()
                                    .map(|child| Step::Enter(child, level + 1)),
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Indent, `<name` and attributes
fn push_open(out: &mut String, node: NodeRef<'_>, level: usize) {
    push_indent(out, level);
    out.push('<');
    out.push_str(node.name());
    for (key, value) in node.attributes() {
        out.push(' ');
        out.push_str(key);
        out.push_str("='");
        out.push_str(value);
        out.push('\'');
    }
}

fn push_indent(out: &mut String, level: usize) {
    out.extend(std::iter::repeat(INDENT).take(level));
}

fn push_close(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup(0))
    }
}

impl Document {
    /// Render the tree from the root, without a prologue
    pub fn serialize(&self) -> String {
        self.root().to_markup(0)
    }

    /// Render the tree preceded by `XML_PROLOGUE` on its own line
    pub fn to_document_string(&self) -> String {
        let body = self.serialize();
        let mut out = String::with_capacity(XML_PROLOGUE.len() + LINE_SEP.len() + body.len());
        out.push_str(XML_PROLOGUE);
        out.push_str(LINE_SEP);
        out.push_str(&body);
        out
    }
}
