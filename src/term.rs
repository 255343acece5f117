//! Elixir Term Conversion Utilities
//!
//! Converts built trees, errors and option lists between Rust and Elixir.

use rustler::types::atom::nil;
use rustler::{Atom, Encoder, Env, NewBinary, NifResult, Term};

use crate::config::ParseOptions;
use crate::dom::NodeRef;
use crate::error::BuildError;

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    element,
    parse,
    validation,
    routing,
    namespace_aware,
    ignore_warnings,
    validate,
    source,
}

/// Convert an element and its subtree to
/// `{:element, name, [{key, value}], data | nil, [children]}`
///
/// Builds bottom-up with an explicit stack so deep trees do not recurse.
pub fn node_to_term<'a>(env: Env<'a>, node: NodeRef<'_>) -> Term<'a> {
    enum Step<'d> {
        Enter(NodeRef<'d>),
        Build(NodeRef<'d>),
    }

    let mut built: Vec<Term<'a>> = Vec::new();
    let mut steps = vec![Step::Enter(node)];

    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(n) => {
                steps.push(Step::Build(n));
                let children: Vec<_> = n.children().collect();
                steps.extend(children.into_iter().rev().map(Step::Enter));
            }
            Step::Build(n) => {
                // Children finished in document order on top of `built`
                let first_child = built.len() - n.node().child_ids().len();
                let mut children = Term::list_new_empty(env);
                for child in built.drain(first_child..).rev() {
                    children = children.list_prepend(child);
                }
                built.push(element_term(env, n, children));
            }
        }
    }

    built.pop().unwrap_or_else(|| nil().encode(env))
}

fn element_term<'a>(env: Env<'a>, node: NodeRef<'_>, children: Term<'a>) -> Term<'a> {
    let mut attrs = Term::list_new_empty(env);
    for (key, value) in node.attributes().iter().rev() {
        let pair = (str_to_binary(env, key), str_to_binary(env, value));
        attrs = attrs.list_prepend(pair.encode(env));
    }

    let data = match node.data() {
        Some(text) => str_to_binary(env, text),
        None => nil().encode(env),
    };

    (element(), str_to_binary(env, node.name()), attrs, data, children).encode(env)
}

/// List of node terms, in the given order
pub fn nodes_to_term<'a>(env: Env<'a>, nodes: &[NodeRef<'_>]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for &node in nodes.iter().rev() {
        list = list.list_prepend(node_to_term(env, node));
    }
    list
}

/// `{kind, message, line | nil}` for the error half of a result tuple
pub fn error_to_term<'a>(env: Env<'a>, err: &BuildError) -> Term<'a> {
    let kind = match err {
        BuildError::Parse(_) => parse(),
        BuildError::Validation(_) => validation(),
        BuildError::Routing(_) => routing(),
    };
    let line = match err.line() {
        Some(line) => line.encode(env),
        None => nil().encode(env),
    };
    (kind, err.message(), line).encode(env)
}

/// Read a keyword list into ParseOptions; unknown keys are ignored
pub fn decode_options(opts: Vec<(Atom, Term<'_>)>) -> NifResult<ParseOptions> {
    let mut options = ParseOptions::default();
    for (key, value) in opts {
        if key == namespace_aware() {
            options.namespace_aware = value.decode()?;
        } else if key == ignore_warnings() {
            options.ignore_warnings = value.decode()?;
        } else if key == validate() {
            options.validate_data = value.decode()?;
        } else if key == source() {
            options.source_id = Some(value.decode::<String>()?);
        }
    }
    Ok(options)
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}
