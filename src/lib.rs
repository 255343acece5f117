//! RustyTree - element trees from a push-driven XML scanner
//!
//! One scanner pass drives a dispatcher, which drives a tree builder:
//! - parse / parse_many: build documents (single, or many in parallel)
//! - get_root, find_first, find_attribute, find_all_matching: read-only queries
//! - serialize: indented markup, optionally with the XML prologue
//!
//! The same pipeline is available to Rust callers through `build`,
//! `build_with`, `build_events` and the `dom` types.

use rustler::types::atom;
use rustler::{Atom, Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod sax;
pub mod strategy;

mod resource;
mod term;

pub use config::ParseOptions;
pub use dom::{Document, Node, NodeId, NodeRef, Shape, TreeBuilder, TreeSink, XML_PROLOGUE};
pub use error::{BuildError, ParseError, Result, RoutingError, ValidationError};
pub use sax::{build, build_events, build_events_with, build_into, build_with, Dispatcher, SaxEvent};
pub use strategy::build_many;

use resource::{DocumentRef, DocumentResource};
use term::{decode_options, error_to_term, node_to_term, nodes_to_term, str_to_binary};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Building
// ============================================================================

fn build_result_to_term<'a>(env: Env<'a>, result: Result<Document>) -> Term<'a> {
    match result {
        Ok(doc) => {
            let arc = ResourceArc::new(DocumentResource::new(doc));
            (atom::ok(), arc).encode(env)
        }
        Err(err) => {
            log::debug!("build failed: {err}");
            (atom::error(), error_to_term(env, &err)).encode(env)
        }
    }
}

/// Parse a binary into a document
/// Returns {:ok, doc} or {:error, {kind, message, line | nil}}
#[rustler::nif]
fn parse<'a>(env: Env<'a>, input: Binary<'a>, opts: Vec<(Atom, Term<'a>)>) -> NifResult<Term<'a>> {
    let options = decode_options(opts)?;
    Ok(build_result_to_term(env, build(input.as_slice(), &options)))
}

/// Parse many binaries in parallel, one result tuple per input
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_many<'a>(
    env: Env<'a>,
    inputs: Vec<Binary<'a>>,
    opts: Vec<(Atom, Term<'a>)>,
) -> NifResult<Term<'a>> {
    let options = decode_options(opts)?;
    let slices: Vec<&[u8]> = inputs.iter().map(|b| b.as_slice()).collect();

    let mut list = Term::list_new_empty(env);
    for result in build_many(&slices, &options).into_iter().rev() {
        list = list.list_prepend(build_result_to_term(env, result));
    }
    Ok(list)
}

// ============================================================================
// Queries
// ============================================================================

/// Get root element of a document
#[rustler::nif]
fn get_root<'a>(env: Env<'a>, doc_ref: DocumentRef) -> NifResult<Term<'a>> {
    Ok(node_to_term(env, doc_ref.doc.root()))
}

/// First element named `name`, depth-first pre-order, or nil
#[rustler::nif]
fn find_first<'a>(env: Env<'a>, doc_ref: DocumentRef, name: &str) -> NifResult<Term<'a>> {
    Ok(match doc_ref.doc.find_first(name) {
        Some(node) => node_to_term(env, node),
        None => atom::nil().encode(env),
    })
}

/// Attribute `key` of the first element named `name`, or nil
#[rustler::nif]
fn find_attribute<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    name: &str,
    key: &str,
) -> NifResult<Term<'a>> {
    Ok(match doc_ref.doc.find_attribute(name, key) {
        Some(value) => str_to_binary(env, value),
        None => atom::nil().encode(env),
    })
}

/// Elements named `name` found by the narrow search (see `NodeRef::find_all_matching`)
#[rustler::nif]
fn find_all_matching<'a>(env: Env<'a>, doc_ref: DocumentRef, name: &str) -> NifResult<Term<'a>> {
    let found = doc_ref.doc.find_all_matching(name);
    Ok(nodes_to_term(env, &found))
}

/// Render the document as indented markup
#[rustler::nif]
fn serialize<'a>(env: Env<'a>, doc_ref: DocumentRef, with_prologue: bool) -> NifResult<Term<'a>> {
    let text = if with_prologue {
        doc_ref.doc.to_document_string()
    } else {
        doc_ref.doc.serialize()
    };
    Ok(str_to_binary(env, &text))
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.RustyTree.Native");
