//! Construction helpers for syntax trees.
//!
//! The parser that produces real trees lives outside this crate; these
//! helpers give tests and host code an ergonomic way to assemble the same
//! shapes, with consistent span handling.

use std::sync::Arc;

use crate::syntax::{Node, Span, Specifier, SyntaxNode, WithSpan};

/// Wraps a node value into a `SyntaxNode` with the given span.
pub fn with_span(node: Node, span: Span) -> SyntaxNode {
    WithSpan {
        value: Arc::new(node),
        span,
    }
}

/// A whole source unit.
pub fn unit(items: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    with_span(Node::Unit(items, span), span)
}

/// An import with a literal specifier, e.g. `import { add } from "./math"`.
/// Pass no bindings for a side-effect import, e.g. `import "./polyfill"`.
pub fn import(bindings: &[&str], specifier: &str, span: Span) -> SyntaxNode {
    with_span(
        Node::Import {
            bindings: names(bindings),
            specifier: Some(Specifier::Literal(specifier.to_string(), span)),
            span,
        },
        span,
    )
}

/// An import whose specifier is a computed expression.
pub fn import_dynamic(bindings: &[&str], specifier: SyntaxNode, span: Span) -> SyntaxNode {
    with_span(
        Node::Import {
            bindings: names(bindings),
            specifier: Some(Specifier::Dynamic(Box::new(specifier))),
            span,
        },
        span,
    )
}

/// A re-export with a literal specifier, e.g. `export { helper } from "./helpers"`.
pub fn export_from(bindings: &[&str], specifier: &str, span: Span) -> SyntaxNode {
    with_span(
        Node::Export {
            bindings: names(bindings),
            specifier: Some(Specifier::Literal(specifier.to_string(), span)),
            span,
        },
        span,
    )
}

/// A local export with no specifier, e.g. `export { helper }`.
pub fn export_named(bindings: &[&str], span: Span) -> SyntaxNode {
    with_span(
        Node::Export {
            bindings: names(bindings),
            specifier: None,
            span,
        },
        span,
    )
}

pub fn block(items: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    with_span(Node::Block(items, span), span)
}

pub fn call(callee: SyntaxNode, args: Vec<SyntaxNode>, span: Span) -> SyntaxNode {
    with_span(
        Node::Call {
            callee: Box::new(callee),
            args,
            span,
        },
        span,
    )
}

pub fn ident(name: &str, span: Span) -> SyntaxNode {
    with_span(Node::Ident(name.to_string(), span), span)
}

pub fn str_lit(value: &str, span: Span) -> SyntaxNode {
    with_span(Node::Str(value.to_string(), span), span)
}

pub fn number(value: f64, span: Span) -> SyntaxNode {
    with_span(Node::Number(value, span), span)
}

pub fn bool_lit(value: bool, span: Span) -> SyntaxNode {
    with_span(Node::Bool(value, span), span)
}

fn names(bindings: &[&str]) -> Vec<String> {
    bindings.iter().map(|s| s.to_string()).collect()
}
