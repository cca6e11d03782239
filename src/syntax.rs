//! Syntax tree model for Graft
//!
//! This module provides the immutable, span-carrying tree types the rewriter
//! operates on. Trees are produced by an external parser; Graft never mutates
//! a node in place, so nodes use shared ownership and replacement trees share
//! unchanged subtrees by reference.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::GraftError;

/// Represents a span in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Wrapper for carrying source span information with any value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithSpan<T> {
    pub value: T,
    pub span: Span,
}

/// Canonical tree node type with shared ownership for cheap replacement.
pub type SyntaxNode = WithSpan<Arc<Node>>;

/// The module path named by an import-like or export-like node.
///
/// Only `Literal` specifiers are ever rewritten; a `Dynamic` specifier is a
/// computed expression the rewriter merely walks through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Specifier {
    Literal(String, Span),
    Dynamic(Box<SyntaxNode>),
}

/// The core node kinds of a parsed source unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// A whole source unit: the root handed to the rewriter.
    Unit(Vec<SyntaxNode>, Span),
    /// An import-like module reference. The specifier is optional: a
    /// reference without one is tolerated and simply never rewritten.
    Import {
        bindings: Vec<String>,
        specifier: Option<Specifier>,
        span: Span,
    },
    /// An export-like module reference (re-export when a specifier is
    /// present, local export otherwise).
    Export {
        bindings: Vec<String>,
        specifier: Option<Specifier>,
        span: Span,
    },
    Block(Vec<SyntaxNode>, Span),
    Call {
        callee: Box<SyntaxNode>,
        args: Vec<SyntaxNode>,
        span: Span,
    },
    Ident(String, Span),
    Str(String, Span),
    Number(f64, Span),
    Bool(bool, Span),
}

impl Specifier {
    /// Returns the span of the specifier itself.
    pub fn span(&self) -> Span {
        match self {
            Specifier::Literal(_, span) => *span,
            Specifier::Dynamic(expr) => expr.span,
        }
    }

    /// Pretty-prints the specifier as it would appear in source.
    pub fn pretty(&self) -> String {
        match self {
            Specifier::Literal(text, _) => format!("\"{}\"", text),
            Specifier::Dynamic(expr) => expr.value.pretty(),
        }
    }
}

impl Node {
    /// Returns the span of this node.
    pub fn span(&self) -> Span {
        use Node::*;
        match self {
            Unit(_, span)
            | Block(_, span)
            | Ident(_, span)
            | Str(_, span)
            | Number(_, span)
            | Bool(_, span) => *span,
            Import { span, .. } | Export { span, .. } | Call { span, .. } => *span,
        }
    }

    /// Returns the kind name of this node as a string (for diagnostics and
    /// debugging).
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Unit(_, _) => "Unit",
            Node::Import { .. } => "Import",
            Node::Export { .. } => "Export",
            Node::Block(_, _) => "Block",
            Node::Call { .. } => "Call",
            Node::Ident(_, _) => "Ident",
            Node::Str(_, _) => "Str",
            Node::Number(_, _) => "Number",
            Node::Bool(_, _) => "Bool",
        }
    }

    /// Pretty-prints the node as source-like text.
    pub fn pretty(&self) -> String {
        match self {
            Node::Unit(items, _) => Self::pretty_items(items, "\n"),
            Node::Import {
                bindings,
                specifier,
                ..
            } => Self::pretty_reference("import", bindings, specifier),
            Node::Export {
                bindings,
                specifier,
                ..
            } => Self::pretty_reference("export", bindings, specifier),
            Node::Block(items, _) => format!("{{ {} }}", Self::pretty_items(items, "; ")),
            Node::Call { callee, args, .. } => {
                format!("{}({})", callee.value.pretty(), Self::pretty_items(args, ", "))
            }
            Node::Ident(name, _) => name.clone(),
            Node::Str(s, _) => format!("\"{}\"", s),
            Node::Number(n, _) => n.to_string(),
            Node::Bool(b, _) => b.to_string(),
        }
    }

    // ------------------------------------------------------------------------
    // Pretty-printing helpers
    // ------------------------------------------------------------------------

    fn pretty_items(items: &[SyntaxNode], separator: &str) -> String {
        items
            .iter()
            .map(|n| n.value.pretty())
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn pretty_reference(
        keyword: &str,
        bindings: &[String],
        specifier: &Option<Specifier>,
    ) -> String {
        let mut out = String::from(keyword);
        if !bindings.is_empty() {
            out.push_str(&format!(" {{ {} }}", bindings.join(", ")));
        }
        match specifier {
            Some(spec) if bindings.is_empty() => out.push_str(&format!(" {}", spec.pretty())),
            Some(spec) => out.push_str(&format!(" from {}", spec.pretty())),
            None => {}
        }
        out
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

/// Decodes a source unit handed over in serde interchange form by the
/// external parser.
pub fn unit_from_json(payload: &str) -> Result<SyntaxNode, GraftError> {
    Ok(serde_json::from_str(payload)?)
}

pub mod builder;
