//! The eligibility predicate and the built-in suffix rules.
//!
//! A module reference qualifies for rewriting only when its specifier is
//! present, literal, relative (`./` or `../`), and carries no filename
//! extension in its final path segment. Everything here is a pure function of
//! the node; a missing or unusual field is "not eligible", never a failure.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::GraftError;
use crate::syntax::{Node, Span, Specifier, SyntaxNode, WithSpan};

// =============================
// Eligibility predicate
// =============================

/// True when the node qualifies for the declaration suffix rewrite.
pub fn needs_rewrite(node: &Node) -> bool {
    eligible_specifier(node).is_some()
}

/// Returns the literal specifier text when every rewrite condition holds:
/// the node is a module reference, its specifier is present and literal,
/// the path is relative, and its final segment has no extension.
pub fn eligible_specifier(node: &Node) -> Option<&str> {
    let specifier = module_specifier(node)?;
    let Specifier::Literal(text, _) = specifier else {
        return None;
    };
    if !is_relative(text) {
        return None;
    }
    // An empty final segment names a directory; nothing to suffix.
    if final_segment(text).is_empty() || has_extension(text) {
        return None;
    }
    Some(text)
}

fn module_specifier(node: &Node) -> Option<&Specifier> {
    match node {
        Node::Import { specifier, .. } | Node::Export { specifier, .. } => specifier.as_ref(),
        _ => None,
    }
}

pub(crate) fn is_relative(path: &str) -> bool {
    path.starts_with("./") || path.starts_with("../")
}

pub(crate) fn has_extension(path: &str) -> bool {
    final_segment(path).contains('.')
}

fn final_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

// =============================
// Built-in suffix rules
// =============================

/// Which node shape a [`SuffixRule`] matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleTarget {
    /// `Import`/`Export` declarations with a literal specifier.
    Declarations,
    /// `import("...")` call expressions with a single literal argument.
    DynamicImports,
}

/// Appends a configured suffix to eligible module specifiers.
///
/// The replacement differs from the input only by the trailing suffix, which
/// is what keeps the walk idempotent: a rewritten specifier has an extension
/// and is no longer eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuffixRule {
    suffix: String,
    target: RuleTarget,
}

impl SuffixRule {
    /// Constructs a suffix rule, validating the suffix: it must be
    /// non-empty, begin with `.`, and contain no path separator.
    pub fn new(suffix: &str, target: RuleTarget) -> Result<Self, GraftError> {
        check_suffix(suffix)?;
        Ok(Self {
            suffix: suffix.to_string(),
            target,
        })
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Applies the rule to a node, producing a replacement on match.
    pub fn apply(&self, node: &SyntaxNode) -> Option<SyntaxNode> {
        match self.target {
            RuleTarget::Declarations => self.apply_declaration(node),
            RuleTarget::DynamicImports => self.apply_dynamic_import(node),
        }
    }

    fn apply_declaration(&self, node: &SyntaxNode) -> Option<SyntaxNode> {
        let text = eligible_specifier(&node.value)?;
        let rewritten = format!("{}{}", text, self.suffix);
        Some(replace_specifier(node, rewritten))
    }

    fn apply_dynamic_import(&self, node: &SyntaxNode) -> Option<SyntaxNode> {
        let (text, arg_span) = dynamic_import_argument(&node.value)?;
        let rewritten = format!("{}{}", text, self.suffix);
        Some(replace_dynamic_argument(node, rewritten, arg_span))
    }
}

/// Returns the literal argument of a dynamic `import("...")` call when it
/// meets the same relative-path and no-extension conditions as a
/// declaration specifier.
fn dynamic_import_argument(node: &Node) -> Option<(&str, Span)> {
    let Node::Call { callee, args, .. } = node else {
        return None;
    };
    let Node::Ident(name, _) = &*callee.value else {
        return None;
    };
    if name != "import" {
        return None;
    }
    let [arg] = args.as_slice() else {
        return None;
    };
    let Node::Str(text, span) = &*arg.value else {
        return None;
    };
    if !is_relative(text) {
        return None;
    }
    if final_segment(text).is_empty() || has_extension(text) {
        return None;
    }
    Some((text, *span))
}

// Eligibility is checked by the callers; any other shape passes through.
fn replace_specifier(node: &SyntaxNode, rewritten: String) -> SyntaxNode {
    let value = match &*node.value {
        Node::Import {
            bindings,
            specifier: Some(Specifier::Literal(_, spec_span)),
            span,
        } => Node::Import {
            bindings: bindings.clone(),
            specifier: Some(Specifier::Literal(rewritten, *spec_span)),
            span: *span,
        },
        Node::Export {
            bindings,
            specifier: Some(Specifier::Literal(_, spec_span)),
            span,
        } => Node::Export {
            bindings: bindings.clone(),
            specifier: Some(Specifier::Literal(rewritten, *spec_span)),
            span: *span,
        },
        _ => return node.clone(),
    };
    WithSpan {
        value: Arc::new(value),
        span: node.span,
    }
}

fn replace_dynamic_argument(node: &SyntaxNode, rewritten: String, arg_span: Span) -> SyntaxNode {
    let Node::Call { callee, args, span } = &*node.value else {
        return node.clone();
    };
    let [arg] = args.as_slice() else {
        return node.clone();
    };
    let new_arg = WithSpan {
        value: Arc::new(Node::Str(rewritten, arg_span)),
        span: arg.span,
    };
    WithSpan {
        value: Arc::new(Node::Call {
            callee: callee.clone(),
            args: vec![new_arg],
            span: *span,
        }),
        span: node.span,
    }
}

fn check_suffix(suffix: &str) -> Result<(), GraftError> {
    if suffix.is_empty() {
        return Err(invalid_suffix(suffix, "suffix is empty"));
    }
    if !suffix.starts_with('.') {
        return Err(invalid_suffix(suffix, "suffix must begin with `.`"));
    }
    if suffix.contains('/') {
        return Err(invalid_suffix(suffix, "suffix must not contain a path separator"));
    }
    Ok(())
}

fn invalid_suffix(suffix: &str, reason: &str) -> GraftError {
    GraftError::InvalidSuffix {
        suffix: suffix.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod predicate_tests {
    use super::*;
    use crate::syntax::builder::{call, export_named, ident, import, import_dynamic, str_lit};

    fn sp() -> Span {
        Span::default()
    }

    #[test]
    fn relative_prefixes() {
        assert!(is_relative("./a"));
        assert!(is_relative("../a"));
        assert!(!is_relative("a"));
        assert!(!is_relative("/a"));
        assert!(!is_relative(".a"));
    }

    #[test]
    fn extension_is_detected_in_the_final_segment_only() {
        assert!(has_extension("./math.js"));
        assert!(has_extension("./.env"));
        assert!(!has_extension("./math"));
        assert!(!has_extension("../x.y/z"));
    }

    #[test]
    fn eligible_specifier_returns_the_text() {
        let node = import(&["add"], "./math", sp());
        assert_eq!(eligible_specifier(&node.value), Some("./math"));
        assert!(needs_rewrite(&node.value));
    }

    #[test]
    fn directory_specifier_is_ineligible() {
        let node = import(&[], "./vendor/", sp());
        assert!(!needs_rewrite(&node.value));
    }

    #[test]
    fn computed_specifier_is_ineligible() {
        let spec = call(ident("resolve", sp()), vec![str_lit("./math", sp())], sp());
        let node = import_dynamic(&["m"], spec, sp());
        assert!(!needs_rewrite(&node.value));
    }

    #[test]
    fn missing_specifier_is_ineligible() {
        let node = export_named(&["helper"], sp());
        assert!(!needs_rewrite(&node.value));
    }

    #[test]
    fn bad_suffixes_are_rejected() {
        for bad in ["", "js", "./js"] {
            let result = SuffixRule::new(bad, RuleTarget::Declarations);
            assert!(
                matches!(result, Err(GraftError::InvalidSuffix { .. })),
                "suffix {:?} should be rejected",
                bad
            );
        }
    }
}
