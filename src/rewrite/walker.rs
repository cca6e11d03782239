//! The tree walk: first-match rule application, then generic recursive
//! rebuild.
//!
//! Pre-order, single pass, no revisiting. The walk is total: a node no rule
//! matches is rebuilt around its rewritten children, and a node whose
//! children all come back unchanged is returned as the original, so
//! untouched subtrees stay shared by reference.

use std::sync::Arc;

use crate::rewrite::{RewriteEnv, RewriteStep, RuleProvenance};
use crate::syntax::builder::with_span;
use crate::syntax::{Node, Span, Specifier, SyntaxNode};

// =============================
// Public API
// =============================

/// Public entry point: rewrites one source unit, returning the root's
/// replacement. Invoked once per unit, synchronously; nothing is consulted
/// beyond the tree and the environment's rule list.
pub fn rewrite_unit(root: SyntaxNode, env: &mut RewriteEnv) -> SyntaxNode {
    rewrite_node(root, env)
}

// =============================
// Internal walk
// =============================

fn rewrite_node(node: SyntaxNode, env: &mut RewriteEnv) -> SyntaxNode {
    if let Some((rule_name, provenance, output)) = apply_rules_once(&node, env) {
        record_rewrite(&mut env.trace, rule_name, provenance, node, output.clone());
        return output;
    }
    map_children(&node, env)
}

/// Tries the rules in priority order; the first match supplies the
/// replacement and later rules are not consulted for this node.
fn apply_rules_once(
    node: &SyntaxNode,
    env: &RewriteEnv,
) -> Option<(String, RuleProvenance, SyntaxNode)> {
    for rule in env.rules() {
        let Some(output) = rule.def.apply(node) else {
            continue;
        };
        return Some((rule.name.clone(), rule.provenance, output));
    }
    None
}

fn record_rewrite(
    trace: &mut Vec<RewriteStep>,
    rule_name: String,
    provenance: RuleProvenance,
    input: SyntaxNode,
    output: SyntaxNode,
) {
    trace.push(RewriteStep {
        rule_name,
        provenance,
        input,
        output,
    });
}

// =============================
// Generic recursive rebuild
// =============================

fn map_children(node: &SyntaxNode, env: &mut RewriteEnv) -> SyntaxNode {
    match &*node.value {
        Node::Unit(items, span) => map_unit(node, items, *span, env),
        Node::Block(items, span) => map_block(node, items, *span, env),
        Node::Call { callee, args, span } => map_call(node, callee, args, *span, env),
        Node::Import {
            bindings,
            specifier: Some(Specifier::Dynamic(inner)),
            span,
        } => map_dynamic_import(node, bindings, inner, *span, env),
        Node::Export {
            bindings,
            specifier: Some(Specifier::Dynamic(inner)),
            span,
        } => map_dynamic_export(node, bindings, inner, *span, env),
        // Leaves, and references with a literal or absent specifier, carry
        // no child nodes.
        _ => node.clone(),
    }
}

fn map_unit(
    node: &SyntaxNode,
    items: &[SyntaxNode],
    span: Span,
    env: &mut RewriteEnv,
) -> SyntaxNode {
    let new_items = visit_all(items, env);
    if unchanged(&new_items, items) {
        return node.clone();
    }
    with_span(Node::Unit(new_items, span), node.span)
}

fn map_block(
    node: &SyntaxNode,
    items: &[SyntaxNode],
    span: Span,
    env: &mut RewriteEnv,
) -> SyntaxNode {
    let new_items = visit_all(items, env);
    if unchanged(&new_items, items) {
        return node.clone();
    }
    with_span(Node::Block(new_items, span), node.span)
}

fn map_call(
    node: &SyntaxNode,
    callee: &SyntaxNode,
    args: &[SyntaxNode],
    span: Span,
    env: &mut RewriteEnv,
) -> SyntaxNode {
    let new_callee = rewrite_node(callee.clone(), env);
    let new_args = visit_all(args, env);
    if Arc::ptr_eq(&new_callee.value, &callee.value) && unchanged(&new_args, args) {
        return node.clone();
    }
    with_span(
        Node::Call {
            callee: Box::new(new_callee),
            args: new_args,
            span,
        },
        node.span,
    )
}

fn map_dynamic_import(
    node: &SyntaxNode,
    bindings: &[String],
    inner: &SyntaxNode,
    span: Span,
    env: &mut RewriteEnv,
) -> SyntaxNode {
    let new_inner = rewrite_node(inner.clone(), env);
    if Arc::ptr_eq(&new_inner.value, &inner.value) {
        return node.clone();
    }
    with_span(
        Node::Import {
            bindings: bindings.to_vec(),
            specifier: Some(Specifier::Dynamic(Box::new(new_inner))),
            span,
        },
        node.span,
    )
}

fn map_dynamic_export(
    node: &SyntaxNode,
    bindings: &[String],
    inner: &SyntaxNode,
    span: Span,
    env: &mut RewriteEnv,
) -> SyntaxNode {
    let new_inner = rewrite_node(inner.clone(), env);
    if Arc::ptr_eq(&new_inner.value, &inner.value) {
        return node.clone();
    }
    with_span(
        Node::Export {
            bindings: bindings.to_vec(),
            specifier: Some(Specifier::Dynamic(Box::new(new_inner))),
            span,
        },
        node.span,
    )
}

fn visit_all(items: &[SyntaxNode], env: &mut RewriteEnv) -> Vec<SyntaxNode> {
    items
        .iter()
        .map(|item| rewrite_node(item.clone(), env))
        .collect()
}

fn unchanged(new: &[SyntaxNode], old: &[SyntaxNode]) -> bool {
    new.iter()
        .zip(old)
        .all(|(n, o)| Arc::ptr_eq(&n.value, &o.value))
}
