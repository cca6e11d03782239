// tests/walker_tests.rs
//
// Traversal shape: structural sharing of untouched subtrees, span
// preservation across replacement, the rewrite trace, and the serde
// interchange edge.

use std::sync::Arc;

use graft::errors::GraftError;
use graft::rewrite::{rewrite_unit, RewriteEnv, RuleProvenance, DEFAULT_SUFFIX};
use graft::syntax::builder::{block, call, ident, import, number, str_lit, unit, with_span};
use graft::syntax::{unit_from_json, Node, Span, Specifier};

fn sp() -> Span {
    Span::default()
}

fn default_env() -> RewriteEnv {
    RewriteEnv::with_suffix(DEFAULT_SUFFIX).expect("default suffix is valid")
}

#[test]
fn untouched_sibling_subtree_is_shared() {
    let touched = import(&["add"], "./math", sp());
    let untouched = block(
        vec![call(ident("main", sp()), vec![number(1.0, sp())], sp())],
        sp(),
    );
    let tree = unit(vec![touched.clone(), untouched.clone()], sp());

    let mut env = default_env();
    let out = rewrite_unit(tree.clone(), &mut env);

    let Node::Unit(items, _) = &*out.value else {
        panic!("expected a unit root");
    };
    assert!(!Arc::ptr_eq(&out.value, &tree.value), "root was rebuilt");
    assert!(!Arc::ptr_eq(&items[0].value, &touched.value), "reference was replaced");
    assert!(Arc::ptr_eq(&items[1].value, &untouched.value), "sibling is shared");
}

#[test]
fn fully_untouched_tree_returns_the_original_root() {
    let tree = unit(
        vec![
            import(&["merge"], "lodash", sp()),
            block(vec![str_lit("hello", sp())], sp()),
        ],
        sp(),
    );
    let mut env = default_env();
    let out = rewrite_unit(tree.clone(), &mut env);
    assert!(Arc::ptr_eq(&out.value, &tree.value));
}

#[test]
fn leaves_inside_a_rebuilt_parent_keep_their_identity() {
    let leaf = number(7.0, sp());
    let tree = block(vec![leaf.clone(), import(&["a"], "./a", sp())], sp());

    let mut env = default_env();
    let out = rewrite_unit(tree, &mut env);

    let Node::Block(items, _) = &*out.value else {
        panic!("expected a block root");
    };
    assert!(Arc::ptr_eq(&items[0].value, &leaf.value));
}

#[test]
fn spans_survive_the_rewrite() {
    let node_span = Span { start: 0, end: 30 };
    let spec_span = Span { start: 20, end: 28 };
    let tree = with_span(
        Node::Import {
            bindings: vec!["add".to_string()],
            specifier: Some(Specifier::Literal("./math".to_string(), spec_span)),
            span: node_span,
        },
        node_span,
    );

    let mut env = default_env();
    let out = rewrite_unit(tree, &mut env);

    assert_eq!(out.span, node_span);
    let Node::Import {
        specifier: Some(Specifier::Literal(text, out_spec_span)),
        span,
        ..
    } = &*out.value
    else {
        panic!("expected an import with a literal specifier");
    };
    assert_eq!(text, "./math.js");
    assert_eq!(*out_spec_span, spec_span);
    assert_eq!(*span, node_span);
}

#[test]
fn trace_records_input_and_output_nodes() {
    let mut env = default_env();
    rewrite_unit(unit(vec![import(&["add"], "./math", sp())], sp()), &mut env);

    assert_eq!(env.trace().len(), 1);
    let step = &env.trace()[0];
    assert_eq!(step.rule_name, "append-extension");
    assert_eq!(step.provenance, RuleProvenance::Builtin);
    assert_eq!(step.input.value.pretty(), r#"import { add } from "./math""#);
    assert_eq!(step.output.value.pretty(), r#"import { add } from "./math.js""#);
}

#[test]
fn trace_can_be_cleared_between_units() {
    let mut env = default_env();
    rewrite_unit(import(&["a"], "./a", sp()), &mut env);
    assert_eq!(env.trace().len(), 1);
    env.clear_trace();
    assert!(env.trace().is_empty());
}

#[test]
fn a_unit_survives_the_interchange_form() {
    let tree = unit(
        vec![
            import(&["add"], "./math", sp()),
            block(vec![number(1.0, sp()), str_lit("x", sp())], sp()),
        ],
        sp(),
    );
    let payload = serde_json::to_string(&tree).expect("tree serializes");
    let decoded = unit_from_json(&payload).expect("payload decodes");
    assert_eq!(decoded, tree);
}

#[test]
fn malformed_payload_is_a_decode_error() {
    let result = unit_from_json("{ not a tree");
    assert!(matches!(result, Err(GraftError::Decode(_))));
}
