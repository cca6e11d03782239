//! # Graft Rewrite System
//!
//! This module is responsible for the purely syntactic transformation of a
//! parsed source unit: one top-to-bottom walk that rewrites module reference
//! paths and forwards every other node unchanged.
//!
//! ## Core Principles
//!
//! - **Syntactic Only**: rules operate solely on the tree (`SyntaxNode`);
//!   they have no access to files, resolution state, or the host pipeline.
//! - **Pure Transformation**: the walk is a total function
//!   `SyntaxNode -> SyntaxNode`; nodes are replaced, never mutated, and
//!   unchanged subtrees are shared by reference.
//! - **Inspectable**: every applied rewrite is recorded in the environment's
//!   trace, so hosts can see exactly which rule fired where.
//!
//! ## Rule Composition
//!
//! A rule is `SyntaxNode -> Option<SyntaxNode>`. The environment holds named
//! rules in a fixed priority order; at each node the first match wins and the
//! replacement is returned without revisiting.

use serde::{Deserialize, Serialize};

use crate::errors::GraftError;
use crate::syntax::SyntaxNode;

pub use rules::{eligible_specifier, needs_rewrite, RuleTarget, SuffixRule};
pub use walker::rewrite_unit;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// The suffix appended by the default environment.
pub const DEFAULT_SUFFIX: &str = ".js";

/// A rewrite rule as a native Rust function.
///
/// Returns `Some(replacement)` when the rule decides the node, `None` to let
/// the walk fall through to later rules and the generic recursive rebuild.
pub type RuleFn = fn(&SyntaxNode) -> Option<SyntaxNode>;

/// A rule definition, either a native function or a configured suffix rule.
#[derive(Debug, Clone)]
pub enum RuleDef {
    /// A native Rust function rule
    Fn(RuleFn),
    /// A built-in suffix-appending rule
    Suffix(SuffixRule),
}

impl RuleDef {
    /// Applies the rule to a node, producing a replacement on match.
    pub fn apply(&self, node: &SyntaxNode) -> Option<SyntaxNode> {
        match self {
            RuleDef::Fn(func) => func(node),
            RuleDef::Suffix(rule) => rule.apply(node),
        }
    }
}

/// Provenance of a rewrite step: built-in or user-registered rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleProvenance {
    Builtin,
    User,
}

/// A rule with its registered name and provenance.
#[derive(Debug, Clone)]
pub struct NamedRule {
    pub name: String,
    pub provenance: RuleProvenance,
    pub def: RuleDef,
}

/// A single applied rewrite, for traceability.
#[derive(Debug, Clone)]
pub struct RewriteStep {
    /// The rule that fired.
    pub rule_name: String,
    /// Which registry the rule came from.
    pub provenance: RuleProvenance,
    /// The node before rewriting.
    pub input: SyntaxNode,
    /// The node after rewriting.
    pub output: SyntaxNode,
}

/// Rewrite environment: the priority-ordered rule list and the trace.
#[derive(Debug, Clone, Default)]
pub struct RewriteEnv {
    rules: Vec<NamedRule>,
    /// Trace of applied rewrites, in walk order.
    pub trace: Vec<RewriteStep>,
}

// ============================================================================
// PUBLIC API IMPLEMENTATION
// ============================================================================

impl RewriteEnv {
    /// Creates a new, empty environment with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Environment carrying the built-in suffix rules for the given suffix.
    pub fn with_suffix(suffix: &str) -> Result<Self, GraftError> {
        let mut env = Self::new();
        env.register_suffix_rules(suffix)?;
        Ok(env)
    }

    /// Appends the built-in suffix rules: module reference declarations
    /// first, dynamic `import()` calls second.
    pub fn register_suffix_rules(&mut self, suffix: &str) -> Result<(), GraftError> {
        self.insert(
            "append-extension",
            RuleProvenance::Builtin,
            RuleDef::Suffix(SuffixRule::new(suffix, RuleTarget::Declarations)?),
        )?;
        self.insert(
            "append-extension-dynamic",
            RuleProvenance::Builtin,
            RuleDef::Suffix(SuffixRule::new(suffix, RuleTarget::DynamicImports)?),
        )
    }

    /// Registers a user rule. Rules apply in registration order, so a rule
    /// registered before the built-ins takes priority over them.
    ///
    /// # Errors
    /// Returns an error if a rule with this name is already registered.
    pub fn register(&mut self, name: &str, def: RuleDef) -> Result<(), GraftError> {
        self.insert(name, RuleProvenance::User, def)
    }

    /// Returns the rules in priority order.
    pub fn rules(&self) -> &[NamedRule] {
        &self.rules
    }

    /// Returns a reference to the rewrite trace.
    pub fn trace(&self) -> &[RewriteStep] {
        &self.trace
    }

    /// Clears the rewrite trace, e.g. between source units.
    pub fn clear_trace(&mut self) {
        self.trace.clear();
    }

    fn insert(
        &mut self,
        name: &str,
        provenance: RuleProvenance,
        def: RuleDef,
    ) -> Result<(), GraftError> {
        if self.rules.iter().any(|rule| rule.name == name) {
            return Err(GraftError::DuplicateRule {
                name: name.to_string(),
            });
        }
        self.rules.push(NamedRule {
            name: name.to_string(),
            provenance,
            def,
        });
        Ok(())
    }
}

// ============================================================================
// MODULE EXPORTS
// ============================================================================

pub mod rules;
pub mod walker;
