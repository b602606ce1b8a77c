//! Single-pass summarization of a rule forest.
//!
//! One depth-first walk computes the three artifact header counters and
//! installs the `thread` pre-order successor links used for linear
//! traversal by the matching runtime.

use super::ast::{RuleId, Ruleset};

/// Totals for the artifact header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub rules: u32,
    pub fields: u32,
    pub pattern_bytes: u32,
}

/// Walk the whole forest once — each node, then its subs chain, then its
/// siblings — accumulating totals and threading each visited rule to its
/// pre-order successor.
pub fn summarize(rules: &mut Ruleset) -> Totals {
    let mut totals = Totals::default();
    let mut prev: Option<RuleId> = None;

    let mut next = rules.root;
    while let Some(id) = next {
        prev = visit(rules, id, &mut totals, prev);
        next = rules.rule(id).sibling;
    }

    totals
}

/// Visit `id` and its subtree; returns the last rule visited so the
/// caller can continue the thread across sibling subtrees.
fn visit(
    rules: &mut Ruleset,
    id: RuleId,
    totals: &mut Totals,
    prev: Option<RuleId>,
) -> Option<RuleId> {
    if let Some(p) = prev {
        rules.rule_mut(p).thread = Some(id);
    }

    totals.rules += 1;
    totals.fields += rules.rule(id).fields.len() as u32;
    totals.pattern_bytes += rules.rule(id).pattern.len() as u32;

    let mut prev = Some(id);
    let mut next = rules.rule(id).subs;
    while let Some(child) = next {
        prev = visit(rules, child, totals, prev);
        next = rules.rule(child).sibling;
    }
    prev
}
