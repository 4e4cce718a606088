// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! First-match-wins evaluation of auto-reply rules against message text.
//!
//! Pure functions with no side effects: the dispatch pipeline hands in
//! the channel's rules in evaluation order and the inbound text, and gets
//! back the first rule whose trigger matches, or nothing.

use botline_core::types::{AutoReplyRule, MatchMode};
use regex::RegexBuilder;
use tracing::warn;

/// Returns the first active rule whose trigger matches `text`.
///
/// Rules are scanned in the order given (callers pass them pre-sorted by
/// priority descending, creation order ascending -- see [`order_rules`]).
/// Scanning stops at the first match; this is first-match-wins, not
/// best-match. Empty or whitespace-only text never matches any rule.
pub fn first_match<'a>(rules: &'a [AutoReplyRule], text: &str) -> Option<&'a AutoReplyRule> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    rules
        .iter()
        .filter(|rule| rule.active)
        .find(|rule| trigger_matches(rule, trimmed))
}

/// Sorts rules into deterministic evaluation order: priority descending,
/// ties broken by creation timestamp ascending, then id ascending.
///
/// The sort is stable, so replaying the same rule set always yields the
/// same winner.
pub fn order_rules(rules: &mut [AutoReplyRule]) {
    rules.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
}

/// Tests one rule's trigger against already-trimmed message text.
fn trigger_matches(rule: &AutoReplyRule, text: &str) -> bool {
    match rule.match_mode {
        MatchMode::Exact => text.to_lowercase() == rule.trigger.trim().to_lowercase(),
        MatchMode::Contains => text
            .to_lowercase()
            .contains(&rule.trigger.trim().to_lowercase()),
        MatchMode::Regex => match RegexBuilder::new(&rule.trigger).case_insensitive(true).build()
        {
            Ok(re) => re.is_match(text),
            Err(e) => {
                // An unparseable pattern is an operator configuration
                // problem; it must not take the pipeline down.
                warn!(rule_id = rule.id, error = %e, "invalid regex trigger, rule skipped");
                false
            }
        },
    }
}
