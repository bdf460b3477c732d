use crate::{count_at, evaluate_conditions, ApplyLimit, CompiledSubPattern, Evaluation};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubPatternOutcome {
    pub triggered: Vec<usize>,
    pub labels: BTreeSet<usize>,
    /// Penetration keyed by disruption card uid.
    pub penetration: BTreeMap<String, i64>,
}

impl SubPatternOutcome {
    pub fn is_empty(&self) -> bool {
        self.triggered.is_empty()
    }
}

fn base_consumption(sub_pattern: &CompiledSubPattern, base: &Evaluation, len: usize) -> Vec<u32> {
    let mut consumed = vec![0u32; len];
    for found in &base.matches {
        let relevant = match &sub_pattern.base_patterns {
            Some(patterns) => patterns.contains(&found.pattern),
            None => true,
        };
        if !relevant {
            continue;
        }
        for (slot, &units) in consumed.iter_mut().zip(&found.consumed) {
            *slot = (*slot).max(units);
        }
    }
    consumed
}

fn is_eligible(sub_pattern: &CompiledSubPattern, base: &Evaluation) -> bool {
    if !sub_pattern.active {
        return false;
    }
    match &sub_pattern.base_patterns {
        None => !base.matches.is_empty(),
        Some(patterns) => patterns.iter().any(|&pattern| base.is_matched(pattern)),
    }
}

/// How many times the effects of an eligible, triggered sub-pattern apply.
pub fn application_count(sub_pattern: &CompiledSubPattern, hand: &[u32]) -> u32 {
    match (sub_pattern.apply_limit, &sub_pattern.trigger_sources) {
        (ApplyLimit::OncePerTrial, _) | (ApplyLimit::OncePerDistinctUid, None) => 1,
        (ApplyLimit::OncePerDistinctUid, Some(sources)) => sources
            .iter()
            .filter(|&&index| count_at(hand, index) > 0)
            .count() as u32,
    }
}

pub fn evaluate_sub_patterns(
    sub_patterns: &[CompiledSubPattern],
    hand: &[u32],
    deck: &[u32],
    base: &Evaluation,
) -> SubPatternOutcome {
    let mut outcome = SubPatternOutcome::default();
    for (index, sub_pattern) in sub_patterns.iter().enumerate() {
        if !is_eligible(sub_pattern, base) {
            continue;
        }
        if evaluate_conditions(&sub_pattern.conditions, hand, deck).is_none() {
            continue;
        }
        if !sub_pattern.base_match.is_empty() {
            let consumed = base_consumption(sub_pattern, base, hand.len());
            if !sub_pattern.base_match.iter().all(|total| total.holds(&consumed)) {
                continue;
            }
        }
        let applications = application_count(sub_pattern, hand);
        if applications == 0 {
            continue;
        }
        outcome.triggered.push(index);
        outcome.labels.extend(sub_pattern.labels.iter().copied());
        for (card, amount) in &sub_pattern.penetration {
            let entry = outcome.penetration.entry(card.clone()).or_insert(0);
            *entry = entry.saturating_add(amount.saturating_mul(i64::from(applications)));
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        CompiledCondition, CompiledRule, CompiledTotal, CountOperator, PatternMatch, RuleMode,
    };

    fn sub(base_patterns: Option<Vec<usize>>) -> CompiledSubPattern {
        CompiledSubPattern {
            uid: "s".to_string(),
            active: true,
            base_patterns,
            conditions: Vec::new(),
            base_match: Vec::new(),
            trigger_sources: None,
            apply_limit: ApplyLimit::OncePerTrial,
            labels: vec![3],
            penetration: vec![("imperm".to_string(), 2)],
        }
    }

    fn matched(pattern: usize, consumed: Vec<u32>) -> Evaluation {
        Evaluation {
            matches: vec![PatternMatch {
                pattern,
                consumed,
                countable: true,
            }],
            ..Evaluation::default()
        }
    }

    #[test]
    fn requires_some_matched_base_pattern() {
        let outcome = evaluate_sub_patterns(&[sub(None)], &[1], &[0], &Evaluation::default());
        assert!(outcome.is_empty());
        let outcome = evaluate_sub_patterns(&[sub(None)], &[1], &[0], &matched(0, vec![1]));
        assert_eq!(outcome.triggered, vec![0]);
        assert!(outcome.labels.contains(&3));
        assert_eq!(outcome.penetration.get("imperm"), Some(&2));
    }

    #[test]
    fn base_pattern_list_must_intersect() {
        let base = matched(1, vec![1]);
        assert!(evaluate_sub_patterns(&[sub(Some(vec![0]))], &[1], &[0], &base).is_empty());
        assert!(!evaluate_sub_patterns(&[sub(Some(vec![0, 1]))], &[1], &[0], &base).is_empty());
    }

    #[test]
    fn distinct_sources_multiply_penetration() {
        let mut per_uid = sub(None);
        per_uid.apply_limit = ApplyLimit::OncePerDistinctUid;
        per_uid.trigger_sources = Some(vec![0, 1, 2]);
        let base = matched(0, vec![0, 0, 0]);
        let outcome = evaluate_sub_patterns(&[per_uid.clone()], &[2, 0, 1], &[0, 1, 0], &base);
        assert_eq!(outcome.penetration.get("imperm"), Some(&4));

        let outcome = evaluate_sub_patterns(&[per_uid], &[0, 0, 0], &[2, 1, 1], &base);
        assert!(outcome.is_empty());
    }

    #[test]
    fn distinct_limit_without_sources_applies_once() {
        let mut per_uid = sub(None);
        per_uid.apply_limit = ApplyLimit::OncePerDistinctUid;
        assert_eq!(application_count(&per_uid, &[2, 1, 1]), 1);

        let base = matched(0, vec![0, 0, 0]);
        let outcome = evaluate_sub_patterns(&[per_uid], &[2, 1, 1], &[0, 0, 0], &base);
        assert_eq!(outcome.triggered, vec![0]);
        assert_eq!(outcome.penetration.get("imperm"), Some(&2));
    }

    #[test]
    fn base_match_total_counts_consumed_units_only() {
        let mut counted = sub(None);
        counted.base_match = vec![CompiledTotal {
            rules: vec![CompiledRule {
                indices: vec![0],
                mode: RuleMode::Raw,
            }],
            operator: CountOperator::Gte,
            count: 2,
        }];
        // two copies in hand, but the base pattern only used one
        let outcome = evaluate_sub_patterns(&[counted.clone()], &[2], &[0], &matched(0, vec![1]));
        assert!(outcome.is_empty());
        let outcome = evaluate_sub_patterns(&[counted], &[2], &[0], &matched(0, vec![2]));
        assert!(!outcome.is_empty());
    }

    #[test]
    fn trigger_conditions_use_pattern_machinery() {
        let mut gated = sub(None);
        gated.conditions = vec![CompiledCondition::Required {
            indices: vec![1],
            count: 1,
        }];
        let base = matched(0, vec![1, 0]);
        assert!(evaluate_sub_patterns(&[gated.clone()], &[1, 0], &[0, 1], &base).is_empty());
        assert!(!evaluate_sub_patterns(&[gated], &[1, 1], &[0, 0], &base).is_empty());
    }
}
