use crate::{
    assign_slots, count_at, CompiledCondition, CompiledPattern, PenetrationEffect, SlotDemand,
};
use std::collections::{BTreeMap, BTreeSet};

pub const SCORE_SUCCESS: u64 = 1_000_000;
pub const SCORE_PER_PATTERN: u64 = 1_000;
pub const SCORE_PER_LABEL: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    pub pattern: usize,
    /// Units of each deck index used to satisfy the pattern's hand conditions.
    pub consumed: Vec<u32>,
    pub countable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub matches: Vec<PatternMatch>,
    pub labels: BTreeSet<usize>,
    /// Labels contributed by patterns that take part in overall rollups.
    pub countable_labels: BTreeSet<usize>,
    pub penetration: BTreeMap<String, i64>,
    pub penetration_effects: Vec<PenetrationEffect>,
}

impl Evaluation {
    pub fn overall_success(&self) -> bool {
        self.matches.iter().any(|found| found.countable) || !self.countable_labels.is_empty()
    }

    pub fn is_matched(&self, pattern: usize) -> bool {
        self.matches.iter().any(|found| found.pattern == pattern)
    }

    /// Ranking used when a card choice has to be made mid-trial.
    pub fn score(&self) -> u64 {
        let success = if self.overall_success() {
            SCORE_SUCCESS
        } else {
            0
        };
        success
            + SCORE_PER_PATTERN * self.matches.len() as u64
            + SCORE_PER_LABEL * self.labels.len() as u64
    }
}

/// Checks `conditions` as one AND group against a hand and the rest of the
/// deck. Returns the units consumed by `required`/`required_distinct`
/// conditions when every condition holds.
pub fn evaluate_conditions(
    conditions: &[CompiledCondition],
    hand: &[u32],
    deck: &[u32],
) -> Option<Vec<u32>> {
    for condition in conditions {
        let holds = match condition {
            CompiledCondition::NotDrawn { indices } => {
                indices.iter().all(|&index| count_at(hand, index) == 0)
            }
            CompiledCondition::DrawTotal(total) => total.holds(hand),
            CompiledCondition::RemainTotal(total) => total.holds(deck),
            CompiledCondition::Required { .. }
            | CompiledCondition::RequiredDistinct { .. }
            | CompiledCondition::LeaveDeck { .. } => true,
        };
        if !holds {
            return None;
        }
    }

    let mut consumed = vec![0u32; hand.len()];
    for condition in conditions {
        if let CompiledCondition::RequiredDistinct { indices, count } = condition {
            let mut selected = 0;
            for &index in indices {
                if selected == *count {
                    break;
                }
                if count_at(hand, index) > 0 {
                    consumed[index] += 1;
                    selected += 1;
                }
            }
            if selected < *count {
                return None;
            }
        }
    }

    let in_hand: Vec<SlotDemand<'_>> = conditions
        .iter()
        .filter_map(|condition| match condition {
            CompiledCondition::Required { indices, count } => Some(SlotDemand {
                indices,
                count: *count,
            }),
            _ => None,
        })
        .collect();
    if !in_hand.is_empty() {
        let mut supply = hand.to_vec();
        if !assign_slots(&in_hand, &mut supply, &mut consumed) {
            return None;
        }
    }

    let in_deck: Vec<SlotDemand<'_>> = conditions
        .iter()
        .filter_map(|condition| match condition {
            CompiledCondition::LeaveDeck { indices, count } => Some(SlotDemand {
                indices,
                count: *count,
            }),
            _ => None,
        })
        .collect();
    if !in_deck.is_empty() {
        let mut supply = deck.to_vec();
        let mut scratch = vec![0u32; deck.len()];
        if !assign_slots(&in_deck, &mut supply, &mut scratch) {
            return None;
        }
    }

    Some(consumed)
}

pub fn evaluate_pattern(pattern: &CompiledPattern, hand: &[u32], deck: &[u32]) -> Option<Vec<u32>> {
    if !pattern.active {
        return None;
    }
    evaluate_conditions(&pattern.conditions, hand, deck)
}

pub fn evaluate_patterns(patterns: &[CompiledPattern], hand: &[u32], deck: &[u32]) -> Evaluation {
    let mut evaluation = Evaluation::default();
    for (index, pattern) in patterns.iter().enumerate() {
        let Some(consumed) = evaluate_pattern(pattern, hand, deck) else {
            continue;
        };
        let countable = !pattern.exclude_from_overall;
        evaluation.labels.extend(pattern.labels.iter().copied());
        if countable {
            evaluation.countable_labels.extend(pattern.labels.iter().copied());
            for effect in &pattern.penetration {
                for category in &effect.disruption_category_uids {
                    let entry = evaluation.penetration.entry(category.clone()).or_insert(0);
                    *entry = entry.saturating_add(effect.amount);
                }
                evaluation.penetration_effects.push(effect.clone());
            }
        }
        evaluation.matches.push(PatternMatch {
            pattern: index,
            consumed,
            countable,
        });
    }
    evaluation
}
