use crate::{
    ApplyLimit, CountOperator, CountRule, LabelEntry, NormalizedDeck, Pattern, PatternCondition,
    PatternEffect, PenetrationEffect, RuleMode, SubPattern, SubPatternEffect, TotalCondition,
    TriggerCondition,
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub indices: Vec<usize>,
    pub mode: RuleMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTotal {
    pub rules: Vec<CompiledRule>,
    pub operator: CountOperator,
    pub count: u32,
}

impl CompiledTotal {
    pub fn total(&self, counts: &[u32]) -> u32 {
        self.rules
            .iter()
            .map(|rule| {
                let sum = rule
                    .indices
                    .iter()
                    .fold(0u32, |sum, &index| sum.saturating_add(count_at(counts, index)));
                match rule.mode {
                    RuleMode::Cap1 => sum.min(1),
                    RuleMode::Raw => sum,
                }
            })
            .fold(0u32, u32::saturating_add)
    }

    pub fn holds(&self, counts: &[u32]) -> bool {
        self.operator.holds(self.total(counts), self.count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompiledCondition {
    Required { indices: Vec<usize>, count: u32 },
    /// Indices are kept sorted so selection runs in index order.
    RequiredDistinct { indices: Vec<usize>, count: u32 },
    LeaveDeck { indices: Vec<usize>, count: u32 },
    NotDrawn { indices: Vec<usize> },
    DrawTotal(CompiledTotal),
    RemainTotal(CompiledTotal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    pub uid: String,
    pub active: bool,
    pub exclude_from_overall: bool,
    pub conditions: Vec<CompiledCondition>,
    /// Attached labels and `add_label` effect labels, deduplicated.
    pub labels: Vec<usize>,
    pub penetration: Vec<PenetrationEffect>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSubPattern {
    pub uid: String,
    pub active: bool,
    /// `None` means any matched base pattern qualifies.
    pub base_patterns: Option<Vec<usize>>,
    pub conditions: Vec<CompiledCondition>,
    pub base_match: Vec<CompiledTotal>,
    /// `None` means the effect applies once when eligible.
    pub trigger_sources: Option<Vec<usize>>,
    pub apply_limit: ApplyLimit,
    pub labels: Vec<usize>,
    pub penetration: Vec<(String, i64)>,
}

/// Label uids interned to dense indices. Declared labels come first, in
/// request order; labels only referenced by patterns follow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    uids: Vec<String>,
    index: HashMap<String, usize>,
    declared: usize,
}

impl LabelTable {
    pub fn from_declared(labels: &[LabelEntry]) -> Self {
        let mut table = Self::default();
        for label in labels {
            table.intern(&label.uid);
        }
        table.declared = table.uids.len();
        table
    }

    pub fn intern(&mut self, uid: &str) -> usize {
        if let Some(&index) = self.index.get(uid) {
            return index;
        }
        let index = self.uids.len();
        self.uids.push(uid.to_string());
        self.index.insert(uid.to_string(), index);
        index
    }

    pub fn index_of(&self, uid: &str) -> Option<usize> {
        self.index.get(uid).copied()
    }

    pub fn uid(&self, index: usize) -> Option<&str> {
        self.uids.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.uids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uids.is_empty()
    }

    pub fn declared(&self) -> &[String] {
        &self.uids[..self.declared]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRules {
    pub patterns: Vec<CompiledPattern>,
    pub sub_patterns: Vec<CompiledSubPattern>,
    pub labels: LabelTable,
}

pub fn count_at(counts: &[u32], index: usize) -> u32 {
    counts.get(index).copied().unwrap_or(0)
}

/// Maps uids to deck indices. Unknown uids and repeats are dropped.
pub fn resolve_indices(deck: &NormalizedDeck, uids: &[String]) -> Vec<usize> {
    let mut indices = Vec::with_capacity(uids.len());
    for uid in uids {
        if let Some(index) = deck.index_of(uid) {
            if !indices.contains(&index) {
                indices.push(index);
            }
        }
    }
    indices
}

fn compile_rule(deck: &NormalizedDeck, rule: &CountRule) -> CompiledRule {
    CompiledRule {
        indices: resolve_indices(deck, &rule.uids),
        mode: rule.mode,
    }
}

pub fn compile_total(deck: &NormalizedDeck, total: &TotalCondition) -> CompiledTotal {
    CompiledTotal {
        rules: total.rules.iter().map(|rule| compile_rule(deck, rule)).collect(),
        operator: total.operator,
        count: total.count,
    }
}

pub fn compile_condition(deck: &NormalizedDeck, condition: &PatternCondition) -> CompiledCondition {
    match condition {
        PatternCondition::Required(inner) => CompiledCondition::Required {
            indices: resolve_indices(deck, &inner.uids),
            count: inner.count,
        },
        PatternCondition::RequiredDistinct(inner) => {
            let mut indices = resolve_indices(deck, &inner.uids);
            indices.sort_unstable();
            CompiledCondition::RequiredDistinct {
                indices,
                count: inner.count,
            }
        }
        PatternCondition::LeaveDeck(inner) => CompiledCondition::LeaveDeck {
            indices: resolve_indices(deck, &inner.uids),
            count: inner.count,
        },
        PatternCondition::NotDrawn(inner) => CompiledCondition::NotDrawn {
            indices: resolve_indices(deck, &inner.uids),
        },
        PatternCondition::DrawTotal(total) => {
            CompiledCondition::DrawTotal(compile_total(deck, total))
        }
        PatternCondition::RemainTotal(total) => {
            CompiledCondition::RemainTotal(compile_total(deck, total))
        }
    }
}

fn intern_all(labels: &mut LabelTable, out: &mut Vec<usize>, uids: &[String]) {
    for uid in uids {
        let index = labels.intern(uid);
        if !out.contains(&index) {
            out.push(index);
        }
    }
}

pub fn compile_pattern(
    deck: &NormalizedDeck,
    labels: &mut LabelTable,
    pattern: &Pattern,
) -> CompiledPattern {
    let mut label_indices = Vec::new();
    intern_all(labels, &mut label_indices, &pattern.labels);
    let mut penetration = Vec::new();
    for effect in &pattern.effects {
        match effect {
            PatternEffect::AddLabel { label_uids } => {
                intern_all(labels, &mut label_indices, label_uids);
            }
            PatternEffect::AddPenetration {
                disruption_category_uids,
                amount,
                pool_id,
            } => penetration.push(PenetrationEffect {
                disruption_category_uids: disruption_category_uids.clone(),
                amount: *amount,
                pool_id: pool_id.clone(),
            }),
        }
    }
    CompiledPattern {
        uid: pattern.uid.clone(),
        active: pattern.active,
        exclude_from_overall: pattern.exclude_from_overall,
        conditions: pattern
            .conditions
            .iter()
            .map(|condition| compile_condition(deck, condition))
            .collect(),
        labels: label_indices,
        penetration,
    }
}

pub fn compile_sub_pattern(
    deck: &NormalizedDeck,
    labels: &mut LabelTable,
    pattern_index: &HashMap<&str, usize>,
    sub_pattern: &SubPattern,
) -> CompiledSubPattern {
    let base_patterns = (!sub_pattern.base_pattern_uids.is_empty()).then(|| {
        let mut indices: Vec<usize> = sub_pattern
            .base_pattern_uids
            .iter()
            .filter_map(|uid| pattern_index.get(uid.as_str()).copied())
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    });
    let trigger_sources = (!sub_pattern.trigger_source_uids.is_empty())
        .then(|| resolve_indices(deck, &sub_pattern.trigger_source_uids));

    let mut conditions = Vec::new();
    let mut base_match = Vec::new();
    for trigger in &sub_pattern.trigger_conditions {
        let condition = match trigger {
            TriggerCondition::BaseMatchTotal(total) => {
                base_match.push(compile_total(deck, total));
                continue;
            }
            TriggerCondition::Required(inner) => PatternCondition::Required(inner.clone()),
            TriggerCondition::RequiredDistinct(inner) => {
                PatternCondition::RequiredDistinct(inner.clone())
            }
            TriggerCondition::LeaveDeck(inner) => PatternCondition::LeaveDeck(inner.clone()),
            TriggerCondition::NotDrawn(inner) => PatternCondition::NotDrawn(inner.clone()),
            TriggerCondition::DrawTotal(total) => PatternCondition::DrawTotal(total.clone()),
            TriggerCondition::RemainTotal(total) => PatternCondition::RemainTotal(total.clone()),
        };
        conditions.push(compile_condition(deck, &condition));
    }

    let mut label_indices = Vec::new();
    let mut penetration = Vec::new();
    for effect in &sub_pattern.effects {
        match effect {
            SubPatternEffect::AddLabel { label_uids } => {
                intern_all(labels, &mut label_indices, label_uids);
            }
            SubPatternEffect::AddPenetration {
                disruption_card_uids,
                amount,
            } => {
                for card in disruption_card_uids {
                    penetration.push((card.clone(), *amount));
                }
            }
        }
    }

    CompiledSubPattern {
        uid: sub_pattern.uid.clone(),
        active: sub_pattern.active,
        base_patterns,
        conditions,
        base_match,
        trigger_sources,
        apply_limit: sub_pattern.apply_limit,
        labels: label_indices,
        penetration,
    }
}

pub fn compile(
    deck: &NormalizedDeck,
    patterns: &[Pattern],
    sub_patterns: &[SubPattern],
    declared_labels: &[LabelEntry],
) -> CompiledRules {
    let mut labels = LabelTable::from_declared(declared_labels);
    let compiled_patterns: Vec<CompiledPattern> = patterns
        .iter()
        .map(|pattern| compile_pattern(deck, &mut labels, pattern))
        .collect();
    let mut pattern_index: HashMap<&str, usize> = HashMap::new();
    for (index, pattern) in patterns.iter().enumerate() {
        pattern_index.entry(pattern.uid.as_str()).or_insert(index);
    }
    let compiled_sub_patterns = sub_patterns
        .iter()
        .map(|sub_pattern| compile_sub_pattern(deck, &mut labels, &pattern_index, sub_pattern))
        .collect();
    CompiledRules {
        patterns: compiled_patterns,
        sub_patterns: compiled_sub_patterns,
        labels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardCountCondition, CardEntry, DeckSettings, PotSettings};

    fn sample_deck() -> NormalizedDeck {
        let cards = vec![CardEntry::new("ash", 3), CardEntry::new("droll", 2)];
        NormalizedDeck::normalize(
            DeckSettings {
                card_count: 40,
                first_hand: 5,
            },
            &cards,
            &PotSettings::default(),
        )
        .expect("normalize")
    }

    #[test]
    fn unknown_uids_are_dropped() {
        let deck = sample_deck();
        let condition = PatternCondition::required(&["ash", "missing", "ash"], 1);
        let compiled = compile_condition(&deck, &condition);
        assert_eq!(
            compiled,
            CompiledCondition::Required {
                indices: vec![0],
                count: 1
            }
        );
    }

    #[test]
    fn distinct_indices_are_sorted() {
        let deck = sample_deck();
        let condition = PatternCondition::RequiredDistinct(CardCountCondition {
            uids: vec!["droll".to_string(), "ash".to_string()],
            count: 2,
        });
        match compile_condition(&deck, &condition) {
            CompiledCondition::RequiredDistinct { indices, .. } => assert_eq!(indices, vec![0, 1]),
            other => panic!("unexpected condition: {other:?}"),
        }
    }

    #[test]
    fn pattern_labels_merge_attached_and_effect_labels() {
        let deck = sample_deck();
        let mut pattern = Pattern::new("p", vec![PatternCondition::required(&["ash"], 1)]);
        pattern.labels = vec!["starter".to_string()];
        pattern.effects = vec![PatternEffect::AddLabel {
            label_uids: vec!["starter".to_string(), "extender".to_string()],
        }];
        let rules = compile(&deck, &[pattern], &[], &[LabelEntry::new("extender")]);
        assert_eq!(rules.labels.declared(), &["extender".to_string()]);
        assert_eq!(rules.labels.index_of("starter"), Some(1));
        assert_eq!(rules.patterns[0].labels, vec![1, 0]);
    }

    #[test]
    fn unresolved_base_patterns_stay_restrictive() {
        let deck = sample_deck();
        let mut sub = SubPattern::new("s", Vec::new());
        sub.base_pattern_uids = vec!["missing".to_string()];
        sub.trigger_source_uids = vec!["missing".to_string()];
        let rules = compile(&deck, &[], &[sub], &[]);
        assert_eq!(rules.sub_patterns[0].base_patterns, Some(Vec::new()));
        assert_eq!(rules.sub_patterns[0].trigger_sources, Some(Vec::new()));
    }
}
