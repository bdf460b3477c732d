use crate::{
    check_penetration, Evaluation, PenetrationEffect, PenetrationVerdict, RngState,
    SubPatternOutcome, VsSettings,
};
use std::collections::{BTreeMap, HashMap};

/// Opponent deck of disruption cards plus blanks, drawn once per trial.
#[derive(Debug, Clone)]
pub struct OpponentPlan {
    categories: Vec<String>,
    card_category: HashMap<String, String>,
    /// `None` entries are blanks.
    pool: Vec<Option<usize>>,
    hand_size: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VsTally {
    pub successes: u64,
    pub disrupted: u64,
}

impl OpponentPlan {
    pub fn from_settings(settings: &VsSettings) -> Option<Self> {
        if !settings.enabled {
            return None;
        }
        let mut categories = Vec::new();
        let mut card_category = HashMap::new();
        let mut pool = Vec::new();
        for (slot, card) in settings.opponent_disruptions.iter().enumerate() {
            let category = card.category().to_string();
            card_category.insert(card.uid.clone(), category.clone());
            categories.push(category);
            pool.extend(std::iter::repeat(Some(slot)).take(card.count as usize));
        }
        let blanks = (settings.opponent_deck_size as usize).saturating_sub(pool.len());
        pool.extend(std::iter::repeat(None).take(blanks));
        Some(Self {
            categories,
            card_category,
            pool,
            hand_size: settings.opponent_hand_size as usize,
        })
    }

    /// Shuffles the opponent deck and returns the penetration needed per
    /// category to get through every disruption in the opening hand.
    pub fn draw_requirements(&self, rng: &mut RngState) -> BTreeMap<String, i64> {
        let mut order = self.pool.clone();
        rng.shuffle(&mut order);
        let mut requirements = BTreeMap::new();
        for slot in order.iter().take(self.hand_size).flatten() {
            if let Some(category) = self.categories.get(*slot) {
                *requirements.entry(category.clone()).or_insert(0) += 1;
            }
        }
        requirements
    }

    /// Penetration available from one trial's matched patterns and
    /// triggered sub-patterns.
    pub fn supply(
        &self,
        evaluation: &Evaluation,
        added: &SubPatternOutcome,
    ) -> Vec<PenetrationEffect> {
        let mut effects = evaluation.penetration_effects.clone();
        for (card, &amount) in &added.penetration {
            let category = self
                .card_category
                .get(card)
                .cloned()
                .unwrap_or_else(|| card.clone());
            effects.push(PenetrationEffect {
                disruption_category_uids: vec![category],
                amount,
                pool_id: None,
            });
        }
        effects
    }

    pub fn resolve(
        &self,
        rng: &mut RngState,
        evaluation: &Evaluation,
        added: &SubPatternOutcome,
        success: bool,
        tally: &mut VsTally,
    ) -> PenetrationVerdict {
        let requirements = self.draw_requirements(rng);
        if !requirements.is_empty() {
            tally.disrupted += 1;
        }
        let verdict = check_penetration(&requirements, &self.supply(evaluation, added));
        if success && verdict.feasible {
            tally.successes += 1;
        }
        verdict
    }
}
