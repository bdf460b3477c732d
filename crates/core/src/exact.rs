use crate::{
    evaluate_patterns, evaluate_sub_patterns, BinomialCache, CompiledRules, NormalizedDeck,
};
use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Weighted hand counts accumulated over every distinct opening hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactTally {
    pub total: BigUint,
    pub overall: BigUint,
    pub patterns: Vec<BigUint>,
    pub labels: Vec<BigUint>,
    pub hands: u64,
}

impl ExactTally {
    fn new(patterns: usize, labels: usize) -> Self {
        Self {
            total: BigUint::zero(),
            overall: BigUint::zero(),
            patterns: vec![BigUint::zero(); patterns],
            labels: vec![BigUint::zero(); labels],
            hands: 0,
        }
    }
}

struct Enumerator<'a> {
    deck: &'a NormalizedDeck,
    rules: &'a CompiledRules,
    cache: BinomialCache,
    cards: Vec<usize>,
    /// Copies held by `cards[position..]`, used to drop dead branches.
    reachable: Vec<u64>,
    hand: Vec<u32>,
    remaining: Vec<u32>,
    tally: ExactTally,
}

impl<'a> Enumerator<'a> {
    fn new(deck: &'a NormalizedDeck, rules: &'a CompiledRules) -> Self {
        let cards: Vec<usize> = (0..deck.len())
            .filter(|&index| deck.deck_counts[index] > 0)
            .collect();
        let mut reachable = vec![0u64; cards.len() + 1];
        for position in (0..cards.len()).rev() {
            reachable[position] =
                reachable[position + 1] + u64::from(deck.deck_counts[cards[position]]);
        }
        Self {
            deck,
            rules,
            cache: BinomialCache::new(),
            cards,
            reachable,
            hand: vec![0; deck.len()],
            remaining: deck.deck_counts.clone(),
            tally: ExactTally::new(rules.patterns.len(), rules.labels.len()),
        }
    }

    fn walk(&mut self, position: usize, slots: u32, weight: &BigUint) {
        if slots == 0 {
            self.record(weight);
            return;
        }
        if self.reachable[position] < u64::from(slots) {
            return;
        }
        let Some(&index) = self.cards.get(position) else {
            return;
        };
        let available = self.deck.deck_counts[index];
        for take in 0..=available.min(slots) {
            let ways = self.cache.choose(available, take);
            self.hand[index] = take;
            self.remaining[index] = available - take;
            self.walk(position + 1, slots - take, &(weight * ways));
        }
        self.hand[index] = 0;
        self.remaining[index] = available;
    }

    fn record(&mut self, weight: &BigUint) {
        let evaluation = evaluate_patterns(&self.rules.patterns, &self.hand, &self.remaining);
        let added = evaluate_sub_patterns(
            &self.rules.sub_patterns,
            &self.hand,
            &self.remaining,
            &evaluation,
        );
        let tally = &mut self.tally;
        tally.hands += 1;
        tally.total += weight;
        if evaluation.overall_success() || !added.labels.is_empty() {
            tally.overall += weight;
        }
        for found in &evaluation.matches {
            tally.patterns[found.pattern] += weight;
        }
        for &label in evaluation.labels.union(&added.labels) {
            tally.labels[label] += weight;
        }
    }
}

/// Enumerates every distinct opening hand of `deck.first_hand` cards,
/// weighting each by the number of ways it can be drawn.
pub fn calculate_exact(deck: &NormalizedDeck, rules: &CompiledRules) -> ExactTally {
    let mut enumerator = Enumerator::new(deck, rules);
    enumerator.walk(0, deck.first_hand, &BigUint::one());
    tracing::debug!(
        target: "openrate_core::exact",
        hands = enumerator.tally.hands,
        memo_entries = enumerator.cache.len(),
        "exact enumeration finished"
    );
    enumerator.tally
}
