use crate::{
    evaluate_patterns, evaluate_sub_patterns, CompiledRules, Evaluation, NormalizedDeck,
    OpponentPlan, RngState, SubPatternOutcome, VsTally,
};
use std::collections::VecDeque;

pub const DESIRES_DRAW: usize = 2;

#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub trials: u64,
    pub prosperity_cost: u32,
    pub sub_patterns: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationTally {
    pub trials: u64,
    pub overall: u64,
    pub patterns: Vec<u64>,
    pub labels: Vec<u64>,
    pub vs: Option<VsTally>,
}

/// Which pot card, if any, resolved during a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotResolution {
    None,
    Prosperity { revealed: usize, picked: Option<usize> },
    Desires { drawn: usize },
}

fn counts_of(len: usize, cards: impl IntoIterator<Item = usize>) -> Vec<u32> {
    let mut counts = vec![0u32; len];
    for index in cards {
        counts[index] += 1;
    }
    counts
}

pub struct Simulator<'a> {
    deck: &'a NormalizedDeck,
    rules: &'a CompiledRules,
    options: SimulationOptions,
    opponent: Option<OpponentPlan>,
    rng: RngState,
    pool: Vec<usize>,
}

impl<'a> Simulator<'a> {
    pub fn new(
        deck: &'a NormalizedDeck,
        rules: &'a CompiledRules,
        options: SimulationOptions,
        opponent: Option<OpponentPlan>,
        rng: RngState,
    ) -> Self {
        Self {
            deck,
            rules,
            options,
            opponent,
            rng,
            pool: deck.card_pool(),
        }
    }

    /// Shuffles, deals the opening hand and resolves pot cards. Returns the
    /// hand counts and the library in draw order.
    pub fn deal(&mut self) -> (Vec<u32>, VecDeque<usize>, PotResolution) {
        let mut order = self.pool.clone();
        self.rng.shuffle(&mut order);
        let dealt = (self.deck.first_hand as usize).min(order.len());
        let mut hand = counts_of(self.deck.len(), order[..dealt].iter().copied());
        let mut library: VecDeque<usize> = order[dealt..].iter().copied().collect();
        let resolution = self.resolve_pot(&mut hand, &mut library);
        (hand, library, resolution)
    }

    fn resolve_pot(&self, hand: &mut [u32], library: &mut VecDeque<usize>) -> PotResolution {
        if let Some(prosperity) = self.deck.prosperity_index.filter(|&index| hand[index] > 0) {
            hand[prosperity] -= 1;
            let reveal = (self.options.prosperity_cost as usize).min(library.len());
            let revealed: Vec<usize> = library.drain(..reveal).collect();
            let picked = self.pick_best(hand, library, &revealed);
            if let Some(position) = picked {
                hand[revealed[position]] += 1;
            }
            for (position, &card) in revealed.iter().enumerate() {
                if Some(position) != picked {
                    library.push_back(card);
                }
            }
            return PotResolution::Prosperity {
                revealed: revealed.len(),
                picked: picked.map(|position| revealed[position]),
            };
        }
        if let Some(desires) = self.deck.desires_index.filter(|&index| hand[index] > 0) {
            hand[desires] -= 1;
            let mut drawn = 0;
            while drawn < DESIRES_DRAW {
                let Some(card) = library.pop_front() else {
                    break;
                };
                hand[card] += 1;
                drawn += 1;
            }
            return PotResolution::Desires { drawn };
        }
        PotResolution::None
    }

    // First revealed card with the highest score wins ties.
    fn pick_best(
        &self,
        hand: &mut [u32],
        library: &VecDeque<usize>,
        revealed: &[usize],
    ) -> Option<usize> {
        if revealed.is_empty() {
            return None;
        }
        let mut deck = counts_of(self.deck.len(), library.iter().chain(revealed).copied());
        let mut best: Option<(usize, u64)> = None;
        for (position, &card) in revealed.iter().enumerate() {
            hand[card] += 1;
            deck[card] -= 1;
            let score = evaluate_patterns(&self.rules.patterns, hand, &deck).score();
            hand[card] -= 1;
            deck[card] += 1;
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((position, score));
            }
        }
        best.map(|(position, _)| position)
    }

    pub fn run(mut self) -> SimulationTally {
        let mut tally = SimulationTally {
            trials: self.options.trials,
            overall: 0,
            patterns: vec![0; self.rules.patterns.len()],
            labels: vec![0; self.rules.labels.len()],
            vs: self.opponent.as_ref().map(|_| VsTally::default()),
        };
        for _ in 0..self.options.trials {
            let (hand, library, _) = self.deal();
            let deck = counts_of(self.deck.len(), library.iter().copied());
            let evaluation = evaluate_patterns(&self.rules.patterns, &hand, &deck);
            let added = if self.options.sub_patterns || self.opponent.is_some() {
                evaluate_sub_patterns(&self.rules.sub_patterns, &hand, &deck, &evaluation)
            } else {
                SubPatternOutcome::default()
            };
            let success = self.record(&mut tally, &evaluation, &added);
            if let (Some(opponent), Some(vs)) = (self.opponent.as_ref(), tally.vs.as_mut()) {
                opponent.resolve(&mut self.rng, &evaluation, &added, success, vs);
            }
        }
        tracing::debug!(
            target: "openrate_core::simulate",
            trials = tally.trials,
            seed = self.rng.seed(),
            overall = tally.overall,
            "simulation finished"
        );
        tally
    }

    fn record(
        &self,
        tally: &mut SimulationTally,
        evaluation: &Evaluation,
        added: &SubPatternOutcome,
    ) -> bool {
        let with_sub_patterns = self.options.sub_patterns;
        let success =
            evaluation.overall_success() || (with_sub_patterns && !added.labels.is_empty());
        if success {
            tally.overall += 1;
        }
        for found in &evaluation.matches {
            tally.patterns[found.pattern] += 1;
        }
        for &label in &evaluation.labels {
            tally.labels[label] += 1;
        }
        if with_sub_patterns {
            for &label in added.labels.difference(&evaluation.labels) {
                tally.labels[label] += 1;
            }
        }
        success
    }
}
