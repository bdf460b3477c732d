use crate::{CardEntry, DeckSettings, PotSettings};
use std::collections::HashMap;
use thiserror::Error;

pub const UNKNOWN_CARD_UID: &str = "__unknown__";
pub const PROSPERITY_CARD_UID: &str = "__pot_prosperity__";
pub const DESIRES_CARD_UID: &str = "__pot_desires__";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("deck lists {total_cards} cards but holds {deck_size} ({excess} too many)")]
    CardCountExceeded {
        deck_size: u32,
        total_cards: u32,
        excess: u32,
    },
}

/// Index-addressed view of a deck. Every card with a positive count gets an
/// index; the gap to the declared deck size is held by a filler card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDeck {
    pub uid_to_index: HashMap<String, usize>,
    pub index_to_uid: Vec<String>,
    pub deck_counts: Vec<u32>,
    pub prosperity_index: Option<usize>,
    pub desires_index: Option<usize>,
    pub unknown_index: Option<usize>,
    pub card_count: u32,
    pub first_hand: u32,
}

impl NormalizedDeck {
    pub fn normalize(
        deck: DeckSettings,
        cards: &[CardEntry],
        pot: &PotSettings,
    ) -> Result<Self, NormalizeError> {
        let mut normalized = Self {
            uid_to_index: HashMap::new(),
            index_to_uid: Vec::new(),
            deck_counts: Vec::new(),
            prosperity_index: None,
            desires_index: None,
            unknown_index: None,
            card_count: deck.card_count,
            first_hand: deck.first_hand,
        };

        let mut listed: u64 = 0;
        for card in cards {
            if card.count == 0 {
                continue;
            }
            listed += u64::from(card.count);
            normalized.push(&card.uid, card.count);
        }
        if pot.prosperity.count > 0 {
            listed += u64::from(pot.prosperity.count);
            normalized.prosperity_index =
                Some(normalized.push(PROSPERITY_CARD_UID, pot.prosperity.count));
        }
        if pot.desires_or_extravagance.count > 0 {
            listed += u64::from(pot.desires_or_extravagance.count);
            normalized.desires_index = Some(
                normalized.push(DESIRES_CARD_UID, pot.desires_or_extravagance.count),
            );
        }

        let deck_size = u64::from(deck.card_count);
        if listed > deck_size {
            let total_cards = u32::try_from(listed).unwrap_or(u32::MAX);
            return Err(NormalizeError::CardCountExceeded {
                deck_size: deck.card_count,
                total_cards,
                excess: total_cards.saturating_sub(deck.card_count),
            });
        }
        let gap = (deck_size - listed) as u32;
        if gap > 0 {
            normalized.unknown_index = Some(normalized.push(UNKNOWN_CARD_UID, gap));
        }
        Ok(normalized)
    }

    // Repeated uids share one index and add up their counts.
    fn push(&mut self, uid: &str, count: u32) -> usize {
        if let Some(&index) = self.uid_to_index.get(uid) {
            self.deck_counts[index] = self.deck_counts[index].saturating_add(count);
            return index;
        }
        let index = self.index_to_uid.len();
        self.uid_to_index.insert(uid.to_string(), index);
        self.index_to_uid.push(uid.to_string());
        self.deck_counts.push(count);
        index
    }

    pub fn len(&self) -> usize {
        self.deck_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck_counts.is_empty()
    }

    pub fn index_of(&self, uid: &str) -> Option<usize> {
        self.uid_to_index.get(uid).copied()
    }

    pub fn uid(&self, index: usize) -> Option<&str> {
        self.index_to_uid.get(index).map(String::as_str)
    }

    pub fn total(&self) -> u64 {
        self.deck_counts.iter().map(|&count| u64::from(count)).sum()
    }

    /// One entry per physical card, used as the shuffle source.
    pub fn card_pool(&self) -> Vec<usize> {
        let mut pool = Vec::with_capacity(self.total() as usize);
        for (index, &count) in self.deck_counts.iter().enumerate() {
            pool.extend(std::iter::repeat(index).take(count as usize));
        }
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PotCount, ProsperitySettings};

    fn settings(card_count: u32, first_hand: u32) -> DeckSettings {
        DeckSettings {
            card_count,
            first_hand,
        }
    }

    #[test]
    fn filler_absorbs_the_gap_to_deck_size() {
        let cards = vec![CardEntry::new("ash", 3), CardEntry::new("nibiru", 2)];
        let deck = NormalizedDeck::normalize(settings(40, 5), &cards, &PotSettings::default())
            .expect("normalize");
        assert_eq!(deck.total(), 40);
        assert_eq!(deck.index_of("ash"), Some(0));
        assert_eq!(deck.index_of("nibiru"), Some(1));
        let unknown = deck.unknown_index.expect("filler");
        assert_eq!(deck.deck_counts[unknown], 35);
        assert_eq!(deck.uid(unknown), Some(UNKNOWN_CARD_UID));
    }

    #[test]
    fn zero_count_cards_get_no_index() {
        let cards = vec![CardEntry::new("ghost", 0), CardEntry::new("ash", 3)];
        let deck = NormalizedDeck::normalize(settings(3, 1), &cards, &PotSettings::default())
            .expect("normalize");
        assert_eq!(deck.index_of("ghost"), None);
        assert_eq!(deck.unknown_index, None);
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn pot_cards_take_deck_slots() {
        let pot = PotSettings {
            desires_or_extravagance: PotCount { count: 2 },
            prosperity: ProsperitySettings {
                count: 3,
                cost: Some(6),
            },
        };
        let cards = vec![CardEntry::new("ash", 3)];
        let deck = NormalizedDeck::normalize(settings(40, 5), &cards, &pot).expect("normalize");
        let prosperity = deck.prosperity_index.expect("prosperity");
        let desires = deck.desires_index.expect("desires");
        assert_eq!(deck.deck_counts[prosperity], 3);
        assert_eq!(deck.deck_counts[desires], 2);
        assert_eq!(deck.deck_counts[deck.unknown_index.expect("filler")], 32);
        assert_eq!(deck.total(), 40);
    }

    #[test]
    fn excess_cards_are_reported() {
        let cards = vec![CardEntry::new("ash", 30), CardEntry::new("nibiru", 15)];
        let err = NormalizedDeck::normalize(settings(40, 5), &cards, &PotSettings::default())
            .expect_err("excess");
        assert_eq!(
            err,
            NormalizeError::CardCountExceeded {
                deck_size: 40,
                total_cards: 45,
                excess: 5,
            }
        );
    }

    #[test]
    fn card_pool_lists_every_copy() {
        let cards = vec![CardEntry::new("a", 2), CardEntry::new("b", 1)];
        let deck = NormalizedDeck::normalize(settings(4, 2), &cards, &PotSettings::default())
            .expect("normalize");
        assert_eq!(deck.card_pool(), vec![0, 0, 1, 2]);
    }
}
