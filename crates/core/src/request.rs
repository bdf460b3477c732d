use crate::{CalculationSettings, Pattern, SubPattern};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSettings {
    pub card_count: u32,
    pub first_hand: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardEntry {
    pub uid: String,
    pub count: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub memo: String,
}

impl CardEntry {
    pub fn new(uid: impl Into<String>, count: u32) -> Self {
        Self {
            uid: uid.into(),
            count,
            name: String::new(),
            memo: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelEntry {
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub memo: String,
}

impl LabelEntry {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: String::new(),
            memo: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotCount {
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProsperitySettings {
    #[serde(default)]
    pub count: u32,
    /// Number of cards revealed on resolution.
    #[serde(default)]
    pub cost: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotSettings {
    #[serde(default)]
    pub desires_or_extravagance: PotCount,
    #[serde(default)]
    pub prosperity: ProsperitySettings,
}

impl PotSettings {
    pub fn is_configured(&self) -> bool {
        self.desires_or_extravagance.count > 0 || self.prosperity.count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentDisruption {
    pub uid: String,
    #[serde(default)]
    pub name: String,
    pub count: u32,
    #[serde(default)]
    pub disruption_category_uid: Option<String>,
}

impl OpponentDisruption {
    /// Category the card is counted under when sizing penetration demand.
    pub fn category(&self) -> &str {
        match self.disruption_category_uid.as_deref() {
            Some(category) if !category.trim().is_empty() => category,
            _ => self.uid.as_str(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub opponent_deck_size: u32,
    #[serde(default)]
    pub opponent_hand_size: u32,
    #[serde(default)]
    pub opponent_disruptions: Vec<OpponentDisruption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationRequest {
    pub deck: DeckSettings,
    #[serde(default)]
    pub cards: Vec<CardEntry>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub sub_patterns: Vec<SubPattern>,
    #[serde(default)]
    pub labels: Vec<LabelEntry>,
    #[serde(default)]
    pub pot: PotSettings,
    #[serde(default)]
    pub vs: Option<VsSettings>,
    #[serde(default)]
    pub settings: CalculationSettings,
}

impl CalculationRequest {
    pub fn new(card_count: u32, first_hand: u32, cards: Vec<CardEntry>) -> Self {
        Self {
            deck: DeckSettings {
                card_count,
                first_hand,
            },
            cards,
            patterns: Vec::new(),
            sub_patterns: Vec::new(),
            labels: Vec::new(),
            pot: PotSettings::default(),
            vs: None,
            settings: CalculationSettings::default(),
        }
    }

    pub fn vs_enabled(&self) -> bool {
        self.vs.as_ref().map(|vs| vs.enabled).unwrap_or(false)
    }
}
