use crate::{CalculationMode, NormalizeError, ZERO_RATE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateEntry {
    pub uid: String,
    pub rate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationError {
    #[serde(rename_all = "camelCase")]
    CardCountExceeded {
        deck_size: u32,
        total_cards: u32,
        excess: u32,
    },
}

impl From<NormalizeError> for CalculationError {
    fn from(value: NormalizeError) -> Self {
        match value {
            NormalizeError::CardCountExceeded {
                deck_size,
                total_cards,
                excess,
            } => Self::CardCountExceeded {
                deck_size,
                total_cards,
                excess,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsRates {
    pub success_rate: String,
    pub disrupted_rate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    pub overall_probability: String,
    pub pattern_success_rates: Vec<RateEntry>,
    pub label_success_rates: Vec<RateEntry>,
    pub mode: CalculationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CalculationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vs: Option<VsRates>,
}

impl CalculationResponse {
    /// All-zero result listing every pattern and label uid.
    pub fn zeroed<'a>(
        mode: CalculationMode,
        pattern_uids: impl IntoIterator<Item = &'a str>,
        label_uids: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let zero = |uid: &str| RateEntry {
            uid: uid.to_string(),
            rate: ZERO_RATE.to_string(),
        };
        Self {
            overall_probability: ZERO_RATE.to_string(),
            pattern_success_rates: pattern_uids.into_iter().map(zero).collect(),
            label_success_rates: label_uids.into_iter().map(zero).collect(),
            mode,
            error: None,
            vs: None,
        }
    }

    pub fn pattern_rate(&self, uid: &str) -> Option<&str> {
        self.pattern_success_rates
            .iter()
            .find(|entry| entry.uid == uid)
            .map(|entry| entry.rate.as_str())
    }

    pub fn label_rate(&self, uid: &str) -> Option<&str> {
        self.label_success_rates
            .iter()
            .find(|entry| entry.uid == uid)
            .map(|entry| entry.rate.as_str())
    }
}
