use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use openrate_core::{
    CalculationRequest, CalculationResponse, CalculationSettings, PenetrationEffect,
    PenetrationVerdict,
};

/// Input of a standalone penetration check: what the opponent's disruption
/// demands per category and what the hand can answer with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenetrationCheck {
    #[serde(default)]
    pub requirements: BTreeMap<String, i64>,
    #[serde(default)]
    pub effects: Vec<PenetrationEffect>,
}

#[derive(Debug, Clone)]
pub struct RequestReport {
    pub request: CalculationRequest,
    pub warnings: Vec<String>,
}
