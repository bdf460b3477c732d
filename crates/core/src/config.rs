use serde::{Deserialize, Serialize};

pub const DEFAULT_SIMULATION_TRIALS: u64 = 10_000;
pub const MAX_SIMULATION_TRIALS: u64 = 1_000_000;
pub const DEFAULT_PROSPERITY_COST: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMode {
    #[default]
    Exact,
    Simulation,
}

impl CalculationMode {
    pub fn id(self) -> &'static str {
        match self {
            CalculationMode::Exact => "exact",
            CalculationMode::Simulation => "simulation",
        }
    }
}

fn default_trials() -> u64 {
    DEFAULT_SIMULATION_TRIALS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationSettings {
    #[serde(default)]
    pub mode: CalculationMode,
    #[serde(default = "default_trials")]
    pub simulation_trials: u64,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Count sub-pattern labels as successes in simulation mode too.
    #[serde(default)]
    pub sub_patterns_in_simulation: bool,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        Self {
            mode: CalculationMode::Exact,
            simulation_trials: DEFAULT_SIMULATION_TRIALS,
            seed: None,
            sub_patterns_in_simulation: false,
        }
    }
}

/// Process-level limits applied on top of the per-request settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_trials: u64,
    pub prosperity_default_cost: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_trials: MAX_SIMULATION_TRIALS,
            prosperity_default_cost: DEFAULT_PROSPERITY_COST,
        }
    }
}

impl EngineConfig {
    pub fn clamp_trials(&self, requested: u64) -> u64 {
        requested.min(self.max_trials)
    }
}
