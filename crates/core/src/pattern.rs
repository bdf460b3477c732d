use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleMode {
    Cap1,
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountOperator {
    Gte,
    Eq,
}

impl CountOperator {
    pub fn holds(self, total: u32, threshold: u32) -> bool {
        match self {
            CountOperator::Gte => total >= threshold,
            CountOperator::Eq => total == threshold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardCountCondition {
    #[serde(default)]
    pub uids: Vec<String>,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSetCondition {
    #[serde(default)]
    pub uids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountRule {
    #[serde(default)]
    pub uids: Vec<String>,
    pub mode: RuleMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCondition {
    #[serde(default)]
    pub rules: Vec<CountRule>,
    pub operator: CountOperator,
    pub count: u32,
}

/// A single AND-combined requirement of a pattern, addressed by card uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternCondition {
    /// At least `count` copies in hand, drawn from `uids`; slots may repeat a uid.
    Required(CardCountCondition),
    /// At least `count` distinct uids from `uids` in hand.
    RequiredDistinct(CardCountCondition),
    /// Like `Required`, but checked against the cards left in the deck.
    LeaveDeck(CardCountCondition),
    NotDrawn(CardSetCondition),
    DrawTotal(TotalCondition),
    RemainTotal(TotalCondition),
}

impl PatternCondition {
    pub fn required(uids: &[&str], count: u32) -> Self {
        PatternCondition::Required(CardCountCondition {
            uids: uids.iter().map(|uid| uid.to_string()).collect(),
            count,
        })
    }
}

/// Trigger conditions of a sub-pattern: every pattern condition plus an
/// aggregate over the cards consumed by the matched base patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerCondition {
    Required(CardCountCondition),
    RequiredDistinct(CardCountCondition),
    LeaveDeck(CardCountCondition),
    NotDrawn(CardSetCondition),
    DrawTotal(TotalCondition),
    RemainTotal(TotalCondition),
    BaseMatchTotal(TotalCondition),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternEffect {
    #[serde(rename_all = "camelCase")]
    AddLabel {
        #[serde(default)]
        label_uids: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddPenetration {
        #[serde(default)]
        disruption_category_uids: Vec<String>,
        amount: i64,
        #[serde(default)]
        pool_id: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubPatternEffect {
    #[serde(rename_all = "camelCase")]
    AddLabel {
        #[serde(default)]
        label_uids: Vec<String>,
    },
    #[serde(rename_all = "camelCase")]
    AddPenetration {
        #[serde(default)]
        disruption_card_uids: Vec<String>,
        amount: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyLimit {
    #[default]
    OncePerTrial,
    OncePerDistinctUid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub conditions: Vec<PatternCondition>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub exclude_from_overall: bool,
    #[serde(default)]
    pub effects: Vec<PatternEffect>,
    #[serde(default)]
    pub memo: String,
}

impl Pattern {
    pub fn new(uid: impl Into<String>, conditions: Vec<PatternCondition>) -> Self {
        Self {
            uid: uid.into(),
            name: String::new(),
            active: true,
            conditions,
            labels: Vec::new(),
            exclude_from_overall: false,
            effects: Vec::new(),
            memo: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubPattern {
    pub uid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub base_pattern_uids: Vec<String>,
    #[serde(default)]
    pub trigger_conditions: Vec<TriggerCondition>,
    #[serde(default)]
    pub trigger_source_uids: Vec<String>,
    #[serde(default)]
    pub apply_limit: ApplyLimit,
    #[serde(default)]
    pub effects: Vec<SubPatternEffect>,
    #[serde(default)]
    pub memo: String,
}

impl SubPattern {
    pub fn new(uid: impl Into<String>, trigger_conditions: Vec<TriggerCondition>) -> Self {
        Self {
            uid: uid.into(),
            name: String::new(),
            active: true,
            base_pattern_uids: Vec::new(),
            trigger_conditions,
            trigger_source_uids: Vec::new(),
            apply_limit: ApplyLimit::OncePerTrial,
            effects: Vec::new(),
            memo: String::new(),
        }
    }
}
