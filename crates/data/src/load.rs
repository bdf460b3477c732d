use crate::schema::{CalculationRequest, CalculationResponse, PenetrationCheck, RequestReport};
use anyhow::Context;
use openrate_core::{PatternCondition, PatternEffect, SubPatternEffect, TriggerCondition};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

pub fn load_request(path: &Path) -> anyhow::Result<CalculationRequest> {
    load_json(path)
}

pub fn parse_request(raw: &str) -> anyhow::Result<CalculationRequest> {
    let request = serde_json::from_str(raw).context("parse calculation request")?;
    Ok(request)
}

/// Loads a request and lists everything about it that is legal but likely
/// a mistake.
pub fn load_request_report(path: &Path) -> anyhow::Result<RequestReport> {
    let request = load_request(path)?;
    let warnings = lint_request(&request);
    Ok(RequestReport { request, warnings })
}

pub fn load_penetration_check(path: &Path) -> anyhow::Result<PenetrationCheck> {
    load_json(path)
}

pub fn render_response(response: &CalculationResponse, pretty: bool) -> anyhow::Result<String> {
    render_json(response, pretty)
}

pub fn render_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.context("serialize output")
}

pub fn lint_request(request: &CalculationRequest) -> Vec<String> {
    let mut warnings = Vec::new();
    if request.deck.first_hand > request.deck.card_count {
        warnings.push(format!(
            "first hand of {} is larger than the {} card deck",
            request.deck.first_hand, request.deck.card_count
        ));
    }

    let mut cards = HashSet::new();
    for card in &request.cards {
        if !cards.insert(card.uid.as_str()) {
            warnings.push(format!("duplicate card {} (counts are summed)", card.uid));
        }
    }

    let mut seen = HashSet::new();
    for pattern in &request.patterns {
        if !seen.insert(pattern.uid.as_str()) {
            warnings.push(format!("duplicate pattern {}", pattern.uid));
        }
        for condition in &pattern.conditions {
            for uid in pattern_condition_uids(condition) {
                if !cards.contains(uid) {
                    warnings.push(format!("pattern {} names unknown card {}", pattern.uid, uid));
                }
            }
        }
    }

    let mut seen = HashSet::new();
    for sub_pattern in &request.sub_patterns {
        if !seen.insert(sub_pattern.uid.as_str()) {
            warnings.push(format!("duplicate sub-pattern {}", sub_pattern.uid));
        }
        for condition in &sub_pattern.trigger_conditions {
            for uid in trigger_condition_uids(condition) {
                if !cards.contains(uid) {
                    warnings.push(format!(
                        "sub-pattern {} names unknown card {}",
                        sub_pattern.uid, uid
                    ));
                }
            }
        }
    }

    let declared: HashSet<&str> = request.labels.iter().map(|label| label.uid.as_str()).collect();
    let mut referenced = BTreeSet::new();
    for pattern in &request.patterns {
        referenced.extend(pattern.labels.iter().map(String::as_str));
        for effect in &pattern.effects {
            if let PatternEffect::AddLabel { label_uids } = effect {
                referenced.extend(label_uids.iter().map(String::as_str));
            }
        }
    }
    for sub_pattern in &request.sub_patterns {
        for effect in &sub_pattern.effects {
            if let SubPatternEffect::AddLabel { label_uids } = effect {
                referenced.extend(label_uids.iter().map(String::as_str));
            }
        }
    }
    for uid in referenced {
        if !declared.contains(uid) {
            warnings.push(format!("label {uid} is used but not declared"));
        }
    }
    warnings
}

fn pattern_condition_uids(condition: &PatternCondition) -> Vec<&str> {
    match condition {
        PatternCondition::Required(inner)
        | PatternCondition::RequiredDistinct(inner)
        | PatternCondition::LeaveDeck(inner) => inner.uids.iter().map(String::as_str).collect(),
        PatternCondition::NotDrawn(inner) => inner.uids.iter().map(String::as_str).collect(),
        PatternCondition::DrawTotal(total) | PatternCondition::RemainTotal(total) => total
            .rules
            .iter()
            .flat_map(|rule| rule.uids.iter().map(String::as_str))
            .collect(),
    }
}

fn trigger_condition_uids(condition: &TriggerCondition) -> Vec<&str> {
    match condition {
        TriggerCondition::Required(inner)
        | TriggerCondition::RequiredDistinct(inner)
        | TriggerCondition::LeaveDeck(inner) => inner.uids.iter().map(String::as_str).collect(),
        TriggerCondition::NotDrawn(inner) => inner.uids.iter().map(String::as_str).collect(),
        TriggerCondition::DrawTotal(total)
        | TriggerCondition::RemainTotal(total)
        | TriggerCondition::BaseMatchTotal(total) => total
            .rules
            .iter()
            .flat_map(|rule| rule.uids.iter().map(String::as_str))
            .collect(),
    }
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
