use crate::FlowNetwork;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Something that can get through disruption of any of the listed
/// categories. Effects with the same `pool_id` are alternative uses of a
/// single resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenetrationEffect {
    #[serde(default)]
    pub disruption_category_uids: Vec<String>,
    pub amount: i64,
    #[serde(default)]
    pub pool_id: Option<String>,
}

impl PenetrationEffect {
    pub fn new(categories: &[&str], amount: i64) -> Self {
        Self {
            disruption_category_uids: categories.iter().map(|uid| uid.to_string()).collect(),
            amount,
            pool_id: None,
        }
    }

    pub fn pooled(mut self, pool_id: impl Into<String>) -> Self {
        self.pool_id = Some(pool_id.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenetrationVerdict {
    pub feasible: bool,
    pub total_required: i64,
    pub max_assignable: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MergedEffect {
    categories: Vec<String>,
    amount: i64,
}

fn merge_effects(effects: &[PenetrationEffect]) -> Vec<MergedEffect> {
    let mut merged: Vec<MergedEffect> = Vec::new();
    let mut pools: HashMap<&str, usize> = HashMap::new();
    for effect in effects {
        if effect.amount <= 0 || effect.disruption_category_uids.is_empty() {
            continue;
        }
        let pool = effect
            .pool_id
            .as_deref()
            .map(str::trim)
            .filter(|pool| !pool.is_empty());
        let slot = match pool.and_then(|pool| pools.get(pool).copied()) {
            Some(slot) => {
                let target = &mut merged[slot];
                target.amount = target.amount.max(effect.amount);
                slot
            }
            None => {
                merged.push(MergedEffect {
                    categories: Vec::new(),
                    amount: effect.amount,
                });
                let slot = merged.len() - 1;
                if let Some(pool) = pool {
                    pools.insert(pool, slot);
                }
                slot
            }
        };
        let categories = &mut merged[slot].categories;
        for category in &effect.disruption_category_uids {
            if !categories.contains(category) {
                categories.push(category.clone());
            }
        }
    }
    merged
}

/// Decides whether `effects` can jointly cover every category requirement.
///
/// The check runs a max-flow over source → effect → category → sink, where
/// an effect may spread its amount over any category it lists and each
/// category drains at most its required amount.
pub fn check_penetration(
    requirements: &BTreeMap<String, i64>,
    effects: &[PenetrationEffect],
) -> PenetrationVerdict {
    let required: Vec<(&str, i64)> = requirements
        .iter()
        .filter(|(_, &amount)| amount > 0)
        .map(|(category, &amount)| (category.as_str(), amount))
        .collect();
    let total_required = required
        .iter()
        .fold(0i64, |sum, (_, amount)| sum.saturating_add(*amount));
    if total_required == 0 {
        return PenetrationVerdict {
            feasible: true,
            total_required: 0,
            max_assignable: 0,
        };
    }

    let category_slot: HashMap<&str, usize> = required
        .iter()
        .enumerate()
        .map(|(slot, (category, _))| (*category, slot))
        .collect();
    let usable: Vec<(Vec<usize>, i64)> = merge_effects(effects)
        .into_iter()
        .filter_map(|effect| {
            let slots: Vec<usize> = effect
                .categories
                .iter()
                .filter_map(|category| category_slot.get(category.as_str()).copied())
                .collect();
            (!slots.is_empty()).then_some((slots, effect.amount))
        })
        .collect();

    let total_supply = usable
        .iter()
        .fold(0i64, |sum, (_, amount)| sum.saturating_add(*amount));
    if total_supply < total_required {
        return PenetrationVerdict {
            feasible: false,
            total_required,
            max_assignable: total_supply,
        };
    }

    let source = 0;
    let sink = 1;
    let effect_base = 2;
    let category_base = effect_base + usable.len();
    let mut network = FlowNetwork::new(category_base + required.len());
    for (offset, (slots, amount)) in usable.iter().enumerate() {
        let node = effect_base + offset;
        network.add_edge(source, node, *amount);
        for &slot in slots {
            network.add_edge(node, category_base + slot, *amount);
        }
    }
    for (slot, (_, amount)) in required.iter().enumerate() {
        network.add_edge(category_base + slot, sink, *amount);
    }
    let max_assignable = network.max_flow(source, sink, total_required);
    PenetrationVerdict {
        feasible: max_assignable >= total_required,
        total_required,
        max_assignable,
    }
}

pub fn can_penetrate(requirements: &BTreeMap<String, i64>, effects: &[PenetrationEffect]) -> bool {
    check_penetration(requirements, effects).feasible
}
