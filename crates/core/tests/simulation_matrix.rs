use openrate_core::{
    calculate, calculate_with, resolve_mode, CalculationMode, CalculationRequest,
    CardCountCondition, CardEntry, EngineConfig, LabelEntry, OpponentDisruption, Pattern,
    PatternCondition, PatternEffect, PotCount, ProsperitySettings, SubPattern, SubPatternEffect,
    TriggerCondition, VsSettings,
};

fn request(card_count: u32, first_hand: u32, cards: &[(&str, u32)]) -> CalculationRequest {
    let mut req = CalculationRequest::new(
        card_count,
        first_hand,
        cards
            .iter()
            .map(|(uid, count)| CardEntry::new(*uid, *count))
            .collect(),
    );
    req.settings.mode = CalculationMode::Simulation;
    req.settings.seed = Some(20_240_601);
    req
}

fn uids(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn rate(value: &str) -> f64 {
    value.parse().expect("rate is numeric")
}

fn one_handtrap() -> VsSettings {
    VsSettings {
        enabled: true,
        opponent_deck_size: 1,
        opponent_hand_size: 1,
        opponent_disruptions: vec![OpponentDisruption {
            uid: "ash".to_string(),
            name: String::new(),
            count: 1,
            disruption_category_uid: Some("handtrap".to_string()),
        }],
    }
}

fn y_trigger(effect: SubPatternEffect) -> SubPattern {
    let mut sub = SubPattern::new(
        "s",
        vec![TriggerCondition::Required(CardCountCondition {
            uids: uids(&["y"]),
            count: 1,
        })],
    );
    sub.effects.push(effect);
    sub
}

#[test]
fn simulation_tracks_the_exact_rate() {
    let mut req = request(40, 5, &[("a", 3)]);
    req.settings.simulation_trials = 20_000;
    req.patterns.push(Pattern::new("p", vec![PatternCondition::required(&["a"], 1)]));
    let response = calculate(&req);
    assert_eq!(response.mode, CalculationMode::Simulation);
    let simulated = rate(&response.overall_probability);
    assert!((simulated - 33.75).abs() < 1.5, "simulated {simulated}");
}

#[test]
fn fixed_seed_repeats_the_response() {
    let mut req = request(40, 5, &[("a", 3), ("b", 6)]);
    req.settings.simulation_trials = 2_000;
    req.patterns.push(Pattern::new("p", vec![PatternCondition::required(&["a", "b"], 2)]));
    assert_eq!(calculate(&req), calculate(&req));
}

#[test]
fn trial_count_is_clamped_by_the_engine_config() {
    let mut req = request(4, 4, &[("a", 1)]);
    req.settings.simulation_trials = 50;
    req.patterns.push(Pattern::new("p", vec![PatternCondition::required(&["a"], 1)]));
    let config = EngineConfig {
        max_trials: 3,
        ..EngineConfig::default()
    };
    let response = calculate_with(&req, &config);
    assert_eq!(response.overall_probability, "100.00");
}

#[test]
fn pot_settings_force_simulation() {
    let mut req = request(40, 5, &[("a", 3)]);
    req.settings.mode = CalculationMode::Exact;
    req.settings.simulation_trials = 200;
    req.pot.prosperity = ProsperitySettings {
        count: 1,
        cost: Some(3),
    };
    assert_eq!(resolve_mode(&req), CalculationMode::Simulation);
    assert_eq!(calculate(&req).mode, CalculationMode::Simulation);

    req.pot.prosperity = ProsperitySettings::default();
    req.pot.desires_or_extravagance = PotCount { count: 1 };
    assert_eq!(resolve_mode(&req), CalculationMode::Simulation);
}

#[test]
fn enabled_vs_forces_simulation() {
    let mut req = request(40, 5, &[("a", 3)]);
    req.settings.mode = CalculationMode::Exact;
    req.vs = Some(VsSettings {
        enabled: false,
        ..one_handtrap()
    });
    assert_eq!(resolve_mode(&req), CalculationMode::Exact);
    req.vs = Some(one_handtrap());
    assert_eq!(resolve_mode(&req), CalculationMode::Simulation);
}

#[test]
fn sub_pattern_labels_are_skipped_in_simulation_by_default() {
    let mut req = request(2, 2, &[("x", 1), ("y", 1)]);
    req.settings.simulation_trials = 100;
    req.labels.push(LabelEntry::new("combo"));
    req.patterns.push(Pattern::new("p", vec![PatternCondition::required(&["x"], 1)]));
    req.sub_patterns.push(y_trigger(SubPatternEffect::AddLabel {
        label_uids: uids(&["combo"]),
    }));

    let response = calculate(&req);
    assert_eq!(response.label_rate("combo"), Some("0.00"));

    req.settings.sub_patterns_in_simulation = true;
    let response = calculate(&req);
    assert_eq!(response.label_rate("combo"), Some("100.00"));

    req.settings.mode = CalculationMode::Exact;
    let response = calculate(&req);
    assert_eq!(response.label_rate("combo"), Some("100.00"));
}

#[test]
fn unanswered_disruption_blocks_every_success() {
    let mut req = request(2, 2, &[("x", 2)]);
    req.settings.simulation_trials = 100;
    req.patterns.push(Pattern::new("p", Vec::new()));
    req.vs = Some(one_handtrap());

    let response = calculate(&req);
    assert_eq!(response.overall_probability, "100.00");
    let vs = response.vs.expect("vs rates");
    assert_eq!(vs.disrupted_rate, "100.00");
    assert_eq!(vs.success_rate, "0.00");
}

#[test]
fn pattern_penetration_gets_through_matching_category() {
    let mut req = request(2, 2, &[("x", 2)]);
    req.settings.simulation_trials = 100;
    let mut pattern = Pattern::new("p", Vec::new());
    pattern.effects.push(PatternEffect::AddPenetration {
        disruption_category_uids: uids(&["handtrap"]),
        amount: 1,
        pool_id: None,
    });
    req.patterns.push(pattern);
    req.vs = Some(one_handtrap());

    let vs = calculate(&req).vs.expect("vs rates");
    assert_eq!(vs.success_rate, "100.00");
}

#[test]
fn sub_pattern_penetration_targets_the_disruption_card() {
    let mut req = request(2, 2, &[("x", 1), ("y", 1)]);
    req.settings.simulation_trials = 100;
    req.patterns.push(Pattern::new("p", Vec::new()));
    req.sub_patterns.push(y_trigger(SubPatternEffect::AddPenetration {
            disruption_card_uids: uids(&["ash"]),
            amount: 1,
        }));
    req.vs = Some(one_handtrap());

    let vs = calculate(&req).vs.expect("vs rates");
    assert_eq!(vs.success_rate, "100.00");
}

#[test]
fn blank_opponent_hand_is_never_disrupted() {
    let mut req = request(2, 2, &[("x", 2)]);
    req.settings.simulation_trials = 100;
    req.patterns.push(Pattern::new("p", Vec::new()));
    req.vs = Some(VsSettings {
        opponent_disruptions: Vec::new(),
        opponent_deck_size: 40,
        opponent_hand_size: 5,
        ..one_handtrap()
    });

    let vs = calculate(&req).vs.expect("vs rates");
    assert_eq!(vs.disrupted_rate, "0.00");
    assert_eq!(vs.success_rate, "100.00");
}

#[test]
fn desires_can_reach_a_card_outside_the_opening_hand() {
    // whole deck is two cards: the pot card and the target
    let mut req = request(2, 1, &[("a", 1)]);
    req.settings.simulation_trials = 400;
    req.pot.desires_or_extravagance = PotCount { count: 1 };
    req.patterns.push(Pattern::new("p", vec![PatternCondition::required(&["a"], 1)]));
    assert_eq!(calculate(&req).overall_probability, "100.00");
}

#[test]
fn prosperity_finds_the_target_in_revealed_cards() {
    // hand holds prosperity or the target; revealing the rest always finds it
    let mut req = request(3, 1, &[("a", 1)]);
    req.settings.simulation_trials = 400;
    req.pot.prosperity = ProsperitySettings {
        count: 2,
        cost: Some(2),
    };
    req.patterns.push(Pattern::new("p", vec![PatternCondition::required(&["a"], 1)]));
    assert_eq!(calculate(&req).overall_probability, "100.00");
}
