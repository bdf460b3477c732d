use crate::{
    calculate_exact, compile, exact_rate, simulated_rate, CalculationError, CalculationMode,
    CalculationRequest, CalculationResponse, CompiledRules, EngineConfig, NormalizedDeck,
    OpponentPlan, RateEntry, RngState, SimulationOptions, Simulator, VsRates,
};

/// Exact enumeration cannot model pot resolution or opponent draws, so
/// either forces simulation.
pub fn resolve_mode(request: &CalculationRequest) -> CalculationMode {
    match request.settings.mode {
        CalculationMode::Exact if request.pot.is_configured() || request.vs_enabled() => {
            CalculationMode::Simulation
        }
        mode => mode,
    }
}

pub fn calculate(request: &CalculationRequest) -> CalculationResponse {
    calculate_with(request, &EngineConfig::default())
}

pub fn calculate_with(request: &CalculationRequest, config: &EngineConfig) -> CalculationResponse {
    let mode = resolve_mode(request);
    tracing::info!(
        target: "openrate_core::engine",
        mode = mode.id(),
        requested = request.settings.mode.id(),
        deck_size = request.deck.card_count,
        first_hand = request.deck.first_hand,
        patterns = request.patterns.len(),
        sub_patterns = request.sub_patterns.len(),
        "calculation started"
    );
    if mode != request.settings.mode {
        tracing::info!(
            target: "openrate_core::engine",
            pot = request.pot.is_configured(),
            vs = request.vs_enabled(),
            "exact mode replaced by simulation"
        );
    }

    let deck = match NormalizedDeck::normalize(request.deck, &request.cards, &request.pot) {
        Ok(deck) => deck,
        Err(err) => {
            tracing::warn!(target: "openrate_core::engine", error = %err, "deck rejected");
            let mut response = CalculationResponse::zeroed(
                mode,
                request.patterns.iter().map(|pattern| pattern.uid.as_str()),
                request.labels.iter().map(|label| label.uid.as_str()),
            );
            response.error = Some(CalculationError::from(err));
            return response;
        }
    };
    let rules = compile(&deck, &request.patterns, &request.sub_patterns, &request.labels);

    match mode {
        CalculationMode::Exact => run_exact(&deck, &rules),
        CalculationMode::Simulation => run_simulation(request, config, &deck, &rules),
    }
}

fn run_exact(deck: &NormalizedDeck, rules: &CompiledRules) -> CalculationResponse {
    let tally = calculate_exact(deck, rules);
    CalculationResponse {
        overall_probability: exact_rate(&tally.overall, &tally.total),
        pattern_success_rates: rules
            .patterns
            .iter()
            .zip(&tally.patterns)
            .map(|(pattern, success)| RateEntry {
                uid: pattern.uid.clone(),
                rate: exact_rate(success, &tally.total),
            })
            .collect(),
        label_success_rates: rules
            .labels
            .declared()
            .iter()
            .zip(&tally.labels)
            .map(|(uid, success)| RateEntry {
                uid: uid.clone(),
                rate: exact_rate(success, &tally.total),
            })
            .collect(),
        mode: CalculationMode::Exact,
        error: None,
        vs: None,
    }
}

fn run_simulation(
    request: &CalculationRequest,
    config: &EngineConfig,
    deck: &NormalizedDeck,
    rules: &CompiledRules,
) -> CalculationResponse {
    let trials = config.clamp_trials(request.settings.simulation_trials);
    let rng = match request.settings.seed {
        Some(seed) => RngState::from_seed(seed),
        None => RngState::fresh(),
    };
    tracing::info!(
        target: "openrate_core::engine",
        trials,
        seed = rng.seed(),
        "simulation seeded"
    );
    let options = SimulationOptions {
        trials,
        prosperity_cost: request
            .pot
            .prosperity
            .cost
            .unwrap_or(config.prosperity_default_cost),
        sub_patterns: request.settings.sub_patterns_in_simulation,
    };
    let opponent = request.vs.as_ref().and_then(OpponentPlan::from_settings);
    let tally = Simulator::new(deck, rules, options, opponent, rng).run();

    CalculationResponse {
        overall_probability: simulated_rate(tally.overall, tally.trials),
        pattern_success_rates: rules
            .patterns
            .iter()
            .zip(&tally.patterns)
            .map(|(pattern, &success)| RateEntry {
                uid: pattern.uid.clone(),
                rate: simulated_rate(success, tally.trials),
            })
            .collect(),
        label_success_rates: rules
            .labels
            .declared()
            .iter()
            .zip(&tally.labels)
            .map(|(uid, &success)| RateEntry {
                uid: uid.clone(),
                rate: simulated_rate(success, tally.trials),
            })
            .collect(),
        mode: CalculationMode::Simulation,
        error: None,
        vs: tally.vs.map(|vs| VsRates {
            success_rate: simulated_rate(vs.successes, tally.trials),
            disrupted_rate: simulated_rate(vs.disrupted, tally.trials),
        }),
    }
}
