//! Wave controller: wave and cooldown timers, stage advancement, run end.
//!
//! `Active` counts `game_timer` down; at zero the run is cleared if this was
//! the last stage, otherwise a cooldown begins. `Cooldown` counts
//! `cooldown_timer` down; at zero the next stage starts and the stage-clear
//! bonus plus the wave bonus is paid.

use tracing::info;

use bulwark_core::constants::DT;
use bulwark_core::effects;
use bulwark_core::enums::{RunOutcome, WavePhase};
use bulwark_core::events::SimEvent;

use crate::economy;
use crate::history::HistoryRecorder;
use crate::state::SimulationState;

pub fn run(state: &mut SimulationState, history: &mut HistoryRecorder, events: &mut Vec<SimEvent>) {
    match state.phase {
        WavePhase::Active => {
            state.game_timer -= DT;
            if state.game_timer > 0.0 {
                return;
            }
            state.game_timer = 0.0;
            events.push(SimEvent::WaveCompleted { stage: state.stage });
            if state.rules.total_stages.is_some_and(|total| state.stage >= total) {
                end_run(state, RunOutcome::Cleared, events);
            } else {
                state.phase = WavePhase::Cooldown;
                state.cooldown_timer = state.rules.cooldown_secs;
                info!(stage = state.stage, "Wave complete, cooldown started");
            }
        }
        WavePhase::Cooldown => {
            state.cooldown_timer -= DT;
            if state.cooldown_timer <= 0.0 {
                let base = state.rules.stage_clear_bonus;
                start_next_stage(state, history, events, base, false);
            }
        }
        WavePhase::Inactive | WavePhase::GameOver => {}
    }
}

/// Pay `base` plus the wave bonus for the stage just played and begin the next one.
/// Returns the total paid.
pub fn start_next_stage(
    state: &mut SimulationState,
    history: &mut HistoryRecorder,
    events: &mut Vec<SimEvent>,
    base: i64,
    early_start: bool,
) -> i64 {
    let bonus = economy::wave_completion_bonus(
        state.city_health_percent,
        state.intercepted_this_wave(),
        state.ground_hits_this_wave(),
    );
    let payout = base + bonus.total;
    state.money += payout;
    history.record_wave(state, bonus, payout, early_start);

    state.stage += 1;
    state.phase = WavePhase::Active;
    state.game_timer = state.rules.wave_duration_secs;
    state.cooldown_timer = 0.0;
    state.reset_wave_tracking();

    info!(stage = state.stage, payout, bonus = bonus.total, early_start, "Stage started");
    events.push(SimEvent::WaveStarted {
        stage: state.stage,
        payout,
        bonus,
        effect: effects::wave_start(),
    });
    payout
}

/// Enter the terminal state. Has no effect if the run already ended.
pub fn end_run(state: &mut SimulationState, outcome: RunOutcome, events: &mut Vec<SimEvent>) {
    if state.phase == WavePhase::GameOver {
        return;
    }
    state.phase = WavePhase::GameOver;
    state.outcome = Some(outcome);
    info!(?outcome, stage = state.stage, "Game over");
    events.push(SimEvent::GameOver {
        outcome,
        stage: state.stage,
    });
}

/// Fail the run once city health is at or below the failure threshold.
pub fn check_city_failure(state: &mut SimulationState, events: &mut Vec<SimEvent>) {
    if state.is_running() && state.city_health_percent <= state.rules.city_failure_percent {
        end_run(state, RunOutcome::Failed, events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::config::GameRules;
    use bulwark_core::constants::TICK_RATE;
    use bulwark_core::enums::Difficulty;

    fn active_state(rules: GameRules) -> SimulationState {
        let mut state = SimulationState::new(rules, Difficulty::Normal);
        state.phase = WavePhase::Active;
        state
    }

    /// Run for `secs` plus one tick, so float drift in the timers cannot
    /// leave a transition one tick short.
    fn run_secs(state: &mut SimulationState, history: &mut HistoryRecorder, secs: f64) -> Vec<SimEvent> {
        let mut events = Vec::new();
        for _ in 0..=(secs * TICK_RATE as f64).round() as u32 {
            run(state, history, &mut events);
        }
        events
    }

    #[test]
    fn wave_then_cooldown_then_next_stage() {
        let mut state = active_state(GameRules::default());
        let mut history = HistoryRecorder::default();
        let money = state.money;

        run_secs(&mut state, &mut history, 20.0);
        assert_eq!(state.phase, WavePhase::Cooldown);
        assert_eq!(state.stage, 1);

        run_secs(&mut state, &mut history, 5.0);
        assert_eq!(state.phase, WavePhase::Active);
        assert_eq!(state.stage, 2);
        assert!(state.money >= money + 100);
        assert!(state.game_timer > 19.9);
        assert_eq!(history.waves().len(), 1);
    }

    #[test]
    fn last_stage_clears_the_run() {
        let rules = GameRules {
            total_stages: Some(1),
            ..GameRules::default()
        };
        let mut state = active_state(rules);
        let mut history = HistoryRecorder::default();
        let events = run_secs(&mut state, &mut history, 20.0);
        assert_eq!(state.phase, WavePhase::GameOver);
        assert_eq!(state.outcome, Some(RunOutcome::Cleared));
        assert!(events
            .iter()
            .any(|e| matches!(e, SimEvent::GameOver { outcome: RunOutcome::Cleared, .. })));
    }

    #[test]
    fn endless_runs_never_clear() {
        let rules = GameRules {
            total_stages: None,
            ..GameRules::default()
        };
        let mut state = active_state(rules);
        let mut history = HistoryRecorder::default();
        run_secs(&mut state, &mut history, 25.0 * 12.0);
        assert!(state.stage > 10);
        assert!(state.is_running());
    }

    #[test]
    fn city_failure_ends_run_once() {
        let mut state = active_state(GameRules::default());
        state.city_health_percent = 0.0;
        let mut events = Vec::new();
        check_city_failure(&mut state, &mut events);
        check_city_failure(&mut state, &mut events);
        assert_eq!(state.outcome, Some(RunOutcome::Failed));
        assert_eq!(events.len(), 1);
    }
}
