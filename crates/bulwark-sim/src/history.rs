//! Per-wave statistics and the end-of-run summary.

use tracing::info;

use bulwark_core::enums::RunOutcome;
use bulwark_core::state::{RunSummary, WaveBonus, WaveRecord};

use crate::state::SimulationState;

/// Collects wave records during a run and produces its summary once.
#[derive(Debug, Clone, Default)]
pub struct HistoryRecorder {
    waves: Vec<WaveRecord>,
    started_at_secs: f64,
    finished: bool,
}

impl HistoryRecorder {
    /// Begin a new run at the given simulation time.
    pub fn start(&mut self, now_secs: f64) {
        self.waves.clear();
        self.started_at_secs = now_secs;
        self.finished = false;
    }

    pub fn waves(&self) -> &[WaveRecord] {
        &self.waves
    }

    /// Record the stage that just ended, with whatever was paid for it.
    pub fn record_wave(&mut self, state: &SimulationState, bonus: WaveBonus, payout: i64, early_start: bool) {
        self.waves.push(WaveRecord {
            stage: state.stage,
            intercepted: state.intercepted_this_wave(),
            ground_hits: state.ground_hits_this_wave(),
            city_health_percent: state.city_health_percent,
            bonus,
            payout,
            early_start,
        });
    }

    /// Produce the run summary. Returns `None` if this run was already summarised.
    pub fn finish(&mut self, state: &SimulationState, outcome: RunOutcome, now_secs: f64) -> Option<RunSummary> {
        if self.finished {
            return None;
        }
        self.finished = true;

        // The final stage never reaches a cooldown payout; record it as played.
        if self.waves.last().map(|w| w.stage) != Some(state.stage) {
            self.record_wave(state, WaveBonus::default(), 0, false);
        }

        let mut summary = RunSummary {
            outcome,
            stage_reached: state.stage,
            intercepted: state.intercepted,
            ground_hits: state.ground_hits,
            final_city_health: state.city_health_percent,
            difficulty: state.difficulty,
            total_stages: state.rules.total_stages,
            wave_duration_secs: state.rules.wave_duration_secs,
            cooldown_secs: state.rules.cooldown_secs,
            final_money: state.money,
            duration_secs: (now_secs - self.started_at_secs).max(0.0),
            score: 0,
            waves: self.waves.clone(),
        };
        summary.score = score(&summary);

        info!(
            outcome = ?summary.outcome,
            stage = summary.stage_reached,
            intercepted = summary.intercepted,
            ground_hits = summary.ground_hits,
            score = summary.score,
            "Run finished"
        );
        Some(summary)
    }
}

/// Leaderboard score: interceptions, stages survived and the city left standing.
pub fn score(summary: &RunSummary) -> u64 {
    let intercepts = summary.intercepted as u64 * 10;
    let stages = summary.stage_reached as u64 * 100;
    let city = (summary.final_city_health.clamp(0.0, 100.0) * 5.0).round() as u64;
    intercepts + stages + city
}
