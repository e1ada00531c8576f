//! Run records and leaderboard statistics.
//!
//! Finished runs are appended to a JSON-lines file, one `RunRecord` per line.
//! Statistics are recomputed from the whole file on demand.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use bulwark_core::enums::{Difficulty, RunOutcome};
use bulwark_core::state::RunSummary;

use crate::error::AppResult;

/// Rankings show at most this many runs.
pub const RANKING_LIMIT: usize = 20;

/// One finished run as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub seed: u64,
    /// Unix seconds when the run was recorded.
    pub recorded_at: u64,
    #[serde(flatten)]
    pub summary: RunSummary,
}

impl RunRecord {
    pub fn new(seed: u64, summary: RunSummary) -> Self {
        let recorded_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            seed,
            recorded_at,
            summary,
        }
    }
}

/// Append-only JSON-lines log of finished runs.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &RunRecord) -> AppResult<()> {
        let line = serde_json::to_string(record)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        debug!(path = %self.path.display(), "Run recorded");
        Ok(())
    }

    /// All readable records. A missing file is an empty log; lines that do
    /// not parse are skipped with a warning.
    pub fn load(&self) -> AppResult<Vec<RunRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        let mut records = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RunRecord>(line) {
                Ok(record) => records.push(record),
                Err(err) => warn!(line = line_no + 1, %err, "Skipping malformed run record"),
            }
        }
        Ok(records)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyTally {
    pub difficulty: Difficulty,
    pub cleared: usize,
    pub total: usize,
}

/// Aggregate figures over every recorded run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardStats {
    pub games: usize,
    pub cleared: usize,
    /// Percentage of games cleared.
    pub clear_rate: f64,
    pub avg_intercepted: f64,
    pub avg_missed: f64,
    pub avg_city_health: f64,
    /// Percentage of all resolved enemy missiles that were intercepted.
    pub interception_rate: f64,
    /// Cleared run with the healthiest city.
    pub best_cleared: Option<RunRecord>,
    pub per_difficulty: Vec<DifficultyTally>,
}

impl LeaderboardStats {
    pub fn from_records(records: &[RunRecord]) -> Self {
        let games = records.len();
        let cleared = records
            .iter()
            .filter(|r| r.summary.outcome == RunOutcome::Cleared)
            .count();
        let total_intercepted: u64 = records.iter().map(|r| r.summary.intercepted as u64).sum();
        let total_missed: u64 = records.iter().map(|r| r.summary.ground_hits as u64).sum();
        let total_health: f64 = records.iter().map(|r| r.summary.final_city_health).sum();

        let average = |total: f64| if games == 0 { 0.0 } else { total / games as f64 };
        let resolved = total_intercepted + total_missed;

        let per_difficulty = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]
            .into_iter()
            .map(|difficulty| {
                let runs = records.iter().filter(|r| r.summary.difficulty == difficulty);
                DifficultyTally {
                    difficulty,
                    cleared: runs
                        .clone()
                        .filter(|r| r.summary.outcome == RunOutcome::Cleared)
                        .count(),
                    total: runs.count(),
                }
            })
            .collect();

        Self {
            games,
            cleared,
            clear_rate: average(cleared as f64) * 100.0,
            avg_intercepted: average(total_intercepted as f64),
            avg_missed: average(total_missed as f64),
            avg_city_health: average(total_health),
            interception_rate: if resolved == 0 {
                0.0
            } else {
                total_intercepted as f64 / resolved as f64 * 100.0
            },
            best_cleared: ranking(records, RunOutcome::Cleared).into_iter().next().cloned(),
            per_difficulty,
        }
    }
}

/// Runs with the given outcome, best first, at most `RANKING_LIMIT`.
///
/// Cleared runs rank by final city health then interceptions; failed runs
/// by the stage reached then city health.
pub fn ranking(records: &[RunRecord], outcome: RunOutcome) -> Vec<&RunRecord> {
    let mut runs: Vec<&RunRecord> = records
        .iter()
        .filter(|r| r.summary.outcome == outcome)
        .collect();
    match outcome {
        RunOutcome::Cleared => runs.sort_by(|a, b| {
            b.summary
                .final_city_health
                .total_cmp(&a.summary.final_city_health)
                .then(b.summary.intercepted.cmp(&a.summary.intercepted))
        }),
        RunOutcome::Failed => runs.sort_by(|a, b| {
            b.summary
                .stage_reached
                .cmp(&a.summary.stage_reached)
                .then(b.summary.final_city_health.total_cmp(&a.summary.final_city_health))
        }),
    }
    runs.truncate(RANKING_LIMIT);
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(outcome: RunOutcome, difficulty: Difficulty, stage: u32, city: f64, intercepted: u32) -> RunSummary {
        RunSummary {
            outcome,
            stage_reached: stage,
            intercepted,
            ground_hits: 10,
            final_city_health: city,
            difficulty,
            total_stages: Some(10),
            wave_duration_secs: 20.0,
            cooldown_secs: 5.0,
            final_money: 0,
            duration_secs: 250.0,
            score: 0,
            waves: Vec::new(),
        }
    }

    fn record(outcome: RunOutcome, difficulty: Difficulty, stage: u32, city: f64, intercepted: u32) -> RunRecord {
        RunRecord {
            seed: 1,
            recorded_at: 0,
            summary: summary(outcome, difficulty, stage, city, intercepted),
        }
    }

    fn temp_log(name: &str) -> RunLog {
        let path = std::env::temp_dir().join(format!("bulwark-{name}-{}.jsonl", std::process::id()));
        let _ = fs::remove_file(&path);
        RunLog::new(path)
    }

    #[test]
    fn test_append_then_load() {
        let log = temp_log("append");
        let first = record(RunOutcome::Cleared, Difficulty::Normal, 10, 80.0, 40);
        let second = record(RunOutcome::Failed, Difficulty::Hard, 4, 0.0, 12);
        log.append(&first).unwrap();
        log.append(&second).unwrap();

        let loaded = log.load().unwrap();
        assert_eq!(loaded, vec![first, second]);
        let _ = fs::remove_file(log.path());
    }

    #[test]
    fn test_missing_log_is_empty() {
        let log = temp_log("missing");
        assert!(log.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let log = temp_log("malformed");
        let good = record(RunOutcome::Cleared, Difficulty::Easy, 10, 95.0, 30);
        log.append(&good).unwrap();
        let mut file = OpenOptions::new().append(true).open(log.path()).unwrap();
        writeln!(file, "{{\"seed\": 3, \"truncat").unwrap();
        writeln!(file).unwrap();

        assert_eq!(log.load().unwrap(), vec![good]);
        let _ = fs::remove_file(log.path());
    }

    #[test]
    fn test_record_is_flat_json() {
        let json = serde_json::to_value(record(RunOutcome::Failed, Difficulty::Hard, 3, 0.0, 5)).unwrap();
        assert_eq!(json["seed"], 1);
        assert_eq!(json["stage_reached"], 3);
        assert_eq!(json["outcome"], "Failed");
    }

    #[test]
    fn test_stats_aggregate() {
        let records = vec![
            record(RunOutcome::Cleared, Difficulty::Normal, 10, 80.0, 30),
            record(RunOutcome::Cleared, Difficulty::Hard, 10, 90.0, 50),
            record(RunOutcome::Failed, Difficulty::Hard, 6, 0.0, 10),
            record(RunOutcome::Failed, Difficulty::Easy, 2, 30.0, 10),
        ];
        let stats = LeaderboardStats::from_records(&records);
        assert_eq!(stats.games, 4);
        assert_eq!(stats.cleared, 2);
        assert_eq!(stats.clear_rate, 50.0);
        assert_eq!(stats.avg_intercepted, 25.0);
        assert_eq!(stats.avg_missed, 10.0);
        assert_eq!(stats.avg_city_health, 50.0);
        // 100 intercepted of 140 resolved
        assert!((stats.interception_rate - 100.0 / 140.0 * 100.0).abs() < 1e-9);
        assert_eq!(stats.best_cleared.unwrap().summary.final_city_health, 90.0);

        let hard = stats
            .per_difficulty
            .iter()
            .find(|t| t.difficulty == Difficulty::Hard)
            .unwrap();
        assert_eq!((hard.cleared, hard.total), (1, 2));
    }

    #[test]
    fn test_empty_stats() {
        let stats = LeaderboardStats::from_records(&[]);
        assert_eq!(stats.games, 0);
        assert_eq!(stats.clear_rate, 0.0);
        assert_eq!(stats.interception_rate, 0.0);
        assert!(stats.best_cleared.is_none());
        assert!(stats.per_difficulty.iter().all(|t| t.total == 0));
    }

    #[test]
    fn test_rankings() {
        let records = vec![
            record(RunOutcome::Cleared, Difficulty::Normal, 10, 80.0, 30),
            record(RunOutcome::Cleared, Difficulty::Normal, 10, 80.0, 45),
            record(RunOutcome::Cleared, Difficulty::Normal, 10, 95.0, 10),
            record(RunOutcome::Failed, Difficulty::Normal, 3, 20.0, 5),
            record(RunOutcome::Failed, Difficulty::Normal, 7, 0.0, 5),
            record(RunOutcome::Failed, Difficulty::Normal, 7, 10.0, 5),
        ];
        let cleared: Vec<(f64, u32)> = ranking(&records, RunOutcome::Cleared)
            .iter()
            .map(|r| (r.summary.final_city_health, r.summary.intercepted))
            .collect();
        assert_eq!(cleared, vec![(95.0, 10), (80.0, 45), (80.0, 30)]);

        let failed: Vec<(u32, f64)> = ranking(&records, RunOutcome::Failed)
            .iter()
            .map(|r| (r.summary.stage_reached, r.summary.final_city_health))
            .collect();
        assert_eq!(failed, vec![(7, 10.0), (7, 0.0), (3, 20.0)]);
    }

    #[test]
    fn test_ranking_is_capped() {
        let records: Vec<RunRecord> = (0..30)
            .map(|i| record(RunOutcome::Failed, Difficulty::Easy, i, 0.0, 0))
            .collect();
        let ranked = ranking(&records, RunOutcome::Failed);
        assert_eq!(ranked.len(), RANKING_LIMIT);
        assert_eq!(ranked[0].summary.stage_reached, 29);
    }
}
