//! Money rules: interception rewards and wave completion bonuses.

use bulwark_core::constants::*;
use bulwark_core::state::WaveBonus;

use crate::state::SimulationState;

/// Reward for one interception at the given streak (streak already counting it).
pub fn interception_bonus(streak: u32) -> i64 {
    let streak_bonus = if streak >= HIGH_STREAK_BONUS_THRESHOLD {
        HIGH_STREAK_BONUS
    } else if streak >= STREAK_BONUS_THRESHOLD {
        STREAK_BONUS
    } else {
        0
    };
    INTERCEPT_BONUS + streak_bonus
}

/// Count an interception and pay for it. Returns the amount paid.
pub fn record_interception(state: &mut SimulationState) -> i64 {
    state.intercepted += 1;
    state.streak += 1;
    let bonus = interception_bonus(state.streak);
    state.money += bonus;
    bonus
}

/// Count an enemy missile that reached the ground or a building.
pub fn record_ground_hit(state: &mut SimulationState) {
    state.ground_hits += 1;
    state.streak = 0;
}

/// Bonus for finishing a wave.
///
/// - city protection: by city-health tier
/// - perfect defense: no ground hits and at least one interception this wave
/// - high interception: at least 80% of this wave's resolved missiles intercepted
pub fn wave_completion_bonus(
    city_health_percent: f64,
    intercepted_this_wave: u32,
    missed_this_wave: u32,
) -> WaveBonus {
    let city_protection = CITY_HEALTH_BONUS_TIERS
        .iter()
        .find(|(min_percent, _)| city_health_percent >= *min_percent)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0);

    let perfect_defense = if missed_this_wave == 0 && intercepted_this_wave > 0 {
        PERFECT_DEFENSE_BONUS
    } else {
        0
    };

    let resolved = intercepted_this_wave + missed_this_wave;
    let high_interception =
        if resolved > 0 && intercepted_this_wave as f64 / resolved as f64 >= HIGH_INTERCEPTION_RATE {
            HIGH_INTERCEPTION_BONUS
        } else {
            0
        };

    WaveBonus {
        city_protection,
        perfect_defense,
        high_interception,
        total: city_protection + perfect_defense + high_interception,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_core::config::GameRules;
    use bulwark_core::enums::Difficulty;

    #[test]
    fn streak_escalates_bonus() {
        assert_eq!(interception_bonus(1), 5);
        assert_eq!(interception_bonus(2), 5);
        assert_eq!(interception_bonus(3), 10);
        assert_eq!(interception_bonus(4), 10);
        assert_eq!(interception_bonus(5), 15);
        assert_eq!(interception_bonus(12), 15);
    }

    #[test]
    fn ground_hit_resets_streak() {
        let mut state = SimulationState::new(GameRules::default(), Difficulty::Normal);
        let start = state.money;
        for _ in 0..3 {
            record_interception(&mut state);
        }
        assert_eq!(state.streak, 3);
        assert_eq!(state.money, start + 5 + 5 + 10);

        record_ground_hit(&mut state);
        assert_eq!(state.streak, 0);
        assert_eq!(state.ground_hits, 1);
        assert_eq!(record_interception(&mut state), 5);
    }

    #[test]
    fn perfect_wave_earns_every_bonus() {
        let bonus = wave_completion_bonus(95.0, 6, 0);
        assert_eq!(bonus.city_protection, 50);
        assert_eq!(bonus.perfect_defense, 75);
        assert_eq!(bonus.high_interception, 25);
        assert_eq!(bonus.total, 150);
    }

    #[test]
    fn empty_wave_is_not_perfect() {
        let bonus = wave_completion_bonus(100.0, 0, 0);
        assert_eq!(bonus.perfect_defense, 0);
        assert_eq!(bonus.high_interception, 0);
        assert_eq!(bonus.total, 50);
    }

    #[test]
    fn city_tiers() {
        assert_eq!(wave_completion_bonus(80.0, 0, 1).city_protection, 30);
        assert_eq!(wave_completion_bonus(50.0, 0, 1).city_protection, 15);
        assert_eq!(wave_completion_bonus(49.9, 0, 1).city_protection, 0);
    }

    #[test]
    fn interception_rate_threshold() {
        // 4 of 5 = 80%: qualifies
        assert_eq!(wave_completion_bonus(0.0, 4, 1).high_interception, 25);
        // 3 of 4 = 75%: does not
        assert_eq!(wave_completion_bonus(0.0, 3, 1).high_interception, 0);
    }
}
