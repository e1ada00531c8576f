#[cfg(test)]
mod tests {
    use glam::DVec3;

    use crate::commands::PlayerCommand;
    use crate::config::{missile_profile, DifficultySettings, GameRules};
    use crate::effects::{self, EffectShape, EffectSpec};
    use crate::enums::*;
    use crate::error::{CommandError, PlacementError};
    use crate::events::SimEvent;
    use crate::state::{GameSnapshot, RunSummary};
    use crate::types::{quadratic_bezier, Aabb, EntityId, Position, SimTime, Velocity};

    /// Verify PlayerCommand round-trips through serde (tagged union).
    #[test]
    fn test_player_command_serde() {
        let commands = vec![
            PlayerCommand::StartGame,
            PlayerCommand::SetDifficulty {
                difficulty: Difficulty::Hard,
            },
            PlayerCommand::PlaceStructure {
                kind: StructureKind::Factory,
                position: Position::new(10.0, 0.0, -4.0),
            },
            PlayerCommand::CancelDelivery {
                factory: EntityId(7),
            },
            PlayerCommand::ApplyUpgrade {
                category: UpgradeCategory::Launcher,
                kind: UpgradeKind::Range,
            },
            PlayerCommand::StartNextWave,
            PlayerCommand::Pause,
        ];
        for cmd in &commands {
            let json = serde_json::to_string(cmd).unwrap();
            let back: PlayerCommand = serde_json::from_str(&json).unwrap();
            // Compare JSON representations since PlayerCommand doesn't derive PartialEq
            assert_eq!(json, serde_json::to_string(&back).unwrap());
        }
    }

    #[test]
    fn test_player_command_json_shape() {
        let json = r#"{"type":"PlaceStructure","kind":"Launcher","position":{"x":4.0,"y":0.0,"z":2.0}}"#;
        let cmd: PlayerCommand = serde_json::from_str(json).unwrap();
        match cmd {
            PlayerCommand::PlaceStructure { kind, position } => {
                assert_eq!(kind, StructureKind::Launcher);
                assert_eq!(position, Position::new(4.0, 0.0, 2.0));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    /// Events carry a typed effect descriptor through serde.
    #[test]
    fn test_event_effect_serde() {
        let event = SimEvent::Explosion {
            kind: MissileType::C,
            position: Position::new(1.0, 0.0, 1.0),
            direct_hit: false,
            effect: effects::ground_explosion(0xb04dfd, 6.0),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""shape":"Disk""#), "json was {json}");
        let back: SimEvent = serde_json::from_str(&json).unwrap();
        match back {
            SimEvent::Explosion { effect, .. } => {
                assert_eq!(effect.shape, EffectShape::Disk { crater_radius: 6.0 });
                assert!(!effect.gravity);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_effect_shape_defaults() {
        assert!(EffectSpec::sphere().gravity);
        assert!(EffectSpec::cone(0.3).gravity);
        assert!(!EffectSpec::disk(2.0).gravity);
        let launch = effects::launch();
        assert_eq!(launch.shape, EffectShape::Cone { spread: 0.3 });
        assert_eq!(launch.count, 15);
    }

    #[test]
    fn test_snapshot_serde() {
        let snapshot = GameSnapshot::default();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.time.tick, back.time.tick);
        assert_eq!(back.phase, WavePhase::Inactive);
        assert!(
            json.len() < 1024,
            "Empty snapshot should be <1KB, was {} bytes",
            json.len()
        );
    }

    #[test]
    fn test_difficulty_table() {
        let easy = DifficultySettings::for_difficulty(Difficulty::Easy);
        let normal = DifficultySettings::for_difficulty(Difficulty::Normal);
        let hard = DifficultySettings::for_difficulty(Difficulty::Hard);
        assert_eq!(normal.range, 36.0);
        assert!(easy.range > normal.range && normal.range > hard.range);
        assert!(!easy.allows(MissileType::C));
        assert!(easy.allows(MissileType::B));
        assert!(hard.allows(MissileType::C));
        assert_eq!(hard.max_enemy_missiles, 20);
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse("brutal"), None);
    }

    #[test]
    fn test_missile_profiles() {
        let c = missile_profile(MissileType::C);
        assert_eq!(c.explosion_radius, 6.0);
        assert_eq!(c.damage_amount, 40.0);
        assert!(missile_profile(MissileType::A).base_speed < c.base_speed);
    }

    #[test]
    fn test_game_rules_partial_deserialize() {
        let rules: GameRules = serde_json::from_str(r#"{"starting_money": 500}"#).unwrap();
        assert_eq!(rules.starting_money, 500);
        assert_eq!(rules.wave_duration_secs, 20.0);
        assert_eq!(rules.total_stages, Some(10));
    }

    #[test]
    fn test_upgrade_kind_categories() {
        assert_eq!(UpgradeKind::Range.category(), UpgradeCategory::Launcher);
        assert_eq!(UpgradeKind::Storage.category(), UpgradeCategory::Factory);
        assert_eq!(UpgradeKind::Armor.category(), UpgradeCategory::City);
    }

    #[test]
    fn test_error_messages() {
        let err = CommandError::InsufficientFunds {
            needed: 100,
            available: 40,
        };
        assert_eq!(err.to_string(), "Insufficient funds: need $100, have $40");

        let err: CommandError = PlacementError::OutOfBounds.into();
        assert_eq!(
            err.to_string(),
            "Invalid placement: position is outside the build area"
        );

        let err = CommandError::MaxLevelReached {
            category: UpgradeCategory::Launcher,
            kind: UpgradeKind::Range,
        };
        assert_eq!(err.to_string(), "launcher range already at max level");
    }

    #[test]
    fn test_position_range() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 12.0, 4.0);
        assert!((a.range_to(&b) - 13.0).abs() < 1e-10);
        assert!((a.horizontal_range_to(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_velocity_speed() {
        let v = Velocity::new(3.0, 0.0, 4.0);
        assert!((v.speed() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_bezier_endpoints_and_midpoint() {
        let p0 = DVec3::ZERO;
        let p1 = DVec3::new(5.0, 10.0, 0.0);
        let p2 = DVec3::new(10.0, 0.0, 0.0);
        assert_eq!(quadratic_bezier(p0, p1, p2, 0.0), p0);
        assert_eq!(quadratic_bezier(p0, p1, p2, 1.0), p2);
        let mid = quadratic_bezier(p0, p1, p2, 0.5);
        assert!((mid - DVec3::new(5.0, 5.0, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_aabb_contains() {
        let b = Aabb::from_center_size(DVec3::new(0.0, 5.0, 0.0), DVec3::new(2.0, 10.0, 2.0));
        assert!(b.contains(DVec3::new(0.5, 9.9, -0.5)));
        assert!(b.contains(DVec3::new(1.0, 0.0, 1.0)));
        assert!(!b.contains(DVec3::new(0.0, 10.5, 0.0)));
        assert!(!b.contains(DVec3::new(1.1, 5.0, 0.0)));
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..60 {
            time.advance();
        }
        assert_eq!(time.tick, 60);
        // 60 ticks at 60Hz = 1 second
        assert!((time.elapsed_secs - 1.0).abs() < 1e-10);
        assert!((time.elapsed_ms() - 1000.0).abs() < 1e-7);
    }

    #[test]
    fn test_interception_rate() {
        let mut summary = RunSummary {
            outcome: RunOutcome::Failed,
            stage_reached: 3,
            intercepted: 8,
            ground_hits: 2,
            final_city_health: 0.0,
            difficulty: Difficulty::Normal,
            total_stages: Some(10),
            wave_duration_secs: 20.0,
            cooldown_secs: 5.0,
            final_money: 0,
            duration_secs: 60.0,
            score: 0,
            waves: Vec::new(),
        };
        assert!((summary.interception_rate() - 0.8).abs() < 1e-12);
        summary.intercepted = 0;
        summary.ground_hits = 0;
        assert_eq!(summary.interception_rate(), 0.0);
    }
}
