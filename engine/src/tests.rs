// ═══════════════════════════════════════════════════════════════════════
// Scenario test suite for the tactics engine
// ═══════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use crate::types::*;
    use crate::config::GameConfig;
    use crate::engine::{
        apply_action, interpret_click, phase, select_cell, Action, BoardStatus, ClickOutcome,
        Resolution, TurnPhase,
    };
    use crate::error::{ActionError, StateError};
    use crate::navigation;
    use crate::progression::start_next_wave;
    use crate::setup::create_initial_roster;
    use crate::state::GameState;
    use crate::storage::{GameStateService, KeyValueStore, MemoryStore, STATE_KEY};
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;
    use std::collections::HashSet;

    // ── Helpers ─────────────────────────────────────────────────────────

    fn piece(kind: CharacterType, position: usize) -> PositionedCharacter {
        PositionedCharacter::new(Character::new(kind), position)
    }

    fn state_with(pieces: Vec<PositionedCharacter>) -> GameState {
        GameState::with_roster(pieces)
    }

    /// Every legal action for the side to move, moves first.
    fn legal_actions(state: &GameState) -> Vec<Action> {
        let faction = if state.is_player_turn { Faction::Player } else { Faction::Computer };
        let roster = &state.positioned_characters;
        let mut actions = Vec::new();
        for pc in navigation::faction_members(roster, faction) {
            let from = pc.position();
            for to in navigation::move_cells(roster, from) {
                actions.push(Action::Move { from, to });
            }
            for target in navigation::attack_cells(roster, from) {
                actions.push(Action::Attack { attacker: from, target });
            }
        }
        actions
    }

    fn assert_roster_invariants(state: &GameState) {
        let mut seen = HashSet::new();
        for pc in &state.positioned_characters {
            assert!(pc.position() < CELL_COUNT, "position {} off board", pc.position());
            assert!(seen.insert(pc.position()), "position {} used twice", pc.position());
            assert!(pc.character().health > 0.0, "dead piece left at {}", pc.position());
        }
    }

    // ── Turn phases ─────────────────────────────────────────────────────

    #[test]
    fn test_initial_phase_is_player_turn() {
        let state = GameState::new();
        assert_eq!(phase(&state), TurnPhase::PlayerTurn);
        assert_eq!(state.current_theme, Theme::Prairie);
        assert!(!state.game_over);
    }

    #[test]
    fn test_move_hands_turn_to_computer() {
        let mut state = state_with(vec![piece(CharacterType::Swordsman, 0), piece(CharacterType::Undead, 63)]);
        state.selected_cell_index = Some(0);

        let report = apply_action(&mut state, Action::Move { from: 0, to: 4 }).unwrap();

        assert_eq!(report.resolution, Resolution::Moved { from: 0, to: 4 });
        assert_eq!(report.status, BoardStatus::Ongoing);
        assert_eq!(phase(&state), TurnPhase::ComputerTurnRunning);
        assert_eq!(state.selected_cell_index, None);
        assert!(state.character_at(0).is_none());
        assert_eq!(state.character_at(4).unwrap().character().kind(), CharacterType::Swordsman);
        // roster order is preserved by the replacement
        assert_eq!(state.positioned_characters[0].position(), 4);
    }

    #[test]
    fn test_computer_pass_returns_turn() {
        let mut state = state_with(vec![piece(CharacterType::Swordsman, 0), piece(CharacterType::Undead, 63)]);
        state.is_player_turn = false;
        let report = apply_action(&mut state, Action::Pass).unwrap();
        assert_eq!(report.faction, Faction::Computer);
        assert_eq!(phase(&state), TurnPhase::PlayerTurn);
    }

    #[test]
    fn test_bowman_attacks_demon_scenario() {
        let mut state = state_with(vec![piece(CharacterType::Bowman, 0), piece(CharacterType::Demon, 1)]);
        state.positioned_characters[1].character_mut().defense = 0.0;

        let report = apply_action(&mut state, Action::Attack { attacker: 0, target: 1 }).unwrap();

        match report.resolution {
            Resolution::Attacked(outcome) => {
                assert_eq!(outcome.damage, 25.0);
                assert_eq!(outcome.health_after, 75.0);
                assert!(!outcome.is_kill());
            }
            other => panic!("expected an attack, got {:?}", other),
        }
        assert_eq!(state.character_at(1).unwrap().character().health, 75.0);
        assert_eq!(phase(&state), TurnPhase::ComputerTurnRunning);
    }

    #[test]
    fn test_last_enemy_killed_clears_wave() {
        let mut state = state_with(vec![piece(CharacterType::Swordsman, 0), piece(CharacterType::Demon, 1)]);
        state.positioned_characters[1].character_mut().health = 5.0;

        let report = apply_action(&mut state, Action::Attack { attacker: 0, target: 1 }).unwrap();

        assert_eq!(report.status, BoardStatus::WaveCleared);
        assert_eq!(state.statistics.enemies_killed, 1);
        assert!(state.character_at(1).is_none());
        // the turn stays with the player until the next wave is spawned
        assert!(state.is_player_turn);

        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let mut store = MemoryStore::new();
        start_next_wave(&mut state, &GameConfig::default(), &mut store, &mut rng).unwrap();
        assert_eq!(phase(&state), TurnPhase::PlayerTurn);
        assert_eq!(state.current_theme, Theme::Desert);
        assert_eq!(state.faction_count(Faction::Computer), 2);
        assert_roster_invariants(&state);
    }

    #[test]
    fn test_player_wipeout_ends_game() {
        let mut state = state_with(vec![piece(CharacterType::Swordsman, 0), piece(CharacterType::Undead, 1)]);
        state.positioned_characters[0].character_mut().health = 5.0;
        state.is_player_turn = false;

        let report = apply_action(&mut state, Action::Attack { attacker: 1, target: 0 }).unwrap();

        assert_eq!(report.status, BoardStatus::PlayerDefeated);
        assert_eq!(phase(&state), TurnPhase::GameOver);
        assert_eq!(state.statistics.player_defeats, 1);
        // a killed player piece is not an enemy kill
        assert_eq!(state.statistics.enemies_killed, 0);
        assert_eq!(apply_action(&mut state, Action::Pass), Err(ActionError::GameOver));
    }

    #[test]
    fn test_invalid_actions_do_not_mutate() {
        let mut state = state_with(vec![
            piece(CharacterType::Swordsman, 0),
            piece(CharacterType::Bowman, 2),
            piece(CharacterType::Undead, 63),
        ]);
        let before = state.clone();

        assert_eq!(
            apply_action(&mut state, Action::Move { from: 0, to: 2 }),
            Err(ActionError::NotInMoveRange { from: 0, to: 2 })
        );
        assert_eq!(
            apply_action(&mut state, Action::Move { from: 0, to: 10 }),
            Err(ActionError::NotInMoveRange { from: 0, to: 10 })
        );
        assert_eq!(
            apply_action(&mut state, Action::Attack { attacker: 0, target: 63 }),
            Err(ActionError::NotInAttackRange { from: 0, to: 63 })
        );
        assert_eq!(
            apply_action(&mut state, Action::Move { from: 63, to: 62 }),
            Err(ActionError::WrongFaction { cell: 63, faction: Faction::Computer })
        );
        assert_eq!(apply_action(&mut state, Action::Move { from: 5, to: 6 }), Err(ActionError::EmptyCell(5)));
        assert_eq!(apply_action(&mut state, Action::Move { from: 64, to: 6 }), Err(ActionError::OutOfBoard(64)));
        assert_eq!(state, before);
    }

    #[test]
    fn test_cannot_attack_own_side() {
        let mut state = state_with(vec![
            piece(CharacterType::Swordsman, 0),
            piece(CharacterType::Bowman, 1),
            piece(CharacterType::Undead, 63),
        ]);
        assert_eq!(
            apply_action(&mut state, Action::Attack { attacker: 0, target: 1 }),
            Err(ActionError::NotInAttackRange { from: 0, to: 1 })
        );
    }

    // ── Click interpretation ────────────────────────────────────────────

    #[test]
    fn test_click_sequence() {
        let mut state = state_with(vec![
            piece(CharacterType::Swordsman, 0),
            piece(CharacterType::Magician, 9),
            piece(CharacterType::Undead, 1),
            piece(CharacterType::Vampire, 40),
        ]);

        // nothing selected: only an own piece does anything
        assert_eq!(interpret_click(&state, 1), ClickOutcome::Ignored);
        assert_eq!(interpret_click(&state, 20), ClickOutcome::Ignored);
        assert_eq!(interpret_click(&state, 0), ClickOutcome::Select { previous: None, index: 0 });

        select_cell(&mut state, 0).unwrap();
        assert_eq!(interpret_click(&state, 0), ClickOutcome::Ignored);
        assert_eq!(interpret_click(&state, 9), ClickOutcome::Select { previous: Some(0), index: 9 });
        assert_eq!(interpret_click(&state, 16), ClickOutcome::Perform(Action::Move { from: 0, to: 16 }));
        assert_eq!(
            interpret_click(&state, 1),
            ClickOutcome::Perform(Action::Attack { attacker: 0, target: 1 })
        );
        // vampire at 40 is five rows down: out of reach either way
        assert_eq!(interpret_click(&state, 40), ClickOutcome::Invalid);
        // off the queen lines
        assert_eq!(interpret_click(&state, 17), ClickOutcome::Invalid);

        state.is_player_turn = false;
        assert_eq!(interpret_click(&state, 16), ClickOutcome::ComputerTurn);

        state.game_over = true;
        assert_eq!(interpret_click(&state, 16), ClickOutcome::Ignored);
    }

    #[test]
    fn test_select_rejects_enemy_and_empty() {
        let mut state = state_with(vec![piece(CharacterType::Swordsman, 0), piece(CharacterType::Undead, 1)]);
        assert!(matches!(select_cell(&mut state, 1), Err(ActionError::WrongFaction { .. })));
        assert_eq!(select_cell(&mut state, 5), Err(ActionError::EmptyCell(5)));
        state.is_player_turn = false;
        assert_eq!(select_cell(&mut state, 0), Err(ActionError::NotPlayerTurn));
        assert_eq!(state.selected_cell_index, None);
    }

    // ── Persistence contract ────────────────────────────────────────────

    fn sample_state() -> GameState {
        let bowman = Character::with_stats(CharacterType::Bowman, 3, 33.0, 29.0, 64.5);
        let mut state = state_with(vec![
            PositionedCharacter::new(bowman, 8),
            PositionedCharacter::new(Character::with_stats(CharacterType::Vampire, 2, 41.0, 37.0, 12.25), 47),
        ]);
        state.is_player_turn = false;
        state.current_theme = Theme::Arctic;
        state.statistics.enemies_killed = 7;
        state.statistics.max_level_reached = 3;
        state.selected_cell_index = Some(8);
        state
    }

    #[test]
    fn test_object_has_exactly_the_persisted_fields() {
        let object = sample_state().to_object();
        let keys: HashSet<&str> = object.as_object().unwrap().keys().map(String::as_str).collect();
        let expected: HashSet<&str> =
            ["isPlayerTurn", "positionedCharacters", "currentTheme", "gameOver", "statistics"].into();
        assert_eq!(keys, expected);

        assert_eq!(object["currentTheme"], json!("arctic"));
        assert_eq!(
            object["positionedCharacters"][0],
            json!({
                "character": { "level": 3, "type": "bowman", "attack": 33.0, "defense": 29.0, "health": 64.5 },
                "position": 8
            })
        );
        assert_eq!(object["statistics"]["enemiesKilled"], json!(7));
    }

    #[test]
    fn test_round_trip_drops_only_selection() {
        let original = sample_state();
        let restored = GameState::from_object(&original.to_object()).unwrap();
        assert_eq!(restored.selected_cell_index, None);
        assert_eq!(restored, GameState { selected_cell_index: None, ..original.clone() });

        let from_text = GameState::from_json(&original.to_json().unwrap()).unwrap();
        assert_eq!(from_text, restored);
    }

    #[test]
    fn test_lenient_load() {
        let object = json!({
            "isPlayerTurn": true,
            "positionedCharacters": [
                { "character": { "level": 1, "type": "paladin", "attack": 40, "defense": 10, "health": 100 }, "position": 3 },
                { "character": { "level": 2, "type": "daemon", "attack": 10, "defense": 10, "health": 80 }, "position": 60 }
            ],
            "currentTheme": "volcano",
            "statistics": { "enemiesKilled": 2, "saveUsageCount": null }
        });
        let state = GameState::from_object(&object).unwrap();
        assert_eq!(state.positioned_characters[0].character().kind(), CharacterType::Swordsman);
        assert_eq!(state.positioned_characters[1].character().kind(), CharacterType::Demon);
        assert_eq!(state.current_theme, Theme::Prairie);
        assert!(!state.game_over);
        assert_eq!(state.statistics.enemies_killed, 2);
        assert_eq!(state.statistics.save_usage_count, 0);
        assert_eq!(state.statistics.player_defeats, 0);
    }

    #[test]
    fn test_null_statistics_default() {
        let state = GameState::from_object(&json!({ "statistics": null })).unwrap();
        assert_eq!(state.statistics, StatRecord::default());
        assert!(state.positioned_characters.is_empty());
        assert!(state.is_player_turn);
    }

    #[test]
    fn test_invalid_rosters_are_rejected() {
        let duplicate = json!({
            "positionedCharacters": [
                { "character": { "level": 1, "type": "bowman", "attack": 25, "defense": 25, "health": 100 }, "position": 3 },
                { "character": { "level": 1, "type": "demon", "attack": 10, "defense": 10, "health": 100 }, "position": 3 }
            ]
        });
        assert!(matches!(GameState::from_object(&duplicate), Err(StateError::InvalidRoster(_))));

        let off_board = json!({
            "positionedCharacters": [
                { "character": { "level": 1, "type": "bowman", "attack": 25, "defense": 25, "health": 100 }, "position": 64 }
            ]
        });
        assert!(matches!(GameState::from_object(&off_board), Err(StateError::InvalidRoster(_))));

        let dead = json!({
            "positionedCharacters": [
                { "character": { "level": 1, "type": "bowman", "attack": 25, "defense": 25, "health": 0 }, "position": 3 },
                { "character": { "level": 1, "type": "demon", "attack": 10, "defense": 10, "health": -30 }, "position": 60 }
            ]
        });
        assert!(matches!(GameState::from_object(&dead), Err(StateError::InvalidRoster(_))));
        assert!(matches!(GameState::from_json(&dead.to_string()), Err(StateError::InvalidRoster(_))));
    }

    #[test]
    fn test_save_slot() {
        let mut service = GameStateService::new(MemoryStore::new());
        assert!(service.load().unwrap().is_none());
        assert_eq!(service.load_or_default().unwrap(), GameState::default());

        let state = sample_state();
        service.save(&state).unwrap();
        let loaded = service.load().unwrap().unwrap();
        assert_eq!(loaded.positioned_characters, state.positioned_characters);

        service.store_mut().set(STATE_KEY, "{ not json").unwrap();
        assert!(matches!(service.load(), Err(StateError::Corrupt(_))));

        service.clear().unwrap();
        assert!(service.load().unwrap().is_none());
    }

    #[test]
    fn test_persist_statistics_keeps_the_rest_of_the_save() {
        let mut service = GameStateService::new(MemoryStore::new());
        let state = sample_state();
        service.save(&state).unwrap();

        let mut stats = state.statistics;
        stats.record_player_defeat();
        service.persist_statistics(&stats).unwrap();

        let loaded = service.load().unwrap().unwrap();
        assert_eq!(loaded.statistics.player_defeats, 1);
        assert_eq!(loaded.positioned_characters, state.positioned_characters);
        assert_eq!(loaded.current_theme, Theme::Arctic);
    }

    #[test]
    fn test_persist_statistics_without_save() {
        let mut service = GameStateService::new(MemoryStore::new());
        let mut stats = StatRecord::default();
        stats.record_save();
        service.persist_statistics(&stats).unwrap();
        let loaded = service.load().unwrap().unwrap();
        assert!(loaded.positioned_characters.is_empty());
        assert_eq!(loaded.statistics.save_usage_count, 1);
    }

    // ── Whole games ─────────────────────────────────────────────────────

    /// Random legal play keeps the roster valid and never stalls.
    #[test]
    fn test_random_play_keeps_invariants() {
        for seed in 0..10u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut store = MemoryStore::new();
            let config = GameConfig::default();
            let mut state = state_with(create_initial_roster(&mut rng, &config).unwrap());

            for _ in 0..300 {
                if state.game_over {
                    break;
                }
                let action = legal_actions(&state).choose(&mut rng).copied().unwrap_or(Action::Pass);
                let report = apply_action(&mut state, action).unwrap();
                if report.status == BoardStatus::WaveCleared {
                    start_next_wave(&mut state, &config, &mut store, &mut rng).unwrap();
                }
                assert_roster_invariants(&state);
            }
        }
    }

    #[test]
    fn test_initial_roster_is_deterministic_per_seed() {
        let config = GameConfig::default();
        let a = create_initial_roster(&mut ChaCha8Rng::seed_from_u64(5), &config).unwrap();
        let b = create_initial_roster(&mut ChaCha8Rng::seed_from_u64(5), &config).unwrap();
        assert_eq!(a, b);
    }
}
