// ═══════════════════════════════════════════════════════════════════════
// Game setup — random team generation and deployment onto the board
// ═══════════════════════════════════════════════════════════════════════

use crate::board;
use crate::config::GameConfig;
use crate::error::SetupError;
use crate::types::*;
use rand::seq::SliceRandom;
use rand::Rng;

/// Attempts allowed per requested team member before giving up.
pub const ATTEMPTS_PER_MEMBER: usize = 100;

/// One character of a random allowed class at a random level in
/// `1..=max_level`, with the class defaults.
pub fn generate_character(
    rng: &mut impl Rng,
    allowed: &[CharacterType],
    max_level: u32,
) -> Option<Character> {
    let &kind = allowed.choose(rng)?;
    let level = rng.gen_range(1..=max_level.max(1));
    Some(Character::at_level(kind, level))
}

/// Build a team of `count` characters from `allowed`, holding at most one
/// member of `restricted`.
pub fn generate_team(
    rng: &mut impl Rng,
    allowed: &[CharacterType],
    max_level: u32,
    count: usize,
    restricted: Option<CharacterType>,
) -> Result<Team, SetupError> {
    let mut team = Team::new();
    if count == 0 {
        return Ok(team);
    }
    if allowed.is_empty() {
        return Err(SetupError::NoAllowedTypes { count });
    }

    let max_attempts = count * ATTEMPTS_PER_MEMBER;
    for _ in 0..max_attempts {
        let Some(candidate) = generate_character(rng, allowed, max_level) else {
            break;
        };
        if restricted == Some(candidate.kind()) && team.count_of(candidate.kind()) >= 1 {
            continue;
        }
        team.add(candidate);
        if team.len() == count {
            return Ok(team);
        }
    }

    Err(SetupError::Exhausted { attempts: max_attempts })
}

/// `count` distinct cells drawn from the given columns.
pub fn random_positions(
    rng: &mut impl Rng,
    columns: &[usize],
    count: usize,
    board_size: usize,
) -> Result<Vec<usize>, SetupError> {
    let mut candidates: Vec<usize> = (0..board_size)
        .flat_map(|row| {
            columns
                .iter()
                .filter(move |&&col| col < board_size)
                .map(move |&col| board::to_index(row, col, board_size))
        })
        .collect();
    candidates.sort_unstable();
    candidates.dedup();

    if count > candidates.len() {
        return Err(SetupError::NotEnoughCells { count, available: candidates.len() });
    }
    candidates.shuffle(rng);
    candidates.truncate(count);
    Ok(candidates)
}

/// Pair each team member with a position.
pub fn position_team(team: Team, positions: &[usize]) -> Vec<PositionedCharacter> {
    team.into_members()
        .into_iter()
        .zip(positions.iter().copied())
        .map(|(character, position)| PositionedCharacter::new(character, position))
        .collect()
}

/// Fresh roster for a new game: player team on the left columns,
/// computer team on the right.
pub fn create_initial_roster(
    rng: &mut impl Rng,
    config: &GameConfig,
) -> Result<Vec<PositionedCharacter>, SetupError> {
    let players = generate_team(
        rng,
        &PLAYER_TYPES,
        config.max_level,
        config.player_team_size,
        config.restricted_type,
    )?;
    let player_positions = random_positions(rng, &config.player_columns, players.len(), BOARD_SIZE)?;

    let mut roster = position_team(players, &player_positions);
    roster.extend(spawn_opponent_wave(rng, config)?);

    log::debug!("initial roster: {} pieces", roster.len());
    Ok(roster)
}

/// A freshly generated, deployed computer team.
pub fn spawn_opponent_wave(
    rng: &mut impl Rng,
    config: &GameConfig,
) -> Result<Vec<PositionedCharacter>, SetupError> {
    let opponents = generate_team(
        rng,
        &COMPUTER_TYPES,
        config.max_level,
        config.opponent_team_size,
        config.restricted_type,
    )?;
    let positions = random_positions(rng, &config.opponent_columns, opponents.len(), BOARD_SIZE)?;
    Ok(position_team(opponents, &positions))
}

/// Move surviving pieces back to their deployment columns.
pub fn redeploy(
    rng: &mut impl Rng,
    pieces: Vec<PositionedCharacter>,
    columns: &[usize],
) -> Result<Vec<PositionedCharacter>, SetupError> {
    let positions = random_positions(rng, columns, pieces.len(), BOARD_SIZE)?;
    Ok(pieces
        .into_iter()
        .zip(positions)
        .map(|(pc, position)| pc.moved_to(position))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_team_has_requested_size() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let team = generate_team(&mut rng, &PLAYER_TYPES, 4, 3, Some(CharacterType::Magician)).unwrap();
        assert_eq!(team.len(), 3);
    }

    #[test]
    fn test_single_type_team() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let team = generate_team(&mut rng, &[CharacterType::Swordsman], 4, 5, None).unwrap();
        assert!(team.members().iter().all(|c| c.kind() == CharacterType::Swordsman));
    }

    #[test]
    fn test_levels_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let team = generate_team(&mut rng, &COMPUTER_TYPES, 2, 10, None).unwrap();
        assert!(team.members().iter().all(|c| (1..=2).contains(&c.level)));
    }

    #[test]
    fn test_zero_count_is_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert!(generate_team(&mut rng, &[], 4, 0, None).unwrap().is_empty());
    }

    #[test]
    fn test_empty_allowed_fails() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(
            generate_team(&mut rng, &[], 4, 3, None),
            Err(SetupError::NoAllowedTypes { count: 3 })
        );
    }

    #[test]
    fn test_restricted_class_exhausts() {
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let result = generate_team(&mut rng, &[CharacterType::Magician], 1, 2, Some(CharacterType::Magician));
        assert_eq!(result, Err(SetupError::Exhausted { attempts: 200 }));
    }

    #[test]
    fn test_at_most_one_magician() {
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let team = generate_team(
                &mut rng,
                &[CharacterType::Magician, CharacterType::Swordsman],
                4,
                5,
                Some(CharacterType::Magician),
            )
            .unwrap();
            assert!(team.count_of(CharacterType::Magician) <= 1);
        }
    }

    #[test]
    fn test_positions_distinct_and_in_columns() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let positions = random_positions(&mut rng, &[6, 7], 16, 8).unwrap();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 16);
        assert!(positions.iter().all(|p| p % 8 == 6 || p % 8 == 7));
    }

    #[test]
    fn test_too_many_positions() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        assert_eq!(
            random_positions(&mut rng, &[0], 9, 8),
            Err(SetupError::NotEnoughCells { count: 9, available: 8 })
        );
    }

    #[test]
    fn test_initial_roster_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let roster = create_initial_roster(&mut rng, &GameConfig::default()).unwrap();
        assert_eq!(roster.len(), 4);
        for pc in &roster {
            let col = pc.position() % BOARD_SIZE;
            if pc.is_player() {
                assert!(col <= 1);
            } else {
                assert!(col >= 6);
            }
        }
    }
}
