//! Storing solved tables and reproducing greedy play from them

mod common;

use common::{board, env, solve_policy, solve_values};
use tempfile::TempDir;
use ttt_planner::{
    Error,
    adapters::{InMemoryRepository, MsgPackRepository},
    config::PlannerConfig,
    planner::{SavedPolicyTable, SavedValueTable},
    ports::TableRepository,
    tictactoe::{Player, Status},
};

fn store_both_marks<R: TableRepository>(repo: &R) {
    let config = PlannerConfig::default();
    for player in Player::BOTH {
        let (_, values) = solve_values(player);
        let (_, policy) = solve_policy(player);
        repo.save_values(&SavedValueTable::from_table(&values, &config))
            .unwrap();
        repo.save_policy(&SavedPolicyTable::from_table(&policy, &config))
            .unwrap();
    }
}

#[test]
fn msgpack_store_reproduces_tables_exactly() {
    let temp_dir = TempDir::new().unwrap();
    let repo = MsgPackRepository::new(temp_dir.path());
    store_both_marks(&repo);

    for name in [
        "values_first.msgpack",
        "values_second.msgpack",
        "policy_first.msgpack",
        "policy_second.msgpack",
    ] {
        assert!(temp_dir.path().join(name).exists(), "{name} missing");
    }

    for player in Player::BOTH {
        let (_, values) = solve_values(player);
        let (_, policy) = solve_policy(player);

        let loaded_values = repo.value_table(player).unwrap();
        assert_eq!(loaded_values.player(), player);
        assert_eq!(loaded_values.max_abs_difference(&values), 0.0);

        let loaded_policy = repo.policy_table(player).unwrap();
        assert_eq!(loaded_policy.len(), policy.len());
        for (state, dist) in policy.iter() {
            assert_eq!(loaded_policy.get(state), Some(dist));
        }
    }
}

#[test]
fn loaded_values_give_the_same_greedy_moves() {
    let repo = InMemoryRepository::new();
    store_both_marks(&repo);

    let env = env(Player::First);
    let (_, values) = solve_values(Player::First);
    let loaded = repo.value_table(Player::First).unwrap();

    for state in env.states().iter().filter(|s| s.status() == Status::Undecided) {
        assert_eq!(
            loaded.greedy_action(&env, state),
            values.greedy_action(&env, state)
        );
    }
}

#[test]
fn saved_metadata_survives_the_round_trip() {
    let repo = InMemoryRepository::new();
    let config = PlannerConfig::new().with_gamma(0.8).with_threshold(1e-6);
    let (_, values) = solve_values(Player::Second);
    repo.save_values(&SavedValueTable::from_table(&values, &config))
        .unwrap();

    let saved = repo.load_values(Player::Second).unwrap();
    assert_eq!(saved.version, SavedValueTable::VERSION);
    assert_eq!(saved.gamma, 0.8);
    assert_eq!(saved.threshold, 1e-6);
    assert_eq!(saved.entries().len(), 5890);
}

#[test]
fn missing_tables_are_reported_per_player() {
    let repo = InMemoryRepository::new();
    let (_, values) = solve_values(Player::First);
    repo.save_values(&SavedValueTable::from_table(&values, &PlannerConfig::default()))
        .unwrap();

    assert!(repo.load_values(Player::First).is_ok());
    match repo.load_values(Player::Second) {
        Err(Error::MissingTable { kind, player }) => {
            assert_eq!(kind, "values");
            assert_eq!(player, "second");
        }
        other => panic!("expected a missing table, got {other:?}"),
    }
}

#[test]
fn board_serializes_as_its_marks() {
    let state = board("XO.......");
    let json = serde_json::to_string(&state).unwrap();
    assert_eq!(json, "[1,-1,0,0,0,0,0,0,0]");

    let back: ttt_planner::tictactoe::BoardState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
    assert_eq!(back.turn(), Player::First);
}
