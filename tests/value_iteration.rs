//! Value iteration over the full state space

mod common;

use common::{board, env, solve_values};
use ttt_planner::{
    Error,
    config::PlannerConfig,
    planner::{Phase, ValueIterationPlanner},
    tictactoe::{BoardState, Player, Status},
};

#[test]
fn empty_board_is_worth_a_draw_for_both_marks() {
    for player in Player::BOTH {
        let (_, values) = solve_values(player);
        assert_eq!(values.get(&BoardState::empty()), Some(0.0));
    }
}

#[test]
fn converges_in_four_sweeps_at_default_parameters() {
    let (planner, _) = solve_values(Player::First);
    let log = planner.log();

    assert_eq!(log.len(), 4);
    assert!(log.iter().all(|record| record.phase == Phase::ValueIteration));
    assert_eq!(
        log.iter().map(|record| record.iteration).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert!(log[3].delta < PlannerConfig::DEFAULT_THRESHOLD);
    assert!(log[0].delta >= PlannerConfig::DEFAULT_THRESHOLD);
}

#[test]
fn one_more_sweep_after_convergence_changes_nothing() {
    let (planner, values) = solve_values(Player::Second);
    let mut again = values.clone();
    let delta = planner.sweep(&mut again).unwrap();

    assert!(delta < PlannerConfig::DEFAULT_THRESHOLD);
    assert!(again.max_abs_difference(&values) < PlannerConfig::DEFAULT_THRESHOLD);
}

#[test]
fn decided_boards_keep_their_terminal_values() {
    let (_, values) = solve_values(Player::First);
    for (state, value) in values.iter() {
        match state.status() {
            Status::FirstWin => assert_eq!(value, 1.0),
            Status::SecondWin => assert_eq!(value, -1.0),
            Status::Draw => assert_eq!(value, 0.0),
            Status::Undecided => assert!((-2.0..=2.0).contains(&value)),
            Status::Infeasible => panic!("infeasible board in value table"),
        }
    }
}

#[test]
fn values_are_antisymmetric_between_player_marks() {
    let (_, first) = solve_values(Player::First);
    let (_, second) = solve_values(Player::Second);

    // Same minimax game seen from the other side.
    for (state, value) in first.iter() {
        let other = second.get(state).unwrap();
        assert!(
            (value + other).abs() < 1e-9,
            "{}: {value} vs {other}",
            state.encode()
        );
    }
}

#[test]
fn opponent_threat_is_valued_as_a_loss() {
    let (_, values) = solve_values(Player::First);

    // O completes the middle row at once: reward -1 plus 0.9 * V(terminal) = -1.9
    let state = board("XX.OO.X..");
    assert_eq!(state.turn(), Player::Second);
    let value = values.get(&state).unwrap();
    assert!((value - (-1.0 + 0.9 * -1.0)).abs() < 1e-9);
}

#[test]
fn greedy_action_takes_an_open_win() {
    let (_, values) = solve_values(Player::First);
    let env = env(Player::First);
    let state = board("XX.OO....");
    assert_eq!(
        values.greedy_action(&env, &state),
        Some(ttt_planner::tictactoe::Action::TopRight)
    );
}

#[test]
fn greedy_action_minimizes_on_the_opponents_turn() {
    // O to move; CR completes the middle row for O.
    let state = board("XX.OO.X..");
    for player in Player::BOTH {
        let (_, values) = solve_values(player);
        assert_eq!(
            values.greedy_action(&env(player), &state),
            Some(ttt_planner::tictactoe::Action::CenterRight),
            "{player} table"
        );
    }
}

#[test]
fn tight_cap_surfaces_non_convergence() {
    let config = PlannerConfig::new().with_max_iterations(1);
    let mut planner = ValueIterationPlanner::with_config(env(Player::First), config);
    match planner.plan() {
        Err(Error::NotConverged {
            phase, iterations, ..
        }) => {
            assert_eq!(phase, "value iteration");
            assert_eq!(iterations, 1);
        }
        other => panic!("expected non-convergence, got {other:?}"),
    }
}

#[test]
fn smaller_threshold_still_reaches_the_same_fixed_point() {
    let (_, values) = solve_values(Player::First);
    let config = PlannerConfig::new().with_threshold(1e-10);
    let mut planner = ValueIterationPlanner::with_config(env(Player::First), config);
    let precise = planner.plan().unwrap();
    assert!(precise.max_abs_difference(&values) < 1e-4);
}
