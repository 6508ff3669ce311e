//! The two-agent match loop

use serde::Serialize;
use tracing::debug;

use crate::{
    Error, Result,
    environment::Environment,
    ports::{Agent, MatchObserver, Observation},
    tictactoe::{Action, BoardState, Player, Status},
};

/// One move of a match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveRecord {
    pub mover: Player,
    pub agent: String,
    pub action: Action,
    /// Board after the move
    pub state: BoardState,
}

/// Summary of a finished match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub moves: Vec<MoveRecord>,
    pub final_state: BoardState,
    /// Sum of rewards for the environment's player
    pub total_reward: f64,
}

impl MatchRecord {
    pub fn status(&self) -> Status {
        self.final_state.status()
    }

    pub fn winner(&self) -> Option<Player> {
        self.final_state.status().winner()
    }
}

/// Runs matches on an environment and reports them to observers
pub struct MatchRunner {
    env: Environment,
    observers: Vec<Box<dyn MatchObserver>>,
}

impl MatchRunner {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            observers: Vec::new(),
        }
    }

    /// Add an observer
    pub fn with_observer(mut self, observer: Box<dyn MatchObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Play one game from the empty board; `first` moves first.
    ///
    /// # Errors
    ///
    /// Fails if an agent fails to choose, picks an illegal action, or an
    /// observer fails.
    pub fn play(&mut self, first: &mut dyn Agent, second: &mut dyn Agent) -> Result<MatchRecord> {
        let start = self.env.reset();
        for observer in &mut self.observers {
            observer.on_match_start(&start)?;
        }

        let mut moves = Vec::new();
        let mut total_reward = 0.0;

        loop {
            let observation = Observation::observe(&self.env);
            let mover = observation.mover;
            let agent: &mut dyn Agent = match mover {
                Player::First => &mut *first,
                Player::Second => &mut *second,
            };

            let action = agent.select_action(&observation)?;
            if !observation.is_legal(action) {
                return Err(Error::IllegalAction {
                    action: action.to_string(),
                    state: observation.state.encode(),
                });
            }

            let result = self.env.step(action, mover)?;
            total_reward += result.reward;
            debug!(%mover, agent = agent.name(), %action, "move played");

            for observer in &mut self.observers {
                observer.on_move(mover, agent.name(), action, &result.next_state)?;
            }
            moves.push(MoveRecord {
                mover,
                agent: agent.name().to_string(),
                action,
                state: result.next_state,
            });

            if result.done {
                break;
            }
        }

        let record = MatchRecord {
            moves,
            final_state: *self.env.state(),
            total_reward,
        };
        for observer in &mut self.observers {
            observer.on_match_end(&record)?;
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{agents::RandomAgent, pipeline::MoveCollector};

    struct Scripted(Vec<Action>);

    impl Agent for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn select_action(&mut self, _observation: &Observation) -> Result<Action> {
            Ok(self.0.remove(0))
        }
    }

    #[test]
    fn first_agent_wins_the_top_row() {
        let mut first = Scripted(vec![Action::TopLeft, Action::TopCenter, Action::TopRight]);
        let mut second = Scripted(vec![Action::CenterLeft, Action::Center]);
        let mut runner = MatchRunner::new(Environment::with_seed(Player::First, 0));

        let record = runner.play(&mut first, &mut second).unwrap();
        assert_eq!(record.moves.len(), 5);
        assert_eq!(record.status(), Status::FirstWin);
        assert_eq!(record.winner(), Some(Player::First));
        assert_eq!(record.total_reward, 1.0);
        assert_eq!(record.moves[1].mover, Player::Second);
    }

    #[test]
    fn reward_is_scored_for_the_environment_player() {
        let mut first = Scripted(vec![Action::TopLeft, Action::TopCenter, Action::TopRight]);
        let mut second = Scripted(vec![Action::CenterLeft, Action::Center]);
        let mut runner = MatchRunner::new(Environment::with_seed(Player::Second, 0));

        let record = runner.play(&mut first, &mut second).unwrap();
        assert_eq!(record.total_reward, -1.0);
    }

    #[test]
    fn illegal_action_stops_the_match() {
        let mut first = Scripted(vec![Action::Center]);
        let mut second = Scripted(vec![Action::Center]);
        let mut runner = MatchRunner::new(Environment::with_seed(Player::First, 0));

        assert!(matches!(
            runner.play(&mut first, &mut second),
            Err(Error::IllegalAction { .. })
        ));
    }

    #[test]
    fn observers_see_every_move() {
        let moves = Rc::new(RefCell::new(Vec::new()));
        let mut runner = MatchRunner::new(Environment::with_seed(Player::First, 0))
            .with_observer(Box::new(MoveCollector::new(Rc::clone(&moves))));

        let mut first = RandomAgent::with_seed("a", 1);
        let mut second = RandomAgent::with_seed("b", 2);
        let record = runner.play(&mut first, &mut second).unwrap();

        assert_eq!(moves.borrow().len(), record.moves.len());
        assert!((5..=9).contains(&record.moves.len()));
        assert!(record.status().is_decided());
    }
}
