//! Agents that pick moves from solved tables, at random, or from user input

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use rand::{Rng, SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    planner::{PolicyTable, ValueTable},
    ports::{Agent, Observation},
    tictactoe::{Action, Status},
};

fn no_actions(observation: &Observation) -> Error {
    Error::NoActionsAvailable {
        state: observation.state.encode(),
    }
}

/// Uniformly random legal moves (baseline)
pub struct RandomAgent {
    name: String,
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_seed(name, random())
    }

    /// Create a random agent with a deterministic seed
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_action(&mut self, observation: &Observation) -> Result<Action> {
        if observation.candidates.is_empty() {
            return Err(no_actions(observation));
        }
        let index = self.rng.random_range(0..observation.candidates.len());
        Ok(observation.candidates[index].0)
    }
}

/// Moves to the successor board with the highest value.
///
/// Ties between equally valued successors are broken uniformly at random.
pub struct ValueAgent {
    name: String,
    values: ValueTable,
    rng: StdRng,
}

impl ValueAgent {
    pub fn new(name: impl Into<String>, values: ValueTable) -> Self {
        Self {
            name: name.into(),
            values,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn values(&self) -> &ValueTable {
        &self.values
    }
}

impl Agent for ValueAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_action(&mut self, observation: &Observation) -> Result<Action> {
        let mut best_value = f64::NEG_INFINITY;
        let mut best_actions = Vec::new();

        for &(action, next_state) in &observation.candidates {
            let value = self
                .values
                .get(&next_state)
                .ok_or_else(|| Error::UnknownState {
                    board: next_state.encode(),
                })?;

            if value > best_value {
                best_value = value;
                best_actions.clear();
                best_actions.push(action);
            } else if value == best_value {
                best_actions.push(action);
            }
        }

        if best_actions.is_empty() {
            return Err(no_actions(observation));
        }
        let index = self.rng.random_range(0..best_actions.len());
        Ok(best_actions[index])
    }
}

/// Samples moves from a policy table
pub struct PolicyAgent {
    name: String,
    policy: PolicyTable,
    rng: StdRng,
}

impl PolicyAgent {
    pub fn new(name: impl Into<String>, policy: PolicyTable) -> Self {
        Self {
            name: name.into(),
            policy,
            rng: StdRng::seed_from_u64(random()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }
}

impl Agent for PolicyAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_action(&mut self, observation: &Observation) -> Result<Action> {
        if observation.state.status() != Status::Undecided {
            return Err(no_actions(observation));
        }

        let dist = self
            .policy
            .get(&observation.state)
            .ok_or_else(|| Error::UnknownState {
                board: observation.state.encode(),
            })?;
        dist.sample(&mut self.rng)
            .ok_or_else(|| no_actions(observation))
    }
}

/// Reads moves as action names (`TL`, `C`, `BR`, ...) from a reader
pub struct InputAgent<R, W> {
    name: String,
    input: R,
    output: W,
}

impl InputAgent<StdinLock<'static>, Stdout> {
    /// Agent reading from standard input and prompting on standard output
    pub fn stdin(name: impl Into<String>) -> Self {
        Self::new(name, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> InputAgent<R, W> {
    pub fn new(name: impl Into<String>, input: R, output: W) -> Self {
        Self {
            name: name.into(),
            input,
            output,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, observation: &Observation) -> Result<()> {
        let legal: Vec<&str> = observation.legal_actions().map(Action::name).collect();
        write!(
            self.output,
            "{} ({}) move [{}]: ",
            self.name,
            observation.mover,
            legal.join(" ")
        )?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Agent for InputAgent<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_action(&mut self, observation: &Observation) -> Result<Action> {
        if observation.candidates.is_empty() {
            return Err(no_actions(observation));
        }

        loop {
            self.prompt(observation)?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(Error::InputClosed);
            }

            match line.trim().parse::<Action>() {
                Ok(action) if observation.is_legal(action) => return Ok(action),
                Ok(action) => writeln!(self.output, "{action} is already taken")?,
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }
}
