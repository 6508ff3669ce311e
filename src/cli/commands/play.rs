//! Play command - Run a match between two agents

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{
    adapters::MsgPackRepository,
    agents::{InputAgent, PolicyAgent, RandomAgent, ValueAgent},
    cli::output::{print_kv, print_section},
    environment::Environment,
    pipeline::{BoardPrinter, MatchRunner},
    ports::{Agent, TableRepository},
    tictactoe::{Player, Status},
};

/// Agent controlling one side of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AgentKind {
    /// Moves typed on standard input
    Input,
    /// Uniformly random legal moves
    Random,
    /// Greedy on the stored value table
    Value,
    /// Samples the stored policy table
    Policy,
}

#[derive(Parser, Debug)]
#[command(about = "Play a match between two agents")]
pub struct PlayArgs {
    /// Agent for the first player (X)
    #[arg(value_enum)]
    pub first: AgentKind,

    /// Agent for the second player (O)
    #[arg(value_enum)]
    pub second: AgentKind,

    /// Directory holding the stored tables
    #[arg(long, short = 't', default_value = "tables")]
    pub tables: PathBuf,

    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let repo = MsgPackRepository::new(&args.tables);
    let seed_for = |offset: u64| args.seed.map(|seed| seed.wrapping_add(offset));

    let mut first = build_agent(args.first, Player::First, &repo, seed_for(1))?;
    let mut second = build_agent(args.second, Player::Second, &repo, seed_for(2))?;

    let env = match args.seed {
        Some(seed) => Environment::with_seed(Player::First, seed),
        None => Environment::new(Player::First),
    };
    let mut runner = MatchRunner::new(env).with_observer(Box::new(BoardPrinter::stdout()));

    let (mut first_wins, mut second_wins, mut draws) = (0, 0, 0);
    for game in 1..=args.games {
        print_section(&format!(
            "Game {game}: {} (X) vs {} (O)",
            first.name(),
            second.name()
        ));
        let record = runner
            .play(first.as_mut(), second.as_mut())
            .with_context(|| format!("Game {game} aborted"))?;

        match record.status() {
            Status::FirstWin => first_wins += 1,
            Status::SecondWin => second_wins += 1,
            _ => draws += 1,
        }
    }

    if args.games > 1 {
        print_section("Summary");
        print_kv("First player wins", &first_wins.to_string());
        print_kv("Second player wins", &second_wins.to_string());
        print_kv("Draws", &draws.to_string());
    }
    Ok(())
}

fn build_agent(
    kind: AgentKind,
    player: Player,
    repo: &MsgPackRepository,
    seed: Option<u64>,
) -> Result<Box<dyn Agent>> {
    let agent: Box<dyn Agent> = match kind {
        AgentKind::Input => Box::new(InputAgent::stdin(format!("human-{player}"))),
        AgentKind::Random => {
            let name = format!("random-{player}");
            match seed {
                Some(seed) => Box::new(RandomAgent::with_seed(name, seed)),
                None => Box::new(RandomAgent::new(name)),
            }
        }
        AgentKind::Value => {
            let values = repo
                .value_table(player)
                .with_context(|| format!("Loading value table for {player} player"))?;
            let agent = ValueAgent::new(format!("value-{player}"), values);
            Box::new(match seed {
                Some(seed) => agent.with_seed(seed),
                None => agent,
            })
        }
        AgentKind::Policy => {
            let policy = repo
                .policy_table(player)
                .with_context(|| format!("Loading policy table for {player} player"))?;
            let agent = PolicyAgent::new(format!("policy-{player}"), policy);
            Box::new(match seed {
                Some(seed) => agent.with_seed(seed),
                None => agent,
            })
        }
    };
    Ok(agent)
}
