//! Match observers

use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

use crate::{
    Result,
    pipeline::MatchRecord,
    ports::MatchObserver,
    tictactoe::{Action, BoardState, Player, Status},
};

/// Prints the board after every move and the result at the end
pub struct BoardPrinter<W: Write> {
    out: W,
}

impl BoardPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> BoardPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> MatchObserver for BoardPrinter<W> {
    fn on_match_start(&mut self, state: &BoardState) -> Result<()> {
        writeln!(self.out, "{state}\n")?;
        Ok(())
    }

    fn on_move(
        &mut self,
        mover: Player,
        agent: &str,
        action: Action,
        next_state: &BoardState,
    ) -> Result<()> {
        writeln!(self.out, "{agent} ({mover}) plays {action}")?;
        writeln!(self.out, "{next_state}\n")?;
        Ok(())
    }

    fn on_match_end(&mut self, record: &MatchRecord) -> Result<()> {
        let result = match record.status() {
            Status::Draw => "draw".to_string(),
            status => match status.winner() {
                Some(winner) => format!("{winner} player wins"),
                None => format!("{status:?}"),
            },
        };
        writeln!(
            self.out,
            "Result: {result} after {} moves",
            record.moves.len()
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Collects played actions into a shared list
pub struct MoveCollector {
    moves: Rc<RefCell<Vec<(Player, Action)>>>,
}

impl MoveCollector {
    pub fn new(moves: Rc<RefCell<Vec<(Player, Action)>>>) -> Self {
        Self { moves }
    }
}

impl MatchObserver for MoveCollector {
    fn on_move(
        &mut self,
        mover: Player,
        _agent: &str,
        action: Action,
        _next_state: &BoardState,
    ) -> Result<()> {
        self.moves.borrow_mut().push((mover, action));
        Ok(())
    }
}
