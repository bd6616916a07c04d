//! Channel-fed adapter letting a human (via a GUI or any frontend) play
//! through the exact same contract and validation path as an AI.

use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use crate::ai::Strategy;
use crate::board::Move;
use crate::state::GameState;

/// The strategy end of the pair: waits for a submitted move each turn.
///
/// The runner's move budget applies unchanged, so a human who walks away
/// forfeits the same way a hung AI would.
pub struct HumanProxy {
    rx: Receiver<Move>,
}

/// The frontend end of the pair: pushes the clicked move in.
#[derive(Clone)]
pub struct MoveSubmitter {
    tx: Sender<Move>,
}

impl HumanProxy {
    /// Creates the connected (strategy, submitter) pair.
    pub fn pair() -> (HumanProxy, MoveSubmitter) {
        let (tx, rx) = channel();
        (HumanProxy { rx }, MoveSubmitter { tx })
    }
}

impl MoveSubmitter {
    /// Submits the human's move. Returns `false` when the match is over and
    /// nobody is listening anymore.
    pub fn submit(&self, mv: Move) -> bool {
        self.tx.send(mv).is_ok()
    }
}

impl Strategy for HumanProxy {
    fn choose_move(&mut self, _state: &GameState, budget: Duration) -> Option<Move> {
        match self.rx.recv_timeout(budget) {
            Ok(mv) => Some(mv),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
