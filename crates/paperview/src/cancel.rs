//! Cooperative cancellation for render tasks
//!
//! A task captures its token when it starts and checks it before committing
//! any result to the canvas. Cancelling never aborts in-flight work; a
//! superseded task simply discards what it produced. The viewer runs on one
//! event loop, so the shared flag is a plain `Cell` behind an `Rc`.

use std::cell::Cell;
use std::rc::Rc;

/// Cancellation token for one render task
///
/// All clones observe a cancellation. Cancelling is idempotent.
#[derive(Clone, Default)]
pub struct CancelToken {
    cancelled: Rc<Cell<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn clones_share_cancellation() {
        let token = CancelToken::new();
        let observer = token.clone();

        token.cancel();
        assert!(token.is_cancelled());
        assert!(observer.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }
}
