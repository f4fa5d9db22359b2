//! Cooperative cancellation for long-running batch operations (§5).
//!
//! A thin newtype over `tokio_util::sync::CancellationToken` so callers
//! depend on this crate's type rather than reaching into `tokio_util`
//! directly. Checked only between atomic steps of a batch operation, never
//! mid-step — a cancelled token stops the *next* order from starting, it
//! never unwinds one already in flight.

#[derive(Clone, Default)]
pub struct CancellationToken(tokio_util::sync::CancellationToken);

impl CancellationToken {
    pub fn new() -> Self {
        Self(tokio_util::sync::CancellationToken::new())
    }

    pub fn cancel(&self) {
        self.0.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.is_cancelled()
    }

    pub fn child_token(&self) -> Self {
        Self(self.0.child_token())
    }
}
