//! Aggregate trait for the in-memory ledger state.

/// Aggregate execution semantics (pure, deterministic).
///
/// - **Decision logic**: `handle(&self, cmd)` returns changes.
/// - **State mutation**: `apply(&mut self, change)` evolves state.
///
/// Aggregates must not perform IO or side effects. They should only return
/// changes describing what happened; persistence is the caller's business.
pub trait Aggregate {
    type Command: Clone + core::fmt::Debug;
    type Change: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Number of changes applied so far.
    fn version(&self) -> u64;

    /// Evolve in-memory state from a single change.
    ///
    /// Implementations should bump `version()` by one per applied change.
    fn apply(&mut self, change: &Self::Change);

    /// Decide which changes to emit given the current state and a command.
    ///
    /// This must not mutate state. An empty vector means the command is a no-op.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Change>, Self::Error>;

    /// Handle a command and apply every resulting change.
    fn execute(&mut self, command: &Self::Command) -> Result<Vec<Self::Change>, Self::Error> {
        let changes = self.handle(command)?;
        for change in &changes {
            self.apply(change);
        }
        Ok(changes)
    }
}
