use crate::entry::LedgerEntry;

/// A projection builds a read model from the ledger entries.
///
/// Read models are **disposable**: the entry list is the source of truth and
/// any projection can be thrown away and rebuilt by replaying it from empty.
/// Replaying the same entries twice must give the same result; projections
/// hold no state that is not derived from the entries they were fed.
pub trait Projection {
    /// Fold a single entry into the read model.
    ///
    /// Entries reaching this point are already validated; implementations
    /// must not fail.
    fn apply(&mut self, entry: &LedgerEntry);

    /// Drop all derived state.
    fn reset(&mut self);

    /// Reset, then replay `entries` in the given order.
    fn rebuild<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = &'a LedgerEntry>,
        Self: Sized,
    {
        self.reset();
        for entry in entries {
            self.apply(entry);
        }
    }
}

/// Build a fresh projection from `entries`.
pub fn replay<'a, P, I>(entries: I) -> P
where
    P: Projection + Default,
    I: IntoIterator<Item = &'a LedgerEntry>,
{
    let mut projection = P::default();
    for entry in entries {
        projection.apply(entry);
    }
    projection
}
