use std::sync::RwLock;

/// A panic occurred while the ledger lock was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ledger lock poisoned")]
pub struct LockPoisoned;

/// Reader/writer discipline around the shared block sequence.
///
/// Writers are serialized: at most one `write` closure runs at a time, and no
/// reader runs while it does. Readers may run concurrently with each other.
/// A reader therefore sees either all of a write or none of it.
///
/// Access is closure-scoped so a guard can never outlive the call that took
/// it.
pub struct AccessGuard<T> {
    inner: RwLock<T>,
}

impl<T> AccessGuard<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(value),
        }
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, LockPoisoned> {
        let state = self.inner.read().map_err(|_| LockPoisoned)?;
        Ok(f(&state))
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, LockPoisoned> {
        let mut state = self.inner.write().map_err(|_| LockPoisoned)?;
        Ok(f(&mut state))
    }
}
