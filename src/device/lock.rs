//! Interruptible device lock
//!
//! A mutex whose blocking acquire can be abandoned when an external
//! [`CancelToken`] fires.
//!
//! ## How it works
//! The protected value lives in a one-slot crossbeam channel. Locking takes
//! the value out of the slot; dropping the guard puts it back. A blocked
//! locker waits in `select!` on both the slot and the token's channel, so
//! cancellation wakes it immediately without polling.
//!
//! ```text
//!   lock()  ── recv ──▶ ┌──────────┐ ◀── send ── guard drop
//!                       │ slot (1) │
//!                       └──────────┘
//!   cancel() drops the token's sender ──▶ every waiter's select! fires
//! ```

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crossbeam::channel::{bounded, never, Receiver, Sender};
use parking_lot::Mutex;

use crate::error::{Result, ScullError};

// =============================================================================
// Cancel Token
// =============================================================================

/// External signal that interrupts blocked lock acquisitions
///
/// Clones share state. Once cancelled a token stays cancelled; create a
/// fresh token to resume interruptible waits.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

struct TokenInner {
    /// Dropped on cancel, which disconnects `fired`
    trigger: Mutex<Option<Sender<()>>>,

    /// Never carries a message; becomes ready once disconnected
    fired: Receiver<()>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (trigger, fired) = bounded(0);
        Self {
            inner: Arc::new(TokenInner {
                trigger: Mutex::new(Some(trigger)),
                fired,
            }),
        }
    }

    /// Fire the token, waking every thread blocked on it
    pub fn cancel(&self) {
        if self.inner.trigger.lock().take().is_some() {
            tracing::debug!("cancel token fired");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.trigger.lock().is_none()
    }

    fn receiver(&self) -> &Receiver<()> {
        &self.inner.fired
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

// =============================================================================
// Interruptible Mutex
// =============================================================================

/// Mutual exclusion with a cancellable blocking acquire
pub struct InterruptibleMutex<T> {
    slot_tx: Sender<T>,
    slot_rx: Receiver<T>,
}

impl<T> InterruptibleMutex<T> {
    pub fn new(value: T) -> Self {
        let (slot_tx, slot_rx) = bounded(1);
        // The slot is empty and its receiver is alive, so this cannot fail.
        let _ = slot_tx.try_send(value);
        Self { slot_tx, slot_rx }
    }

    /// Acquire the lock, blocking until it is free or `cancel` fires
    ///
    /// An uncontended lock is granted even if the token has already fired;
    /// cancellation only ends a wait. On `Interrupted` nothing was acquired.
    pub fn lock(&self, cancel: Option<&CancelToken>) -> Result<LockGuard<'_, T>> {
        if let Some(guard) = self.try_lock() {
            return Ok(guard);
        }

        let idle = never();
        let fired = cancel.map(CancelToken::receiver).unwrap_or(&idle);

        crossbeam::select! {
            recv(self.slot_rx) -> value => match value {
                Ok(value) => Ok(self.guard(value)),
                Err(_) => Err(ScullError::Busy("lock slot disconnected".to_string())),
            },
            recv(fired) -> _ => {
                tracing::debug!("lock acquisition interrupted");
                Err(ScullError::Interrupted)
            },
        }
    }

    /// Acquire the lock only if nobody holds it
    pub fn try_lock(&self) -> Option<LockGuard<'_, T>> {
        self.slot_rx.try_recv().ok().map(|value| self.guard(value))
    }

    /// Whether some guard currently holds the value
    pub fn is_locked(&self) -> bool {
        self.slot_rx.is_empty()
    }

    fn guard(&self, value: T) -> LockGuard<'_, T> {
        LockGuard {
            value: Some(value),
            home: &self.slot_tx,
        }
    }
}

/// Exclusive access to the locked value; unlocks on drop
pub struct LockGuard<'a, T> {
    /// Always `Some` until drop hands it back
    value: Option<T>,
    home: &'a Sender<T>,
}

impl<T> Deref for LockGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.value {
            Some(value) => value,
            None => unreachable!("lock guard used after release"),
        }
    }
}

impl<T> DerefMut for LockGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.value {
            Some(value) => value,
            None => unreachable!("lock guard used after release"),
        }
    }
}

impl<T> Drop for LockGuard<'_, T> {
    fn drop(&mut self) {
        if let Some(value) = self.value.take() {
            // The slot is empty while a guard exists, so this never blocks.
            let _ = self.home.try_send(value);
        }
    }
}
