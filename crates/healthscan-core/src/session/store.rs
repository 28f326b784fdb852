//! Single-writer session store.
//!
//! `SessionStore` owns the only sender and is deliberately not `Clone`.
//! Readers get a `SessionHandle`, which can snapshot the current value or
//! wait for the next change. Every publish notifies, even when the value is
//! unchanged; subscribers are expected to tolerate re-delivery.

use tokio::sync::watch;

use super::SessionState;

/// The writer side. Scoped to the composition root that creates it.
#[derive(Debug)]
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    /// Creates a store whose initial value is `resolving`.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::resolving());
        Self { tx }
    }

    /// Returns a new read-only handle.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            rx: self.tx.subscribe(),
        }
    }

    pub fn current(&self) -> SessionState {
        *self.tx.borrow()
    }

    /// Publishes `state` to every handle.
    pub fn publish(&self, state: SessionState) {
        tracing::debug!(%state, "session state published");
        self.tx.send_replace(state);
    }

    /// Returns to `resolving` (e.g. while re-validating).
    pub fn begin_resolving(&self) {
        self.publish(SessionState::resolving());
    }
}

/// Read-only view of the session store.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Current value without consuming the change notification.
    pub fn snapshot(&self) -> SessionState {
        *self.rx.borrow()
    }

    /// Returns the latest value if it was published since the last call.
    ///
    /// Returns `None` when nothing new arrived or the store is gone.
    pub fn take_changed(&mut self) -> Option<SessionState> {
        match self.rx.has_changed() {
            Ok(true) => Some(*self.rx.borrow_and_update()),
            _ => None,
        }
    }

    /// Waits for the next publish.
    ///
    /// Returns `None` once the store has been dropped.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_handle_sees_current_value() {
        let store = SessionStore::new();
        store.publish(SessionState::resolved(false, true));

        let handle = store.handle();
        assert_eq!(handle.snapshot(), SessionState::resolved(false, true));
    }

    #[test]
    fn test_take_changed_marks_seen() {
        let store = SessionStore::new();
        let mut handle = store.handle();
        assert_eq!(handle.take_changed(), None);

        store.publish(SessionState::resolved(true, false));
        assert_eq!(
            handle.take_changed(),
            Some(SessionState::resolved(true, false))
        );
        assert_eq!(handle.take_changed(), None);
    }

    #[test]
    fn test_identical_publish_still_notifies() {
        let store = SessionStore::new();
        let mut handle = store.handle();
        store.publish(SessionState::resolving());
        assert_eq!(handle.take_changed(), Some(SessionState::resolving()));
    }

    #[tokio::test]
    async fn test_changed_returns_none_after_store_dropped() {
        let store = SessionStore::new();
        let mut handle = store.handle();
        drop(store);
        assert_eq!(handle.changed().await, None);
    }

    #[tokio::test]
    async fn test_many_readers_one_writer() {
        let store = SessionStore::new();
        let mut a = store.handle();
        let mut b = a.clone();

        store.publish(SessionState::resolved(false, false));

        assert_eq!(a.changed().await, Some(SessionState::resolved(false, false)));
        assert_eq!(b.changed().await, Some(SessionState::resolved(false, false)));
    }
}
