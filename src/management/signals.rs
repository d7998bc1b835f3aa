use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU64, Ordering},
};

/// Login state changes. Carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    LoggedIn,
    LoggedOut,
}

/// Receives [`AuthEvent`]s. Closures taking an `AuthEvent` implement this.
pub trait AuthObserver: Send + Sync {
    fn on_event(&self, event: AuthEvent);
}

impl<F> AuthObserver for F
where
    F: Fn(AuthEvent) + Send + Sync,
{
    fn on_event(&self, event: AuthEvent) {
        self(event)
    }
}

/// Handle returned by [`Signals::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Observer registry. Observers are notified synchronously, in the order
/// they subscribed.
#[derive(Default)]
pub struct Signals {
    observers: RwLock<Vec<(SubscriptionId, Arc<dyn AuthObserver>)>>,
    next_id: AtomicU64,
}

impl Signals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Arc<dyn AuthObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut observers = match self.observers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        observers.push((id, observer));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = match self.observers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    pub fn emit(&self, event: AuthEvent) {
        // snapshot so observers may subscribe from inside a callback
        let snapshot: Vec<Arc<dyn AuthObserver>> = match self.observers.read() {
            Ok(guard) => guard.iter().map(|(_, o)| Arc::clone(o)).collect(),
            Err(poisoned) => poisoned
                .into_inner()
                .iter()
                .map(|(_, o)| Arc::clone(o))
                .collect(),
        };

        for observer in snapshot {
            observer.on_event(event);
        }
    }
}
