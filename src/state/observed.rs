use std::fmt;

/// A change listener. Receives the record as it looks after the mutation,
/// together with the event describing what happened to it.
pub type Listener<T, E> = Box<dyn FnMut(&T, &E) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub struct Listeners<T, E> {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener<T, E>)>,
}

impl<T, E> Listeners<T, E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&T, &E) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Calls every listener synchronously, in subscription order.
    pub fn notify(&mut self, value: &T, event: &E) {
        for (_, listener) in self.entries.iter_mut() {
            listener(value, event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<T, E> Default for Listeners<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Listeners<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

/// A record plus the listeners watching it.
#[derive(Debug)]
pub struct Observed<T, E> {
    value: T,
    listeners: Listeners<T, E>,
}

impl<T, E> Observed<T, E> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Listeners::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&T, &E) + Send + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Runs `mutate` against the record. Listeners hear about it only when
    /// `mutate` reports an event, so writes that change nothing stay silent.
    /// The event is handed back to the caller.
    pub fn update<F>(&mut self, mutate: F) -> Option<E>
    where
        F: FnOnce(&mut T) -> Option<E>,
    {
        let event = mutate(&mut self.value)?;
        self.listeners.notify(&self.value, &event);
        Some(event)
    }

    pub fn emit(&mut self, event: &E) {
        self.listeners.notify(&self.value, event);
    }

    /// Tells every listener the record is going away, then detaches them.
    pub fn destroy(mut self, event: E) -> T {
        self.listeners.notify(&self.value, &event);
        self.listeners.clear();
        self.value
    }
}

impl<T: Default, E> Default for Observed<T, E> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
