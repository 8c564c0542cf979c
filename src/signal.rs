//! Observable values and payload events.
//!
//! Both types call their listeners synchronously, in registration order, on the
//! thread doing the write. There is no equality check: every `set` notifies.

use std::fmt;

/// Handle returned by `subscribe`/`connect`, used to remove a listener again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listeners<T> {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn FnMut(&T)>)>,
}

impl<T> Listeners<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    fn add(&mut self, listener: Box<dyn FnMut(&T)>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    fn notify(&mut self, value: &T) {
        for (_, listener) in self.entries.iter_mut() {
            listener(value);
        }
    }
}

/// A stored value that notifies its subscribers on every write
pub struct Property<T> {
    value: T,
    listeners: Listeners<T>,
}

impl<T> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: Listeners::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store `value`, then call every listener with the stored value
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.listeners.notify(&self.value);
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&T) + 'static) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.entries.len()
    }
}

impl<T: Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.value)
            .field("listeners", &self.listeners.entries.len())
            .finish()
    }
}

/// A stateless event carrying a payload to its connected handlers
pub struct Signal<T> {
    listeners: Listeners<T>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            listeners: Listeners::new(),
        }
    }

    pub fn connect(&mut self, handler: impl FnMut(&T) + 'static) -> ListenerId {
        self.listeners.add(Box::new(handler))
    }

    pub fn disconnect(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn emit(&mut self, payload: &T) {
        self.listeners.notify(payload);
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("handlers", &self.listeners.entries.len())
            .finish()
    }
}
