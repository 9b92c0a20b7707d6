use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Broadcast channel used by page services to announce state changes.
///
/// Every subscriber receives its own copy of each emitted value. Delivery
/// order between subscribers is unspecified. Dropping a [`Subscription`]
/// unsubscribes it; the channel prunes dead subscribers on the next emit.
#[derive(Debug)]
pub struct EventChannel<T: Clone> {
    senders: Vec<Sender<T>>,
}

impl<T: Clone> Default for EventChannel<T> {
    fn default() -> Self {
        Self {
            senders: Vec::new(),
        }
    }
}

impl<T: Clone> EventChannel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. It only sees values emitted after this call.
    pub fn subscribe(&mut self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        Subscription { rx }
    }

    /// Deliver `value` to every live subscriber.
    pub fn emit(&mut self, value: T) {
        self.senders.retain(|tx| tx.send(value.clone()).is_ok());
    }

    /// Subscribers still registered as of the last emit.
    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}

/// Receiving end of an [`EventChannel`].
#[derive(Debug)]
pub struct Subscription<T> {
    rx: Receiver<T>,
}

impl<T> Subscription<T> {
    /// A subscription that never yields anything.
    pub fn closed() -> Self {
        let (_, rx) = mpsc::channel();
        Self { rx }
    }

    /// Next pending value, if any.
    pub fn try_next(&self) -> Option<T> {
        match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// All pending values in emission order.
    pub fn drain(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }

    /// Most recent pending value, discarding older ones.
    pub fn latest(&self) -> Option<T> {
        self.rx.try_iter().last()
    }
}
