//! Bookkeeping of listeners registered on the transport

use mifare_transport::ListenerId;

/// Opaque handle of a subscription
///
/// Subscriptions are only removed all at once, with
/// [`AcuraReader::unsubscribe_all`](crate::AcuraReader::unsubscribe_all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("subscription#{_0}")]
pub struct SubscriptionId(u64);

/// Subscriptions of one session, mapped to their transport listeners
#[derive(Debug, Default)]
pub(crate) struct Subscriptions {
    next: u64,
    entries: Vec<(SubscriptionId, ListenerId)>,
}

impl Subscriptions {
    pub(crate) fn insert(&mut self, listener: ListenerId) -> SubscriptionId {
        self.next += 1;
        let id = SubscriptionId(self.next);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn take(&mut self) -> Vec<(SubscriptionId, ListenerId)> {
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_across_clears() {
        let mut subscriptions = Subscriptions::default();
        let first = subscriptions.insert(ListenerId::new(10));
        assert_eq!(subscriptions.take().len(), 1);

        let second = subscriptions.insert(ListenerId::new(11));
        assert_ne!(first, second);
        assert_eq!(subscriptions.len(), 1);
    }
}
