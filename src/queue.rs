//! Producer/consumer event queue.
//!
//! A FIFO of [`PointerEvent`]s bridging the notification context (producer)
//! and the host's polling context (consumer). Unbounded: the producer never
//! blocks on space and never drops. Draining swaps the whole buffer under the
//! lock and hands the previous contents to the caller, so consumer callbacks
//! never run while the lock is held and a slow consumer cannot stall the
//! input-delivery path.

use crate::event::PointerEvent;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe FIFO of normalized events.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: Mutex<Vec<PointerEvent>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    // A consumer that panicked mid-drain must not wedge the producer, so
    // poisoning is stripped rather than propagated.
    fn buffer(&self) -> MutexGuard<'_, Vec<PointerEvent>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one event. O(1), short critical section.
    pub fn push(&self, event: PointerEvent) {
        self.buffer().push(event);
    }

    /// Atomically take everything queued so far, in insertion order.
    ///
    /// Pushes racing the swap land in the fresh buffer and are returned by
    /// the next drain.
    pub fn drain_all(&self) -> Vec<PointerEvent> {
        std::mem::take(&mut *self.buffer())
    }

    /// Number of events currently queued. Diagnostic only; the value is stale
    /// the moment the lock is released.
    pub fn len(&self) -> usize {
        self.buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceHandle;

    fn removed(n: isize) -> PointerEvent {
        PointerEvent::DeviceRemoved {
            handle: DeviceHandle(n),
            name: "Unknown".into(),
        }
    }

    #[test]
    fn drain_preserves_insertion_order() {
        let q = EventQueue::new();
        q.push(removed(1));
        q.push(removed(2));
        q.push(removed(3));
        let drained = q.drain_all();
        let handles: Vec<isize> = drained.iter().map(|e| e.handle().0).collect();
        assert_eq!(handles, vec![1, 2, 3]);
    }

    #[test]
    fn second_drain_without_push_is_empty() {
        let q = EventQueue::new();
        q.push(removed(1));
        assert_eq!(q.drain_all().len(), 1);
        assert!(q.drain_all().is_empty());
    }

    #[test]
    fn push_after_drain_lands_in_next_drain() {
        let q = EventQueue::new();
        q.push(removed(1));
        let first = q.drain_all();
        q.push(removed(2));
        let second = q.drain_all();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].handle(), DeviceHandle(2));
    }

    #[test]
    fn concurrent_producers_never_lose_events() {
        use std::sync::Arc;

        let q = Arc::new(EventQueue::new());
        let mut producers = Vec::new();
        for t in 0..4 {
            let q = Arc::clone(&q);
            producers.push(std::thread::spawn(move || {
                for i in 0..100 {
                    q.push(removed((t * 1000 + i) as isize));
                }
            }));
        }
        let mut seen = q.drain_all().len();
        for p in producers {
            p.join().unwrap();
        }
        seen += q.drain_all().len();
        assert_eq!(seen, 400);
    }
}
