use crate::audio::spectrum::SpectrumFrame;
use arc_swap::{ArcSwap, ArcSwapOption};
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type FrameQueue = ArrayQueue<Arc<SpectrumFrame>>;

/// Destination for frames produced on the audio thread
///
/// Implementations must return immediately whether or not the frame could
/// be buffered. Blocking here stalls playback.
pub trait FrameSink {
    fn try_publish(&mut self, frame: Arc<SpectrumFrame>);
}

struct BusShared {
    /// Per-subscriber bounded queues (audio thread only loads this)
    subscribers: ArcSwap<Vec<Arc<FrameQueue>>>,
    /// Replayed to new subscribers
    latest: ArcSwapOption<SpectrumFrame>,
    capacity: usize,
    published: AtomicU64,
    evicted: AtomicU64,
}

/// Bounded multicast channel from the audio thread to any number of readers
///
/// Every subscriber has its own lock-free queue of `capacity` frames. When a
/// queue is full the oldest unconsumed frame is dropped, never the newest,
/// and the publisher never waits. New subscribers start with the latest
/// published frame already queued.
#[derive(Clone)]
pub struct FrameBus {
    shared: Arc<BusShared>,
}

/// Audio-thread half of a [`FrameBus`]
pub struct FramePublisher {
    shared: Arc<BusShared>,
}

/// Factory function to create the bus pair
/// Returns (publisher for audio thread, bus handle for consumers)
pub fn create_frame_channels(capacity: usize) -> (FramePublisher, FrameBus) {
    let shared = Arc::new(BusShared {
        subscribers: ArcSwap::from_pointee(Vec::new()),
        latest: ArcSwapOption::empty(),
        capacity: capacity.max(1),
        published: AtomicU64::new(0),
        evicted: AtomicU64::new(0),
    });

    (
        FramePublisher {
            shared: Arc::clone(&shared),
        },
        FrameBus { shared },
    )
}

impl FrameSink for FramePublisher {
    /// Called from audio thread - never blocks, never allocates
    fn try_publish(&mut self, frame: Arc<SpectrumFrame>) {
        let subscribers = self.shared.subscribers.load();
        for queue in subscribers.iter() {
            if queue.force_push(Arc::clone(&frame)).is_some() {
                self.shared.evicted.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.shared.latest.store(Some(frame));
        self.shared.published.fetch_add(1, Ordering::Relaxed);
    }
}

impl FrameBus {
    /// Subscribe to the raw (unsmoothed) per-hop stream
    pub fn subscribe(&self) -> FrameSubscription {
        let queue = Arc::new(ArrayQueue::new(self.shared.capacity));

        // Replay before the publisher can see the queue, so the replayed
        // frame is always older than anything pushed afterwards
        if let Some(latest) = self.shared.latest.load_full() {
            let _ = queue.push(latest);
        }

        self.shared.subscribers.rcu(|subscribers| {
            let mut updated = Vec::clone(subscribers);
            updated.push(Arc::clone(&queue));
            updated
        });

        FrameSubscription {
            queue,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Most recently published frame, if any
    pub fn latest(&self) -> Option<Arc<SpectrumFrame>> {
        self.shared.latest.load_full()
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.load().len()
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    pub fn published(&self) -> u64 {
        self.shared.published.load(Ordering::Relaxed)
    }

    /// Frames dropped because a subscriber fell behind
    pub fn evicted(&self) -> u64 {
        self.shared.evicted.load(Ordering::Relaxed)
    }
}

/// Reader half; dropping it unsubscribes
pub struct FrameSubscription {
    queue: Arc<FrameQueue>,
    shared: Arc<BusShared>,
}

impl FrameSubscription {
    /// Oldest buffered frame, without waiting
    pub fn try_recv(&self) -> Option<Arc<SpectrumFrame>> {
        self.queue.pop()
    }

    /// Take every buffered frame, oldest first
    pub fn drain(&self) -> impl Iterator<Item = Arc<SpectrumFrame>> + '_ {
        std::iter::from_fn(move || self.queue.pop())
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl Drop for FrameSubscription {
    fn drop(&mut self) {
        let queue = &self.queue;
        self.shared.subscribers.rcu(|subscribers| {
            subscribers
                .iter()
                .filter(|candidate| !Arc::ptr_eq(candidate, queue))
                .cloned()
                .collect::<Vec<_>>()
        });
    }
}
