use crate::audio::frame_bus::FrameSubscription;
use crate::audio::spectrum::SpectrumFrame;
use arc_swap::ArcSwap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One step of exponential temporal smoothing
///
/// `smoothed[i] = previous[i] * (1 - α) + current[i] * α`, falling back to
/// `current[i]` where `previous` is shorter (transform size changed). An empty
/// side yields the other side unchanged. The timestamp is always `current`'s.
pub fn smooth_frames(
    previous: &SpectrumFrame,
    current: &SpectrumFrame,
    alpha: f32,
) -> SpectrumFrame {
    if previous.is_empty() {
        return current.clone();
    }
    if current.is_empty() {
        return previous.clone();
    }

    let keep = 1.0 - alpha;
    let magnitudes = current
        .magnitudes
        .iter()
        .enumerate()
        .map(|(i, &value)| match previous.magnitudes.get(i) {
            Some(&old) => old * keep + value * alpha,
            None => value,
        })
        .collect();

    SpectrumFrame::new(
        magnitudes,
        previous.rms * keep + current.rms * alpha,
        current.timestamp_ms,
    )
}

struct SmoothedState {
    current: ArcSwap<SpectrumFrame>,
    version: AtomicU64,
}

/// Folds the raw frame stream into a continuously updated smoothed frame
///
/// Runs off the audio thread: it may allocate and sleep. There is a single
/// writer (this engine) and any number of [`SmoothedFrameReader`]s, which
/// always see a complete immutable frame.
pub struct SmoothingEngine {
    subscription: FrameSubscription,
    factor: f32,

    // Last smoothed value, None until the first frame
    previous: Option<Arc<SpectrumFrame>>,
    state: Arc<SmoothedState>,
}

impl SmoothingEngine {
    pub fn new(subscription: FrameSubscription, factor: f32) -> Self {
        Self {
            subscription,
            factor,
            previous: None,
            state: Arc::new(SmoothedState {
                current: ArcSwap::from_pointee(SpectrumFrame::empty()),
                version: AtomicU64::new(0),
            }),
        }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Apply one frame and publish the result
    pub fn observe(&mut self, frame: &SpectrumFrame) -> Arc<SpectrumFrame> {
        let smoothed = self.fold(frame);
        self.publish(Arc::clone(&smoothed));
        smoothed
    }

    /// Fold every pending raw frame, publishing once. Returns whether
    /// anything was pending.
    pub fn update(&mut self) -> bool {
        let mut folded = false;
        while let Some(frame) = self.subscription.try_recv() {
            self.fold(&frame);
            folded = true;
        }

        if folded {
            if let Some(latest) = self.previous.clone() {
                self.publish(latest);
            }
        }
        folded
    }

    fn fold(&mut self, frame: &SpectrumFrame) -> Arc<SpectrumFrame> {
        let smoothed = match self.previous.as_deref() {
            // First frame is taken as-is
            None => Arc::new(frame.clone()),
            Some(previous) => Arc::new(smooth_frames(previous, frame, self.factor)),
        };
        self.previous = Some(Arc::clone(&smoothed));
        smoothed
    }

    fn publish(&self, frame: Arc<SpectrumFrame>) {
        self.state.current.store(frame);
        self.state.version.fetch_add(1, Ordering::Release);
    }

    pub fn reader(&self) -> SmoothedFrameReader {
        SmoothedFrameReader {
            state: Arc::clone(&self.state),
        }
    }

    /// Move the engine onto its own worker thread, polling the bus every
    /// `poll_interval` while idle
    pub fn spawn(mut self, poll_interval: Duration) -> std::io::Result<SmoothingWorker> {
        let running = Arc::new(AtomicBool::new(true));
        let worker_running = Arc::clone(&running);

        let handle = thread::Builder::new()
            .name("spectrum-smoothing".into())
            .spawn(move || {
                log::debug!("Smoothing worker started");
                while worker_running.load(Ordering::Acquire) {
                    if !self.update() {
                        thread::sleep(poll_interval);
                    }
                }
                log::debug!("Smoothing worker stopped");
                self
            })?;

        Ok(SmoothingWorker {
            running,
            handle: Some(handle),
        })
    }
}

/// Cheap cloneable view of the latest smoothed frame
#[derive(Clone)]
pub struct SmoothedFrameReader {
    state: Arc<SmoothedState>,
}

impl SmoothedFrameReader {
    /// Latest smoothed frame, [`SpectrumFrame::empty`] before any audio
    pub fn latest(&self) -> Arc<SpectrumFrame> {
        self.state.current.load_full()
    }

    /// Increases on every publish, for cheap change detection
    pub fn version(&self) -> u64 {
        self.state.version.load(Ordering::Acquire)
    }
}

/// Handle to a running [`SmoothingEngine`]; dropping it stops the thread
pub struct SmoothingWorker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<SmoothingEngine>>,
}

impl SmoothingWorker {
    /// Stop the worker and take the engine back
    pub fn stop(mut self) -> Option<SmoothingEngine> {
        self.running.store(false, Ordering::Release);
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(engine) => Some(engine),
            Err(_) => {
                log::error!("Smoothing worker panicked");
                None
            }
        }
    }
}

impl Drop for SmoothingWorker {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::frame_bus::{create_frame_channels, FrameSink};

    fn frame(magnitudes: Vec<f32>, rms: f32, ts: u64) -> SpectrumFrame {
        SpectrumFrame::new(magnitudes, rms, ts)
    }

    fn engine() -> (crate::audio::frame_bus::FramePublisher, SmoothingEngine) {
        let (publisher, bus) = create_frame_channels(3);
        (publisher, SmoothingEngine::new(bus.subscribe(), 0.3))
    }

    #[test]
    fn blends_with_alpha() {
        let previous = frame(vec![1.0, 0.0], 0.0, 1);
        let current = frame(vec![0.0, 1.0], 1.0, 2);
        let smoothed = smooth_frames(&previous, &current, 0.3);

        assert!((smoothed.magnitudes[0] - 0.7).abs() < 1e-6);
        assert!((smoothed.magnitudes[1] - 0.3).abs() < 1e-6);
        assert!((smoothed.rms - 0.3).abs() < 1e-6);
        assert_eq!(smoothed.timestamp_ms, 2);
    }

    #[test]
    fn empty_sides_pass_the_other_through() {
        let real = frame(vec![0.5; 4], 0.2, 9);
        assert_eq!(smooth_frames(&SpectrumFrame::empty(), &real, 0.3), real);
        assert_eq!(smooth_frames(&real, &SpectrumFrame::empty(), 0.3), real);
    }

    #[test]
    fn longer_current_uses_raw_values_past_previous() {
        let previous = frame(vec![1.0, 1.0], 0.0, 1);
        let current = frame(vec![0.0, 0.0, 0.8, 0.6], 0.0, 2);
        let smoothed = smooth_frames(&previous, &current, 0.5);
        assert_eq!(smoothed.magnitudes, vec![0.5, 0.5, 0.8, 0.6]);
    }

    #[test]
    fn shorter_current_truncates_to_its_length() {
        let previous = frame(vec![1.0; 4], 0.0, 1);
        let current = frame(vec![0.0; 2], 0.0, 2);
        assert_eq!(smooth_frames(&previous, &current, 0.5).magnitudes.len(), 2);
    }

    #[test]
    fn first_frame_is_taken_unchanged() {
        let (_publisher, mut engine) = engine();
        let reader = engine.reader();
        assert!(reader.latest().is_empty());
        assert_eq!(reader.version(), 0);

        let first = frame(vec![0.4, 0.9], 0.5, 3);
        engine.observe(&first);
        assert_eq!(*reader.latest(), first);
        assert_eq!(reader.version(), 1);
    }

    #[test]
    fn converges_to_constant_input() {
        let (_publisher, mut engine) = engine();
        engine.observe(&frame(vec![0.0; 8], 0.0, 0));

        let target = frame(vec![1.0; 8], 1.0, 1);
        let mut frames_needed = 0;
        for n in 1..=20 {
            let smoothed = engine.observe(&target);
            if smoothed.magnitudes.iter().all(|&m| m >= 0.95) {
                frames_needed = n;
                break;
            }
        }
        // 1 - 0.7^n >= 0.95 first holds at n = 9
        assert!(frames_needed > 0 && frames_needed <= 10, "took {frames_needed}");
    }

    #[test]
    fn update_drains_bus_and_publishes_once() {
        let (mut publisher, mut engine) = engine();
        let reader = engine.reader();
        assert!(!engine.update());

        publisher.try_publish(Arc::new(frame(vec![1.0], 1.0, 1)));
        publisher.try_publish(Arc::new(frame(vec![0.0], 0.0, 2)));
        assert!(engine.update());

        let latest = reader.latest();
        assert!((latest.magnitudes[0] - 0.7).abs() < 1e-6);
        assert_eq!(latest.timestamp_ms, 2);
        assert_eq!(reader.version(), 1);
    }

    #[test]
    fn worker_thread_smooths_in_background() {
        let (mut publisher, engine) = engine();
        let reader = engine.reader();
        let worker = engine.spawn(Duration::from_millis(1)).unwrap();

        publisher.try_publish(Arc::new(frame(vec![0.5; 4], 0.5, 11)));
        for _ in 0..500 {
            if reader.version() > 0 {
                break;
            }
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(reader.latest().timestamp_ms, 11);

        let engine = worker.stop().unwrap();
        assert_eq!(engine.factor(), 0.3);
    }
}
