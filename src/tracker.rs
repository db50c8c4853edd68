//! Real-time tracking loop: acquisition, pose updates and datagram emission.
//!
//! One background thread owns the landmark source and the output socket
//! for the lifetime of a tracking run. Callers interact through
//! [`Tracker::start`], [`Tracker::stop`] and [`Tracker::center`]; the
//! shared [`Head`] is mutex-guarded so a recenter from another thread can
//! never interleave with a tick's rotation update.

use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::constants::{DEFAULT_ACQUISITION_TIMEOUT_SECS, DEFAULT_FPS};
use crate::filters::FilterParams;
use crate::head::{Head, HeadPose};
use crate::landmarks::{LandmarkSample, LandmarkSource};
use crate::protocol;
use crate::{Error, Result};

/// Runtime parameters for the producer loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Capture frame rate; bounds the emission rate
    pub fps: f64,
    /// Seconds to wait for a face during [`Tracker::start`]
    pub acquisition_timeout_secs: f64,
    /// Tuning for the per-coordinate smoothing filters
    pub filter: FilterParams,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            acquisition_timeout_secs: DEFAULT_ACQUISITION_TIMEOUT_SECS,
            filter: FilterParams::default(),
        }
    }
}

/// Lifecycle of the tracking producer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No resources held
    Idle,
    /// Blocking inside `start`, waiting for the first face
    Acquiring,
    /// Background loop is producing pose datagrams
    Tracking,
    /// Loop has exited; safe to release the frame source
    Stopped,
}

/// State shared between the caller and the tracking thread
struct Shared {
    head: Mutex<Option<Head>>,
    latest: Mutex<Option<HeadPose>>,
    state: Mutex<TrackerState>,
    running: AtomicBool,
}

impl Shared {
    fn set_state(&self, state: TrackerState) {
        *lock(&self.state) = state;
    }
}

/// Poison-tolerant lock: a panicked tick must not wedge `stop` or `center`
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Head pose producer.
///
/// Owns the tracking thread and its lifecycle; the landmark source and the
/// UDP socket are moved into the thread on `start` and dropped when the
/// loop exits, so `stop` returning implies all loop-owned resources are
/// released.
pub struct Tracker {
    config: TrackerConfig,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Tracker {
    /// Create an idle tracker
    ///
    /// # Panics
    ///
    /// Panics if the configured frame rate or acquisition timeout is not
    /// positive
    #[must_use]
    pub fn new(config: TrackerConfig) -> Self {
        assert!(config.fps > 0.0, "Frame rate must be positive");
        assert!(
            config.acquisition_timeout_secs > 0.0,
            "Acquisition timeout must be positive"
        );
        Self {
            config,
            shared: Arc::new(Shared {
                head: Mutex::new(None),
                latest: Mutex::new(None),
                state: Mutex::new(TrackerState::Idle),
                running: AtomicBool::new(false),
            }),
            worker: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> TrackerState {
        *lock(&self.shared.state)
    }

    /// Most recently published pose, if tracking has produced one.
    ///
    /// Published as a value snapshot each tick; safe to poll from a
    /// display thread.
    pub fn latest_pose(&self) -> Option<HeadPose> {
        *lock(&self.shared.latest)
    }

    /// Start tracking.
    ///
    /// Blocks until the source yields a frame with exactly one valid face,
    /// then spawns the background loop and returns. Datagrams flow to
    /// `destination` until [`stop`](Self::stop) is called or the source
    /// fails.
    ///
    /// # Errors
    ///
    /// - `SourceExhausted` if the source ends before a face is seen
    /// - `NoFaceDetected` if the acquisition timeout elapses first
    /// - `InvalidInput` if the tracker is already running
    /// - `Io` if the output socket cannot be created
    pub fn start(
        &mut self,
        mut source: Box<dyn LandmarkSource>,
        destination: SocketAddr,
    ) -> Result<()> {
        if self.worker.is_some() {
            return Err(Error::InvalidInput(
                "tracker is already running".to_string(),
            ));
        }

        let bind_addr = if destination.is_ipv4() {
            "0.0.0.0:0"
        } else {
            "[::]:0"
        };
        let socket = UdpSocket::bind(bind_addr)?;

        self.shared.set_state(TrackerState::Acquiring);
        info!("acquiring face, will stream to {destination}");

        let clock = Instant::now();
        let timeout = Duration::from_secs_f64(self.config.acquisition_timeout_secs);
        let head = match acquire(source.as_mut(), self.config.filter, clock, timeout) {
            Ok(head) => head,
            Err(e) => {
                self.shared.set_state(TrackerState::Idle);
                return Err(e);
            }
        };

        *lock(&self.shared.head) = Some(head);
        *lock(&self.shared.latest) = None;
        self.shared.running.store(true, Ordering::SeqCst);
        self.shared.set_state(TrackerState::Tracking);

        let shared = Arc::clone(&self.shared);
        let frame_period = Duration::from_secs_f64(1.0 / self.config.fps);
        let spawned = std::thread::Builder::new()
            .name("head-tracker".to_string())
            .spawn(move || track_loop(source, socket, destination, &shared, frame_period, clock));

        match spawned {
            Ok(worker) => {
                self.worker = Some(worker);
                info!("tracking started");
                Ok(())
            }
            Err(e) => {
                self.shared.running.store(false, Ordering::SeqCst);
                *lock(&self.shared.head) = None;
                self.shared.set_state(TrackerState::Idle);
                Err(e.into())
            }
        }
    }

    /// Stop tracking and wait for the loop to exit.
    ///
    /// When this returns, no further datagrams will be sent and the
    /// landmark source has been released. Idempotent; a no-op when
    /// nothing is running.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        self.shared.running.store(false, Ordering::SeqCst);
        if worker.join().is_err() {
            warn!("tracking thread panicked during shutdown");
        }
        self.shared.set_state(TrackerState::Stopped);
        info!("tracking stopped");
    }

    /// Re-zero the pose around the current head position.
    ///
    /// Safe to call from any thread while the loop runs; the shared head
    /// lock makes the reference swap atomic with respect to tick updates.
    /// A no-op before a face has been acquired.
    pub fn center(&self) {
        let mut guard = lock(&self.shared.head);
        if let Some(head) = guard.as_mut() {
            head.center();
            *lock(&self.shared.latest) = Some(head.pose());
            info!("tracking recentered");
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Block until the source yields a valid face, then build the head state
fn acquire(
    source: &mut dyn LandmarkSource,
    filter: FilterParams,
    clock: Instant,
    timeout: Duration,
) -> Result<Head> {
    loop {
        if clock.elapsed() > timeout {
            return Err(Error::NoFaceDetected);
        }
        let Some(landmarks) = source.capture()? else {
            continue;
        };
        match LandmarkSample::from_indexed(&landmarks) {
            Ok(sample) => {
                return Ok(Head::with_params(
                    &sample,
                    clock.elapsed().as_secs_f64(),
                    filter,
                ))
            }
            Err(e) => debug!("skipping frame during acquisition: {e}"),
        }
    }
}

fn track_loop(
    mut source: Box<dyn LandmarkSource>,
    socket: UdpSocket,
    destination: SocketAddr,
    shared: &Arc<Shared>,
    frame_period: Duration,
    clock: Instant,
) {
    while shared.running.load(Ordering::SeqCst) {
        let tick_start = Instant::now();

        let landmarks = match source.capture() {
            Ok(landmarks) => landmarks,
            Err(Error::SourceExhausted) => {
                info!("landmark source exhausted, tracking loop exiting");
                break;
            }
            Err(e) => {
                warn!("landmark source failed, tracking loop exiting: {e}");
                break;
            }
        };

        if let Some(landmarks) = landmarks {
            match LandmarkSample::from_indexed(&landmarks) {
                Ok(sample) => {
                    let pose = {
                        let mut guard = lock(&shared.head);
                        let Some(head) = guard.as_mut() else { break };
                        head.update_points(&sample, clock.elapsed().as_secs_f64());
                        head.update_rotation();
                        head.update_position();
                        let pose = head.pose();
                        // published under the head lock so a concurrent
                        // recenter is never overwritten by a stale pose
                        *lock(&shared.latest) = Some(pose);
                        pose
                    };

                    let packet = protocol::encode(&pose);
                    if let Err(e) = socket.send_to(&packet, destination) {
                        warn!("pose datagram to {destination} failed: {e}");
                    }
                }
                // Treated like "no face": skip the tick, keep looping
                Err(e) => debug!("tick skipped: {e}"),
            }
        }

        // Bound the emission rate to the configured capture rate
        if let Some(idle) = frame_period.checked_sub(tick_start.elapsed()) {
            std::thread::sleep(idle);
        }
    }
    shared.set_state(TrackerState::Stopped);
}
