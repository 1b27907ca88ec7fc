// Scan session state machine
//
// idle -> warming-up -> scanning -> (success | failure-exhausted | cancelled)
//
// The loop is cooperative: the cancel flag is checked before every
// continuation so closing the scanner stops cleanly. Frames come from a
// FrameSource and detection goes through a QrDetector, so the same state
// machine drives a camera, a recorded clip, or a test script.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::{sleep, timeout};

use crate::config::ScanLoopConfig;
use crate::error::CameraError;
use crate::resolver::ScanOutcome;

/// A captured frame (grayscale buffer)
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub luma: Vec<u8>,
}

/// A rectangular detection region within a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn full(frame: &Frame) -> Self {
        Self {
            x: 0,
            y: 0,
            width: frame.width,
            height: frame.height,
        }
    }

    /// Centered region covering `fraction` of each dimension
    pub fn center(frame: &Frame, fraction: f32) -> Self {
        let fraction = fraction.clamp(0.0, 1.0);
        let width = (frame.width as f32 * fraction) as u32;
        let height = (frame.height as f32 * fraction) as u32;
        Self {
            x: (frame.width - width) / 2,
            y: (frame.height - height) / 2,
            width,
            height,
        }
    }
}

/// Camera acquisition constraints, tried in descending order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraConstraint {
    /// Rear-facing camera at the ideal resolution
    EnvironmentFacing,
    /// Any video device
    BasicVideo,
    /// Whatever the platform will give us
    Minimal,
}

/// The fallback ladder for camera acquisition
pub const CONSTRAINT_LADDER: [CameraConstraint; 3] = [
    CameraConstraint::EnvironmentFacing,
    CameraConstraint::BasicVideo,
    CameraConstraint::Minimal,
];

/// Source of frames for a scan session
pub trait FrameSource: Send {
    /// Try to open the source under the given constraint
    fn open(&mut self, constraint: CameraConstraint) -> Result<(), CameraError>;

    /// Next frame, or `None` when the source has closed
    fn next_frame(&mut self) -> Result<Option<Frame>, CameraError>;

    fn close(&mut self) {}
}

/// QR detection over a frame region
pub trait QrDetector: Send + Sync {
    fn detect(&self, frame: &Frame, region: Region) -> Option<String>;
}

/// Observable phase of a scan session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    WarmingUp,
    Scanning,
    Processing,
    Closed,
}

/// How a scan session ended
#[derive(Debug)]
pub enum ScanSessionEnd {
    /// The resolver produced a successful outcome; the session closed
    /// after the display delay
    Resolved(ScanOutcome),
    /// The consecutive-miss budget ran out ("unable to detect")
    DetectionExhausted { failures: u32 },
    /// Cancelled by the operator, or the frame source closed
    Cancelled,
}

/// Cancellation handle shared with the UI. Setting it stops the session
/// before its next continuation; an in-flight resolver call is not
/// aborted, but its result is discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct ScanSession<D: QrDetector> {
    config: ScanLoopConfig,
    detector: D,
    cancel: CancelFlag,
    phase_tx: watch::Sender<ScanPhase>,
    phase_rx: watch::Receiver<ScanPhase>,
}

impl<D: QrDetector> ScanSession<D> {
    pub fn new(config: ScanLoopConfig, detector: D) -> Self {
        let (phase_tx, phase_rx) = watch::channel(ScanPhase::Idle);
        Self {
            config,
            detector,
            cancel: CancelFlag::new(),
            phase_tx,
            phase_rx,
        }
    }

    /// Handle for the UI to cancel this session
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Watch the session phase (for status messages)
    pub fn phase(&self) -> watch::Receiver<ScanPhase> {
        self.phase_rx.clone()
    }

    fn set_phase(&self, phase: ScanPhase) {
        let _ = self.phase_tx.send(phase);
    }

    /// Run the session to completion. `process` is the downstream
    /// pipeline for a decoded payload (the scan resolver); it is given
    /// `processing_timeout` to answer, and a timeout is a recoverable
    /// processing failure rather than a fatal scanner error.
    pub async fn run<S, F, Fut>(
        &mut self,
        source: &mut S,
        mut process: F,
    ) -> Result<ScanSessionEnd, CameraError>
    where
        S: FrameSource,
        F: FnMut(String) -> Fut,
        Fut: Future<Output = ScanOutcome>,
    {
        self.set_phase(ScanPhase::WarmingUp);
        open_with_ladder(source)?;
        self.set_phase(ScanPhase::Scanning);

        let mut failures: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                return self.finish(source, ScanSessionEnd::Cancelled);
            }

            let frame = match source.next_frame()? {
                Some(frame) => frame,
                None => return self.finish(source, ScanSessionEnd::Cancelled),
            };

            // localized detection first, full frame second
            let center = Region::center(&frame, self.config.center_crop);
            let decoded = self
                .detector
                .detect(&frame, center)
                .or_else(|| self.detector.detect(&frame, Region::full(&frame)));

            let Some(code) = decoded else {
                failures += 1;
                if failures >= self.config.max_failures {
                    tracing::info!(failures, "unable to detect a badge, giving up");
                    return self.finish(source, ScanSessionEnd::DetectionExhausted { failures });
                }
                sleep(self.config.retry_delay).await;
                continue;
            };

            self.set_phase(ScanPhase::Processing);
            let result = timeout(self.config.processing_timeout, process(code)).await;

            // a result landing after cancellation is discarded
            if self.cancel.is_cancelled() {
                return self.finish(source, ScanSessionEnd::Cancelled);
            }

            match result {
                Err(_elapsed) => {
                    tracing::warn!("scan processing timed out, scanner stays open");
                    failures = 0;
                    self.set_phase(ScanPhase::Scanning);
                }
                Ok(outcome) if outcome.success => {
                    sleep(self.config.close_delay).await;
                    return self.finish(source, ScanSessionEnd::Resolved(outcome));
                }
                Ok(outcome) => {
                    tracing::debug!(message = %outcome.message, "scan rejected, retrying");
                    failures = 0;
                    self.set_phase(ScanPhase::Scanning);
                    sleep(self.config.retry_delay).await;
                }
            }
        }
    }

    fn finish<S: FrameSource>(
        &self,
        source: &mut S,
        end: ScanSessionEnd,
    ) -> Result<ScanSessionEnd, CameraError> {
        source.close();
        self.set_phase(ScanPhase::Closed);
        Ok(end)
    }
}

/// Try each constraint in descending order; surface the last error when
/// every rung fails.
fn open_with_ladder<S: FrameSource>(source: &mut S) -> Result<(), CameraError> {
    let mut last = CameraError::Unsupported;
    for constraint in CONSTRAINT_LADDER {
        match source.open(constraint) {
            Ok(()) => return Ok(()),
            Err(err) => {
                tracing::debug!(?constraint, %err, "camera constraint rejected");
                last = err;
            }
        }
    }
    Err(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{ScanAction, ScanErrorKind};
    use std::collections::VecDeque;
    use std::time::Duration;

    fn frame() -> Frame {
        Frame {
            width: 640,
            height: 480,
            luma: vec![0; 640 * 480],
        }
    }

    /// Scripted source: yields a fixed number of frames, then ends
    struct ScriptedSource {
        frames: VecDeque<Frame>,
        fail_open: Vec<CameraConstraint>,
        opened_with: Option<CameraConstraint>,
        open_error: CameraError,
        closed: bool,
    }

    impl ScriptedSource {
        fn with_frames(n: usize) -> Self {
            Self {
                frames: (0..n).map(|_| frame()).collect(),
                fail_open: Vec::new(),
                opened_with: None,
                open_error: CameraError::PermissionDenied,
                closed: false,
            }
        }
    }

    impl FrameSource for ScriptedSource {
        fn open(&mut self, constraint: CameraConstraint) -> Result<(), CameraError> {
            if self.fail_open.contains(&constraint) {
                return Err(self.open_error);
            }
            self.opened_with = Some(constraint);
            Ok(())
        }

        fn next_frame(&mut self) -> Result<Option<Frame>, CameraError> {
            Ok(self.frames.pop_front())
        }

        fn close(&mut self) {
            self.closed = true;
        }
    }

    /// Detector that answers on the nth attempt
    struct NthAttemptDetector {
        hits_at: u32,
        calls: std::sync::atomic::AtomicU32,
        payload: String,
    }

    impl NthAttemptDetector {
        fn new(hits_at: u32, payload: &str) -> Self {
            Self {
                hits_at,
                calls: std::sync::atomic::AtomicU32::new(0),
                payload: payload.to_string(),
            }
        }
    }

    impl QrDetector for NthAttemptDetector {
        fn detect(&self, _frame: &Frame, _region: Region) -> Option<String> {
            // two calls per frame (center crop, then full); count frames
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call / 2 + 1 >= self.hits_at {
                Some(self.payload.clone())
            } else {
                None
            }
        }
    }

    struct NeverDetector;
    impl QrDetector for NeverDetector {
        fn detect(&self, _frame: &Frame, _region: Region) -> Option<String> {
            None
        }
    }

    fn success_outcome() -> ScanOutcome {
        ScanOutcome::succeeded(ScanAction::Checkin, "ok", serde_json::Value::Null)
    }

    fn failure_outcome() -> ScanOutcome {
        ScanOutcome {
            success: false,
            action: ScanAction::Error,
            message: "nope".to_string(),
            data: None,
            error: Some(ScanErrorKind::NotFound),
        }
    }

    #[test]
    fn center_region_covers_80_percent() {
        let f = frame();
        let r = Region::center(&f, 0.8);
        assert_eq!(r.width, 512);
        assert_eq!(r.height, 384);
        assert_eq!(r.x, 64);
        assert_eq!(r.y, 48);
    }

    #[tokio::test(start_paused = true)]
    async fn detection_on_third_frame_resolves() {
        let mut session = ScanSession::new(
            ScanLoopConfig::default(),
            NthAttemptDetector::new(3, "usr_1|Visitor|e|1"),
        );
        let mut source = ScriptedSource::with_frames(10);

        let end = session
            .run(&mut source, |code| async move {
                assert_eq!(code, "usr_1|Visitor|e|1");
                success_outcome()
            })
            .await
            .unwrap();

        match end {
            ScanSessionEnd::Resolved(outcome) => assert!(outcome.success),
            other => panic!("expected resolved, got {other:?}"),
        }
        assert!(source.closed);
        assert_eq!(*session.phase().borrow(), ScanPhase::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn hundred_misses_exhaust_detection() {
        let mut session = ScanSession::new(ScanLoopConfig::default(), NeverDetector);
        let mut source = ScriptedSource::with_frames(500);

        let end = session
            .run(&mut source, |_| async { success_outcome() })
            .await
            .unwrap();

        match end {
            ScanSessionEnd::DetectionExhausted { failures } => assert_eq!(failures, 100),
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failed_outcome_keeps_session_open_for_retry() {
        let mut session = ScanSession::new(
            ScanLoopConfig::default(),
            NthAttemptDetector::new(1, "usr_1"),
        );
        let mut source = ScriptedSource::with_frames(3);

        let calls = std::sync::atomic::AtomicU32::new(0);
        let end = session
            .run(&mut source, |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        failure_outcome()
                    } else {
                        success_outcome()
                    }
                }
            })
            .await
            .unwrap();

        assert!(matches!(end, ScanSessionEnd::Resolved(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn processing_timeout_is_recoverable() {
        let config = ScanLoopConfig::default().with_processing_timeout(Duration::from_secs(10));
        let mut session = ScanSession::new(config, NthAttemptDetector::new(1, "usr_1"));
        let mut source = ScriptedSource::with_frames(3);

        let calls = std::sync::atomic::AtomicU32::new(0);
        let end = session
            .run(&mut source, |_| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        // hangs past the processing timeout
                        sleep(Duration::from_secs(60)).await;
                    }
                    success_outcome()
                }
            })
            .await
            .unwrap();

        // first attempt timed out, scanner stayed open, second succeeded
        assert!(matches!(end, ScanSessionEnd::Resolved(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_session_discards_late_result() {
        let mut session = ScanSession::new(
            ScanLoopConfig::default(),
            NthAttemptDetector::new(1, "usr_1"),
        );
        let cancel = session.cancel_flag();
        let mut source = ScriptedSource::with_frames(3);

        let end = session
            .run(&mut source, |_| {
                // cancel arrives while the resolver is in flight
                cancel.cancel();
                async { success_outcome() }
            })
            .await
            .unwrap();

        assert!(matches!(end, ScanSessionEnd::Cancelled));
        assert!(source.closed);
    }

    #[tokio::test(start_paused = true)]
    async fn source_ending_cancels_cleanly() {
        let mut session = ScanSession::new(ScanLoopConfig::default(), NeverDetector);
        let mut source = ScriptedSource::with_frames(2);

        let end = session
            .run(&mut source, |_| async { success_outcome() })
            .await
            .unwrap();

        assert!(matches!(end, ScanSessionEnd::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn constraint_ladder_falls_back_before_failing() {
        let mut session = ScanSession::new(ScanLoopConfig::default(), NeverDetector);

        // ideal constraint rejected, basic works
        let mut source = ScriptedSource::with_frames(0);
        source.fail_open = vec![CameraConstraint::EnvironmentFacing];
        session
            .run(&mut source, |_| async { success_outcome() })
            .await
            .unwrap();
        assert_eq!(source.opened_with, Some(CameraConstraint::BasicVideo));

        // every rung rejected: the error surfaces
        let mut source = ScriptedSource::with_frames(0);
        source.fail_open = CONSTRAINT_LADDER.to_vec();
        source.open_error = CameraError::NoCamera;
        let err = session
            .run(&mut source, |_| async { success_outcome() })
            .await
            .unwrap_err();
        assert_eq!(err, CameraError::NoCamera);
    }
}
