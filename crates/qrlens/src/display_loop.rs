use std::time::Duration;

use qrlens_io::{fps_counter::FpsCounter, sink::DisplaySink, source::FrameSource, IoError};
use qrlens_qr::{overlay::render_symbols, DecodeOutcome, DecoderAdapter};
use thiserror::Error;

/// Default wait for a key press after each displayed frame.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(1);

/// Default wait before reading again after a failed read.
pub const DEFAULT_READ_BACKOFF: Duration = Duration::from_millis(10);

/// An error type for the display loop.
#[derive(Error, Debug)]
pub enum LoopError {
    /// The sink failed to show a frame.
    #[error(transparent)]
    IoError(#[from] IoError),

    /// The loop already ran to completion and released its source.
    #[error("The display loop already stopped")]
    AlreadyStopped,
}

/// What the loop does when reading a frame fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadFailurePolicy {
    /// Log the failure, wait for `backoff` and read again.
    Continue {
        /// Wait before the next read.
        backoff: Duration,
        /// Stop after this many failures in a row, `None` to retry forever.
        max_consecutive: Option<usize>,
    },
    /// Stop at the first failed read.
    Abort,
}

impl Default for ReadFailurePolicy {
    fn default() -> Self {
        Self::Continue {
            backoff: DEFAULT_READ_BACKOFF,
            max_consecutive: None,
        }
    }
}

/// Configuration of a [`DisplayLoop`].
#[derive(Clone, Debug)]
pub struct LoopConfig {
    /// Label passed to the sink, defaults to the decoder name.
    pub label: Option<String>,
    /// Wait for a key press after each displayed frame.
    pub poll_timeout: Duration,
    /// What to do when a read fails.
    pub read_failure_policy: ReadFailurePolicy,
    /// Stop after displaying this many frames.
    pub max_frames: Option<usize>,
    /// Print the text of every decoded symbol to stdout.
    pub print_text: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            label: None,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
            read_failure_policy: ReadFailurePolicy::default(),
            max_frames: None,
            print_text: false,
        }
    }
}

impl LoopConfig {
    /// Set the label passed to the sink.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the wait for a key press after each displayed frame.
    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    /// Set the read failure policy.
    pub fn with_read_failure_policy(mut self, policy: ReadFailurePolicy) -> Self {
        self.read_failure_policy = policy;
        self
    }

    /// Stop after displaying `max_frames` frames.
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Print the text of every decoded symbol to stdout.
    pub fn with_print_text(mut self, print_text: bool) -> Self {
        self.print_text = print_text;
        self
    }
}

/// The states of a [`DisplayLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Created, not running yet.
    Idle,
    /// Waiting for the next frame from the source.
    CapturingFrame,
    /// Running the decoder over the frame.
    Decoding,
    /// Drawing the decoded symbols over the frame.
    Rendering,
    /// Showing the frame and polling for a key.
    Displaying,
    /// Finished, the source is released.
    Stopped,
}

/// Why a [`DisplayLoop`] stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The sink reported a key press.
    KeyPressed(char),
    /// The source has no more frames.
    EndOfStream,
    /// The configured number of frames was displayed.
    FrameLimit,
    /// Reading a frame failed and the policy gave up.
    ReadFailure,
}

/// Per-run frame counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameCounters {
    /// Frames handed to the sink.
    pub frames_displayed: usize,
    /// Symbols decoded over all frames.
    pub symbols_decoded: usize,
    /// Frames without any decoded symbol, decode failures included.
    pub empty_frames: usize,
    /// Frames where the decoder faulted.
    pub decode_failures: usize,
    /// Failed reads from the source.
    pub read_failures: usize,
}

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopReport {
    /// What happened during the run.
    pub counters: FrameCounters,
    /// State of the loop after the run, always [`LoopState::Stopped`].
    pub state: LoopState,
    /// Why the loop stopped.
    pub stop_reason: StopReason,
}

/// Runs one decoder over every frame of a source and shows the annotated frames.
///
/// Each frame is read, decoded, drawn over and shown before the next one is read.
/// The source is released when the loop stops, whatever the reason.
///
/// # Example
///
/// ```no_run
/// use qrlens::{DisplayLoop, LoopConfig};
/// use qrlens::io::{sink::{PngDirSink, StopSignal}, source::ImageDirSource};
/// use qrlens::qr::BuiltinDetector;
///
/// let source = ImageDirSource::open("frames")?;
/// let sink = PngDirSink::create("annotated", StopSignal::new())?;
///
/// let mut display = DisplayLoop::new(source, sink, BuiltinDetector::new(), LoopConfig::default());
/// let report = display.run()?;
/// println!("{:?}", report.stop_reason);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DisplayLoop<S, K, D> {
    source: S,
    sink: K,
    decoder: D,
    config: LoopConfig,
    state: LoopState,
    fps_counter: FpsCounter,
}

impl<S, K, D> DisplayLoop<S, K, D>
where
    S: FrameSource,
    K: DisplaySink,
    D: DecoderAdapter,
{
    /// Create an idle loop owning its source, sink and decoder.
    pub fn new(source: S, sink: K, decoder: D, config: LoopConfig) -> Self {
        Self {
            source,
            sink,
            decoder,
            config,
            state: LoopState::Idle,
            fps_counter: FpsCounter::new(),
        }
    }

    /// The current state of the loop.
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// The smoothed display rate.
    pub fn fps(&self) -> f32 {
        self.fps_counter.fps()
    }

    /// Give back the source, sink and decoder.
    pub fn into_parts(self) -> (S, K, D) {
        (self.source, self.sink, self.decoder)
    }

    /// Run until a key is pressed, the source ends, the frame limit is reached or a
    /// read failure stops the loop.
    ///
    /// # Errors
    ///
    /// Returns [`LoopError::IoError`] if the sink fails to show a frame and
    /// [`LoopError::AlreadyStopped`] if the loop already ran.
    pub fn run(&mut self) -> Result<LoopReport, LoopError> {
        if self.state == LoopState::Stopped {
            return Err(LoopError::AlreadyStopped);
        }

        let mut counters = FrameCounters::default();
        let result = self.run_frames(&mut counters);

        self.source.release();
        self.transition(LoopState::Stopped);

        let stop_reason = result?;
        log::info!(
            "Stopped ({stop_reason:?}) after {} frames",
            counters.frames_displayed
        );

        Ok(LoopReport {
            counters,
            state: self.state,
            stop_reason,
        })
    }

    fn run_frames(&mut self, counters: &mut FrameCounters) -> Result<StopReason, LoopError> {
        let label = match &self.config.label {
            Some(label) => label.clone(),
            None => self.decoder.name().to_string(),
        };
        let mut consecutive_failures = 0;

        loop {
            if self
                .config
                .max_frames
                .is_some_and(|max| counters.frames_displayed >= max)
            {
                return Ok(StopReason::FrameLimit);
            }

            self.transition(LoopState::CapturingFrame);
            let mut frame = match self.source.read_frame() {
                Ok(Some(frame)) => {
                    consecutive_failures = 0;
                    frame
                }
                Ok(None) => return Ok(StopReason::EndOfStream),
                Err(e) => {
                    counters.read_failures += 1;
                    consecutive_failures += 1;

                    match self.config.read_failure_policy {
                        ReadFailurePolicy::Abort => {
                            log::error!("Failed to read frame: {e}");
                            return Ok(StopReason::ReadFailure);
                        }
                        ReadFailurePolicy::Continue {
                            backoff,
                            max_consecutive,
                        } => {
                            if max_consecutive.is_some_and(|max| consecutive_failures >= max) {
                                log::error!(
                                    "Failed to read frame: {e} ({consecutive_failures} in a row, giving up)"
                                );
                                return Ok(StopReason::ReadFailure);
                            }
                            log::warn!("Failed to read frame: {e} (retrying in {backoff:?})");
                            std::thread::sleep(backoff);
                            continue;
                        }
                    }
                }
            };

            self.transition(LoopState::Decoding);
            let outcome = self.decoder.decode(&frame);
            match &outcome {
                DecodeOutcome::Found(symbols) => counters.symbols_decoded += symbols.len(),
                DecodeOutcome::NotFound => counters.empty_frames += 1,
                DecodeOutcome::Failed(_) => {
                    counters.empty_frames += 1;
                    counters.decode_failures += 1;
                }
            }

            self.transition(LoopState::Rendering);
            let symbols = outcome.symbols();
            if self.config.print_text {
                for symbol in symbols {
                    println!("Decoded Data : {}", symbol.text);
                }
            }
            render_symbols(&mut frame, symbols, self.decoder.overlay_style());

            self.transition(LoopState::Displaying);
            self.sink.show(&label, &frame)?;
            counters.frames_displayed += 1;

            let fps = self.fps_counter.update();
            log::debug!("{label}: {fps:.1} fps");

            if let Some(key) = self.sink.poll_key(self.config.poll_timeout) {
                return Ok(StopReason::KeyPressed(key));
            }
        }
    }

    fn transition(&mut self, next: LoopState) {
        log::trace!("{:?} -> {next:?}", self.state);
        self.state = next;
    }
}
