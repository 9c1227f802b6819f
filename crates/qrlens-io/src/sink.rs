use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use qrlens_image::Image;

use crate::{error::IoError, functional::write_image_png_rgb8};

/// Key reported by sinks when the stop signal fired.
pub const STOP_KEY: char = 'q';

/// Where annotated frames are shown.
pub trait DisplaySink {
    /// Show a frame under the given label.
    fn show(&mut self, label: &str, frame: &Image<u8, 3>) -> Result<(), IoError>;

    /// Wait up to `timeout` for a key press.
    ///
    /// Doubles as the pacing delay of the display loop and as its stop request poll.
    fn poll_key(&mut self, timeout: Duration) -> Option<char>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn show(&mut self, label: &str, frame: &Image<u8, 3>) -> Result<(), IoError> {
        (**self).show(label, frame)
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<char> {
        (**self).poll_key(timeout)
    }
}

/// A cancel flag shared between a signal handler and the display loop.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// Create a signal that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the signal fired.
    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fire the signal on Ctrl-C.
    ///
    /// Only one handler can be installed per process.
    pub fn install_ctrlc(&self) -> Result<(), IoError> {
        let signal = self.clone();
        ctrlc::set_handler(move || {
            log::info!("Received Ctrl-C signal. Sending stop signal !!");
            signal.trigger();
        })?;
        Ok(())
    }
}

/// Writes every shown frame as a PNG file into a directory.
///
/// Files are named `<label>_<index>.png` with a zero padded frame index.
pub struct PngDirSink {
    out_dir: PathBuf,
    frame_index: usize,
    stop: StopSignal,
}

impl PngDirSink {
    /// Create the output directory if needed.
    pub fn create(out_dir: impl AsRef<Path>, stop: StopSignal) -> Result<Self, IoError> {
        let out_dir = out_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&out_dir)?;
        Ok(Self {
            out_dir,
            frame_index: 0,
            stop,
        })
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> usize {
        self.frame_index
    }

    fn file_name(&self, label: &str) -> String {
        let label: String = label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        format!("{label}_{:06}.png", self.frame_index)
    }
}

impl DisplaySink for PngDirSink {
    fn show(&mut self, label: &str, frame: &Image<u8, 3>) -> Result<(), IoError> {
        let path = self.out_dir.join(self.file_name(label));
        write_image_png_rgb8(&path, frame)?;
        log::trace!("Wrote {}", path.display());
        self.frame_index += 1;
        Ok(())
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<char> {
        if self.stop.is_triggered() {
            return Some(STOP_KEY);
        }

        std::thread::sleep(timeout);

        self.stop.is_triggered().then_some(STOP_KEY)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{DisplaySink, PngDirSink, StopSignal, STOP_KEY};
    use crate::{error::IoError, functional::read_image_any_rgb8};
    use qrlens_image::Image;

    #[test]
    fn png_sink_writes_frames() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let out_dir = tmp_dir.path().join("out");
        let mut sink = PngDirSink::create(&out_dir, StopSignal::new())?;

        let frame = Image::<u8, 3>::from_size_val([8, 8].into(), 42)?;
        sink.show("QRCode Zbar", &frame)?;
        sink.show("QRCode Zbar", &frame)?;
        assert_eq!(sink.frames_written(), 2);

        let written = read_image_any_rgb8(out_dir.join("QRCode_Zbar_000001.png"))?;
        assert_eq!(written.as_slice(), frame.as_slice());

        Ok(())
    }

    #[test]
    fn png_sink_reports_stop_key() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let stop = StopSignal::new();
        let mut sink = PngDirSink::create(tmp_dir.path(), stop.clone())?;

        assert_eq!(sink.poll_key(Duration::from_millis(1)), None);
        stop.trigger();
        assert_eq!(sink.poll_key(Duration::from_millis(1)), Some(STOP_KEY));

        Ok(())
    }
}
