use std::path::{Path, PathBuf};

use qrlens_image::Image;

use crate::{error::IoError, functional::read_image_any_rgb8};

/// File extensions picked up by [`ImageDirSource`].
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A source of successive RGB frames.
///
/// Sources are opened by their constructors, which fail with
/// [`IoError::SourceUnavailable`] when nothing can be read. After that, every call to
/// [`FrameSource::read_frame`] returns one of:
///
/// * `Ok(Some(frame))` - the next frame.
/// * `Ok(None)` - the end of the stream.
/// * `Err(_)` - this read failed; later reads may still succeed.
pub trait FrameSource {
    /// Read the next frame.
    fn read_frame(&mut self) -> Result<Option<Image<u8, 3>>, IoError>;

    /// Release the underlying resources. Reads after a release report the end of the stream.
    fn release(&mut self) {}
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn read_frame(&mut self) -> Result<Option<Image<u8, 3>>, IoError> {
        (**self).read_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Reads the images of a directory in file name order.
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    next: usize,
    looping: bool,
    released: bool,
}

impl ImageDirSource {
    /// Open a directory of `png`/`jpg` images.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::SourceUnavailable`] if the path is not a readable directory or
    /// does not contain any image.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, IoError> {
        let dir = dir.as_ref();

        let entries = std::fs::read_dir(dir)
            .map_err(|e| IoError::SourceUnavailable(format!("{}: {e}", dir.display())))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
            if path.is_file() && is_image {
                paths.push(path);
            }
        }

        if paths.is_empty() {
            return Err(IoError::SourceUnavailable(format!(
                "{}: no images found",
                dir.display()
            )));
        }

        paths.sort();
        log::debug!("Opened {} with {} frames", dir.display(), paths.len());

        Ok(Self {
            paths,
            next: 0,
            looping: false,
            released: false,
        })
    }

    /// Restart from the first image instead of ending the stream.
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Number of images in the directory.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the directory holds no images. Always false for an opened source.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageDirSource {
    fn read_frame(&mut self) -> Result<Option<Image<u8, 3>>, IoError> {
        if self.released {
            return Ok(None);
        }

        if self.next >= self.paths.len() {
            if !self.looping {
                return Ok(None);
            }
            self.next = 0;
        }

        // advance first so a broken file is skipped by the next read
        let path = &self.paths[self.next];
        self.next += 1;

        read_image_any_rgb8(path).map(Some)
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Serves the same still image over and over.
pub struct StillImageSource {
    frame: Option<Image<u8, 3>>,
    remaining: Option<usize>,
}

impl StillImageSource {
    /// Load an image file.
    ///
    /// # Arguments
    ///
    /// * `path` - The image to serve.
    /// * `repeat` - How many frames to serve, `None` for an endless stream.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::SourceUnavailable`] if the image cannot be read.
    pub fn open(path: impl AsRef<Path>, repeat: Option<usize>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let frame = read_image_any_rgb8(path)
            .map_err(|e| IoError::SourceUnavailable(format!("{}: {e}", path.display())))?;
        Ok(Self::from_image(frame, repeat))
    }

    /// Serve an image that is already in memory.
    pub fn from_image(frame: Image<u8, 3>, repeat: Option<usize>) -> Self {
        Self {
            frame: Some(frame),
            remaining: repeat,
        }
    }
}

impl FrameSource for StillImageSource {
    fn read_frame(&mut self) -> Result<Option<Image<u8, 3>>, IoError> {
        match self.remaining.as_mut() {
            Some(0) => return Ok(None),
            Some(n) => *n -= 1,
            None => {}
        }

        Ok(self.frame.clone())
    }

    fn release(&mut self) {
        self.frame = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameSource, ImageDirSource, StillImageSource};
    use crate::{error::IoError, functional::write_image_png_rgb8};
    use qrlens_image::Image;

    fn frame(val: u8) -> Result<Image<u8, 3>, IoError> {
        Ok(Image::from_size_val([4, 3].into(), val)?)
    }

    #[test]
    fn dir_source_reads_in_order() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        write_image_png_rgb8(tmp_dir.path().join("b.png"), &frame(20)?)?;
        write_image_png_rgb8(tmp_dir.path().join("a.png"), &frame(10)?)?;
        std::fs::write(tmp_dir.path().join("notes.txt"), "not a frame")?;

        let mut source = ImageDirSource::open(tmp_dir.path())?;
        assert_eq!(source.len(), 2);

        let first = source.read_frame()?.expect("first frame");
        assert_eq!(first.as_slice()[0], 10);
        let second = source.read_frame()?.expect("second frame");
        assert_eq!(second.as_slice()[0], 20);
        assert!(source.read_frame()?.is_none());

        Ok(())
    }

    #[test]
    fn dir_source_loops_until_released() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        write_image_png_rgb8(tmp_dir.path().join("only.png"), &frame(5)?)?;

        let mut source = ImageDirSource::open(tmp_dir.path())?.with_looping(true);
        for _ in 0..3 {
            assert!(source.read_frame()?.is_some());
        }

        source.release();
        assert!(source.read_frame()?.is_none());

        Ok(())
    }

    #[test]
    fn dir_source_skips_broken_file() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        std::fs::write(tmp_dir.path().join("a.png"), b"definitely not a png")?;
        write_image_png_rgb8(tmp_dir.path().join("b.png"), &frame(7)?)?;

        let mut source = ImageDirSource::open(tmp_dir.path())?;
        assert!(source.read_frame().is_err());
        assert_eq!(source.read_frame()?.expect("second frame").as_slice()[0], 7);

        Ok(())
    }

    #[test]
    fn dir_source_unavailable() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        assert!(matches!(
            ImageDirSource::open(tmp_dir.path()),
            Err(IoError::SourceUnavailable(_))
        ));
        assert!(matches!(
            ImageDirSource::open(tmp_dir.path().join("missing")),
            Err(IoError::SourceUnavailable(_))
        ));
        Ok(())
    }

    #[test]
    fn still_source_repeats() -> Result<(), IoError> {
        let mut source = StillImageSource::from_image(frame(1)?, Some(2));
        assert!(source.read_frame()?.is_some());
        assert!(source.read_frame()?.is_some());
        assert!(source.read_frame()?.is_none());

        let mut endless = StillImageSource::from_image(frame(1)?, None);
        for _ in 0..10 {
            assert!(endless.read_frame()?.is_some());
        }
        endless.release();
        assert!(endless.read_frame()?.is_none());

        assert!(matches!(
            StillImageSource::open("missing.png", None),
            Err(IoError::SourceUnavailable(_))
        ));
        Ok(())
    }
}
