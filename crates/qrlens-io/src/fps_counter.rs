use std::time::Instant;

/// The smoothing factor for the FPS calculation.
const SMOOTHING: f32 = 0.95;

/// A frame per second (FPS) counter with exponential smoothing.
///
/// # Examples
///
/// ```
/// use qrlens_io::fps_counter::FpsCounter;
///
/// let mut fps_counter = FpsCounter::new();
///
/// for _ in 0..100 {
///    fps_counter.update();
/// }
///
/// assert_eq!(fps_counter.frames(), 100);
/// ```
pub struct FpsCounter {
    last_time: Instant,
    frame_count: u64,
    fps: f32,
}

impl FpsCounter {
    /// Creates a new `FpsCounter`.
    pub fn new() -> Self {
        Self {
            last_time: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    /// Returns the current smoothed FPS.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Returns the number of frames counted so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frame_count
    }

    /// Counts one frame and returns the updated FPS.
    pub fn update(&mut self) -> f32 {
        self.frame_count += 1;

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_time).as_secs_f32();
        self.last_time = now;

        // two frames within the timer resolution carry no rate information
        if elapsed <= f32::EPSILON {
            return self.fps;
        }

        let instant_fps = 1.0 / elapsed;
        self.fps = if self.fps == 0.0 {
            instant_fps
        } else {
            self.fps * SMOOTHING + instant_fps * (1.0 - SMOOTHING)
        };

        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    #[test]
    fn test_fps_counter() {
        let mut fps_counter = super::FpsCounter::new();
        for _ in 0..3 {
            std::thread::sleep(Duration::from_millis(5));
            fps_counter.update();
        }
        assert_eq!(fps_counter.frames(), 3);
        assert!(fps_counter.fps() > 0.0);
        assert!(fps_counter.fps().is_finite());
    }
}
