use std::time::Duration;

use qrlens::{
    image::Image,
    io::{
        sink::{DisplaySink, StopSignal, STOP_KEY},
        IoError,
    },
};

/// Streams the annotated frames to a spawned rerun viewer.
pub struct RerunSink {
    rec: rerun::RecordingStream,
    stop: StopSignal,
}

impl RerunSink {
    pub fn spawn(stop: StopSignal) -> Result<Self, Box<dyn std::error::Error>> {
        let rec = rerun::RecordingStreamBuilder::new("qrlens QR Compare").spawn()?;
        Ok(Self { rec, stop })
    }
}

impl DisplaySink for RerunSink {
    fn show(&mut self, label: &str, frame: &Image<u8, 3>) -> Result<(), IoError> {
        let entity = label.replace(' ', "_");
        self.rec
            .log(
                entity,
                &rerun::Image::from_elements(
                    frame.as_slice(),
                    frame.size().into(),
                    rerun::ColorModel::RGB,
                ),
            )
            .map_err(|e| IoError::SinkError(e.to_string()))
    }

    fn poll_key(&mut self, timeout: Duration) -> Option<char> {
        std::thread::sleep(timeout);
        self.stop.is_triggered().then_some(STOP_KEY)
    }
}
