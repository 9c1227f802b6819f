/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// The frame source could not be opened.
    #[error("Frame source is not available: {0}")]
    SourceUnavailable(String),

    /// Error to open or write the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] qrlens_image::ImageError),

    /// Error to decode or encode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// The display sink could not show a frame.
    #[error("Failed to show the frame: {0}")]
    SinkError(String),

    /// Error to install the stop signal handler.
    #[error("Failed to install the signal handler. {0}")]
    SignalHandlerError(#[from] ctrlc::Error),
}
