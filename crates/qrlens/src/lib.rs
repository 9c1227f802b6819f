#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use qrlens_image as image;

#[doc(inline)]
pub use qrlens_imgproc as imgproc;

#[doc(inline)]
pub use qrlens_io as io;

#[doc(inline)]
pub use qrlens_qr as qr;

/// The frame loop tying a source, a decoder and a sink together.
pub mod display_loop;

pub use crate::display_loop::{
    DisplayLoop, FrameCounters, LoopConfig, LoopError, LoopReport, LoopState, ReadFailurePolicy,
    StopReason,
};
