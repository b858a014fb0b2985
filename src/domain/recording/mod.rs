//! Recording domain module

mod clock;
mod limit;
mod request;

pub use clock::{format_elapsed, RecordingClock, ZERO_DISPLAY};
pub use limit::RecordingLimit;
pub use request::{
    OutputTarget, RecordingRequest, Resolution, VideoCodec, ALL_RESOLUTIONS, DEFAULT_FRAME_RATE,
};
