//! Camera domain module
//!
//! Device descriptors, capability profiles and the negotiation that
//! matches a recording request against them.

mod device;
mod negotiation;
mod profile;
mod tuning;

pub use device::{CameraDevice, CameraPosition, SceneMode};
pub use negotiation::{
    negotiate, select_preview_profile, select_video_profile, NegotiatedProfiles, ProfileNotFound,
    VARIABLE_RATE_FPS, VARIABLE_RATE_RANGE,
};
pub use profile::{
    FrameRateRange, OutputCapability, PixelFormat, PreviewProfile, Size, StreamKind, VideoProfile,
};
pub use tuning::{ColorSpace, StabilizationMode};
