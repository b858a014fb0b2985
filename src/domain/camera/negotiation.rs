//! Profile negotiation
//!
//! Picks the hardware profiles that satisfy a [`RecordingRequest`]. Both
//! selectors are pure: the first matching profile in enumeration order wins
//! and there is no further tie-break.

use serde::Serialize;
use thiserror::Error;

use crate::domain::recording::RecordingRequest;

use super::profile::{
    FrameRateRange, OutputCapability, PixelFormat, PreviewProfile, Size, StreamKind, VideoProfile,
};

/// Rate at which a variable-rate profile is also acceptable
pub const VARIABLE_RATE_FPS: u32 = 30;

/// The variable-rate range accepted for [`VARIABLE_RATE_FPS`]
pub const VARIABLE_RATE_RANGE: FrameRateRange = FrameRateRange::new(1, VARIABLE_RATE_FPS);

/// No enumerated profile satisfies the request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No {stream} profile matches {size} @ {frame_rate} fps ({})", dynamic_range(.hdr))]
pub struct ProfileNotFound {
    pub stream: StreamKind,
    pub size: Size,
    pub frame_rate: u32,
    pub hdr: bool,
}

fn dynamic_range(hdr: &bool) -> &'static str {
    if *hdr {
        "HDR"
    } else {
        "SDR"
    }
}

/// The preview/video pair chosen for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NegotiatedProfiles {
    pub preview: PreviewProfile,
    pub video: VideoProfile,
}

/// Select the preview profile with the dynamic range's format and exactly `target` size
pub fn select_preview_profile(
    profiles: &[PreviewProfile],
    target: Size,
    hdr: bool,
) -> Option<PreviewProfile> {
    let format = PixelFormat::preview_format(hdr);
    profiles
        .iter()
        .find(|profile| profile.format == format && profile.size == target)
        .copied()
}

/// Select the video profile matching the request's format, size and frame rate
pub fn select_video_profile(
    profiles: &[VideoProfile],
    request: &RecordingRequest,
) -> Option<VideoProfile> {
    let format = PixelFormat::video_format(request.hdr);
    profiles
        .iter()
        .find(|profile| {
            profile.format == format
                && profile.size == request.size
                && frame_rate_matches(profile.frame_rate, request.frame_rate)
        })
        .copied()
}

/// 30 fps also accepts the variable `[1,30]` range; every other rate needs
/// an exact fixed range.
fn frame_rate_matches(range: FrameRateRange, frame_rate: u32) -> bool {
    if frame_rate == VARIABLE_RATE_FPS && range == VARIABLE_RATE_RANGE {
        return true;
    }
    range == FrameRateRange::fixed(frame_rate)
}

/// Negotiate both streams, reporting which one has no match
pub fn negotiate(
    capability: &OutputCapability,
    request: &RecordingRequest,
) -> Result<NegotiatedProfiles, ProfileNotFound> {
    let not_found = |stream| ProfileNotFound {
        stream,
        size: request.size,
        frame_rate: request.frame_rate,
        hdr: request.hdr,
    };

    let video = select_video_profile(&capability.video_profiles, request)
        .ok_or_else(|| not_found(StreamKind::Video))?;
    let preview = select_preview_profile(&capability.preview_profiles, request.size, request.hdr)
        .ok_or_else(|| not_found(StreamKind::Preview))?;

    Ok(NegotiatedProfiles { preview, video })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::domain::recording::{OutputTarget, Resolution, VideoCodec};

    const FHD: Size = Size::new(1920, 1080);

    fn request(frame_rate: u32, hdr: bool) -> RecordingRequest {
        let codec = if hdr { VideoCodec::Hevc } else { VideoCodec::Avc };
        RecordingRequest::new(
            Resolution::Fhd1080p,
            frame_rate,
            hdr,
            codec,
            OutputTarget {
                preview_surface: "preview".to_string(),
                encoder_surface: "encoder".to_string(),
                path: PathBuf::from("out.mp4"),
            },
        )
    }

    fn video(format: PixelFormat, size: Size, min: u32, max: u32) -> VideoProfile {
        VideoProfile::new(format, size, FrameRateRange::new(min, max))
    }

    #[test]
    fn preview_requires_exact_size_and_format() {
        let profiles = [
            PreviewProfile::new(PixelFormat::Yuv420Sp, Size::new(1280, 720)),
            PreviewProfile::new(PixelFormat::YcrcbP010, FHD),
            PreviewProfile::new(PixelFormat::Yuv420Sp, FHD),
        ];

        assert_eq!(
            select_preview_profile(&profiles, FHD, false),
            Some(profiles[2])
        );
        assert_eq!(
            select_preview_profile(&profiles, FHD, true),
            Some(profiles[1])
        );
        assert_eq!(
            select_preview_profile(&profiles, Size::new(3840, 2160), false),
            None
        );
    }

    #[test]
    fn thirty_fps_accepts_variable_and_fixed_ranges() {
        let variable = [video(PixelFormat::Yuv420Sp, FHD, 1, 30)];
        let fixed = [video(PixelFormat::Yuv420Sp, FHD, 30, 30)];

        assert_eq!(select_video_profile(&variable, &request(30, false)), Some(variable[0]));
        assert_eq!(select_video_profile(&fixed, &request(30, false)), Some(fixed[0]));
    }

    #[test]
    fn thirty_fps_never_picks_a_lower_ceiling() {
        let profiles = [
            video(PixelFormat::Yuv420Sp, FHD, 1, 25),
            video(PixelFormat::Yuv420Sp, FHD, 15, 30),
            video(PixelFormat::Yuv420Sp, FHD, 1, 60),
        ];
        assert_eq!(select_video_profile(&profiles, &request(30, false)), None);
    }

    #[test]
    fn sixty_fps_requires_exact_fixed_range() {
        let profiles = [
            video(PixelFormat::Yuv420Sp, FHD, 1, 60),
            video(PixelFormat::Yuv420Sp, FHD, 60, 60),
        ];
        assert_eq!(select_video_profile(&profiles, &request(60, false)), Some(profiles[1]));

        let variable_only = [video(PixelFormat::Yuv420Sp, FHD, 1, 60)];
        assert_eq!(select_video_profile(&variable_only, &request(60, false)), None);
    }

    #[test]
    fn hdr_video_needs_ten_bit_format() {
        let profiles = [
            video(PixelFormat::Yuv420Sp, FHD, 1, 30),
            video(PixelFormat::YcbcrP010, FHD, 1, 30),
        ];
        assert_eq!(select_video_profile(&profiles, &request(30, true)), Some(profiles[1]));
    }

    #[test]
    fn first_match_in_enumeration_order_wins() {
        let profiles = [
            video(PixelFormat::Yuv420Sp, FHD, 30, 30),
            video(PixelFormat::Yuv420Sp, FHD, 1, 30),
        ];
        assert_eq!(select_video_profile(&profiles, &request(30, false)), Some(profiles[0]));
    }

    #[test]
    fn negotiation_is_deterministic() {
        let capability = OutputCapability {
            preview_profiles: vec![
                PreviewProfile::new(PixelFormat::Yuv420Sp, FHD),
                PreviewProfile::new(PixelFormat::Yuv420Sp, FHD),
            ],
            video_profiles: vec![
                video(PixelFormat::Yuv420Sp, FHD, 1, 30),
                video(PixelFormat::Yuv420Sp, FHD, 30, 30),
            ],
        };
        let request = request(30, false);

        let first = negotiate(&capability, &request).unwrap();
        let second = negotiate(&capability, &request).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.video.frame_rate, FrameRateRange::new(1, 30));
    }

    #[test]
    fn negotiation_names_the_missing_stream() {
        let capability = OutputCapability {
            preview_profiles: vec![],
            video_profiles: vec![video(PixelFormat::Yuv420Sp, FHD, 1, 30)],
        };
        let err = negotiate(&capability, &request(30, false)).unwrap_err();
        assert_eq!(err.stream, StreamKind::Preview);

        let err = negotiate(&OutputCapability::default(), &request(30, true)).unwrap_err();
        assert_eq!(err.stream, StreamKind::Video);
        assert!(err.hdr);
    }

    #[test]
    fn error_display() {
        let err = ProfileNotFound {
            stream: StreamKind::Video,
            size: FHD,
            frame_rate: 60,
            hdr: true,
        };
        assert_eq!(err.to_string(), "No video profile matches 1920x1080 @ 60 fps (HDR)");
    }
}
