//! Profiles command handler

use colored::Colorize;
use serde::Serialize;
use thiserror::Error;

use crate::application::ports::CameraManager;
use crate::application::SessionError;
use crate::domain::camera::{
    negotiate, CameraDevice, NegotiatedProfiles, OutputCapability, SceneMode,
};
use crate::domain::recording::RecordingRequest;
use crate::domain::session::Operation;

use super::presenter::Presenter;

/// Profiles command failures
#[derive(Debug, Error)]
pub enum ProfilesError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ProfilesError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Session(err) => err.user_message(),
            Self::Encode(_) => self.to_string(),
        }
    }
}

/// What the first camera offers and what a request negotiates to
#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    pub device: CameraDevice,
    pub request: String,
    pub capability: OutputCapability,
    pub negotiated: Option<NegotiatedProfiles>,
    /// Why negotiation failed, when it did
    pub mismatch: Option<String>,
}

/// Query the first camera's video-mode capability and negotiate `request` against it
pub async fn inspect_profiles<M: CameraManager>(
    camera: &M,
    request: &RecordingRequest,
) -> Result<ProfileReport, SessionError> {
    request.validate()?;

    let device = camera
        .enumerate_devices()
        .await
        .map_err(|e| SessionError::DeviceUnavailable {
            reason: e.to_string(),
        })?
        .into_iter()
        .next()
        .ok_or_else(|| SessionError::DeviceUnavailable {
            reason: "no camera devices found".to_string(),
        })?;

    if !camera
        .supported_scene_modes(&device)
        .contains(&SceneMode::NormalVideo)
    {
        return Err(SessionError::DeviceUnavailable {
            reason: format!("{} does not support {}", device, SceneMode::NormalVideo),
        });
    }

    let capability = camera
        .output_capability(&device, SceneMode::NormalVideo)
        .map_err(|e| SessionError::Hardware {
            operation: Operation::QueryCapability,
            reason: e.to_string(),
        })?;

    let (negotiated, mismatch) = match negotiate(&capability, request) {
        Ok(profiles) => (Some(profiles), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(ProfileReport {
        device,
        request: request.to_string(),
        capability,
        negotiated,
        mismatch,
    })
}

/// Handle profiles subcommand
pub async fn handle_profiles_command<M: CameraManager>(
    camera: &M,
    request: &RecordingRequest,
    json: bool,
    presenter: &Presenter,
) -> Result<(), ProfilesError> {
    let report = inspect_profiles(camera, request).await?;

    if json {
        presenter.output(&to_json(&report)?);
        return Ok(());
    }

    presenter.key_value("device", &report.device.to_string());
    presenter.output(&format!("{}", "Preview profiles".bold()));
    for profile in &report.capability.preview_profiles {
        presenter.output(&format!("  {}", profile));
    }
    presenter.output(&format!("{}", "Video profiles".bold()));
    for profile in &report.capability.video_profiles {
        presenter.output(&format!("  {}", profile));
    }

    presenter.key_value("request", &report.request);
    match (&report.negotiated, &report.mismatch) {
        (Some(profiles), _) => {
            presenter.key_value("preview", &profiles.preview.to_string());
            presenter.key_value("video", &profiles.video.to_string());
        }
        (None, Some(reason)) => presenter.warn(reason),
        (None, None) => {}
    }

    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ProfilesError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use crate::domain::camera::{FrameRateRange, PixelFormat, StreamKind};
    use crate::domain::recording::{OutputTarget, Resolution, VideoCodec};
    use crate::infrastructure::SimulatedCamera;

    fn request(resolution: Resolution, frame_rate: u32, hdr: bool) -> RecordingRequest {
        let codec = if hdr { VideoCodec::Hevc } else { VideoCodec::Avc };
        RecordingRequest::new(
            resolution,
            frame_rate,
            hdr,
            codec,
            OutputTarget {
                preview_surface: "preview".to_string(),
                encoder_surface: "encoder".to_string(),
                path: PathBuf::from("clip.mp4"),
            },
        )
    }

    #[tokio::test]
    async fn reports_negotiated_pair() {
        let camera = SimulatedCamera::new();
        let report = inspect_profiles(&camera, &request(Resolution::Fhd1080p, 30, true))
            .await
            .unwrap();

        let profiles = report.negotiated.unwrap();
        assert_eq!(profiles.video.format, PixelFormat::video_format(true));
        assert!(report.mismatch.is_none());
        assert!(!report.capability.video_profiles.is_empty());
    }

    #[tokio::test]
    async fn reports_mismatch_without_failing() {
        let camera = SimulatedCamera::with_capability(SimulatedCamera::sdr_only_capability());
        let report = inspect_profiles(&camera, &request(Resolution::Fhd1080p, 30, true))
            .await
            .unwrap();

        assert!(report.negotiated.is_none());
        let reason = report.mismatch.unwrap();
        assert!(reason.contains(StreamKind::Video.as_str()), "{reason}");
    }

    #[tokio::test]
    async fn sixty_fps_needs_fixed_range() {
        let camera = SimulatedCamera::with_capability(SimulatedCamera::sdr_only_capability());
        let report = inspect_profiles(&camera, &request(Resolution::Hd720p, 60, false))
            .await
            .unwrap();

        let video = report.negotiated.unwrap().video;
        assert_eq!(video.frame_rate, FrameRateRange::fixed(60));
    }

    #[tokio::test]
    async fn no_camera_is_an_error() {
        let camera = SimulatedCamera::without_devices();
        let err = inspect_profiles(&camera, &request(Resolution::Fhd1080p, 30, false))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::DeviceUnavailable { .. }));
    }

    #[tokio::test]
    async fn report_serializes_to_json() {
        let camera = SimulatedCamera::new();
        let report = inspect_profiles(&camera, &request(Resolution::Fhd1080p, 30, false))
            .await
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["negotiated"]["video"].is_object());
        assert!(json["mismatch"].is_null());
    }

    #[test]
    fn encode_failure_is_an_error() {
        let unencodable = BTreeMap::from([(vec![1u8], 1u8)]);
        let err = to_json(&unencodable).unwrap_err();
        assert!(matches!(err, ProfilesError::Encode(_)));
        assert!(err.user_message().starts_with("Failed to encode report"));
    }

    #[tokio::test]
    async fn session_errors_keep_their_user_message() {
        let camera = SimulatedCamera::without_devices();
        let err = handle_profiles_command(
            &camera,
            &request(Resolution::Fhd1080p, 30, false),
            true,
            &Presenter::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ProfilesError::Session(SessionError::DeviceUnavailable { .. })
        ));
        assert!(err.user_message().starts_with("No usable camera"));
    }
}
