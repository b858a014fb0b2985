//! Recording runner

use std::collections::VecDeque;
use std::env;
use std::future;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::{interval_at, sleep, Instant};
use tracing::debug;

use crate::application::ports::{ConfigStore, Notifier};
use crate::application::{FacadeConfig, SessionError, SessionFacade};
use crate::domain::config::AppConfig;
use crate::domain::recording::{OutputTarget, RecordingLimit, RecordingRequest};
use crate::infrastructure::{create_notifier, FileOutputs, SimulatedCamera, XdgConfigStore};

use super::args::RecordOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Per-call latency of the simulated camera driver
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(30);

/// Gap between `--zoom` steps
pub const ZOOM_STEP_INTERVAL: Duration = Duration::from_secs(1);

const PREVIEW_SURFACE: &str = "camcorder-preview";
const ENCODER_SURFACE: &str = "camcorder-encoder";

/// Why the recording loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    LimitReached,
    Interrupted,
}

impl StopReason {
    fn as_str(&self) -> &'static str {
        match self {
            Self::LimitReached => "time limit reached",
            Self::Interrupted => "stopped by user",
        }
    }
}

type Facade = SessionFacade<SimulatedCamera, FileOutputs, Box<dyn Notifier>>;

/// Record until the limit elapses or the user interrupts
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.setup() {
        presenter.error(&format!("Failed to setup signal handler: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    let camera = Arc::new(SimulatedCamera::new().with_latency(SIMULATED_LATENCY));
    let facade: Facade = SessionFacade::new(
        camera,
        Arc::new(FileOutputs::new()),
        create_notifier(options.notify),
        FacadeConfig {
            stabilization: options.stabilization,
            enable_notify: true,
        },
    );

    let target = OutputTarget {
        preview_surface: PREVIEW_SURFACE.to_string(),
        encoder_surface: ENCODER_SURFACE.to_string(),
        path: output_path(&options.output_dir, Local::now()),
    };
    let request = RecordingRequest::new(
        options.resolution,
        options.frame_rate,
        options.hdr,
        options.codec,
        target.clone(),
    );

    if let Err(code) = start(&facade, request, &presenter).await {
        return code;
    }

    let initial = *facade.subscribe_elapsed().borrow();
    let status = presenter.format_recording(initial, options.limit, None);
    presenter.start_spinner(&status);
    let reason = record_loop(&facade, &shutdown, &presenter, &options).await;

    let elapsed = facade.elapsed_time_text();
    match facade.stop_recording().await {
        Ok(report) => {
            presenter.spinner_success(&format!("Recorded {} ({})", elapsed, reason.as_str()));
            for warning in &report.warnings {
                presenter.warn(&warning.to_string());
            }
            presenter.output(&target.path.display().to_string());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail(&e.user_message());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Start recording, falling back to the default request once when the
/// camera has no matching profiles
async fn start(
    facade: &Facade,
    request: RecordingRequest,
    presenter: &Presenter,
) -> Result<(), ExitCode> {
    presenter.info(&format!("Requesting {}", request));

    let first = facade.start_recording(request).await;
    let profiles = match first {
        Ok(profiles) => profiles,
        Err(SessionError::ProfileNotFound(missing)) => {
            presenter.warn(&format!("{}; falling back to defaults", missing));
            let fallback = facade
                .capture_config()
                .ok_or_else(|| ExitCode::from(EXIT_ERROR))?;
            presenter.info(&format!("Requesting {}", fallback));
            facade
                .start_recording(fallback)
                .await
                .map_err(|e| report_failure(presenter, &e))?
        }
        Err(e) => return Err(report_failure(presenter, &e)),
    };

    presenter.success(&format!(
        "Preview {} | Video {}",
        profiles.preview, profiles.video
    ));
    Ok(())
}

async fn record_loop(
    facade: &Facade,
    shutdown: &ShutdownSignal,
    presenter: &Presenter,
    options: &RecordOptions,
) -> StopReason {
    let mut clock = facade.subscribe_elapsed();
    let mut zoom_steps: VecDeque<f64> = options.zoom_steps.iter().copied().collect();
    let mut zoom_tick = interval_at(Instant::now() + ZOOM_STEP_INTERVAL, ZOOM_STEP_INTERVAL);
    let mut zoom_ratio: Option<f64> = None;

    let deadline = until_limit(options.limit);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => return StopReason::LimitReached,
            _ = shutdown.wait() => return StopReason::Interrupted,
            Ok(()) = clock.changed() => {
                let now = *clock.borrow_and_update();
                presenter.update_recording(now, options.limit, zoom_ratio);
            }
            _ = zoom_tick.tick(), if !zoom_steps.is_empty() => {
                if let Some(scale) = zoom_steps.pop_front() {
                    let applied = facade.on_zoom_gesture(scale);
                    zoom_ratio = facade.on_zoom_gesture_end().or(zoom_ratio);
                    debug!(scale, ?applied, ?zoom_ratio, "Zoom step");
                    presenter.update_recording(*clock.borrow(), options.limit, zoom_ratio);
                }
            }
        }
    }
}

async fn until_limit(limit: Option<RecordingLimit>) {
    match limit {
        Some(limit) => sleep(limit.as_std()).await,
        None => future::pending().await,
    }
}

fn report_failure(presenter: &Presenter, err: &SessionError) -> ExitCode {
    presenter.error(&err.user_message());
    match err {
        SessionError::InvalidRequest(_) => ExitCode::from(EXIT_USAGE_ERROR),
        _ => ExitCode::from(EXIT_ERROR),
    }
}

/// `<dir>/VID_<yyyymmdd_hhmmss>.mp4`
pub fn output_path(dir: &Path, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("VID_{}.mp4", now.format("%Y%m%d_%H%M%S")))
}

/// The user's video directory, or the working directory, plus `camcorder`
pub fn default_output_dir() -> PathBuf {
    dirs::video_dir()
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
        .join("camcorder")
}

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            debug!(error = %e, "Ignoring unreadable config file");
            AppConfig::empty()
        }
    };

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Resolve recording options from the merged config
pub fn record_options(
    config: &AppConfig,
    limit: Option<RecordingLimit>,
    zoom_steps: Vec<f64>,
) -> RecordOptions {
    RecordOptions {
        resolution: config.resolution_or_default(),
        frame_rate: config.frame_rate_or_default(),
        hdr: config.hdr_or_default(),
        codec: config.codec_or_default(),
        limit,
        zoom_steps,
        output_dir: config.output_dir().unwrap_or_else(default_output_dir),
        stabilization: config.stabilization_or_default(),
        notify: config.notify_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::domain::recording::{Resolution, VideoCodec};

    #[test]
    fn output_path_uses_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let path = output_path(Path::new("/videos"), now);
        assert_eq!(path, PathBuf::from("/videos/VID_20240309_140507.mp4"));
    }

    #[test]
    fn default_output_dir_ends_with_app_dir() {
        assert!(default_output_dir().ends_with("camcorder"));
    }

    #[test]
    fn record_options_from_defaults() {
        let options = record_options(&AppConfig::defaults(), None, Vec::new());
        assert_eq!(options.resolution, Resolution::Fhd1080p);
        assert_eq!(options.frame_rate, 30);
        assert!(!options.hdr);
        assert_eq!(options.codec, VideoCodec::Avc);
        assert!(options.stabilization);
        assert!(!options.notify);
        assert_eq!(options.output_dir, default_output_dir());
    }

    #[test]
    fn record_options_honour_overrides() {
        let config = AppConfig::defaults().merge(AppConfig {
            resolution: Some("4k".to_string()),
            frame_rate: Some(60),
            hdr: Some(true),
            codec: Some("hevc".to_string()),
            output_dir: Some("/tmp/clips".to_string()),
            ..AppConfig::empty()
        });
        let limit = RecordingLimit::from_secs(10);
        let options = record_options(&config, limit, vec![2.0]);

        assert_eq!(options.resolution, Resolution::Uhd4k);
        assert_eq!(options.frame_rate, 60);
        assert!(options.hdr);
        assert_eq!(options.codec, VideoCodec::Hevc);
        assert_eq!(options.limit, limit);
        assert_eq!(options.zoom_steps, vec![2.0]);
        assert_eq!(options.output_dir, PathBuf::from("/tmp/clips"));
    }

    #[test]
    fn stop_reasons_read_naturally() {
        assert_eq!(StopReason::LimitReached.as_str(), "time limit reached");
        assert_eq!(StopReason::Interrupted.as_str(), "stopped by user");
    }
}
