//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::config::AppConfig;
use crate::domain::recording::{RecordingLimit, Resolution, VideoCodec};

/// Camcorder - camera recording session orchestrator
#[derive(Parser, Debug)]
#[command(name = "camcorder")]
#[command(version)]
#[command(about = "Record video from the camera with negotiated capture profiles")]
#[command(long_about = None)]
pub struct Cli {
    /// Resolution preset
    #[arg(short = 'r', long, value_name = "PRESET", global = true)]
    pub resolution: Option<ResolutionArg>,

    /// Frame rate in frames per second (30 or 60)
    #[arg(
        short = 'f',
        long = "fps",
        value_name = "FPS",
        global = true,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub frame_rate: Option<u32>,

    /// Record in HDR (requires --codec hevc)
    #[arg(long, global = true)]
    pub hdr: bool,

    /// Record in SDR even if the config file enables HDR
    #[arg(long, global = true, conflicts_with = "hdr")]
    pub no_hdr: bool,

    /// Video codec
    #[arg(short = 'c', long, value_name = "CODEC", global = true)]
    pub codec: Option<CodecArg>,

    /// Stop after this long (e.g., 30s, 5m, 1h, 2m30s). Runs until Ctrl-C otherwise
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Pinch scale to apply, one per second (repeatable, e.g. --zoom 2 --zoom 0.5)
    #[arg(
        short = 'z',
        long = "zoom",
        value_name = "SCALE",
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    pub zoom_steps: Vec<f64>,

    /// Directory the recording is written to
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Do not enable video stabilization
    #[arg(long)]
    pub no_stabilization: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Settings given on the command line, for merging over the config file
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            resolution: self
                .resolution
                .map(|r| Resolution::from(r).as_str().to_string()),
            frame_rate: self.frame_rate,
            hdr: match (self.hdr, self.no_hdr) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            },
            codec: self.codec.map(|c| VideoCodec::from(c).as_str().to_string()),
            stabilization: self.no_stabilization.then_some(false),
            output_dir: self
                .output
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            notify: self.notify.then_some(true),
            log_level: None,
        }
    }

    /// Parsed `--duration`, if given
    pub fn limit(&self) -> Result<Option<RecordingLimit>, String> {
        self.duration
            .as_deref()
            .map(|s| s.parse::<RecordingLimit>().map_err(|e| e.to_string()))
            .transpose()
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show the camera's profiles and what a request negotiates to
    Profiles {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Resolution argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ResolutionArg {
    #[value(name = "4k")]
    Uhd4k,
    #[value(name = "1080p")]
    Fhd1080p,
    #[value(name = "720p")]
    Hd720p,
}

impl From<ResolutionArg> for Resolution {
    fn from(arg: ResolutionArg) -> Self {
        match arg {
            ResolutionArg::Uhd4k => Resolution::Uhd4k,
            ResolutionArg::Fhd1080p => Resolution::Fhd1080p,
            ResolutionArg::Hd720p => Resolution::Hd720p,
        }
    }
}

/// Codec argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CodecArg {
    Avc,
    Hevc,
}

impl From<CodecArg> for VideoCodec {
    fn from(arg: CodecArg) -> Self {
        match arg {
            CodecArg::Avc => VideoCodec::Avc,
            CodecArg::Hevc => VideoCodec::Hevc,
        }
    }
}

/// Parsed recording options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub resolution: Resolution,
    pub frame_rate: u32,
    pub hdr: bool,
    pub codec: VideoCodec,
    pub limit: Option<RecordingLimit>,
    pub zoom_steps: Vec<f64>,
    pub output_dir: PathBuf,
    pub stabilization: bool,
    pub notify: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "resolution",
    "frame_rate",
    "hdr",
    "codec",
    "stabilization",
    "output_dir",
    "notify",
    "log_level",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["camcorder"]);
        assert!(cli.resolution.is_none());
        assert!(cli.frame_rate.is_none());
        assert!(!cli.hdr);
        assert!(cli.codec.is_none());
        assert!(cli.duration.is_none());
        assert!(cli.zoom_steps.is_empty());
        assert!(!cli.notify);
        assert!(!cli.no_stabilization);
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_request_flags() {
        let cli = Cli::parse_from([
            "camcorder", "-r", "4k", "--fps", "60", "--hdr", "-c", "hevc",
        ]);
        assert_eq!(cli.resolution, Some(ResolutionArg::Uhd4k));
        assert_eq!(cli.frame_rate, Some(60));
        assert!(cli.hdr);
        assert_eq!(cli.codec, Some(CodecArg::Hevc));
    }

    #[test]
    fn cli_rejects_zero_fps() {
        assert!(Cli::try_parse_from(["camcorder", "--fps", "0"]).is_err());
    }

    #[test]
    fn cli_parses_zoom_steps() {
        let cli = Cli::parse_from(["camcorder", "--zoom", "2", "-z", "0.5,1.5"]);
        assert_eq!(cli.zoom_steps, vec![2.0, 0.5, 1.5]);
    }

    #[test]
    fn cli_parses_duration() {
        let cli = Cli::parse_from(["camcorder", "-d", "2m30s"]);
        assert_eq!(cli.limit().unwrap().map(|l| l.as_secs()), Some(150));

        let cli = Cli::parse_from(["camcorder", "-d", "soon"]);
        assert!(cli.limit().is_err());
    }

    #[test]
    fn cli_parses_profiles_with_request_flags() {
        let cli = Cli::parse_from(["camcorder", "profiles", "--hdr", "-c", "hevc", "--json"]);
        assert!(matches!(cli.command, Some(Commands::Profiles { json: true })));
        assert!(cli.hdr);
        assert_eq!(cli.codec, Some(CodecArg::Hevc));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["camcorder", "config", "set", "codec", "hevc"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "codec");
            assert_eq!(value, "hevc");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn unset_flags_do_not_override_config() {
        let config = Cli::parse_from(["camcorder"]).to_config();
        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn set_flags_become_config_values() {
        let config = Cli::parse_from([
            "camcorder",
            "-r",
            "720p",
            "--no-stabilization",
            "-n",
            "-o",
            "/tmp/clips",
        ])
        .to_config();
        assert_eq!(config.resolution.as_deref(), Some("720p"));
        assert_eq!(config.stabilization, Some(false));
        assert_eq!(config.notify, Some(true));
        assert_eq!(config.output_dir.as_deref(), Some("/tmp/clips"));
        assert_eq!(config.hdr, None);
    }

    #[test]
    fn no_hdr_overrides_config_file() {
        let cli = Cli::parse_from(["camcorder", "--no-hdr"]);
        assert_eq!(cli.to_config().hdr, Some(false));

        let file = AppConfig {
            hdr: Some(true),
            ..AppConfig::empty()
        };
        let merged = AppConfig::defaults().merge(file).merge(cli.to_config());
        assert!(!merged.hdr_or_default());
    }

    #[test]
    fn hdr_and_no_hdr_conflict() {
        assert!(Cli::try_parse_from(["camcorder", "--hdr", "--no-hdr"]).is_err());
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("resolution"));
        assert!(is_valid_config_key("log_level"));
        assert!(!is_valid_config_key("api_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
