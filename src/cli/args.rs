//! CLI argument parsing with clap.

use clap::{ArgAction, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::capture::NamingRequest;
use crate::configure::DeviceSettings;
use crate::histogram::HistogramOptions;
use crate::normalize::{parse_flag, parse_rotation, parse_setting, RotationMode, Setting};
use crate::pipeline::CaptureRequest;

/// Value of `--snapshot`/`--directory` meaning "not given".
pub const UNSET_SENTINEL: &str = "False";

/// Multi-letter single-dash flags and the long flags they stand for.
const LEGACY_FLAGS: &[(&str, &str)] = &[
    ("-fps", "--frames"),
    ("-fh", "--fliph"),
    ("-fv", "--flipv"),
    ("-hist", "--histogram"),
    ("-ga", "--gaussian"),
    ("-rt", "--rotate"),
];

/// Configure a RayCi beam profiler camera and take a snapshot
#[derive(Parser, Debug)]
#[command(name = "rayci-snap")]
#[command(version, about = "Configure a RayCi camera and take a snapshot", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Manual exposure, automatic gain, save to /tmp/test.png
    rayci-snap --exposure 2.0 --gain auto --snapshot test.png --directory /tmp

    # Random file name in the default directory, with a Gaussian histogram
    rayci-snap -r true -hist true -ga true

    # Rotate left and flip vertically
    rayci-snap -s beam.png -rt left -fv true")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Exposure time: 'auto' or a value such as 2.0 (rounded by RayCi)
    #[arg(short, long, default_value = "auto", value_parser = parse_setting)]
    pub exposure: Setting<f64>,

    /// Gain: 'auto' or a factor such as 2.5 (rounded by RayCi)
    #[arg(short, long, default_value = "auto", value_parser = parse_setting)]
    pub gain: Setting<f64>,

    /// Frame rate in frames per second: 'auto' or a value, alias -fps
    #[arg(long, default_value = "auto", value_parser = parse_setting)]
    pub frames: Setting<f64>,

    /// Reduce the pixel clock (true/false)
    #[arg(short = 'c', long, default_value = "False", value_parser = parse_flag, action = ArgAction::Set)]
    pub clock: bool,

    /// File name to save the picture as; existing files are overwritten
    #[arg(short, long)]
    pub snapshot: Option<String>,

    /// Directory to save the picture to (default: configured directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Generate a random file name when --snapshot is not given (true/false)
    #[arg(short, long, default_value = "False", value_parser = parse_flag, action = ArgAction::Set)]
    pub random: bool,

    /// Flip the image horizontally (true/false), alias -fh
    #[arg(long, default_value = "False", value_parser = parse_flag, action = ArgAction::Set)]
    pub fliph: bool,

    /// Flip the image vertically (true/false), alias -fv
    #[arg(long, default_value = "False", value_parser = parse_flag, action = ArgAction::Set)]
    pub flipv: bool,

    /// Rotation: 'False' for none, 'left'/'l' or 'right'/'r', alias -rt
    #[arg(long, default_value = "False", value_parser = parse_rotation)]
    pub rotate: RotationMode,

    /// Also export the cross-section histogram (true/false), alias -hist
    #[arg(long, default_value = "False", value_parser = parse_flag, action = ArgAction::Set)]
    pub histogram: bool,

    /// Use a Gaussian fit in the histogram (true/false), alias -ga
    #[arg(long, default_value = "False", value_parser = parse_flag, action = ArgAction::Set)]
    pub gaussian: bool,

    /// RayCi server URL (overrides the config file)
    #[arg(long)]
    pub server: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log requests to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the cameras RayCi knows about
    ListCameras,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Create default config file
    Init,
}

impl Args {
    /// Parse process arguments, accepting the multi-letter short flags.
    pub fn parse_with_legacy_flags() -> Self {
        Self::parse_from(expand_legacy_flags(std::env::args_os()))
    }

    /// Snapshot name, treating the `False` sentinel as absent.
    pub fn snapshot_name(&self) -> Option<&str> {
        self.snapshot
            .as_deref()
            .filter(|name| *name != UNSET_SENTINEL)
    }

    /// Target directory, treating the `False` sentinel as absent.
    pub fn target_directory(&self) -> Option<&PathBuf> {
        self.directory
            .as_ref()
            .filter(|dir| dir.as_os_str() != UNSET_SENTINEL)
    }

    pub fn capture_request(&self) -> CaptureRequest {
        CaptureRequest {
            settings: DeviceSettings {
                exposure: self.exposure,
                gain: self.gain,
                frame_rate: self.frames,
                reduce_pixel_clock: self.clock,
                flip_horizontal: self.fliph,
                flip_vertical: self.flipv,
                rotation: self.rotate,
            },
            naming: NamingRequest {
                random: self.random,
                directory: self.target_directory().cloned(),
                snapshot: self.snapshot_name().map(str::to_string),
            },
            histogram: self.histogram.then_some(HistogramOptions {
                gaussian: self.gaussian,
            }),
        }
    }
}

/// Rewrite `-fps`, `-fh`, `-fv`, `-hist`, `-ga` and `-rt` to their long
/// forms. clap would otherwise read `-rt` as `-r t`.
pub fn expand_legacy_flags<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut expanded = Vec::new();
    let mut passthrough = false;

    for arg in args.into_iter().map(Into::into) {
        if passthrough {
            expanded.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            expanded.push(arg);
            continue;
        }

        let rewritten = arg.to_str().and_then(|s| {
            LEGACY_FLAGS.iter().find_map(|(short, long)| {
                if s == *short {
                    Some(OsString::from(*long))
                } else {
                    s.strip_prefix(short)
                        .and_then(|rest| rest.strip_prefix('='))
                        .map(|value| OsString::from(format!("{}={}", long, value)))
                }
            })
        });
        expanded.push(rewritten.unwrap_or(arg));
    }
    expanded
}
