use crate::error::ConfigError;
use crate::input::MAX_AXES;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Reads discarded before timing starts, lets the device settle
pub const DEFAULT_WARMUP_SAMPLES: u64 = 100;

/// Command line of the `joyrate` binary.
#[derive(Debug, Parser)]
#[command(name = "joyrate", version)]
#[command(about = "Measure how fast a joystick event device reports samples")]
pub struct Args {
    /// Joystick event device, e.g. /dev/input/event7
    pub device: PathBuf,

    /// Stop after this many samples (0 or absent runs until interrupted)
    pub max_samples: Option<u64>,

    /// Samples read and discarded before timing starts
    #[arg(long, default_value_t = DEFAULT_WARMUP_SAMPLES)]
    pub warmup: u64,

    /// First axis code of the effective-sample rule
    #[arg(long, default_value_t = 0)]
    pub x_axis: usize,

    /// Second axis code of the effective-sample rule
    #[arg(long, default_value_t = 1)]
    pub y_axis: usize,

    /// Give up when the device is silent for this long (0 or absent blocks forever)
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Play a rumble after opening, as <weak>,<strong>
    #[arg(long, value_name = "WEAK,STRONG")]
    pub rumble: Option<String>,

    /// Print reports as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Validated settings for one measuring run.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub device: PathBuf,
    /// `None` runs until the device fails
    pub max_samples: Option<u64>,
    pub warmup_samples: u64,
    pub tracked_axes: (usize, usize),
    pub read_timeout: Option<Duration>,
    pub rumble: Option<(i16, i16)>,
    pub output: OutputFormat,
}

impl SessionConfig {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
            max_samples: None,
            warmup_samples: DEFAULT_WARMUP_SAMPLES,
            tracked_axes: (0, 1),
            read_timeout: None,
            rumble: None,
            output: OutputFormat::Text,
        }
    }
}

impl TryFrom<Args> for SessionConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        for axis in [args.x_axis, args.y_axis] {
            if axis >= MAX_AXES {
                return Err(ConfigError::InvalidAxis(axis));
            }
        }
        if args.x_axis == args.y_axis {
            return Err(ConfigError::DuplicateAxis(args.x_axis));
        }

        let rumble = args.rumble.as_deref().map(parse_rumble).transpose()?;

        Ok(Self {
            device: args.device,
            // 0 means no limit
            max_samples: args.max_samples.filter(|&limit| limit != 0),
            warmup_samples: args.warmup,
            tracked_axes: (args.x_axis, args.y_axis),
            read_timeout: args
                .timeout_ms
                .filter(|&ms| ms != 0)
                .map(Duration::from_millis),
            rumble,
            output: if args.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
        })
    }
}

pub fn parse_rumble(value: &str) -> Result<(i16, i16), ConfigError> {
    let invalid = || ConfigError::InvalidRumble(value.to_string());
    let (weak, strong) = value.split_once(',').ok_or_else(invalid)?;
    let weak = weak.trim().parse().map_err(|_| invalid())?;
    let strong = strong.trim().parse().map_err(|_| invalid())?;
    Ok((weak, strong))
}
