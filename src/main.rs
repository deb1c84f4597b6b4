//! # RC HID
//!
//! Drive an RC transmitter from a Logitech G29 steering wheel.
//!
//! This application reads the wheel, scales steering, pedals and buttons into
//! calibrated channel values, and sends one frame per tick to the transmitter
//! over a serial link.

use std::path::Path;

use anyhow::Result;
use tokio::sync::watch;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rc_hid::config::{Config, LoggingConfig};
use rc_hid::error::RcHidError;
use rc_hid::serial::{spawn_echo_reader, LinkSerial};
use rc_hid::telemetry::TelemetryLogger;
use rc_hid::wheel::g29::G29Wheel;
use rc_hid::wheel::{ChannelMapper, WheelState};

/// Config file used when no path is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// File name prefix of the daily rolling log
const LOG_FILE_NAME: &str = "rc-hid.log";

/// Main entry point for RC HID application
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (first CLI argument or `config/default.toml`)
///    - Set up logging with tracing subscriber
///    - Open the wheel and start its reader thread
///    - Open the serial link and start echoing receiver output
///
/// 2. **Main Loop**
///    - Every `output.tick_ms`: map wheel state, encode, send
///    - Record telemetry when enabled
///    - Log status every `output.status_interval_ticks` frames
///
/// 3. **Shutdown**
///    - Ctrl+C stops the loop cleanly
///    - A disconnected wheel ends the loop with an error
///
/// # Errors
///
/// Returns error if:
/// - The configuration cannot be loaded or is invalid
/// - No wheel or serial device can be opened
/// - The wheel disconnects while running
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO rc_hid: RC HID v0.1.0 starting...
/// INFO rc_hid::wheel::g29: Opened G29 wheel at /dev/input/event5
/// INFO rc_hid::serial: Opened serial port /dev/ttyUSB0 at 115200 baud
/// INFO rc_hid: Sent 1000 frames: steering=1830 throttle=1925 aux=2047
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config(std::env::args().nth(1), Path::new(DEFAULT_CONFIG_PATH))?;
    let _log_guard = init_logging(&config.logging);

    info!("RC HID v{} starting...", env!("CARGO_PKG_VERSION"));

    run(config).await
}

/// Load the config at `arg`, or the default path, or built-in defaults
fn load_config(arg: Option<String>, default_path: &Path) -> Result<Config> {
    let config = match arg {
        Some(path) => Config::load(path)?,
        None if default_path.exists() => Config::load(default_path)?,
        None => Config::default(),
    };
    Ok(config)
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. The returned guard must be
/// held until exit so buffered file output is flushed.
fn init_logging(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter).with(fmt::layer());

    if logging.file_dir.is_empty() {
        registry.init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&logging.file_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    registry
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Some(guard)
}

async fn run(config: Config) -> Result<()> {
    let mut mapper = ChannelMapper::from_config(&config)?;
    let field_names: Vec<String> = mapper.field_names().into_iter().map(str::to_string).collect();

    let wheel = G29Wheel::open(&config.wheel.device_path)?;
    let (state_tx, mut state_rx) = watch::channel(WheelState::default());
    std::thread::Builder::new()
        .name("wheel-reader".to_string())
        .spawn(move || {
            if let Err(e) = wheel.run(state_tx) {
                error!("Wheel reader stopped: {}", e);
            }
        })?;

    let (link, reader) = LinkSerial::open(&config.serial.port, config.serial.baud_rate)?;
    let mut link = link.with_write_timeout(Duration::from_millis(config.serial.timeout_ms));
    let echo = spawn_echo_reader(reader);

    let mut telemetry = if config.telemetry.enabled {
        Some(TelemetryLogger::new(&config.telemetry)?)
    } else {
        None
    };

    let mut ticker = interval(Duration::from_millis(config.output.tick_ms));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("Starting output loop every {} ms", config.output.tick_ms);
    info!("Press Ctrl+C to exit");

    let mut tick: u64 = 0;
    let mut last_status: u64 = 0;

    let outcome = loop {
        tokio::select! {
            _ = ticker.tick() => {
                if state_rx.has_changed().is_err() {
                    break Err(RcHidError::Wheel("Wheel disconnected".to_string()));
                }
                let state = state_rx.borrow_and_update().clone();
                let frame = mapper.map(&state);
                tick += 1;

                if let Some(logger) = telemetry.as_mut() {
                    if let Err(e) = logger.record(tick, &state, &frame) {
                        warn!("{}", e);
                    }
                }

                if let Err(e) = link.send_frame(&frame).await {
                    debug!("Failed to send frame: {}", e);
                    continue;
                }

                if tick - last_status >= config.output.status_interval_ticks {
                    info!("Sent {} frames: {}", link.frames_sent(), describe(&field_names, &frame.channels));
                    last_status = tick;
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break Ok(());
            }
        }
    };

    echo.abort();
    if let Some(logger) = telemetry.as_mut() {
        logger.flush()?;
    }
    info!("Total frames sent: {}", link.frames_sent());

    outcome.map_err(Into::into)
}

/// Format `name=value` pairs for the status line
fn describe(names: &[String], values: &[u16]) -> String {
    names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(" ")
}
