//! # Logitech G29 Wheel Module
//!
//! Detects and reads the G29 racing wheel through the Linux evdev interface.
//!
//! ## Wheel Detection
//!
//! The G29 is identified by:
//! - Vendor ID: 0x046d (Logitech)
//! - Product ID: 0xc24f (G29, PS3/PS4 mode)

use evdev::Device;
use std::path::Path;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::mapper::EventMapper;
use super::state::WheelState;
use crate::error::{RcHidError, Result};

/// Logitech vendor ID
pub const G29_VENDOR_ID: u16 = 0x046d;

/// G29 product ID
pub const G29_PRODUCT_ID: u16 = 0xc24f;

/// Directory scanned for event devices
const INPUT_DIR: &str = "/dev/input";

/// Returns `true` if the IDs belong to a G29.
#[must_use]
pub fn is_g29(vendor: u16, product: u16) -> bool {
    vendor == G29_VENDOR_ID && product == G29_PRODUCT_ID
}

/// Open G29 wheel handle
pub struct G29Wheel {
    device: Device,
    device_path: String,
}

impl G29Wheel {
    /// Open the wheel
    ///
    /// With an empty `device_path`, scans `/dev/input/event*` in sorted order
    /// and opens the first device matching the G29 IDs. Otherwise opens the
    /// given node directly.
    ///
    /// # Errors
    ///
    /// - `WheelNotFound`: No G29 found during the scan
    /// - `Wheel`: The input directory or the given device could not be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rc_hid::wheel::g29::G29Wheel;
    ///
    /// let wheel = G29Wheel::open("")?;
    /// println!("Connected to wheel at: {}", wheel.device_path());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(device_path: &str) -> Result<Self> {
        if device_path.is_empty() {
            return Self::scan(Path::new(INPUT_DIR));
        }

        let device = Device::open(device_path)
            .map_err(|e| RcHidError::Wheel(format!("Failed to open {}: {}", device_path, e)))?;

        let id = device.input_id();
        if !is_g29(id.vendor(), id.product()) {
            warn!(
                "{} is not a G29 (vendor: 0x{:04x}, product: 0x{:04x}), using it anyway",
                device_path,
                id.vendor(),
                id.product()
            );
        }

        info!("Opened wheel at: {}", device_path);
        Ok(Self {
            device,
            device_path: device_path.to_string(),
        })
    }

    fn scan(input_dir: &Path) -> Result<Self> {
        if !input_dir.exists() {
            return Err(RcHidError::Wheel(format!(
                "{} directory not found",
                input_dir.display()
            )));
        }

        let mut entries: Vec<_> = std::fs::read_dir(input_dir)
            .map_err(|e| RcHidError::Wheel(format!("Failed to read {}: {}", input_dir.display(), e)))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| RcHidError::Wheel(format!("Failed to read directory entry: {}", e)))?;

        // Deterministic pick when several wheels are attached
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();

            let is_event_node = path
                .file_name()
                .map(|name| name.to_string_lossy().starts_with("event"))
                .unwrap_or(false);
            if !is_event_node {
                continue;
            }

            match Device::open(&path) {
                Ok(device) => {
                    let id = device.input_id();
                    debug!(
                        "Found input device: {} (vendor: 0x{:04x}, product: 0x{:04x})",
                        path.display(),
                        id.vendor(),
                        id.product()
                    );

                    if is_g29(id.vendor(), id.product()) {
                        let device_path = path.to_string_lossy().to_string();
                        info!("Found Logitech G29 at: {}", device_path);
                        return Ok(Self { device, device_path });
                    }
                }
                Err(e) => {
                    debug!("Could not open {}: {}", path.display(), e);
                }
            }
        }

        Err(RcHidError::WheelNotFound)
    }

    /// Get the `/dev/input/eventX` path this wheel was opened from
    #[must_use]
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Get the device name reported by the kernel
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }

    /// Fetch pending input events, blocking until at least one arrives
    ///
    /// # Errors
    ///
    /// Returns `Wheel` error if the read fails (e.g. the wheel was unplugged)
    pub fn fetch_events(&mut self) -> Result<impl Iterator<Item = evdev::InputEvent> + '_> {
        self.device
            .fetch_events()
            .map_err(|e| RcHidError::Wheel(format!("Failed to fetch events: {}", e)))
    }

    /// Read events forever, publishing a fresh [`WheelState`] after each batch
    ///
    /// Intended to run on a dedicated blocking thread. Returns `Ok(())` when
    /// every receiver has been dropped.
    ///
    /// # Errors
    ///
    /// Returns `Wheel` error when the device stops delivering events
    pub fn run(mut self, publisher: watch::Sender<WheelState>) -> Result<()> {
        let mut mapper = EventMapper::new();

        loop {
            for event in self.fetch_events()? {
                mapper.process_event(&event);
            }

            if publisher.send(mapper.state_snapshot()).is_err() {
                debug!("Wheel state receiver dropped, stopping reader");
                return Ok(());
            }
        }
    }
}
