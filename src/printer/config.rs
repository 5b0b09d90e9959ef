//! # Printer Configuration
//!
//! Hardware characteristics of supported ESC/POS thermal printers and the
//! Bluetooth discovery filter used to find them.
//!
//! ## Supported Printers
//!
//! | Profile | Paper | Columns (Font A) | BLE chunk | Chunk delay |
//! |---------|-------|------------------|-----------|-------------|
//! | MP58    | 58mm  | 32               | 100 bytes | 50 ms       |
//! | MP80    | 80mm  | 48               | 100 bytes | 50 ms       |
//!
//! ## Usage
//!
//! ```
//! use struk::printer::PrinterProfile;
//!
//! let profile = PrinterProfile::MP58;
//! assert_eq!(profile.columns, 32);
//! ```

use std::time::Duration;

use uuid::Uuid;

/// # Printer Profile
///
/// Layout width plus the transport tuning for one printer family.
///
/// ## BLE Flow Control
///
/// The write characteristic offers no backpressure signal, so large buffers
/// are split into `chunk_size` writes separated by `chunk_delay`. This keeps
/// the printer's small receive buffer from overrunning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterProfile {
    /// Printer family name
    pub name: &'static str,

    /// Characters per line at normal size
    pub columns: usize,

    /// Maximum bytes per BLE write
    pub chunk_size: usize,

    /// Pause between consecutive chunk writes
    pub chunk_delay: Duration,

    /// How often the connection watchdog polls the link while connected
    pub poll_interval: Duration,

    /// Blank lines fed before the cut
    pub trailing_feed: u8,
}

impl PrinterProfile {
    /// # 58mm Portable Printer (VSC MP-58C and clones)
    ///
    /// ```text
    /// ├─ 4mm ─┼──── 48mm printable ────┼─ 4mm ─┤
    /// │       │  32 chars (12x24 dots) │       │
    /// ```
    pub const MP58: Self = Self {
        name: "MP-58",
        columns: 32,
        chunk_size: 100,
        chunk_delay: Duration::from_millis(50),
        poll_interval: Duration::from_secs(3),
        trailing_feed: 4,
    };

    /// # 80mm Printer
    ///
    /// Same command set and transport tuning, wider paper.
    pub const MP80: Self = Self {
        name: "MP-80",
        columns: 48,
        ..Self::MP58
    };

    /// Override the BLE chunk size. Zero is clamped to one byte.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Override the pause between chunks.
    pub fn with_chunk_delay(mut self, delay: Duration) -> Self {
        self.chunk_delay = delay;
        self
    }

    /// Override the watchdog poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Look up a built-in profile by name (`mp58`, `mp80`, case-insensitive).
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().replace('-', "").as_str() {
            "mp58" | "58" | "58mm" => Ok(Self::MP58),
            "mp80" | "80" | "80mm" => Ok(Self::MP80),
            _ => Err(format!("Unknown profile '{}'. Use 'mp58' or 'mp80'", s)),
        }
    }
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self::MP58
    }
}

// ============================================================================
// DEVICE DISCOVERY FILTER
// ============================================================================

/// # Bluetooth Discovery Filter
///
/// Which advertised names to offer during discovery and which GATT services
/// and characteristics to try once connected. The UUID lists are ordered by
/// priority; negotiation takes the first that resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFilter {
    /// Advertised-name prefixes of the supported printer family
    pub name_prefixes: &'static [&'static str],

    /// Candidate GATT services, requested as optional services
    pub service_uuids: &'static [Uuid],

    /// Candidate writable characteristics, tried within each service
    pub characteristic_uuids: &'static [Uuid],
}

impl DeviceFilter {
    /// Filter for generic 58mm ESC/POS BLE printers. Firmware differs in
    /// which GATT profile it exposes, hence the candidate lists.
    pub const ESC_POS_58: Self = Self {
        name_prefixes: &["Portable", "VSC", "MP-58", "Printer", "BlueTooth", "BT"],
        service_uuids: &[
            Uuid::from_u128(0x0000ff00_0000_1000_8000_00805f9b34fb),
            Uuid::from_u128(0xe7810a71_73ae_499d_8c15_faa9aef0c3f2),
            Uuid::from_u128(0x000018f0_0000_1000_8000_00805f9b34fb),
            Uuid::from_u128(0x49535343_fe7d_4ae5_8fa9_9fafd205e455),
        ],
        characteristic_uuids: &[
            Uuid::from_u128(0x0000ff02_0000_1000_8000_00805f9b34fb),
            Uuid::from_u128(0xbef8d6c9_9c21_4c9e_b632_bd58c1009f9f),
            Uuid::from_u128(0x00002af1_0000_1000_8000_00805f9b34fb),
            Uuid::from_u128(0x49535343_8841_43f4_a8d4_ecbe34729bb3),
        ],
    };

    /// Whether an advertised name belongs to the supported family.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix))
    }
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self::ESC_POS_58
    }
}

// ============================================================================
// TESTS
// ============================================================================
