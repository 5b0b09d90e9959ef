//! # GATT Abstraction
//!
//! The platform seam. A [`BluetoothBackend`] finds a printer and hands back a
//! [`GattDevice`]; everything above this module (negotiation, chunked writes,
//! session lifecycle) is written against these traits only.
//!
//! Implementations:
//!
//! - [`super::memory::MemoryBackend`]: in-process simulated printer
//! - `super::ble::BleBackend`: btleplug (feature `ble`)

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::printer::DeviceFilter;

/// Write capabilities declared by a characteristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CharProperties {
    pub write: bool,
    pub write_without_response: bool,
}

impl CharProperties {
    pub const WRITE: Self = Self {
        write: true,
        write_without_response: false,
    };

    pub const WRITE_WITHOUT_RESPONSE: Self = Self {
        write: false,
        write_without_response: true,
    };

    pub const READ_ONLY: Self = Self {
        write: false,
        write_without_response: false,
    };

    pub fn is_writable(&self) -> bool {
        self.write || self.write_without_response
    }
}

/// How a chunk is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    WithResponse,
    WithoutResponse,
}

/// A characteristic as seen through discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Characteristic {
    pub service: Uuid,
    pub uuid: Uuid,
    pub properties: CharProperties,
}

impl Characteristic {
    /// Unacknowledged writes when the characteristic allows them, otherwise
    /// acknowledged writes.
    pub fn write_kind(&self) -> WriteKind {
        if self.properties.write_without_response {
            WriteKind::WithoutResponse
        } else {
            WriteKind::WithResponse
        }
    }
}

/// A primary service and its characteristics, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GattService {
    pub uuid: Uuid,
    pub characteristics: Vec<Characteristic>,
}

/// Invoked when the peripheral drops the link on its own.
pub type DisconnectCallback = Box<dyn Fn() + Send + Sync + 'static>;

/// Host Bluetooth stack: capability check and device selection.
#[async_trait]
pub trait BluetoothBackend: Send + Sync {
    /// Whether the host has usable Bluetooth at all.
    async fn is_available(&self) -> bool;

    /// Discover printers matching `filter` and return the chosen one.
    ///
    /// Returns [`crate::StrukError::Cancelled`] when nothing is chosen.
    async fn request_device(&self, filter: &DeviceFilter) -> Result<Arc<dyn GattDevice>>;
}

/// One peripheral and its GATT server.
#[async_trait]
pub trait GattDevice: Send + Sync {
    /// Advertised display name.
    fn name(&self) -> Option<String>;

    /// Open the GATT server.
    async fn connect(&self) -> Result<()>;

    /// Tear down the GATT link.
    async fn disconnect(&self) -> Result<()>;

    /// Live link status as reported by the platform.
    async fn is_connected(&self) -> bool;

    /// Look up a primary service. `Ok(None)` when the device does not expose
    /// it; `Err` when probing itself failed.
    async fn primary_service(&self, uuid: Uuid) -> Result<Option<GattService>>;

    /// Write one chunk.
    async fn write(&self, characteristic: &Characteristic, data: &[u8], kind: WriteKind)
    -> Result<()>;

    /// Register for peripheral-initiated disconnect notifications.
    fn on_disconnect(&self, callback: DisconnectCallback);
}
