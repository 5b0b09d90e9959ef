//! # BLE Transport (btleplug)
//!
//! Talks to real printers through the host Bluetooth stack (BlueZ on Linux,
//! CoreBluetooth on macOS, WinRT on Windows).
//!
//! There is no interactive chooser on the command line: discovery scans for
//! a fixed window and picks the first advertised name that matches the
//! filter, or the first that starts with an explicit `--device` name.
//!
//! ## Setup (Linux)
//!
//! ```bash
//! # BlueZ must be running and the adapter powered
//! $ bluetoothctl power on
//! # Then scan for nearby printers
//! $ struk scan
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{
    Central, CentralEvent, CharPropFlags, Characteristic as BleCharacteristic, Manager as _,
    Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::gatt::{
    BluetoothBackend, CharProperties, Characteristic, DisconnectCallback, GattDevice, GattService,
    WriteKind,
};
use crate::error::{Result, StrukError};
use crate::printer::DeviceFilter;

/// Default time spent scanning before choosing
pub const DEFAULT_SCAN_WINDOW: Duration = Duration::from_secs(5);

fn gatt_error(e: btleplug::Error) -> StrukError {
    StrukError::Gatt(e.to_string())
}

/// A printer seen during a scan.
#[derive(Debug, Clone)]
pub struct Discovered {
    pub name: String,
    pub address: String,
    pub rssi: Option<i16>,
}

/// Host Bluetooth via btleplug.
pub struct BleBackend {
    scan_window: Duration,
    device_name: Option<String>,
}

impl BleBackend {
    pub fn new() -> Self {
        Self {
            scan_window: DEFAULT_SCAN_WINDOW,
            device_name: None,
        }
    }

    pub fn with_scan_window(mut self, window: Duration) -> Self {
        self.scan_window = window;
        self
    }

    /// Only accept printers whose advertised name starts with `name`.
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = Some(name.into());
        self
    }

    async fn adapter(&self) -> Result<Adapter> {
        let manager = Manager::new().await.map_err(|e| {
            tracing::debug!(error = %e, "Bluetooth manager unavailable");
            StrukError::BluetoothUnavailable
        })?;
        let adapters = manager
            .adapters()
            .await
            .map_err(|_| StrukError::BluetoothUnavailable)?;
        adapters
            .into_iter()
            .next()
            .ok_or(StrukError::BluetoothUnavailable)
    }

    /// Scan and list nearby printers matching `filter`.
    pub async fn scan(&self, filter: &DeviceFilter) -> Result<Vec<Discovered>> {
        let adapter = self.adapter().await?;
        let found = discover(&adapter, filter, self.scan_window).await?;

        let mut printers = Vec::with_capacity(found.len());
        for (peripheral, name) in found {
            let rssi = match peripheral.properties().await {
                Ok(Some(props)) => props.rssi,
                _ => None,
            };
            printers.push(Discovered {
                name,
                address: peripheral.address().to_string(),
                rssi,
            });
        }
        Ok(printers)
    }
}

impl Default for BleBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan for `window` and collect peripherals whose name matches `filter`.
async fn discover(
    adapter: &Adapter,
    filter: &DeviceFilter,
    window: Duration,
) -> Result<Vec<(Peripheral, String)>> {
    tracing::info!(seconds = window.as_secs_f32(), "scanning for printers");
    adapter
        .start_scan(ScanFilter::default())
        .await
        .map_err(gatt_error)?;
    tokio::time::sleep(window).await;

    let peripherals = adapter.peripherals().await.map_err(gatt_error)?;
    if let Err(e) = adapter.stop_scan().await {
        tracing::warn!(error = %e, "failed to stop scan");
    }

    let mut found = Vec::new();
    for peripheral in peripherals {
        let Ok(Some(props)) = peripheral.properties().await else {
            continue;
        };
        let Some(name) = props.local_name else {
            continue;
        };
        if filter.matches_name(&name) {
            tracing::debug!(%name, address = %props.address, "printer found");
            found.push((peripheral, name));
        }
    }
    Ok(found)
}

#[async_trait]
impl BluetoothBackend for BleBackend {
    async fn is_available(&self) -> bool {
        self.adapter().await.is_ok()
    }

    async fn request_device(&self, filter: &DeviceFilter) -> Result<Arc<dyn GattDevice>> {
        let adapter = self.adapter().await?;
        let found = discover(&adapter, filter, self.scan_window).await?;

        let (peripheral, name) = found
            .into_iter()
            .find(|(_, name)| {
                self.device_name
                    .as_deref()
                    .is_none_or(|wanted| name.starts_with(wanted))
            })
            .ok_or(StrukError::Cancelled)?;

        Ok(Arc::new(BlePrinter::new(adapter, peripheral, name)))
    }
}

// ============================================================================
// PERIPHERAL
// ============================================================================

/// A printer reached through btleplug.
pub struct BlePrinter {
    adapter: Adapter,
    peripheral: Peripheral,
    name: String,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl BlePrinter {
    fn new(adapter: Adapter, peripheral: Peripheral, name: String) -> Self {
        Self {
            adapter,
            peripheral,
            name,
            listener: Mutex::new(None),
        }
    }

    fn find(&self, characteristic: &Characteristic) -> Option<BleCharacteristic> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == characteristic.uuid && c.service_uuid == characteristic.service)
    }
}

fn convert(c: &BleCharacteristic) -> Characteristic {
    Characteristic {
        service: c.service_uuid,
        uuid: c.uuid,
        properties: CharProperties {
            write: c.properties.contains(CharPropFlags::WRITE),
            write_without_response: c.properties.contains(CharPropFlags::WRITE_WITHOUT_RESPONSE),
        },
    }
}

#[async_trait]
impl GattDevice for BlePrinter {
    fn name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    async fn connect(&self) -> Result<()> {
        self.peripheral.connect().await.map_err(gatt_error)?;
        if let Err(e) = self.peripheral.discover_services().await {
            // The link is up but unusable without a service table
            if let Err(close) = self.peripheral.disconnect().await {
                tracing::warn!(error = %close, "failed to close link after discovery error");
            }
            return Err(gatt_error(e));
        }
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.peripheral.disconnect().await.map_err(gatt_error)
    }

    async fn is_connected(&self) -> bool {
        self.peripheral.is_connected().await.unwrap_or(false)
    }

    async fn primary_service(&self, uuid: Uuid) -> Result<Option<GattService>> {
        Ok(self
            .peripheral
            .services()
            .into_iter()
            .find(|s| s.uuid == uuid && s.primary)
            .map(|s| GattService {
                uuid: s.uuid,
                characteristics: s.characteristics.iter().map(convert).collect(),
            }))
    }

    async fn write(&self, characteristic: &Characteristic, data: &[u8], kind: WriteKind) -> Result<()> {
        let target = self.find(characteristic).ok_or_else(|| {
            StrukError::Write(format!("characteristic {} vanished", characteristic.uuid))
        })?;
        let write_type = match kind {
            WriteKind::WithResponse => WriteType::WithResponse,
            WriteKind::WithoutResponse => WriteType::WithoutResponse,
        };
        self.peripheral
            .write(&target, data, write_type)
            .await
            .map_err(|e| StrukError::Write(e.to_string()))
    }

    fn on_disconnect(&self, callback: DisconnectCallback) {
        let adapter = self.adapter.clone();
        let id = self.peripheral.id();
        let handle = tokio::spawn(async move {
            let mut events = match adapter.events().await {
                Ok(events) => events,
                Err(e) => {
                    tracing::warn!(error = %e, "cannot subscribe to adapter events");
                    return;
                }
            };
            while let Some(event) = events.next().await {
                match event {
                    CentralEvent::DeviceDisconnected(peripheral) if peripheral == id => callback(),
                    _ => {}
                }
            }
        });

        let mut listener = self.listener.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = listener.replace(handle) {
            previous.abort();
        }
    }
}

impl Drop for BlePrinter {
    fn drop(&mut self) {
        let listener = self.listener.get_mut().unwrap_or_else(|e| e.into_inner());
        if let Some(handle) = listener.take() {
            handle.abort();
        }
    }
}
