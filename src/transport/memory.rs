//! # In-Memory Transport
//!
//! A simulated BLE printer. Records every chunk it receives and lets callers
//! inject the failures a real printer produces: no Bluetooth, dismissed
//! chooser, missing characteristic, failed writes and dropped links.
//!
//! Used by the test suite and by the CLI's `--dry-run` mode.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use super::gatt::{
    BluetoothBackend, CharProperties, Characteristic, DisconnectCallback, GattDevice, GattService,
    WriteKind,
};
use crate::error::{Result, StrukError};
use crate::printer::DeviceFilter;

/// Lock ignoring poison; the guarded data stays consistent between statements.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ============================================================================
// SIMULATED PRINTER
// ============================================================================

/// A simulated printer peripheral.
pub struct MemoryPrinter {
    name: String,
    services: Vec<GattService>,
    connected: AtomicBool,
    /// Reason, and whether the link is left up when the failure hits.
    connect_error: Mutex<Option<(String, bool)>>,
    fail_after: Mutex<Option<usize>>,
    write_delay: Mutex<Duration>,
    writes: Mutex<Vec<(WriteKind, Vec<u8>)>>,
    listener: Mutex<Option<DisconnectCallback>>,
    disconnect_calls: AtomicUsize,
}

impl MemoryPrinter {
    /// Printer exposing the most common profile: service `ff00` with
    /// characteristic `ff02` (write without response).
    pub fn new(name: impl Into<String>) -> Self {
        let filter = DeviceFilter::ESC_POS_58;
        let service = filter.service_uuids[0];
        Self::with_services(
            name,
            vec![GattService {
                uuid: service,
                characteristics: vec![Characteristic {
                    service,
                    uuid: filter.characteristic_uuids[0],
                    properties: CharProperties::WRITE_WITHOUT_RESPONSE,
                }],
            }],
        )
    }

    /// Printer with an explicit GATT layout.
    pub fn with_services(name: impl Into<String>, services: Vec<GattService>) -> Self {
        Self {
            name: name.into(),
            services,
            connected: AtomicBool::new(false),
            connect_error: Mutex::new(None),
            fail_after: Mutex::new(None),
            write_delay: Mutex::new(Duration::ZERO),
            writes: Mutex::new(Vec::new()),
            listener: Mutex::new(None),
            disconnect_calls: AtomicUsize::new(0),
        }
    }

    /// The first characteristic of the first service.
    pub fn default_characteristic(&self) -> Characteristic {
        self.services
            .iter()
            .flat_map(|s| s.characteristics.iter())
            .next()
            .cloned()
            .unwrap_or(Characteristic {
                service: Uuid::nil(),
                uuid: Uuid::nil(),
                properties: CharProperties::WRITE,
            })
    }

    /// Make the next `connect` fail with a GATT error.
    pub fn fail_connect(&self, reason: impl Into<String>) {
        *lock(&self.connect_error) = Some((reason.into(), false));
    }

    /// Make the next `connect` bring the link up and then fail, the way a
    /// peripheral does when service discovery times out.
    pub fn fail_connect_half_open(&self, reason: impl Into<String>) {
        *lock(&self.connect_error) = Some((reason.into(), true));
    }

    /// Accept `n` more writes, then fail every write after.
    pub fn fail_writes_after(&self, n: usize) {
        let sent = lock(&self.writes).len();
        *lock(&self.fail_after) = Some(sent + n);
    }

    /// Hold every write for `delay` before accepting it.
    pub fn set_write_delay(&self, delay: Duration) {
        *lock(&self.write_delay) = delay;
    }

    /// Simulate the peripheral dropping the link and announcing it.
    pub fn drop_link(&self) {
        self.connected.store(false, Ordering::SeqCst);
        if let Some(listener) = lock(&self.listener).as_ref() {
            listener();
        }
    }

    /// Simulate the link dropping without any event reaching the host.
    pub fn drop_link_silently(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Every chunk received, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        lock(&self.writes).iter().map(|(_, data)| data.clone()).collect()
    }

    /// Write mode of every chunk received, in order.
    pub fn write_kinds(&self) -> Vec<WriteKind> {
        lock(&self.writes).iter().map(|(kind, _)| *kind).collect()
    }

    /// All received bytes, concatenated.
    pub fn received(&self) -> Vec<u8> {
        lock(&self.writes)
            .iter()
            .flat_map(|(_, data)| data.iter().copied())
            .collect()
    }

    /// Number of disconnect listeners registered (at most one).
    pub fn listener_count(&self) -> usize {
        usize::from(lock(&self.listener).is_some())
    }

    /// How many times the host tore the GATT link down.
    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GattDevice for MemoryPrinter {
    fn name(&self) -> Option<String> {
        Some(self.name.clone())
    }

    async fn connect(&self) -> Result<()> {
        let failure = lock(&self.connect_error).take();
        if let Some((reason, half_open)) = failure {
            self.connected.store(half_open, Ordering::SeqCst);
            return Err(StrukError::Gatt(reason));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn primary_service(&self, uuid: Uuid) -> Result<Option<GattService>> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(StrukError::Gatt("GATT server is disconnected".into()));
        }
        Ok(self.services.iter().find(|s| s.uuid == uuid).cloned())
    }

    async fn write(&self, characteristic: &Characteristic, data: &[u8], kind: WriteKind) -> Result<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(StrukError::Write("GATT server is disconnected".into()));
        }
        if !characteristic.properties.is_writable() {
            return Err(StrukError::Write(format!(
                "characteristic {} is not writable",
                characteristic.uuid
            )));
        }

        let delay = *lock(&self.write_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut writes = lock(&self.writes);
        if lock(&self.fail_after).is_some_and(|limit| writes.len() >= limit) {
            return Err(StrukError::Write("simulated write failure".into()));
        }
        writes.push((kind, data.to_vec()));
        Ok(())
    }

    /// Replaces any earlier listener, as a peripheral event handler does.
    fn on_disconnect(&self, callback: DisconnectCallback) {
        *lock(&self.listener) = Some(callback);
    }
}

// ============================================================================
// SIMULATED HOST
// ============================================================================

/// A simulated host Bluetooth stack with a fixed set of nearby printers.
///
/// The chooser picks the first printer whose name matches the filter.
pub struct MemoryBackend {
    available: bool,
    devices: Vec<Arc<MemoryPrinter>>,
    requests: AtomicUsize,
}

impl MemoryBackend {
    /// Host with Bluetooth and no printers in range.
    pub fn new() -> Self {
        Self {
            available: true,
            devices: Vec::new(),
            requests: AtomicUsize::new(0),
        }
    }

    /// Host without Bluetooth support.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Put a printer in range.
    pub fn with_device(mut self, device: Arc<MemoryPrinter>) -> Self {
        self.devices.push(device);
        self
    }

    /// How many times the device chooser was shown.
    pub fn chooser_requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BluetoothBackend for MemoryBackend {
    async fn is_available(&self) -> bool {
        self.available
    }

    async fn request_device(&self, filter: &DeviceFilter) -> Result<Arc<dyn GattDevice>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let device = self
            .devices
            .iter()
            .find(|d| filter.matches_name(&d.name))
            .ok_or(StrukError::Cancelled)?;
        Ok(device.clone() as Arc<dyn GattDevice>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_chooser_filters_by_name() {
        let backend = MemoryBackend::new()
            .with_device(Arc::new(MemoryPrinter::new("Headphones")))
            .with_device(Arc::new(MemoryPrinter::new("MP-58A1")));
        let device = backend
            .request_device(&DeviceFilter::ESC_POS_58)
            .await
            .unwrap();
        assert_eq!(device.name().as_deref(), Some("MP-58A1"));
    }

    #[tokio::test]
    async fn test_chooser_cancelled_without_match() {
        let backend = MemoryBackend::new().with_device(Arc::new(MemoryPrinter::new("Headphones")));
        let result = backend.request_device(&DeviceFilter::ESC_POS_58).await;
        assert!(matches!(result, Err(StrukError::Cancelled)));
        assert_eq!(backend.chooser_requests(), 1);
    }

    #[tokio::test]
    async fn test_drop_link_notifies_listeners() {
        let printer = MemoryPrinter::new("MP-58A1");
        printer.connect().await.unwrap();
        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        printer.on_disconnect(Box::new(move || flag.store(true, Ordering::SeqCst)));

        printer.drop_link();
        assert!(fired.load(Ordering::SeqCst));
        assert!(!printer.is_connected().await);
    }

    #[tokio::test]
    async fn test_listener_replaced_not_stacked() {
        let printer = MemoryPrinter::new("MP-58A1");
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let a = first.clone();
        printer.on_disconnect(Box::new(move || {
            a.fetch_add(1, Ordering::SeqCst);
        }));
        let b = second.clone();
        printer.on_disconnect(Box::new(move || {
            b.fetch_add(1, Ordering::SeqCst);
        }));

        printer.drop_link();
        assert_eq!(printer.listener_count(), 1);
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_half_open_connect_failure_leaves_link_up() {
        let printer = MemoryPrinter::new("MP-58A1");
        printer.fail_connect_half_open("discovery timed out");
        assert!(matches!(printer.connect().await, Err(StrukError::Gatt(_))));
        assert!(printer.is_connected().await);
    }

    #[tokio::test]
    async fn test_write_requires_link() {
        let printer = MemoryPrinter::new("MP-58A1");
        let ch = printer.default_characteristic();
        let result = printer.write(&ch, b"x", WriteKind::WithoutResponse).await;
        assert!(matches!(result, Err(StrukError::Write(_))));
    }
}
