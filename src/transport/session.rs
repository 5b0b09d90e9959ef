//! # Printer Session Manager
//!
//! Owns the lifecycle of one printer connection:
//!
//! ```text
//! Disconnected ──connect()──▶ Discovering ──chosen──▶ Connecting ──negotiated──▶ Connected
//!      ▲                          │                        │                        │
//!      └────────── cancel / failure ───────────────────────┘                        │
//!      └──────── disconnect() / peripheral event / liveness poll ───────────────────┘
//! ```
//!
//! Link loss is observed two ways: the platform's disconnect event, and a
//! watchdog task that polls the device every [`PrinterProfile::poll_interval`]
//! in case the event never arrives. Whichever fires first flips the state.
//!
//! Connection state is published on a [`tokio::sync::watch`] channel so UI
//! code can follow it with [`PrinterManager::subscribe`]. The printing flag
//! gets its own channel, [`PrinterManager::subscribe_printing`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::chunked::write_chunked;
use super::gatt::{BluetoothBackend, Characteristic, DisconnectCallback, GattDevice};
use super::negotiate::find_writable;
use crate::error::{Result, StrukError};
use crate::printer::{DeviceFilter, PrinterProfile};
use crate::receipt::{ReceiptDocument, compose};

/// Where the manager is in the connection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Discovering,
    Connecting,
    Connected,
}

/// An established link: the device, its negotiated write characteristic and
/// the watchdog polling it. Dropping the session stops the watchdog.
pub struct PrinterSession {
    device: Arc<dyn GattDevice>,
    characteristic: Characteristic,
    device_name: Option<String>,
    watchdog: JoinHandle<()>,
}

impl PrinterSession {
    pub fn device_name(&self) -> Option<&str> {
        self.device_name.as_deref()
    }

    pub fn characteristic(&self) -> &Characteristic {
        &self.characteristic
    }
}

impl Drop for PrinterSession {
    fn drop(&mut self) {
        self.watchdog.abort();
    }
}

/// # Printer Manager
///
/// Single point of contact for connecting to and printing on a BLE receipt
/// printer. At most one session is active at a time.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use struk::transport::{MemoryBackend, MemoryPrinter, PrinterManager};
/// use struk::{PrinterProfile, receipt};
///
/// # #[tokio::main]
/// # async fn main() {
/// let printer = Arc::new(MemoryPrinter::new("MP-58A1"));
/// let backend = MemoryBackend::new().with_device(printer.clone());
/// let mut manager = PrinterManager::new(backend, PrinterProfile::MP58);
///
/// manager.connect().await.unwrap();
/// manager.print(&receipt::cash_receipt()).await.unwrap();
/// assert!(!printer.received().is_empty());
/// # }
/// ```
pub struct PrinterManager<B> {
    backend: B,
    profile: PrinterProfile,
    filter: DeviceFilter,
    state: Arc<watch::Sender<ConnectionState>>,
    /// Bumped per connection; stale link-loss signals compare against it.
    generation: Arc<AtomicU64>,
    session: Option<PrinterSession>,
    printing: Arc<watch::Sender<bool>>,
}

impl<B: BluetoothBackend> PrinterManager<B> {
    pub fn new(backend: B, profile: PrinterProfile) -> Self {
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (printing, _) = watch::channel(false);
        Self {
            backend,
            profile,
            filter: DeviceFilter::default(),
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            session: None,
            printing: Arc::new(printing),
        }
    }

    /// Replace the discovery filter.
    pub fn with_filter(mut self, filter: DeviceFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn profile(&self) -> &PrinterProfile {
        &self.profile
    }

    // ========================================================================
    // OBSERVABLES
    // ========================================================================

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Follow state changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected && self.session.is_some()
    }

    pub fn is_connecting(&self) -> bool {
        matches!(
            self.state(),
            ConnectionState::Discovering | ConnectionState::Connecting
        )
    }

    pub fn is_printing(&self) -> bool {
        *self.printing.borrow()
    }

    /// Follow the printing flag. It is `true` for the whole chunked write.
    pub fn subscribe_printing(&self) -> watch::Receiver<bool> {
        self.printing.subscribe()
    }

    /// Name of the connected printer, if any.
    pub fn device_name(&self) -> Option<String> {
        if !self.is_connected() {
            return None;
        }
        self.session
            .as_ref()
            .and_then(|s| s.device_name().map(str::to_string))
    }

    /// Whether the host has Bluetooth at all.
    pub async fn bluetooth_supported(&self) -> bool {
        self.backend.is_available().await
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Discover, choose and connect to a printer, then negotiate its write
    /// characteristic.
    ///
    /// Fails with [`StrukError::BluetoothUnavailable`] before any discovery
    /// when the host lacks Bluetooth, and with [`StrukError::AlreadyConnected`]
    /// while a session is live.
    pub async fn connect(&mut self) -> Result<()> {
        self.reap_lost_session();
        if self.session.is_some() {
            return Err(StrukError::AlreadyConnected);
        }
        if !self.backend.is_available().await {
            tracing::warn!("Bluetooth is not available on this host");
            return Err(StrukError::BluetoothUnavailable);
        }

        self.state.send_replace(ConnectionState::Discovering);
        match self.establish().await {
            Ok(session) => {
                tracing::info!(
                    device = session.device_name().unwrap_or("unknown"),
                    characteristic = %session.characteristic.uuid,
                    "printer connected"
                );
                self.session = Some(session);
                Ok(())
            }
            Err(e) => {
                self.state.send_replace(ConnectionState::Disconnected);
                match &e {
                    StrukError::Cancelled => tracing::info!("printer selection cancelled"),
                    _ => tracing::warn!(error = %e, "printer connection failed"),
                }
                Err(e)
            }
        }
    }

    async fn establish(&self) -> Result<PrinterSession> {
        let device = self.backend.request_device(&self.filter).await?;
        let device_name = device.name();
        tracing::debug!(device = ?device_name, "printer chosen");

        self.state.send_replace(ConnectionState::Connecting);
        if let Err(e) = device.connect().await {
            // A failure after the link came up must not leave it open
            if device.is_connected().await {
                if let Err(close) = device.disconnect().await {
                    tracing::warn!(error = %close, "failed to close GATT link");
                }
            }
            return Err(e);
        }

        let characteristic = match find_writable(device.as_ref(), &self.filter).await {
            Ok(characteristic) => characteristic,
            Err(e) => {
                // Leave nothing half-open
                if let Err(close) = device.disconnect().await {
                    tracing::warn!(error = %close, "failed to close GATT link");
                }
                return Err(e);
            }
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        device.on_disconnect(link_lost_callback(
            self.state.clone(),
            self.generation.clone(),
            generation,
        ));

        self.state.send_replace(ConnectionState::Connected);
        if !device.is_connected().await {
            self.generation.fetch_add(1, Ordering::SeqCst);
            return Err(StrukError::Gatt("link dropped during setup".into()));
        }

        let watchdog = spawn_watchdog(
            device.clone(),
            self.state.clone(),
            self.generation.clone(),
            generation,
            self.profile.poll_interval,
        );

        Ok(PrinterSession {
            device,
            characteristic,
            device_name,
            watchdog,
        })
    }

    /// Close the session and return to `Disconnected`. A no-op when nothing
    /// is connected.
    pub async fn disconnect(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            self.state.send_replace(ConnectionState::Disconnected);
            return Ok(());
        };

        // Our own teardown is not a link loss
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(ConnectionState::Disconnected);

        let device = session.device.clone();
        drop(session);

        if device.is_connected().await {
            device.disconnect().await?;
        }
        tracing::info!("printer disconnected");
        Ok(())
    }

    /// Drop a session whose link was lost in the background.
    fn reap_lost_session(&mut self) {
        if self.session.is_some() && self.state() != ConnectionState::Connected {
            tracing::debug!("discarding lost session");
            self.session = None;
        }
    }

    // ========================================================================
    // PRINTING
    // ========================================================================

    /// Compose, encode and send a receipt.
    pub async fn print(&mut self, doc: &ReceiptDocument) -> Result<()> {
        let bytes = compose(doc, &self.profile).to_bytes();
        self.print_bytes(&bytes).await
    }

    /// Send pre-encoded bytes.
    ///
    /// Fails with [`StrukError::NotConnected`] without touching the transport
    /// when there is no live session.
    pub async fn print_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.reap_lost_session();
        let (device, characteristic) = match &self.session {
            Some(session) if self.state() == ConnectionState::Connected => {
                (session.device.clone(), session.characteristic.clone())
            }
            _ => return Err(StrukError::NotConnected),
        };

        let printing = PrintingGuard::raise(&self.printing);
        let result = write_chunked(
            device.as_ref(),
            &characteristic,
            data,
            self.profile.chunk_size,
            self.profile.chunk_delay,
        )
        .await;
        drop(printing);

        match result {
            Ok(writes) => {
                tracing::info!(bytes = data.len(), writes, "receipt sent");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "print failed");
                Err(e)
            }
        }
    }
}

impl<B> Drop for PrinterManager<B> {
    fn drop(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// Holds the printing flag up; lowers it on drop, including when the print
/// future is cancelled mid-write.
struct PrintingGuard {
    flag: Arc<watch::Sender<bool>>,
}

impl PrintingGuard {
    fn raise(flag: &Arc<watch::Sender<bool>>) -> Self {
        flag.send_replace(true);
        Self { flag: flag.clone() }
    }
}

impl Drop for PrintingGuard {
    fn drop(&mut self) {
        self.flag.send_replace(false);
    }
}

/// Flip to `Disconnected` if `generation` is still the live connection.
fn mark_lost(state: &watch::Sender<ConnectionState>, current: &AtomicU64, generation: u64) -> bool {
    if current.load(Ordering::SeqCst) != generation {
        return false;
    }
    state.send_if_modified(|s| {
        let was_connected = *s == ConnectionState::Connected;
        if was_connected {
            *s = ConnectionState::Disconnected;
        }
        was_connected
    })
}

fn link_lost_callback(
    state: Arc<watch::Sender<ConnectionState>>,
    current: Arc<AtomicU64>,
    generation: u64,
) -> DisconnectCallback {
    Box::new(move || {
        if mark_lost(&state, &current, generation) {
            tracing::warn!("printer reported disconnect");
        }
    })
}

/// Poll the device until the link is gone or the state leaves `Connected`.
fn spawn_watchdog(
    device: Arc<dyn GattDevice>,
    state: Arc<watch::Sender<ConnectionState>>,
    current: Arc<AtomicU64>,
    generation: u64,
    interval: Duration,
) -> JoinHandle<()> {
    let mut changes = state.subscribe();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        // First tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if current.load(Ordering::SeqCst) != generation {
                        break;
                    }
                    if !device.is_connected().await {
                        if mark_lost(&state, &current, generation) {
                            tracing::warn!("printer link lost (liveness poll)");
                        }
                        break;
                    }
                }
                changed = changes.changed() => {
                    if changed.is_err() || *changes.borrow() != ConnectionState::Connected {
                        break;
                    }
                }
            }
        }
    })
}
