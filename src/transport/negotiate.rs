//! # Characteristic Negotiation
//!
//! Finds the characteristic to stream print data into. Printer firmware
//! varies in which GATT profile it exposes, so this is an ordered search:
//!
//! 1. Each candidate service, in priority order
//! 2. Within a reachable service, each known characteristic UUID in order
//! 3. Failing that, the first characteristic that declares any write support
//!
//! The first hit wins. A service that cannot be read is skipped.

use uuid::Uuid;

use super::gatt::{Characteristic, GattDevice, GattService};
use crate::error::{Result, StrukError};
use crate::printer::DeviceFilter;

/// Search the device for a writable characteristic.
///
/// Returns [`StrukError::NoWritableCharacteristic`] when no candidate
/// service yields one. Closing the GATT link on failure is the caller's job.
pub async fn find_writable(device: &dyn GattDevice, filter: &DeviceFilter) -> Result<Characteristic> {
    for &service_uuid in filter.service_uuids {
        let service = match device.primary_service(service_uuid).await {
            Ok(Some(service)) => service,
            Ok(None) => {
                tracing::debug!(%service_uuid, "service not present");
                continue;
            }
            Err(e) => {
                tracing::debug!(%service_uuid, error = %e, "service lookup failed");
                continue;
            }
        };

        if let Some(characteristic) = select_characteristic(&service, filter.characteristic_uuids) {
            tracing::debug!(
                service = %service_uuid,
                characteristic = %characteristic.uuid,
                "selected write characteristic"
            );
            return Ok(characteristic);
        }
    }

    Err(StrukError::NoWritableCharacteristic)
}

/// Pick a characteristic within one service: known UUIDs first, then any
/// writable one.
pub fn select_characteristic(service: &GattService, preferred: &[Uuid]) -> Option<Characteristic> {
    let writable = |c: &&Characteristic| c.properties.is_writable();

    preferred
        .iter()
        .find_map(|uuid| {
            service
                .characteristics
                .iter()
                .filter(writable)
                .find(|c| c.uuid == *uuid)
        })
        .or_else(|| service.characteristics.iter().find(writable))
        .cloned()
}
