//! # Chunked Writes
//!
//! BLE printers have small receive buffers and the write characteristic
//! gives no backpressure, so a buffer is sent as bounded chunks with a fixed
//! pause between them. The pause is skipped after the last chunk.

use std::time::Duration;

use super::gatt::{Characteristic, GattDevice};
use crate::error::Result;

/// Stream `data` into `characteristic`, `chunk_size` bytes at a time.
///
/// Returns the number of writes issued, which is `ceil(len / chunk_size)`.
/// Stops at the first failed write; bytes already sent stay sent.
pub async fn write_chunked(
    device: &dyn GattDevice,
    characteristic: &Characteristic,
    data: &[u8],
    chunk_size: usize,
    delay: Duration,
) -> Result<usize> {
    let kind = characteristic.write_kind();
    let total = data.len().div_ceil(chunk_size.max(1));

    for (i, chunk) in data.chunks(chunk_size.max(1)).enumerate() {
        device.write(characteristic, chunk, kind).await?;
        tracing::trace!(chunk = i + 1, total, bytes = chunk.len(), "chunk written");

        if i + 1 < total && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(total)
}
