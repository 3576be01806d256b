//! Human-readable status line.

use crate::error::WatermarkError;
use crate::watermark::WatermarkStore;

/// Describe the persisted watermark.
///
/// Never fails: storage problems are rendered into the returned text.  Reads
/// only, so it is safe to call while the scheduler is polling; it may see the
/// watermark from before or after an in-flight cycle.
pub fn describe(store: &WatermarkStore) -> String {
    match store.load() {
        Ok(watermark) if watermark.is_zero() => "Feed has not been updated as of yet".to_string(),
        Ok(watermark) => format!("Last entry was published at {watermark}"),
        Err(WatermarkError::Load(e)) => format!("Could not load storage data: {e}"),
        Err(WatermarkError::Parse(e)) => format!("Could not parse storage data: {e}"),
        Err(e) => format!("Storage error: {e}"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
