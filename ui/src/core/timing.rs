//! Clock helpers shared by the workflow and the report.

use time::OffsetDateTime;

pub use api::timing::sleep_ms;

/// Current UTC timestamp. Works in the browser through the `wasm-bindgen`
/// feature of `time`.
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Minute-resolution seed for the analysis simulator: runs within the same
/// minute reproduce the same record, which is intentional for the demo.
pub fn minute_seed() -> u64 {
    let timestamp = now_utc().unix_timestamp();
    (timestamp / 60).max(0) as u64
}
