//! Image listing: locator extraction and the bounded poll loop.

use serde_json::Value;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::client::ApiClient;
use crate::timing::sleep_ms;

/// Field names a record may expose its image locator under. Deployed
/// backends have not agreed on one, so all of them are probed in order.
const LOCATOR_FIELDS: [&str; 5] = ["image", "image_url", "url", "file", "src"];

/// Wrapper keys a listing may nest the record sequence under.
const LIST_KEYS: [&str; 2] = ["results", "images"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOptions {
    pub timeout_ms: u64,
    pub interval_ms: u64,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            interval_ms: 3_000,
        }
    }
}

/// What a poll run produced. `image` is `Some` on the first successful
/// probe; failed probes keep only the most recent message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollOutcome {
    pub image: Option<String>,
    pub last_error: Option<String>,
    pub cancelled: bool,
}

impl PollOutcome {
    pub fn found(&self) -> bool {
        self.image.is_some()
    }
}

/// Extract the most recent image locator from a listing payload. Accepts a
/// bare array or an object wrapping one under `results`/`images`; the first
/// entry is treated as most recent. `None` when nothing matches.
pub fn latest_image_locator(payload: &Value) -> Option<String> {
    let records = payload
        .as_array()
        .or_else(|| LIST_KEYS.iter().find_map(|key| payload.get(*key)?.as_array()))?;
    let newest = records.first()?;
    LOCATOR_FIELDS
        .iter()
        .find_map(|field| newest.get(*field).and_then(Value::as_str))
        .map(str::to_owned)
}

/// Resolve a possibly relative locator against the API base origin.
pub fn absolutize(base: &str, locator: &str) -> String {
    if locator.starts_with("http://")
        || locator.starts_with("https://")
        || locator.starts_with("data:")
    {
        locator.to_string()
    } else if locator.starts_with('/') {
        format!("{base}{locator}")
    } else {
        format!("{base}/{locator}")
    }
}

/// Poll the images endpoint until a locator shows up, the accumulated wait
/// reaches `timeout_ms`, or `cancel` trips. A probe that fails (network,
/// non-2xx, undecodable body) counts as "not found yet": its message lands
/// in `last_error` and polling continues.
pub async fn poll_for_image(
    client: &ApiClient,
    opts: &PollOptions,
    cancel: &CancelToken,
) -> PollOutcome {
    let mut outcome = PollOutcome::default();
    let mut waited_ms = 0u64;

    loop {
        if cancel.is_cancelled() {
            outcome.cancelled = true;
            return outcome;
        }

        match client.latest_image().await {
            Ok(Some(locator)) => {
                debug!(locator = %locator, "sample image available");
                outcome.image = Some(locator);
                return outcome;
            }
            Ok(None) => {}
            Err(err) => {
                outcome.last_error = Some(err.to_string());
            }
        }

        if waited_ms >= opts.timeout_ms {
            debug!(waited_ms, "image poll timed out");
            return outcome;
        }
        sleep_ms(opts.interval_ms).await;
        waited_ms += opts.interval_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_first_entry_wins() {
        let payload = json!([
            {"id": 9, "image": "/media/uploads/newest.jpg"},
            {"id": 8, "image": "/media/uploads/older.jpg"},
        ]);
        assert_eq!(
            latest_image_locator(&payload).as_deref(),
            Some("/media/uploads/newest.jpg")
        );
    }

    #[test]
    fn wrapped_listings_are_unwrapped() {
        let under_results = json!({"results": [{"url": "a.png"}]});
        let under_images = json!({"images": [{"file": "b.png"}]});
        assert_eq!(latest_image_locator(&under_results).as_deref(), Some("a.png"));
        assert_eq!(latest_image_locator(&under_images).as_deref(), Some("b.png"));
    }

    #[test]
    fn every_locator_field_is_accepted() {
        for field in LOCATOR_FIELDS {
            let payload = json!([{field: "sample.jpg"}]);
            assert_eq!(latest_image_locator(&payload).as_deref(), Some("sample.jpg"));
        }
    }

    #[test]
    fn unusable_payloads_yield_none() {
        assert!(latest_image_locator(&json!([])).is_none());
        assert!(latest_image_locator(&json!({"count": 0})).is_none());
        assert!(latest_image_locator(&json!([{"thumbnail": "x.jpg"}])).is_none());
        assert!(latest_image_locator(&json!("uploads/x.jpg")).is_none());
    }

    #[test]
    fn absolutize_leaves_absolute_locators_alone() {
        let base = "http://127.0.0.1:8000";
        assert_eq!(
            absolutize(base, "https://cdn.example.com/x.jpg"),
            "https://cdn.example.com/x.jpg"
        );
        assert_eq!(
            absolutize(base, "data:image/png;base64,AAAA"),
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn absolutize_resolves_relative_locators() {
        let base = "http://127.0.0.1:8000";
        assert_eq!(
            absolutize(base, "/media/uploads/x.jpg"),
            "http://127.0.0.1:8000/media/uploads/x.jpg"
        );
        assert_eq!(
            absolutize(base, "media/uploads/x.jpg"),
            "http://127.0.0.1:8000/media/uploads/x.jpg"
        );
    }
}
