//! Report delivery: the download status machine and the platform-specific
//! file hand-off.

/// How long the "Complete!" confirmation stays up before the button rearms.
pub const SETTLE_DELAY_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DownloadStatus {
    #[default]
    Idle,
    Downloading,
    Downloaded,
}

/// Download state machine: `Idle → Downloading → Downloaded → Idle`.
/// `begin` is the re-entrant guard — while a document is in flight a
/// second request is refused, so no duplicate file is ever emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadGate {
    status: DownloadStatus,
}

impl DownloadGate {
    pub fn status(&self) -> DownloadStatus {
        self.status
    }

    /// Claim the gate. Refused unless idle.
    pub fn begin(&mut self) -> bool {
        if self.status != DownloadStatus::Idle {
            return false;
        }
        self.status = DownloadStatus::Downloading;
        true
    }

    pub fn complete(&mut self) {
        if self.status == DownloadStatus::Downloading {
            self.status = DownloadStatus::Downloaded;
        }
    }

    /// Drop straight back to idle after a failed attempt.
    pub fn abort(&mut self) {
        if self.status == DownloadStatus::Downloading {
            self.status = DownloadStatus::Idle;
        }
    }

    /// Auto-revert once the confirmation has been shown.
    pub fn settle(&mut self) {
        if self.status == DownloadStatus::Downloaded {
            self.status = DownloadStatus::Idle;
        }
    }
}

/// Hand the finished document to the user. On the web this starts a
/// browser download and returns `Ok(None)`; native builds write under the
/// user data dir and return the path.
#[cfg(target_arch = "wasm32")]
pub fn deliver_report(filename: &str, bytes: &[u8]) -> Result<Option<String>, String> {
    use wasm_bindgen::JsCast;
    use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let mut opts = BlobPropertyBag::new();
    opts.type_("application/pdf");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
        .map_err(|_| "Failed to create blob".to_string())?;
    let url = Url::create_object_url_with_blob(&blob)
        .map_err(|_| "Unable to create download".to_string())?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| "Document unavailable".to_string())?;
    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(|_| "Unable to create anchor".to_string())?
        .dyn_into()
        .map_err(|_| "Anchor cast failed".to_string())?;
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.style().set_property("display", "none").ok();

    document
        .body()
        .ok_or_else(|| "Missing body".to_string())?
        .append_child(&anchor)
        .ok();
    anchor.click();
    anchor.remove();
    Url::revoke_object_url(&url).ok();

    Ok(None)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn deliver_report(filename: &str, bytes: &[u8]) -> Result<Option<String>, String> {
    use std::fs;
    use std::io::Write;

    let dirs = directories::ProjectDirs::from("com", "PlastiScan", "PlastiScan")
        .ok_or_else(|| "Unable to determine report directory".to_string())?;
    let dir = dirs.data_dir().join("reports");
    fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
    let path = dir.join(filename);
    let mut file = fs::File::create(&path).map_err(|err| err.to_string())?;
    file.write_all(bytes).map_err(|err| err.to_string())?;
    Ok(Some(path.to_string_lossy().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_refused_while_in_flight() {
        let mut gate = DownloadGate::default();
        assert!(gate.begin());
        assert!(!gate.begin());
        assert_eq!(gate.status(), DownloadStatus::Downloading);
    }

    #[test]
    fn full_cycle_returns_to_idle() {
        let mut gate = DownloadGate::default();
        assert!(gate.begin());
        gate.complete();
        assert_eq!(gate.status(), DownloadStatus::Downloaded);
        assert!(!gate.begin());
        gate.settle();
        assert_eq!(gate.status(), DownloadStatus::Idle);
        assert!(gate.begin());
    }

    #[test]
    fn abort_rearms_after_a_failure() {
        let mut gate = DownloadGate::default();
        assert!(gate.begin());
        gate.abort();
        assert_eq!(gate.status(), DownloadStatus::Idle);
        assert!(gate.begin());
    }

    #[test]
    fn settle_outside_downloaded_is_a_no_op() {
        let mut gate = DownloadGate::default();
        gate.settle();
        assert_eq!(gate.status(), DownloadStatus::Idle);
        gate.begin();
        gate.settle();
        assert_eq!(gate.status(), DownloadStatus::Downloading);
    }
}
