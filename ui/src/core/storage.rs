//! Token persistence. Browser builds keep the pair in localStorage under
//! the keys the deployed frontend always used; native builds keep a JSON
//! file under the user data dir.

use api::TokenPair;

#[cfg(target_arch = "wasm32")]
const ACCESS_KEY: &str = "accesstoken";
#[cfg(target_arch = "wasm32")]
const REFRESH_KEY: &str = "refreshtoken";

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .ok_or_else(|| "window unavailable".to_string())?
        .local_storage()
        .map_err(|_| "localStorage blocked".to_string())?
        .ok_or_else(|| "localStorage unavailable".to_string())
}

#[cfg(target_arch = "wasm32")]
pub fn save_tokens(tokens: &TokenPair) -> Result<(), String> {
    let storage = local_storage()?;
    storage
        .set_item(ACCESS_KEY, &tokens.access)
        .map_err(|_| "token write blocked".to_string())?;
    storage
        .set_item(REFRESH_KEY, &tokens.refresh)
        .map_err(|_| "token write blocked".to_string())
}

#[cfg(target_arch = "wasm32")]
pub fn load_tokens() -> Option<TokenPair> {
    let storage = local_storage().ok()?;
    let access = storage.get_item(ACCESS_KEY).ok()??;
    let refresh = storage.get_item(REFRESH_KEY).ok()??;
    Some(TokenPair { access, refresh })
}

#[cfg(target_arch = "wasm32")]
pub fn clear_tokens() {
    if let Ok(storage) = local_storage() {
        storage.remove_item(ACCESS_KEY).ok();
        storage.remove_item(REFRESH_KEY).ok();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn session_file() -> Result<std::path::PathBuf, String> {
    let dirs = directories::ProjectDirs::from("com", "PlastiScan", "PlastiScan")
        .ok_or_else(|| "unable to determine data directory".to_string())?;
    Ok(dirs.data_dir().join("session.json"))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_tokens(tokens: &TokenPair) -> Result<(), String> {
    let path = session_file()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| err.to_string())?;
    }
    let payload = serde_json::to_vec_pretty(tokens).map_err(|err| err.to_string())?;
    std::fs::write(&path, payload).map_err(|err| err.to_string())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_tokens() -> Option<TokenPair> {
    let path = session_file().ok()?;
    let payload = std::fs::read(path).ok()?;
    serde_json::from_slice(&payload).ok()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn clear_tokens() {
    if let Ok(path) = session_file() {
        std::fs::remove_file(path).ok();
    }
}
