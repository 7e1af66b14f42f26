//! Explicit session state. The app constructs one `Session` and threads it
//! through the client and the views; there is no ambient token singleton.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Access/refresh pair returned by the token endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Shared handle to the signed-in state. Clones point at the same slot, so
/// the client and every view observe a single session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    tokens: Arc<Mutex<Option<TokenPair>>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tokens(&self, tokens: TokenPair) {
        if let Ok(mut slot) = self.tokens.lock() {
            *slot = Some(tokens);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.tokens.lock() {
            *slot = None;
        }
    }

    pub fn tokens(&self) -> Option<TokenPair> {
        self.tokens.lock().ok()?.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        Some(self.tokens()?.access)
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            access: "access-123".into(),
            refresh: "refresh-456".into(),
        }
    }

    #[test]
    fn clones_share_the_slot() {
        let session = Session::new();
        let observer = session.clone();
        assert!(!observer.is_authenticated());

        session.set_tokens(pair());
        assert_eq!(observer.access_token().as_deref(), Some("access-123"));

        session.clear();
        assert!(!observer.is_authenticated());
    }
}
