//! Durable storage of the bearer token between runs

use std::{
    fmt::Debug,
    sync::{Arc, Mutex},
};

use vtc_shared::token::AuthToken;

/// Somewhere a single token can be kept between runs
pub trait TokenStorage: Debug + Send {
    fn load(&self) -> anyhow::Result<Option<AuthToken>>;
    fn store(&mut self, token: &AuthToken) -> anyhow::Result<()>;
    fn clear(&mut self) -> anyhow::Result<()>;
}

/// Keeps the token in memory only. Clones share the same slot which lets
/// tests inspect what the client persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStorage {
    slot: Arc<Mutex<Option<AuthToken>>>,
}

impl MemoryTokenStorage {
    pub fn with_token(token: AuthToken) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token))),
        }
    }

    pub fn peek(&self) -> Option<AuthToken> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<AuthToken>> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> anyhow::Result<Option<AuthToken>> {
        Ok(self.peek())
    }

    fn store(&mut self, token: &AuthToken) -> anyhow::Result<()> {
        *self.lock() = Some(token.clone());
        Ok(())
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileTokenStorage;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::{io::ErrorKind, path::PathBuf};

    use anyhow::Context as _;
    use tracing::debug;
    use vtc_shared::token::AuthToken;

    use super::TokenStorage;

    /// One file holding nothing but the token
    #[derive(Debug, Clone)]
    pub struct FileTokenStorage {
        path: PathBuf,
    }

    impl FileTokenStorage {
        pub fn new<P: Into<PathBuf>>(path: P) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &std::path::Path {
            &self.path
        }
    }

    impl TokenStorage for FileTokenStorage {
        fn load(&self) -> anyhow::Result<Option<AuthToken>> {
            let contents = match std::fs::read_to_string(&self.path) {
                Ok(contents) => contents,
                Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("failed to read token file: {:?}", self.path))
                }
            };
            // An empty file is the same as no token
            Ok(AuthToken::try_from(contents).ok())
        }

        fn store(&mut self, token: &AuthToken) -> anyhow::Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create folder: {parent:?}"))?;
            }
            std::fs::write(&self.path, token.expose())
                .with_context(|| format!("failed to write token file: {:?}", self.path))
        }

        fn clear(&mut self) -> anyhow::Result<()> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    debug!("no token file to remove");
                    Ok(())
                }
                Err(e) => Err(e)
                    .with_context(|| format!("failed to remove token file: {:?}", self.path)),
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalTokenStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use anyhow::{anyhow, Context as _};
    use vtc_shared::{
        const_config::{client::CLIENT_TOKEN_STORAGE_KEY, navigation::NAV_TOKEN_COOKIE_NAME},
        token::AuthToken,
    };
    use web_sys::wasm_bindgen::JsCast as _;

    use super::TokenStorage;

    /// Browser `localStorage`, mirrored into a cookie so the edge server can
    /// check navigations before the dashboard loads
    #[derive(Debug, Clone, Default)]
    pub struct LocalTokenStorage;

    fn local_storage() -> anyhow::Result<web_sys::Storage> {
        web_sys::window()
            .context("no window")?
            .local_storage()
            .map_err(|e| anyhow!("failed to access local storage: {e:?}"))?
            .context("local storage not available")
    }

    fn set_cookie(value: &str) -> anyhow::Result<()> {
        let document = web_sys::window()
            .context("no window")?
            .document()
            .context("no document")?
            .dyn_into::<web_sys::HtmlDocument>()
            .map_err(|_| anyhow!("document is not an html document"))?;
        document
            .set_cookie(value)
            .map_err(|e| anyhow!("failed to set cookie: {e:?}"))
    }

    impl TokenStorage for LocalTokenStorage {
        fn load(&self) -> anyhow::Result<Option<AuthToken>> {
            let value = local_storage()?
                .get_item(CLIENT_TOKEN_STORAGE_KEY)
                .map_err(|e| anyhow!("failed to read token: {e:?}"))?;
            Ok(value.and_then(|x| AuthToken::try_from(x).ok()))
        }

        fn store(&mut self, token: &AuthToken) -> anyhow::Result<()> {
            local_storage()?
                .set_item(CLIENT_TOKEN_STORAGE_KEY, token.expose())
                .map_err(|e| anyhow!("failed to store token: {e:?}"))?;
            set_cookie(&format!(
                "{NAV_TOKEN_COOKIE_NAME}={}; path=/; SameSite=Lax",
                token.expose()
            ))
        }

        fn clear(&mut self) -> anyhow::Result<()> {
            local_storage()?
                .remove_item(CLIENT_TOKEN_STORAGE_KEY)
                .map_err(|e| anyhow!("failed to remove token: {e:?}"))?;
            set_cookie(&format!("{NAV_TOKEN_COOKIE_NAME}=; path=/; Max-Age=0"))
        }
    }
}
