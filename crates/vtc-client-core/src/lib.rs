//! Backend client shared by every build of the dashboard
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod client;
mod session;
mod storage;

pub use client::{Client, ResponseError, UiCallBack, DUMMY_ARGUMENT};
pub use session::{AuthAction, AuthState, Session, SessionStore};
#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileTokenStorage;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalTokenStorage;
pub use storage::{MemoryTokenStorage, TokenStorage};
