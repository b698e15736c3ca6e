//! SQLite persistence for airsight sessions.
//!
//! This crate provides the key-value store the session core uses to remember
//! recent locations and the theme preference across runs.
//!
//! # Example
//!
//! ```no_run
//! use airsight_store::Store;
//!
//! let store = Store::open(airsight_store::default_db_path())?;
//! store.set("airsight.theme", "light")?;
//! assert_eq!(store.get("airsight.theme")?.as_deref(), Some("light"));
//! # Ok::<(), airsight_store::Error>(())
//! ```

mod error;
mod schema;
mod store;

pub use error::{Error, Result};
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/airsight/state.db`
/// - macOS: `~/Library/Application Support/airsight/state.db`
/// - Windows: `C:\Users\<user>\AppData\Local\airsight\state.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("airsight")
        .join("state.db")
}
