//! Session store with tiered lifetimes and counter-scheduled expiry sweeps.
//!
//! This crate provides the session surface over the `tessera-store`
//! storage layer:
//! - [`Session`]: per-request key-value state, loaded on open and
//!   persisted on save under a composite identifier that encodes the
//!   lifetime tier
//! - [`GarbageCollector`]: a counter in a singleton log record decides,
//!   once per session start, whether to sweep expired entries
//! - [`Transport`]: the boundary through which identifiers reach the
//!   outside world (cookies or otherwise)
//! - [`Settings`]: TOML-loadable configuration validated at construction
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tessera_session::{NoTransport, Session, Settings};
//! use tessera_store::FileAdapter;
//!
//! let settings = Settings::new("/var/lib/app/sessions").with_run_rate(25);
//! let mut session = Session::open(
//!     Arc::new(FileAdapter::new()),
//!     Arc::new(NoTransport),
//!     settings,
//!     cookie_value.as_deref(),
//! )?;
//! session.put("user", "ada");
//! session.save()?;
//! ```

mod config;
mod error;
mod gc;
mod session;
mod transport;

pub use config::{
    DEFAULT_COOKIE_NAME, DEFAULT_LONG_TTL_SECS, DEFAULT_RUN_RATE, DEFAULT_SHORT_TTL_SECS,
    DEFAULT_TIER, LONG_TIER, Settings, load_settings_file,
};
pub use error::{Result, SessionError};
pub use gc::GarbageCollector;
pub use session::Session;
pub use transport::{NoTransport, Transport};
