#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `moo_net_harness` is the facade for the network harness workspace. It
//! re-exports the [`harness`] crate, which replaces a MOO server's socket
//! layer with a deterministic in-process one, and the [`logging`] crate,
//! which sets up tracing for it.
//!
//! # Examples
//!
//! ```
//! use moo_net_harness::{HarnessConfig, Verbosity};
//!
//! let config = HarnessConfig::builder()
//!     .max_connections(4)
//!     .build()
//!     .expect("valid config");
//! assert_eq!(config.max_connections(), 4);
//! assert_eq!(Verbosity::from_level(0).directive(), "harness=off");
//! ```

pub use harness::*;
pub use logging::{HARNESS_TARGET, Verbosity};

#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
pub use logging::{build_filter, init_tracing, try_init_tracing};
