#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Overview
//!
//! `logging` holds the diagnostics plumbing shared by the harness workspace.
//! Every subsystem of the harness emits `tracing` events under its own target
//! so test drivers can switch individual areas on and off with an
//! [`EnvFilter`](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
//! directive.
//!
//! # Targets
//!
//! | Target | Emitted by |
//! |---|---|
//! | `harness::lifecycle` | init, cleanup, initialize, shutdown |
//! | `harness::conn` | connection create/close, suspension, binary mode |
//! | `harness::listener` | listener create/close |
//! | `harness::pump` | input queueing and delivery |
//! | `harness::capture` | capture buffer overflow |
//!
//! # Invariants
//!
//! - Log output never reaches the capture buffer; it goes to whatever
//!   subscriber the test process installs.
//! - The crate installs no subscriber on its own. Callers opt in through
//!   [`init_tracing`] or [`try_init_tracing`] (feature `tracing`).
//!
//! # Examples
//!
//! ```
//! use logging::Verbosity;
//!
//! let verbosity = Verbosity::from_level(3);
//! assert_eq!(verbosity, Verbosity::Debug);
//! assert_eq!(verbosity.directive(), "harness=debug");
//! ```

mod tracing_macros;
mod verbosity;

#[cfg(feature = "tracing")]
mod tracing_bridge;

pub use verbosity::{HARNESS_TARGET, Verbosity};

#[cfg(feature = "tracing")]
#[cfg_attr(docsrs, doc(cfg(feature = "tracing")))]
pub use tracing_bridge::{build_filter, init_tracing, try_init_tracing};
