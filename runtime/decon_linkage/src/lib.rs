//! Decon Linkage - the points where generated call sites meet the runtime.
//!
//! - handle retrieval: the match step and component steps of a pattern,
//!   individually, so a call site can cache each one
//! - named pattern lookup: a registry of pattern factories declared on user
//!   types, described by [`DeconstructorInfo`] metadata
//! - switch linkage: one dispatcher for an ordered case list
//!
//! # Tracing
//!
//! Enable logging with `RUST_LOG=decon_linkage=debug` (or `decon=debug`
//! prefixes for every crate) after calling [`init_tracing`].

use std::sync::Once;

mod bootstrap;
mod handles;
mod metadata;
mod registry;

pub use bootstrap::switch_bootstrap;
pub use handles::{component_handle, component_handles, match_handle};
pub use metadata::{BindingInfo, DeconstructorInfo, RawDigester};
pub use registry::{
    MemberKey, PatternFactory, PatternMember, PatternRegistry, PatternSource, RefKind,
};

static TRACING_INIT: Once = Once::new();

/// Initialize the tracing subscriber.
///
/// Does nothing unless `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
