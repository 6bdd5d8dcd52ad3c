//! Public SDK surface for Quill.
//!
//! This crate re-exports the building blocks and provides a small
//! initialization helper to keep consumer setup consistent.

/// Re-export for convenience.
pub use quill_rs_config as config;
pub use quill_rs_core as core;
/// Re-export for convenience.
pub use quill_rs_protocol as protocol;
pub use quill_rs_tui as tui;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::builder()
            .format_timestamp_millis()
            .parse_default_env()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::{config, core, protocol};
    use pretty_assertions::assert_eq;

    #[test]
    fn re_exports_reach_each_crate() {
        super::init_logging();
        let settings = config::QuillSettings::default();
        let registry = core::CommandRegistry::from_settings(&settings.shortcuts);
        assert_eq!(registry.available(false).len(), 3);
        assert_eq!(
            protocol::Message::user("hi").role,
            protocol::Role::User
        );
    }
}
