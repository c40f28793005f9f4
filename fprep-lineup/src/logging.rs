//! Tracing subscriber setup for the binary
//!
//! The subscriber is installed before configuration is resolved so that
//! config-resolution events are not lost. The level from the config file is
//! applied afterwards through a reload handle, unless `RUST_LOG` is set.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Level used until the configured one is known
pub const DEFAULT_LEVEL: &str = "info";

/// Filter directive covering both workspace crates
pub fn filter_directive(level: &str) -> String {
    format!("fprep_lineup={level},fprep_common={level}")
}

/// Handle for changing the filter after startup
pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// Reloadable filter layer and its handle
    ///
    /// `from_env` marks a filter taken from `RUST_LOG`, which config never overrides.
    pub fn layer(initial: EnvFilter, from_env: bool) -> (reload::Layer<EnvFilter, Registry>, Self) {
        let (layer, handle) = reload::Layer::new(initial);
        (layer, Self { handle, from_env })
    }

    /// Apply the configured level
    pub fn apply_level(&self, level: &str) -> anyhow::Result<()> {
        if self.from_env {
            return Ok(());
        }
        let filter = EnvFilter::try_new(filter_directive(level))?;
        self.handle.reload(filter)?;
        Ok(())
    }

    /// Current filter, as text
    pub fn current_filter(&self) -> Option<String> {
        self.handle.with_current(|filter| filter.to_string()).ok()
    }
}

/// Install the global subscriber (stderr, so stdout stays JSON)
pub fn init() -> LogHandle {
    let (initial, from_env) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(filter_directive(DEFAULT_LEVEL)), false),
    };

    let (filter_layer, handle) = LogHandle::layer(initial, from_env);
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
    handle
}
