//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

use env_logger::{Builder, Env};

/// Initialize the logging system
///
/// Defaults to `Info` and honours `RUST_LOG` when it is set.
pub fn init() {
    init_with_level(log::LevelFilter::Info);
}

/// Initialize the logging system with an explicit default level
pub fn init_with_level(level: log::LevelFilter) {
    // A second init (tests, embedding apps) is not an error worth surfacing.
    let _ = builder(Env::default(), level).try_init();
}

fn builder(env: Env<'_>, level: log::LevelFilter) -> Builder {
    Builder::from_env(env.default_filter_or(level.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::LevelFilter;

    #[test]
    fn test_default_level_applies_without_filter_variable() {
        let env = Env::new().filter("RIPPLE_ENGINE_TEST_LOG_UNSET");
        assert_eq!(builder(env, LevelFilter::Debug).build().filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_filter_variable_overrides_default_level() {
        std::env::set_var("RIPPLE_ENGINE_TEST_LOG_WARN", "warn");
        let env = Env::new().filter("RIPPLE_ENGINE_TEST_LOG_WARN");
        assert_eq!(builder(env, LevelFilter::Debug).build().filter(), LevelFilter::Warn);
    }
}
