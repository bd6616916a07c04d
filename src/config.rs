//! Config for the arena behaviors.
//!
//! Configuration can be created programmatically using [`Configuration::new()`]
//! or by reading environment variables using [`Configuration::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional and case-insensitive; set to `"true"` to enable.
//!
//! - `QUANTIK_VERBOSE`: print match results to stdout (default: `true`)
//! - `QUANTIK_LOG`: enable logging to a file (default: `false`)

/// Configuration for arena behaviors.
#[derive(Debug, Clone, Copy)]
pub struct Configuration {
    pub(crate) verbose: bool,
    pub(crate) log: bool,
}

impl Configuration {
    /// Create a new configuration with default parameters.
    ///
    /// By default the arena prints match results to stdout and does not log
    /// to a file.
    pub fn new() -> Self {
        Self {
            verbose: true,
            log: false,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Recognized variables:
    /// - `QUANTIK_VERBOSE`: if set to `"true"`, enables verbose output (default: `true`)
    /// - `QUANTIK_LOG`: if set to `"true"`, enables logging to file (default: `false`)
    ///
    /// Any other value (including unset) falls back to the default.
    pub fn from_env() -> Self {
        fn get_env_flag(var: &str, default: bool) -> bool {
            match std::env::var(var) {
                Ok(val) => val.eq_ignore_ascii_case("true"),
                Err(_) => default,
            }
        }

        Self {
            verbose: get_env_flag("QUANTIK_VERBOSE", true),
            log: get_env_flag("QUANTIK_LOG", false),
        }
    }

    /// Enable or disable printing match results to stdout.
    pub fn with_verbose(mut self, value: bool) -> Self {
        self.verbose = value;
        self
    }

    /// Enable or disable logging to file.
    pub fn with_log(mut self, value: bool) -> Self {
        self.log = value;
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}
