//! Tactic parameters

use std::fmt;

/// Value of a tactic parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// Boolean parameter
    Bool(bool),
    /// Unsigned numeric parameter
    Uint(u64),
    /// Free-form string parameter
    Str(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Uint(n) => write!(f, "{n}"),
            ParamValue::Str(s) => write!(f, "{s}"),
        }
    }
}

/// Description of a parameter a tactic understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDescr {
    /// Fully qualified key
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Value used when the key is not set
    pub default: ParamValue,
}

/// Configuration of the sine tactic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SineConfig {
    /// Report goal sizes at info level instead of debug
    pub verbose: bool,
}

impl SineConfig {
    /// Key for [`SineConfig::verbose`].
    pub const VERBOSE: &'static str = "sine.verbose";

    /// Set verbosity.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Apply one `key = value` setting. Returns false if the key is not a
    /// sine parameter or the value has the wrong type.
    pub fn update(&mut self, key: &str, value: &ParamValue) -> bool {
        match (key, value) {
            (Self::VERBOSE, ParamValue::Bool(b)) => {
                self.verbose = *b;
                true
            }
            _ => false,
        }
    }

    /// Parameters understood by [`SineConfig::update`].
    #[must_use]
    pub fn param_descrs() -> Vec<ParamDescr> {
        vec![ParamDescr {
            name: Self::VERBOSE,
            description: "report goal size before and after filtering at info level",
            default: ParamValue::Bool(false),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_known_key() {
        let mut config = SineConfig::default();
        assert!(config.update("sine.verbose", &ParamValue::Bool(true)));
        assert!(config.verbose);
    }

    #[test]
    fn test_update_rejects_unknown_key_and_wrong_type() {
        let mut config = SineConfig::default();
        assert!(!config.update("sine.max_depth", &ParamValue::Uint(3)));
        assert!(!config.update("sine.verbose", &ParamValue::Uint(1)));
        assert_eq!(config, SineConfig::default());
    }

    #[test]
    fn test_param_descrs_cover_defaults() {
        let descrs = SineConfig::param_descrs();
        assert_eq!(descrs.len(), 1);
        assert_eq!(descrs[0].name, SineConfig::VERBOSE);
        assert_eq!(descrs[0].default, ParamValue::Bool(SineConfig::default().verbose));
    }
}
