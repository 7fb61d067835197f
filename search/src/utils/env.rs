//! Global parameters that can be overridden from environment variables.
//!
//! The typical usage is to expose internal knobs that are not worth a place in the
//! public API but may be used to tune or debug a search:
//!
//! ```
//! use treesearch::utils::EnvParam;
//! static WIDTH: EnvParam<u32> = EnvParam::new("MYAPP_WIDTH", "4");
//!
//! assert_eq!(WIDTH.get(), 4); // environment variable not set, default applies
//! ```
//!
//! A parameter is read from the environment once, on first access. Later changes to
//! the environment variable are ignored.

use once_cell::sync::OnceCell;
use std::str::FromStr;

pub struct EnvParam<T> {
    var: &'static str,
    default: &'static str,
    value: OnceCell<T>,
}

impl<T> EnvParam<T> {
    pub const fn new(var: &'static str, default: &'static str) -> EnvParam<T> {
        EnvParam {
            var,
            default,
            value: OnceCell::new(),
        }
    }
}

impl<T: FromStr> EnvParam<T> {
    /// Returns the value of the parameter, initializing it from the environment on
    /// the first call. An unparsable environment value falls back to the default.
    ///
    /// # Panics
    ///
    /// Panics if the declared default cannot be parsed, which is a programming error.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        *self.value()
    }

    pub fn value(&self) -> &T {
        self.value.get_or_init(|| match std::env::var(self.var) {
            Ok(raw) => T::from_str(&raw).unwrap_or_else(|_| {
                tracing::warn!(
                    "could not parse \"{}\" for {}, using default \"{}\"",
                    raw,
                    self.var,
                    self.default
                );
                self.parsed_default()
            }),
            Err(_) => self.parsed_default(),
        })
    }

    fn parsed_default(&self) -> T {
        match T::from_str(self.default) {
            Ok(v) => v,
            Err(_) => panic!("{}: invalid default value \"{}\"", self.var, self.default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static UNSET: EnvParam<u64> = EnvParam::new("TREESEARCH_TEST_UNSET_PARAM", "42");

    #[test]
    fn default_applies_when_env_is_absent() {
        assert_eq!(UNSET.get(), 42);
        // repeated accesses hit the cached value
        assert_eq!(UNSET.get(), 42);
    }
}
