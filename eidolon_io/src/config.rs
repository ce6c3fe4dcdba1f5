//! Matrix allocation and shared-memory configuration.

/// Default minimum number of rows added when a local matrix grows.
pub const DEFAULT_MIN_GROWTH_ROWS: usize = 1000;

/// Default prefix for shared segment names.
pub const DEFAULT_NAME_PREFIX: &str = "__viz__";

/// Default number of alternative names tried when a shared name is taken.
pub const DEFAULT_MAX_NAME_RETRIES: usize = 100_000;

/// Growth, naming and permission settings used by [`crate::Matrix`] and the shared backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixConfig {
    /// Lower bound on the capacity of a grown matrix.
    pub min_growth_rows: usize,
    /// Growth factor numerator applied to the current row count.
    pub growth_num: usize,
    /// Growth factor denominator applied to the current row count.
    pub growth_den: usize,
    /// Prefix of every shared segment name.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_prefix"))]
    pub name_prefix: &'static str,
    /// How many alternative names to try before giving up on a shared create.
    pub max_name_retries: usize,
    /// Permission bits for created segments.
    pub shared_mode: u32,
}

#[cfg(feature = "serde")]
fn default_prefix() -> &'static str {
    DEFAULT_NAME_PREFIX
}

impl MatrixConfig {
    /// Create a configuration with the default settings.
    #[inline]
    pub const fn new() -> Self {
        Self {
            min_growth_rows: DEFAULT_MIN_GROWTH_ROWS,
            growth_num: 3,
            growth_den: 2,
            name_prefix: DEFAULT_NAME_PREFIX,
            max_name_retries: DEFAULT_MAX_NAME_RETRIES,
            shared_mode: 0o600,
        }
    }

    /// Builder method: set the minimum growth.
    pub const fn with_min_growth_rows(mut self, rows: usize) -> Self {
        self.min_growth_rows = rows;
        self
    }

    /// Builder method: set the growth factor as a fraction.
    pub const fn with_growth(mut self, num: usize, den: usize) -> Self {
        self.growth_num = num;
        self.growth_den = den;
        self
    }

    /// Builder method: set the shared name prefix.
    pub const fn with_name_prefix(mut self, prefix: &'static str) -> Self {
        self.name_prefix = prefix;
        self
    }

    /// Builder method: set the retry cap for shared names.
    pub const fn with_max_name_retries(mut self, retries: usize) -> Self {
        self.max_name_retries = retries;
        self
    }

    /// Builder method: set the permission bits of created segments.
    pub const fn with_shared_mode(mut self, mode: u32) -> Self {
        self.shared_mode = mode;
        self
    }

    /// Row capacity to reallocate to when `n` rows plus `extra` reserved rows no
    /// longer fit: `max(min_growth_rows, n * growth + extra)`.
    #[inline]
    pub fn grown_capacity(&self, n: usize, extra: usize) -> usize {
        let scaled = n.saturating_mul(self.growth_num) / self.growth_den.max(1);
        self.min_growth_rows.max(scaled.saturating_add(extra))
    }
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self::new()
    }
}
