use crate::config::EvictionConfig;

/// Batched front trimming for result buffers.
///
/// Removing from the front of the buffer on every single-step growth would
/// make each request pay for a shift, so trimming waits until the excess over
/// the cap is larger than both `threshold` and `cap / divider`, then removes
/// all of it at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionPolicy {
    threshold: usize,
    divider: usize,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self::from(&EvictionConfig::default())
    }
}

impl From<&EvictionConfig> for EvictionPolicy {
    fn from(config: &EvictionConfig) -> Self {
        Self::new(config.threshold, config.divider)
    }
}

impl EvictionPolicy {
    /// A zero divider is treated as 1.
    pub fn new(threshold: usize, divider: usize) -> Self {
        Self {
            threshold,
            divider: divider.max(1),
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn divider(&self) -> usize {
        self.divider
    }

    /// Number of entries to drop from the front of a buffer of `len` entries
    /// capped at `cap`; 0 while the excess is still inside the hysteresis band.
    pub fn excess_to_remove(&self, len: usize, cap: usize) -> usize {
        let excess = len.saturating_sub(cap);
        if excess > self.threshold && excess > cap / self.divider {
            excess
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_cap_waits_for_threshold() {
        let policy = EvictionPolicy::default();
        // cap/10 = 5 is exceeded long before the absolute threshold
        assert_eq!(policy.excess_to_remove(50 + 5, 50), 0);
        assert_eq!(policy.excess_to_remove(50 + 100, 50), 0);
        assert_eq!(policy.excess_to_remove(50 + 101, 50), 101);
    }

    #[test]
    fn test_large_cap_waits_for_divider() {
        let policy = EvictionPolicy::default();
        assert_eq!(policy.excess_to_remove(5000 + 101, 5000), 0);
        assert_eq!(policy.excess_to_remove(5000 + 500, 5000), 0);
        assert_eq!(policy.excess_to_remove(5000 + 501, 5000), 501);
    }

    #[test]
    fn test_under_cap_never_trims() {
        let policy = EvictionPolicy::new(0, 10);
        assert_eq!(policy.excess_to_remove(3, 10), 0);
        assert_eq!(policy.excess_to_remove(10, 10), 0);
    }
}
