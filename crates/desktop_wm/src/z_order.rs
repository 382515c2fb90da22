//! Z-order watermark allocation.

/// Monotonic "highest z-index" watermark.
///
/// Every promotion takes `highest + 1`. Before allocating, callers resync the watermark against
/// the z-indices actually rendered, since bulk restore or external edits to the surface can leave
/// a rendered value above the counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZOrderAllocator {
    highest_z: u32,
}

impl ZOrderAllocator {
    pub fn highest(&self) -> u32 {
        self.highest_z
    }

    /// Raises the watermark to cover every rendered value. Returns `true` when it was stale.
    pub fn resync<I>(&mut self, rendered: I) -> bool
    where
        I: IntoIterator<Item = u32>,
    {
        let rendered_max = rendered.into_iter().max().unwrap_or(0);
        if rendered_max > self.highest_z {
            self.highest_z = rendered_max;
            true
        } else {
            false
        }
    }

    /// Allocates the next top-of-stack value.
    pub fn next(&mut self) -> u32 {
        self.highest_z = self.highest_z.saturating_add(1);
        self.highest_z
    }

    /// Accounts for an explicitly assigned value (bulk restore).
    pub fn observe(&mut self, z_index: u32) {
        self.highest_z = self.highest_z.max(z_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocations_are_strictly_increasing() {
        let mut z = ZOrderAllocator::default();
        assert_eq!(z.next(), 1);
        assert_eq!(z.next(), 2);
        assert_eq!(z.highest(), 2);
    }

    #[test]
    fn resync_only_ever_raises_the_watermark() {
        let mut z = ZOrderAllocator::default();
        z.next();
        z.next();

        assert!(!z.resync([1, 2]));
        assert!(!z.resync(Vec::new()));
        assert!(z.resync([2, 17, 3]));
        assert_eq!(z.next(), 18);
    }

    #[test]
    fn observed_override_lifts_subsequent_allocations() {
        let mut z = ZOrderAllocator::default();
        z.observe(40);
        z.observe(12);
        assert_eq!(z.next(), 41);
    }
}
