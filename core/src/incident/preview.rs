use std::collections::BTreeSet;

use ulid::Ulid;

/// Handle to a live image preview resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PreviewHandle(Ulid);

/// Tracks preview resources acquired for staged image files.
///
/// Every acquire must be paired with exactly one release before the
/// owning form goes away; `live()` is the leak check the tests lean on.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    live: BTreeSet<PreviewHandle>,
    acquired: u64,
    released: u64,
    stale_releases: u64,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&mut self) -> PreviewHandle {
        let handle = PreviewHandle(Ulid::new());
        self.live.insert(handle);
        self.acquired += 1;
        handle
    }

    /// Release a handle. Releasing twice is tolerated and counted, not an
    /// error; the second release is a no-op.
    pub fn release(&mut self, handle: PreviewHandle) -> bool {
        if self.live.remove(&handle) {
            self.released += 1;
            true
        } else {
            self.stale_releases += 1;
            false
        }
    }

    pub fn release_all(&mut self) {
        self.released += self.live.len() as u64;
        self.live.clear();
    }

    pub fn live(&self) -> usize {
        self.live.len()
    }

    pub fn acquired(&self) -> u64 {
        self.acquired
    }

    pub fn stale_releases(&self) -> u64 {
        self.stale_releases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_release_is_symmetric() {
        let mut registry = PreviewRegistry::new();
        let a = registry.acquire();
        let b = registry.acquire();
        assert_eq!(registry.live(), 2);
        assert!(registry.release(a));
        assert!(registry.release(b));
        assert_eq!(registry.live(), 0);
        assert_eq!(registry.stale_releases(), 0);
    }

    #[test]
    fn double_release_is_idempotent() {
        let mut registry = PreviewRegistry::new();
        let handle = registry.acquire();
        assert!(registry.release(handle));
        assert!(!registry.release(handle));
        assert_eq!(registry.live(), 0);
        assert_eq!(registry.stale_releases(), 1);
    }

    #[test]
    fn release_all_empties_the_registry() {
        let mut registry = PreviewRegistry::new();
        for _ in 0..5 {
            registry.acquire();
        }
        registry.release_all();
        assert_eq!(registry.live(), 0);
        assert_eq!(registry.acquired(), 5);
    }
}
