use std::fmt;

/// Scoped read access to an external model (the IDE's "read action").
///
/// Collaborators hand out a guard whose release callback runs exactly once on
/// drop, so the lock is released on every exit path, including unwinding.
pub struct ReadGuard<'a> {
    release: Option<Box<dyn FnOnce() + 'a>>,
}

impl<'a> ReadGuard<'a> {
    pub fn new(release: impl FnOnce() + 'a) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Guard for collaborators whose reads are always consistent.
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ReadGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadGuard")
            .field("held", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn releases_once_on_drop() {
        let released = Cell::new(0);
        {
            let _guard = ReadGuard::new(|| released.set(released.get() + 1));
            assert_eq!(released.get(), 0);
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn releases_when_unwinding() {
        let released = std::sync::atomic::AtomicBool::new(false);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = ReadGuard::new(|| {
                released.store(true, std::sync::atomic::Ordering::SeqCst);
            });
            panic!("scan failed");
        }));
        assert!(result.is_err());
        assert!(released.load(std::sync::atomic::Ordering::SeqCst));
    }
}
