use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

static ENV_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

/// Holds the process-wide env lock for the duration of a test and restores
/// every variable it touched when dropped.
pub(crate) struct EnvScope {
    saved: Vec<(&'static str, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvScope {
    pub(crate) fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    pub(crate) fn set(&mut self, key: &'static str, value: &str) -> &mut Self {
        self.remember(key);
        // SAFETY: test-only; ENV_LOCK is held for the lifetime of the scope.
        unsafe {
            std::env::set_var(key, value);
        }
        self
    }

    pub(crate) fn unset(&mut self, key: &'static str) -> &mut Self {
        self.remember(key);
        // SAFETY: test-only; ENV_LOCK is held for the lifetime of the scope.
        unsafe {
            std::env::remove_var(key);
        }
        self
    }

    fn remember(&mut self, key: &'static str) {
        if !self.saved.iter().any(|(saved, _)| *saved == key) {
            self.saved.push((key, std::env::var(key).ok()));
        }
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        for (key, previous) in self.saved.drain(..).rev() {
            // SAFETY: the lock guard field is dropped after this body runs.
            unsafe {
                match previous {
                    Some(value) => std::env::set_var(key, value),
                    None => std::env::remove_var(key),
                }
            }
        }
    }
}
