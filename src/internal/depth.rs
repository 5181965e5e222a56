//! Recursion depth guard for factory evaluation.

use std::cell::Cell;

use crate::error::{DiError, DiResult};

// Thread-local count of factory evaluations currently on the stack
thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Guard for one level of factory evaluation.
///
/// Entering fails once `max_depth` evaluations are already in progress on
/// this thread, turning runaway recursion (a factory that ends up asking for
/// itself) into [`DiError::DepthExceeded`] instead of a stack overflow.
pub(crate) struct DepthGuard {
    _private: (),
}

impl DepthGuard {
    pub(crate) fn enter(max_depth: usize) -> DiResult<Self> {
        DEPTH.with(|depth| {
            let current = depth.get();
            if current >= max_depth {
                return Err(DiError::DepthExceeded(current));
            }
            depth.set(current + 1);
            Ok(Self { _private: () })
        })
    }

    #[cfg(test)]
    pub(crate) fn current() -> usize {
        DEPTH.with(Cell::get)
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}
