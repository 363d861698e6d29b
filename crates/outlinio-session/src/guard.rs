// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// One-run-at-a-time guard backing `is_processing`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use outlinio_core::error::{OutlinioError, Result};

/// Held for the duration of a pipeline run. Dropping it clears the flag, even
/// if the run panicked.
#[derive(Debug)]
pub struct RunGuard {
    flag: Arc<AtomicBool>,
}

impl RunGuard {
    /// Claim the run slot, failing if another run already holds it.
    pub fn acquire(flag: &Arc<AtomicBool>) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                OutlinioError::ProcessingFailure("a sketch run is already in progress".into())
            })?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_run_is_rejected_while_first_is_held() {
        let flag = Arc::new(AtomicBool::new(false));
        let first = RunGuard::acquire(&flag).unwrap();
        assert!(flag.load(Ordering::Acquire));
        assert!(matches!(
            RunGuard::acquire(&flag),
            Err(OutlinioError::ProcessingFailure(_))
        ));
        drop(first);
        assert!(!flag.load(Ordering::Acquire));
        assert!(RunGuard::acquire(&flag).is_ok());
    }

    #[test]
    fn flag_clears_when_the_holder_panics() {
        let flag = Arc::new(AtomicBool::new(false));
        let shared = Arc::clone(&flag);
        let result = std::thread::spawn(move || {
            let _run = RunGuard::acquire(&shared).unwrap();
            panic!("stage blew up");
        })
        .join();
        assert!(result.is_err());
        assert!(!flag.load(Ordering::Acquire));
    }
}
