//! Chunk and memory governor
//!
//! Enforces the injected [`ResourceBudget`] over every chunked loop in the
//! pipeline: a running byte estimate checked before each tile, a hard abort
//! when the ceiling is crossed mid-run, and a cancellation token observed at
//! every tile and stage boundary. The host computes the budget from the
//! memory it is actually willing to spend; the engine never introspects the
//! process heap itself.

use crate::buffer::CHANNELS;
use crate::error::PixliftError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Hard resource ceilings for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct ResourceBudget {
    /// Reject input files larger than this before decoding.
    pub max_input_bytes: usize,

    /// Pixel ceiling for the resampling path. The planner shrinks the scale
    /// factor so the output never exceeds it.
    pub max_working_pixels: u64,

    /// Tighter pixel ceiling for the segmentation path; larger images are
    /// segmented at reduced resolution and the mask is scaled back up.
    pub max_segmentation_pixels: u64,

    /// Hard ceiling on the estimated transient working set, in bytes.
    pub max_bytes: usize,
}

impl Default for ResourceBudget {
    fn default() -> Self {
        Self {
            max_input_bytes: 50 * 1024 * 1024,
            max_working_pixels: 2_100_000,
            max_segmentation_pixels: 1_200_000,
            max_bytes: 128 * 1024 * 1024,
        }
    }
}

/// Shared cancellation flag, checked at tile and stage boundaries only
/// (never mid-pixel-loop). Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Per-invocation governor wrapping a budget and a cancellation token.
///
/// Tiled loops call [`Governor::charge`] before working on a tile and
/// [`Governor::release`] afterwards; the running estimate therefore tracks
/// the peak transient working set, not the cumulative total.
#[derive(Debug)]
pub struct Governor {
    budget: ResourceBudget,
    cancel: CancelToken,
    in_flight_bytes: AtomicUsize,
}

impl Governor {
    pub fn new(budget: ResourceBudget, cancel: CancelToken) -> Self {
        Self {
            budget,
            cancel,
            in_flight_bytes: AtomicUsize::new(0),
        }
    }

    pub fn budget(&self) -> &ResourceBudget {
        &self.budget
    }

    /// Estimate the bytes a stage will touch for `pixels` pixels across
    /// `passes` full-buffer passes.
    pub fn estimate_bytes(pixels: u64, passes: u32) -> usize {
        (pixels as usize)
            .saturating_mul(CHANNELS)
            .saturating_mul(passes.max(1) as usize)
    }

    /// Cancellation checkpoint. Called between stages and between tiles.
    pub fn checkpoint(&self) -> Result<(), PixliftError> {
        if self.cancel.is_cancelled() {
            return Err(PixliftError::Cancelled);
        }
        Ok(())
    }

    /// Admit one tile's worth of work into the running estimate, aborting
    /// with `MemoryLimitExceeded` if the ceiling would be crossed.
    pub fn charge(&self, pixels: u64, passes: u32) -> Result<TileCharge<'_>, PixliftError> {
        self.checkpoint()?;
        let bytes = Self::estimate_bytes(pixels, passes);
        let prior = self.in_flight_bytes.fetch_add(bytes, Ordering::SeqCst);
        let estimated = prior + bytes;
        if estimated > self.budget.max_bytes {
            // Roll back so parallel siblings see a consistent estimate.
            self.in_flight_bytes.fetch_sub(bytes, Ordering::SeqCst);
            return Err(PixliftError::MemoryLimitExceeded {
                estimated,
                limit: self.budget.max_bytes,
            });
        }
        Ok(TileCharge {
            governor: self,
            bytes,
        })
    }

    fn release(&self, bytes: usize) {
        self.in_flight_bytes.fetch_sub(bytes, Ordering::SeqCst);
    }
}

/// RAII guard for one tile's admitted byte estimate.
#[derive(Debug)]
pub struct TileCharge<'a> {
    governor: &'a Governor,
    bytes: usize,
}

impl Drop for TileCharge<'_> {
    fn drop(&mut self) {
        self.governor.release(self.bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_within_budget_succeeds() {
        let governor = Governor::new(ResourceBudget::default(), CancelToken::new());
        let charge = governor.charge(256 * 256, 2).unwrap();
        drop(charge);
        assert_eq!(governor.in_flight_bytes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn exceeding_budget_aborts() {
        let budget = ResourceBudget {
            max_bytes: 1024,
            ..ResourceBudget::default()
        };
        let governor = Governor::new(budget, CancelToken::new());
        let err = governor.charge(10_000, 4).unwrap_err();
        assert!(matches!(err, PixliftError::MemoryLimitExceeded { .. }));
        // Failed charge must not leak into the running estimate.
        assert_eq!(governor.in_flight_bytes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancellation_observed_at_checkpoint() {
        let cancel = CancelToken::new();
        let governor = Governor::new(ResourceBudget::default(), cancel.clone());
        assert!(governor.checkpoint().is_ok());
        cancel.cancel();
        assert!(matches!(governor.checkpoint(), Err(PixliftError::Cancelled)));
        assert!(matches!(
            governor.charge(16, 1),
            Err(PixliftError::Cancelled)
        ));
    }
}
