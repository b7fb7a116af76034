//! Draw operation lifecycle and the per-voxel protocol

#[cfg(debug_assertions)]
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::core::config::DrawConfig;
use crate::core::types::IVec3;
use crate::math::BoundingBox;
use crate::session::{Actor, Authorizer};
use crate::voxel::brush::{BrushInstance, PaintContext, RestoreInstance};
use crate::voxel::grid::Grid;
use super::ledger::{UndoLedger, UndoRecord};
use super::shape::{DrawKind, Shape, Traversal};
use super::{DrawError, DrawInfo};

/// Collaborators an operation works against
pub struct DrawContext<'a> {
    pub grid: &'a mut dyn Grid,
    pub authorizer: &'a dyn Authorizer,
    pub actor: &'a mut dyn Actor,
}

impl<'a> DrawContext<'a> {
    pub fn new(grid: &'a mut dyn Grid, authorizer: &'a dyn Authorizer, actor: &'a mut dyn Actor) -> Self {
        Self { grid, authorizer, actor }
    }
}

/// Lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawState {
    /// Constructed, waiting for `prepare`
    Pending,
    /// Prepared; batches may run
    Running,
    /// Every voxel resolved
    Done,
    /// Stopped by a cancel request
    Cancelled,
}

/// Per-voxel outcome counters. `processed == mutated + denied + skipped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub processed: u64,
    pub mutated: u64,
    pub denied: u64,
    pub skipped: u64,
}

/// Shared cancel flag, cloneable across drivers
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Final report of a finished operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSummary {
    pub kind: DrawKind,
    pub brush: String,
    pub state: DrawState,
    pub stats: DrawStats,
    /// Whether the recorded history can undo the edit
    pub restorable: bool,
}

impl fmt::Display for DrawSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} with {}: {} blocks changed, {} denied, {} skipped",
            self.kind, self.brush, self.stats.mutated, self.stats.denied, self.stats.skipped
        )?;
        if self.state == DrawState::Cancelled {
            f.write_str(" (cancelled)")?;
        }
        if !self.restorable {
            f.write_str(" (cannot be undone)")?;
        }
        Ok(())
    }
}

/// One edit: a region, a brush instance, and the progress through both.
///
/// Driven as `prepare → run_batch* → finish`. Batches resume where the
/// previous one stopped. The engine spawns no threads and takes no locks;
/// it assumes a single writer per grid.
#[derive(Debug)]
pub struct DrawOperation {
    kind: DrawKind,
    brush: Box<dyn BrushInstance>,
    seed: u64,
    use_alternate: bool,
    max_volume: Option<u64>,
    /// Source history of an undo operation, consumed at `prepare`
    history: Option<UndoLedger>,
    info: Option<DrawInfo>,
    traversal: Option<Traversal>,
    undo: UndoLedger,
    stats: DrawStats,
    estimate: u64,
    state: DrawState,
    cancel: CancelToken,
    #[cfg(debug_assertions)]
    visited: HashSet<IVec3>,
}

impl DrawOperation {
    /// Create an operation of `kind` painting with `brush`.
    pub fn new(kind: DrawKind, brush: Box<dyn BrushInstance>, config: &DrawConfig) -> Self {
        Self {
            kind,
            brush,
            seed: config.operation_seed(),
            use_alternate: false,
            max_volume: config.max_volume,
            history: None,
            info: None,
            traversal: None,
            undo: UndoLedger::new(config.undo_capacity),
            stats: DrawStats::default(),
            estimate: 0,
            state: DrawState::Pending,
            cancel: CancelToken::new(),
            #[cfg(debug_assertions)]
            visited: HashSet::new(),
        }
    }

    /// Create an operation restoring the blocks recorded in `history`.
    /// Its own ledger records what it overwrites, so finishing it yields
    /// the redo history.
    pub fn undo(history: UndoLedger, config: &DrawConfig) -> Self {
        let brush = Box::new(RestoreInstance::from_ledger(&history));
        let mut op = Self::new(DrawKind::Undo, brush, config);
        op.history = Some(history);
        op
    }

    /// Ask the brush for its secondary action
    pub fn with_alternate(mut self, use_alternate: bool) -> Self {
        self.use_alternate = use_alternate;
        self
    }

    /// Override the generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn kind(&self) -> DrawKind {
        self.kind
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    /// Approximate voxel count computed at `prepare`
    pub fn estimate(&self) -> u64 {
        self.estimate
    }

    /// Region brushes paint in, clipped to the grid, once prepared
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.info.as_ref().map(|info| info.bounds)
    }

    pub fn is_done(&self) -> bool {
        self.state == DrawState::Done
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == DrawState::Cancelled
    }

    /// Prepared and neither done nor cancelled
    pub fn is_running(&self) -> bool {
        self.state == DrawState::Running
    }

    /// Edit history recorded so far
    pub fn undo_ledger(&self) -> &UndoLedger {
        &self.undo
    }

    /// Request cancellation. Observed at the start of the next batch.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Handle for cancelling from elsewhere
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Progress in percent, clamped to 100
    pub fn percent_done(&self) -> u64 {
        if self.is_done() {
            return 100;
        }
        if self.estimate == 0 {
            return 0;
        }
        (self.stats.processed.saturating_mul(100) / self.estimate).min(100)
    }

    /// Validate marks, compute the region and begin the brush.
    ///
    /// This is the only point at which an edit is rejected as a whole; on
    /// error nothing has been mutated and the operation should be dropped.
    pub fn prepare(&mut self, marks: &[IVec3], ctx: &mut DrawContext<'_>) -> Result<(), DrawError> {
        if self.state != DrawState::Pending {
            return Err(DrawError::InvalidState("operation already prepared"));
        }

        let shape = match self.history.as_ref() {
            Some(history) => {
                if !marks.is_empty() {
                    return Err(DrawError::WrongMarkCount { expected: 0, got: marks.len() });
                }
                if !history.is_restorable() {
                    return Err(DrawError::NotRestorable);
                }
                if history.is_empty() {
                    return Err(DrawError::NothingToUndo);
                }
                Shape::Points(history.entries().iter().map(|e| e.coord).collect())
            }
            None => Shape::from_marks(self.kind, marks)?,
        };

        let full = shape.bounds().ok_or(DrawError::NothingToUndo)?;
        let clipped = full.intersection(&ctx.grid.bounds());
        let (bounds, estimate) = if shape.clips_to_grid() {
            let clipped = clipped.ok_or(DrawError::OutsideWorld)?;
            (clipped, shape.estimate().min(clipped.volume()))
        } else {
            // Off-grid voxels are walked and skipped, but brushes only ever
            // paint inside the grid, so they see the clipped region.
            // A line that misses the grid entirely paints nothing.
            (clipped.unwrap_or(BoundingBox::from_corners(full.min, full.min)), shape.estimate())
        };

        if self.kind != DrawKind::Undo {
            if let Some(limit) = self.max_volume.filter(|limit| estimate > *limit) {
                return Err(DrawError::TooLarge { estimate, limit });
            }
        }

        let info = DrawInfo::new(self.kind.name(), bounds, self.seed).with_alternate(self.use_alternate);
        self.brush.begin(&*ctx.actor, &info)?;

        log::info!(
            "{} started {} with {} over {:?}..{:?}, about {} blocks",
            ctx.actor.name(),
            self.kind,
            self.brush.description(),
            bounds.min,
            bounds.max,
            estimate
        );

        self.history = None;
        self.traversal = Some(shape.traversal(bounds));
        self.info = Some(info);
        self.estimate = estimate;
        self.state = DrawState::Running;
        Ok(())
    }

    /// Resolve voxels until `quota` of them were mutated or the region is
    /// exhausted. Returns the number mutated by this call.
    pub fn run_batch(&mut self, quota: usize, ctx: &mut DrawContext<'_>) -> usize {
        if self.state != DrawState::Running {
            return 0;
        }
        if self.cancel.is_cancelled() {
            log::warn!("{} cancelled {} after {} blocks", ctx.actor.name(), self.kind, self.stats.mutated);
            self.state = DrawState::Cancelled;
            return 0;
        }
        let Some(mut traversal) = self.traversal.take() else {
            self.state = DrawState::Done;
            return 0;
        };

        let mut done = 0;
        while done < quota {
            let Some(coord) = traversal.next() else {
                break;
            };
            if self.resolve(coord, ctx) {
                done += 1;
            }
        }

        if traversal.is_finished() {
            self.state = DrawState::Done;
        }
        self.traversal = Some(traversal);

        log::debug!(
            "{} batch: {} mutated, {}/{} processed ({}%)",
            self.kind,
            done,
            self.stats.processed,
            self.estimate,
            self.percent_done()
        );
        done
    }

    /// Per-voxel protocol. Returns true when the voxel was mutated.
    fn resolve(&mut self, coord: IVec3, ctx: &mut DrawContext<'_>) -> bool {
        #[cfg(debug_assertions)]
        assert!(self.visited.insert(coord), "voxel {coord} resolved twice");

        self.stats.processed += 1;

        if !ctx.grid.in_bounds(coord) {
            self.stats.skipped += 1;
            return false;
        }

        let Some(info) = self.info.as_ref() else {
            self.stats.skipped += 1;
            return false;
        };
        let paint = PaintContext { coord, info, grid: &*ctx.grid };
        let Some(block) = self.brush.next_block(&paint) else {
            self.stats.skipped += 1;
            return false;
        };

        let previous = ctx.grid.get_block(coord);
        if previous == block {
            self.stats.skipped += 1;
            return false;
        }

        if !ctx.authorizer.can_place(&*ctx.actor, coord, block).is_allowed() {
            self.stats.denied += 1;
            return false;
        }

        if !ctx.grid.set_block(coord, block) {
            self.stats.skipped += 1;
            return false;
        }

        if self.undo.record(coord, previous) == UndoRecord::Overflowed {
            log::warn!(
                "{} exceeded {} undo entries, {} will not be undoable",
                ctx.actor.name(),
                self.undo.capacity(),
                self.kind
            );
            ctx.actor.notify(&format!(
                "This edit changes more than {} blocks and cannot be undone",
                self.undo.capacity()
            ));
        }

        self.stats.mutated += 1;
        true
    }

    /// Wrap up the edit: report statistics, release the brush and hand the
    /// history to the actor. Performs no further mutation.
    pub fn finish(mut self, ctx: &mut DrawContext<'_>) -> DrawSummary {
        if self.state == DrawState::Running {
            log::warn!("{} finished while still running, treating as cancelled", self.kind);
            self.state = DrawState::Cancelled;
        }

        let summary = DrawSummary {
            kind: self.kind,
            brush: self.brush.description(),
            state: self.state,
            stats: self.stats,
            restorable: self.undo.is_restorable(),
        };

        ctx.actor.report_mutated(self.stats.mutated);
        self.brush.end();
        log::info!(
            "{} finished {}: {:?} in state {:?}",
            ctx.actor.name(),
            self.kind,
            self.stats,
            self.state
        );

        if self.state != DrawState::Pending {
            ctx.actor.notify(&summary.to_string());
        }
        if self.stats.mutated > 0 {
            ctx.actor.record_undo(self.undo);
        }
        summary
    }
}
