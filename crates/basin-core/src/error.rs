use thiserror::Error;

/// Fatal configuration errors, reported before any pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DrainageError {
    /// Both dimensions must be at least 3 so that an interior cell exists.
    #[error("grid is {width}x{height}; need at least 3x3 for an interior cell")]
    GridTooSmall { width: usize, height: usize },

    /// The sample buffer does not match the declared dimensions.
    #[error("elevation buffer holds {actual} samples, expected {expected}")]
    SampleCountMismatch { expected: usize, actual: usize },
}

/// Data-quality findings collected while labeling or accumulating.
///
/// These never abort a run: the affected walk stops and the finding is
/// reported with the coordinates of the cell where it tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QualityWarning {
    /// A flow-path walk revisited a cell already carrying its own in-progress
    /// basin id. Frequent occurrences point at a direction-graph cycle.
    #[error("flow path revisited its own basin at ({x}, {y})")]
    FlowCycle { x: usize, y: usize },

    /// An accumulation walk exceeded the iteration bound without reaching a
    /// terminal cell.
    #[error("flow accumulation from ({x}, {y}) exceeded the iteration bound")]
    AccumulationOverrun { x: usize, y: usize },
}
