//! Extension point for redirecting unresolved sinks to an alternate outlet.
//!
//! The intended follow-up to sink handling: walk the boundary of a basin that
//! ends in a sink, find the lowest boundary cell whose flow leaves the basin,
//! and reroute the sink's flow toward it. Only the interface is fixed here;
//! the search strategy and its tie-breaking are deliberately unspecified.

/// A proposed rerouting of a sink-terminated basin's flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutletRedirect {
    /// Boundary cell acting as the alternate outlet.
    pub outlet: usize,
    /// Cell outside the basin that the outlet drains toward.
    pub target: usize,
}

/// Strategy for picking an alternate outlet for a sink-terminated basin.
///
/// `boundary` is the basin's cached boundary cell set, as produced by
/// [`super::watershed::BasinGrid::boundary_cells`]. Implementations return
/// `None` when the basin has no usable outlet (for example, when it is
/// genuinely endorheic).
pub trait OutletSearch {
    fn find_outlet(&self, basin: u8, boundary: &[usize]) -> Option<OutletRedirect>;
}
