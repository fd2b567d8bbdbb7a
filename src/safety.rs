// Safety filter: decides whether a head may legally move onto a cell this turn.

use std::collections::HashSet;

use crate::snapshot::Snapshot;
use crate::types::Coord;

/// Cells treated as unsafe on top of raw body occupancy
pub type HazardSet = HashSet<Coord>;

/// A cell is safe when it is on the board, not covered by any body and not a hazard.
///
/// Every body cell counts, tails included, even though a tail moves away when its
/// snake does not eat this turn.
pub fn is_safe(cell: &Coord, snapshot: &Snapshot, hazards: &HazardSet) -> bool {
    snapshot.in_bounds(cell) && !snapshot.is_occupied(cell) && !hazards.contains(cell)
}
