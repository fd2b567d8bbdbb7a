// Threat prediction: cells an opponent of at least our length could move its head onto.

use log::debug;

use crate::safety::HazardSet;
use crate::snapshot::Snapshot;

/// Predicts next-turn head cells of every opponent that would win or tie a head-to-head.
///
/// All four neighbours of such an opponent's head are added; no attempt is made to guess
/// which way it will actually go. Shorter opponents are ignored.
pub fn predict_hazards(snapshot: &Snapshot) -> HazardSet {
    let mut hazards = HazardSet::new();

    for opponent in snapshot
        .opponents
        .iter()
        .filter(|s| s.length >= snapshot.you.length)
    {
        hazards.extend(snapshot.neighbors(opponent.head).map(|(_, cell)| cell));
    }

    debug!(
        "Turn {}: {} hazard cells predicted",
        snapshot.turn,
        hazards.len()
    );
    hazards
}
