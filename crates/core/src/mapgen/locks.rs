//! Lock identifiers and key distribution into treasure chambers.

use crate::map::{Chamber, Map};
use crate::rng::Roller;
use crate::types::{ChamberKind, Item, KeyId, Pos};

fn positions_where(map: &Map, keep: impl Fn(&Chamber) -> bool) -> Vec<Pos> {
    map.chambers().filter(|chamber| keep(chamber)).map(|chamber| chamber.pos).collect()
}

/// Gives every lock its key id and hides one key per lock in a distinct, item-free
/// treasure chamber. Surplus locks keep their id with no key anywhere on the map.
/// Returns the number of such keyless locks.
pub(super) fn place_locks_and_keys(map: &mut Map, roller: &mut impl Roller) -> usize {
    let locks = positions_where(map, |chamber| chamber.kind == ChamberKind::Locked);
    let mut hoards = positions_where(map, |chamber| {
        chamber.kind == ChamberKind::Treasure && chamber.item.is_none()
    });
    roller.shuffle(&mut hoards);

    let mut keyless = 0;
    for (index, lock) in locks.iter().copied().enumerate() {
        let key = KeyId(lock);
        if let Some(chamber) = map.chamber_mut(lock) {
            chamber.required_key = Some(key);
        }
        match hoards.get(index).and_then(|&hoard| map.chamber_mut(hoard)) {
            Some(hoard) => hoard.item = Some(Item::key(key)),
            None => keyless += 1,
        }
    }
    keyless
}
