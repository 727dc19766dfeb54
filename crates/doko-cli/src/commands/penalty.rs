use doko_core::PenaltyDelta;

use crate::store::SnapshotStore;

pub fn run(
    store: &SnapshotStore,
    evening: Option<i64>,
    player: &str,
    remove: bool,
) -> Result<(), String> {
    let mut club = store.load()?;
    let id = super::open_evening_id(&club, evening)?;
    let member = club.resolve_member(player).map_err(|e| e.to_string())?;
    let delta = if remove {
        PenaltyDelta::Remove
    } else {
        PenaltyDelta::Add
    };

    let evening = club.evening_mut(id).map_err(|e| e.to_string())?;
    let count = evening
        .adjust_penalty(member, delta)
        .map_err(|e| e.to_string())?;
    let name = evening
        .player(member)
        .map(|p| p.name.clone())
        .unwrap_or_default();
    println!("  {name}: {count} penalties");

    store.save(&mut club)
}
