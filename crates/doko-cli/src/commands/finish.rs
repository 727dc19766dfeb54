use colored::Colorize;

use crate::store::SnapshotStore;

pub fn run(store: &SnapshotStore, evening: Option<i64>) -> Result<(), String> {
    let mut club = store.load()?;
    let id = super::open_evening_id(&club, evening)?;

    let settlement = club
        .finish_evening(id)
        .map_err(|e| e.to_string())?
        .clone();
    store.save(&mut club)?;

    println!("  {} evening {id}", "Settled".bold());
    println!();
    super::print_settlement(&settlement);
    Ok(())
}
