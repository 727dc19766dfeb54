use comfy_table::{ContentArrangement, Table};

use crate::store::SnapshotStore;

pub fn add(store: &SnapshotStore, name: &str) -> Result<(), String> {
    let mut club = store.load()?;
    let id = club.add_member(name).map_err(|e| e.to_string())?;
    store.save(&mut club)?;
    println!("Added member '{}' (id {id})", name.trim());
    Ok(())
}

pub fn list(store: &SnapshotStore) -> Result<(), String> {
    let club = store.load()?;
    if club.members.is_empty() {
        println!("  No members yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Name", "Evenings"]);
    for member in club.members.iter() {
        let evenings = club
            .evenings
            .iter()
            .filter(|e| e.participant_ids().contains(&member.id))
            .count();
        table.add_row(vec![member.id.to_string(), member.name.clone(), evenings.to_string()]);
    }
    println!("{table}");
    println!();
    println!("  {} members", club.members.len());
    Ok(())
}

pub fn remove(store: &SnapshotStore, member: &str) -> Result<(), String> {
    let mut club = store.load()?;
    let id = club.resolve_member(member).map_err(|e| e.to_string())?;
    club.remove_member(id).map_err(|e| e.to_string())?;
    store.save(&mut club)?;
    println!("Removed member {id}");
    Ok(())
}
