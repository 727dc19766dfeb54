use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use doko_core::{MemberId, Venue};

use crate::store::SnapshotStore;

pub fn new(store: &SnapshotStore, players: &[String], host: Option<&str>) -> Result<(), String> {
    let mut club = store.load()?;
    let ids = players
        .iter()
        .map(|p| club.resolve_member(p))
        .collect::<Result<Vec<MemberId>, _>>()
        .map_err(|e| e.to_string())?;
    let venue = match host {
        Some(h) => Venue::Home(club.resolve_member(h).map_err(|e| e.to_string())?),
        None => Venue::Pub,
    };

    let id = club.create_evening(&ids, venue).map_err(|e| e.to_string())?;
    store.save(&mut club)?;

    let evening = club.evening(id).map_err(|e| e.to_string())?;
    println!("  {} evening {id} ({})", "Started".bold(), super::venue_label(&club, evening));
    if let Some(dealer) = evening.dealer() {
        println!("  First dealer (sits out): {}", dealer.name);
    }
    Ok(())
}

pub fn list(store: &SnapshotStore) -> Result<(), String> {
    let club = store.load()?;
    if club.evenings.is_empty() {
        println!("  No evenings yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Date", "Venue", "Players", "Rounds", "Status"]);
    for evening in club.evenings.iter().rev() {
        let players: Vec<&str> = evening.players().iter().map(|p| p.name.as_str()).collect();
        table.add_row(vec![
            evening.id().to_string(),
            evening.date().format("%Y-%m-%d %H:%M").to_string(),
            super::venue_label(&club, evening),
            players.join(", "),
            evening.games().len().to_string(),
            if evening.is_finished() { "settled" } else { "open" }.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn show(store: &SnapshotStore, id: Option<i64>) -> Result<(), String> {
    let club = store.load()?;
    let evening = match id {
        Some(id) => club.evening(id).map_err(|e| e.to_string())?,
        None => club.evenings.last().ok_or("no evenings yet")?,
    };

    println!(
        "  {} {} | {} | {} rounds",
        "Evening".bold(),
        evening.date().format("%Y-%m-%d"),
        super::venue_label(&club, evening),
        evening.games().len()
    );
    println!();
    super::print_standings(evening);

    if !evening.games().is_empty() {
        let mut rounds = Table::new();
        rounds.set_content_arrangement(ContentArrangement::Dynamic);
        rounds.set_header(vec!["#", "Mode", "Points", "Winners"]);
        for (i, round) in evening.games().iter().enumerate() {
            let winners: Vec<String> = round
                .winner_ids
                .iter()
                .map(|w| {
                    evening
                        .player(*w)
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| w.to_string())
                })
                .collect();
            rounds.add_row(vec![
                (i + 1).to_string(),
                round.mode.to_string(),
                round.points.to_string(),
                winners.join(", "),
            ]);
        }
        println!();
        println!("{rounds}");
    }

    if let Some(settlement) = evening.settlement() {
        println!();
        super::print_settlement(settlement);
    }
    Ok(())
}
