use colored::Colorize;

use doko_core::{GameMode, RoundDraft};

use crate::store::SnapshotStore;

pub fn run(
    store: &SnapshotStore,
    evening: Option<i64>,
    winners: &[String],
    points: &str,
    solo: bool,
) -> Result<(), String> {
    let mut club = store.load()?;
    let id = super::open_evening_id(&club, evening)?;

    let mut draft = RoundDraft::new();
    draft.set_mode(if solo { GameMode::Solo } else { GameMode::Normal });
    for winner in winners {
        let member = club.resolve_member(winner).map_err(|e| e.to_string())?;
        if !draft.toggle_winner(member) {
            println!(
                "  {} {winner}: at most {} winners in a {} round",
                "Ignored".yellow(),
                draft.mode().max_winners(),
                draft.mode()
            );
        }
    }
    draft.set_points(points);

    let evening = club.evening_mut(id).map_err(|e| e.to_string())?;
    let number = {
        evening.record_round(&mut draft).map_err(|e| e.to_string())?;
        evening.games().len()
    };
    println!("  {} round {number}", "Recorded".bold());
    if let Some(dealer) = evening.dealer() {
        println!("  Next dealer (sits out): {}", dealer.name);
    }
    println!();
    super::print_standings(evening);

    store.save(&mut club)
}
