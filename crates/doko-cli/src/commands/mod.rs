pub mod evening;
pub mod finance;
pub mod finish;
pub mod member;
pub mod penalty;
pub mod play;
pub mod round;
pub mod settings;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use doko_core::evening::Venue;
use doko_core::{ClubSnapshot, EveningSession, Settlement};

/// Pick the evening to work on: the given id, or the latest open one.
fn open_evening_id(club: &ClubSnapshot, id: Option<i64>) -> Result<i64, String> {
    match id {
        Some(id) => club.evening(id).map(|e| e.id()).map_err(|e| e.to_string()),
        None => club
            .latest_open_evening()
            .map(|e| e.id())
            .ok_or_else(|| "no open evening; start one with `doko evening new`".to_string()),
    }
}

/// Human-readable venue of an evening.
fn venue_label(club: &ClubSnapshot, evening: &EveningSession) -> String {
    match evening.venue() {
        Some(Venue::Pub) => "Pub".to_string(),
        Some(Venue::Home(host)) => match club.members.get(host) {
            Some(m) => format!("at {}", m.name),
            None => "at ?".to_string(),
        },
        None => evening.location().to_string(),
    }
}

/// Print standings in seat order.
fn print_standings(evening: &EveningSession) {
    let dealer = evening.dealer().map(|d| d.member_id);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Player", "Points", "Penalties"]);
    for player in evening.players() {
        let name = if Some(player.member_id) == dealer {
            format!("{} (deals)", player.name)
        } else {
            player.name.clone()
        };
        table.add_row(vec![
            name,
            format!("{:+}", player.total_points),
            player.penalties.to_string(),
        ]);
    }
    println!("{table}");
}

/// Print a settlement, ranked, with absent members below.
fn print_settlement(settlement: &Settlement) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "#", "Player", "Points", "Base", "Penalties", "Host", "Fixed", "Pays",
    ]);
    for p in &settlement.participants {
        let name = if p.is_host {
            format!("{} (host)", p.name)
        } else {
            p.name.clone()
        };
        table.add_row(vec![
            p.rank.to_string(),
            name,
            format!("{:+}", p.points),
            format!("{:.2}", p.base_payout),
            format!("{:.2}", p.penalty_cost),
            format!("{:+.2}", p.host_adjustment),
            format!("{:.2}", p.fixed_contribution),
            format!("{:.2}", p.total_payout),
        ]);
    }
    for p in &settlement.non_participants {
        table.add_row(vec![
            "-".to_string(),
            format!("{} (absent)", p.name),
            String::new(),
            format!("{:.2}", p.game_total),
            String::new(),
            String::new(),
            format!("{:.2}", p.fixed_contribution),
            format!("{:.2}", p.total_payout),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "  {} {:.2}",
        "Total income:".bold(),
        settlement.total_income()
    );
}
