use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use doko_core::FinanceOverview;

use crate::store::SnapshotStore;

pub fn run(store: &SnapshotStore) -> Result<(), String> {
    let club = store.load()?;
    let overview = FinanceOverview::from_snapshot(&club);

    if overview.settled_evenings == 0 {
        println!("  No settled evenings yet.");
        return Ok(());
    }

    println!(
        "  {} {} settled evenings | total income {:.2} | per evening {:.2}",
        "Finances:".bold(),
        overview.settled_evenings,
        overview.total_income,
        overview.average_income
    );
    println!();

    let mut members = Table::new();
    members.set_content_arrangement(ContentArrangement::Dynamic);
    members.set_header(vec!["Member", "Evenings", "Total paid"]);
    for m in &overview.members {
        members.add_row(vec![
            m.name.clone(),
            m.evenings_attended.to_string(),
            format!("{:.2}", m.total_paid),
        ]);
    }
    println!("{members}");
    println!();

    let mut evenings = Table::new();
    evenings.set_content_arrangement(ContentArrangement::Dynamic);
    evenings.set_header(vec!["Date", "Rounds", "Income"]);
    for e in &overview.evenings {
        evenings.add_row(vec![
            e.date.format("%Y-%m-%d").to_string(),
            e.rounds.to_string(),
            format!("{:.2}", e.income),
        ]);
    }
    println!("{evenings}");
    Ok(())
}
