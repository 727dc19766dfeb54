use std::io::{self, BufRead, Write};

use colored::Colorize;

use doko_core::TableConsole;
use doko_core::console::format_standings;

use crate::store::SnapshotStore;

pub fn run(store: &SnapshotStore, evening: Option<i64>) -> Result<(), String> {
    let mut club = store.load()?;
    let id = super::open_evening_id(&club, evening)?;
    let mut console = TableConsole::new(&mut club, id).map_err(|e| e.to_string())?;

    println!("  {} evening {id}", "Playing".bold());
    if let Ok(evening) = console.evening() {
        println!("{}", format_standings(evening));
    }
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        match console.process(&line) {
            Ok(reply) => {
                if !reply.text.is_empty() {
                    println!("{}\n", reply.text);
                }
                if reply.changed {
                    if let Err(e) = store.save(console.club_mut()) {
                        tracing::error!(error = %e, "save failed, continuing in memory");
                        println!("{}\n", format!("not saved: {e}").yellow());
                    }
                }
                if reply.quit {
                    break;
                }
            }
            Err(e) => {
                println!("{}\n", e.to_string().yellow());
            }
        }
    }

    Ok(())
}
