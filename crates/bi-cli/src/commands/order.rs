use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use bi_engine::{Bracket, Viewer};

const DIVIDER: &str = "~ here be bad guys ~";

pub fn run(
    path: &Path,
    viewer: Viewer,
    no_dex: bool,
    json: bool,
    debug: bool,
) -> Result<(), String> {
    let slot = super::load_encounter(path)?;
    let engine = super::engine(no_dex, debug);
    let view = engine.tracker(&slot, viewer).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&view).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    if view.rows.is_empty() {
        println!("  No combatants in the encounter.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Init", "Side", "Bracket"]);

    let divider_row = || {
        vec![
            String::new(),
            DIVIDER.to_string(),
            String::new(),
            String::new(),
            String::new(),
        ]
    };

    for (pos, row) in view.rows.iter().enumerate() {
        if row.divider_before {
            table.add_row(divider_row());
        }
        table.add_row(vec![
            (pos + 1).to_string(),
            row.name.clone(),
            row.initiative.map_or_else(|| "--".to_string(), |v| v.to_string()),
            (if row.ally { "ally" } else { "enemy" }).to_string(),
            match row.bracket {
                Bracket::Index(i) => i.to_string(),
                Bracket::Unassigned => "-".to_string(),
            },
        ]);
        if row.divider_after {
            table.add_row(divider_row());
        }
    }

    println!("{table}");
    println!();
    println!(
        "  {} combatants in {} brackets",
        view.rows.len(),
        view.partition.bracket_count()
    );

    if !view.partition.needs_roll.is_empty() {
        let names: Vec<&str> = view
            .rows
            .iter()
            .filter(|r| r.bracket == Bracket::Unassigned)
            .map(|r| r.name.as_str())
            .collect();
        println!("  {} {}", "Needs roll:".yellow().bold(), names.join(", "));
    }

    Ok(())
}
