//! `giftafy catalog`: list the local catalog.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use giftafy_core::search::catalog::{CatalogItem, GiftCatalog};

use crate::state::ClientContext;

pub fn list_catalog(ctx: &ClientContext, json: bool) -> Result<()> {
    let catalog = &ctx.catalog;

    if json {
        let output = serde_json::json!({
            "baseline": catalog.baseline(),
            "bonusGroups": catalog.bonus_groups(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("Baseline").bold());
    println!("{}", item_table(catalog.baseline()));

    for group in catalog.bonus_groups() {
        println!();
        println!(
            "  {} {}",
            style(&group.name).bold(),
            style(format!("(keywords: {})", group.keywords.join(", "))).dim()
        );
        println!("{}", item_table(&group.items));
    }

    println!();
    println!(
        "  {} items in {} bonus group{}",
        style(item_count(catalog)).bold(),
        catalog.bonus_groups().len(),
        if catalog.bonus_groups().len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn item_count(catalog: &GiftCatalog) -> usize {
    catalog.baseline().len()
        + catalog
            .bonus_groups()
            .iter()
            .map(|g| g.items.len())
            .sum::<usize>()
}

fn item_table(items: &[CatalogItem]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Gift").fg(Color::White),
        Cell::new("Price").fg(Color::White),
        Cell::new("Retailer").fg(Color::White),
        Cell::new("Match").fg(Color::White),
    ]);

    for item in items {
        table.add_row(vec![
            Cell::new(&item.record.title),
            Cell::new(&item.record.price).fg(Color::Green),
            Cell::new(&item.record.retailer),
            Cell::new(format!("{}%", item.record.match_score)),
        ]);
    }
    table
}
