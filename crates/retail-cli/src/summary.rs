use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::RunResult;

pub fn print_summary(result: &RunResult) {
    if result.dry_run {
        println!("Dry run: nothing was loaded.");
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Entity"),
        header_cell("Table"),
        header_cell("Raw rows"),
        header_cell("Clean rows"),
        header_cell("Dropped"),
        header_cell("Loaded"),
        header_cell("Duration"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    align_column(&mut table, 6, CellAlignment::Right);
    for summary in &result.entities {
        let status = if summary.error.is_some() {
            Cell::new("✗").fg(Color::Red).add_attribute(Attribute::Bold)
        } else if summary.loaded {
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(summary.entity.key()),
            Cell::new(summary.entity.table_name()),
            Cell::new(summary.raw_rows),
            Cell::new(summary.clean_rows),
            Cell::new(summary.raw_rows.saturating_sub(summary.clean_rows)),
            status,
            Cell::new(format!("{:.1?}", summary.duration)),
        ]);
    }
    println!("{table}");
    let errors: Vec<_> = result
        .entities
        .iter()
        .filter_map(|summary| {
            summary
                .error
                .as_ref()
                .map(|error| (summary.entity, error))
        })
        .collect();
    if !errors.is_empty() {
        eprintln!("Errors:");
        for (entity, error) in errors {
            eprintln!("- {entity}: {error}");
        }
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Dim)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}
