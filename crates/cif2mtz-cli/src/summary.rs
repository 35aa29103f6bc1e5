use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{BlockReport, Failure, RunReport};

pub fn print_summary(report: &RunReport) {
    println!("Input: {}", report.input.display());
    if let Some(spec) = &report.spec {
        println!("Spec: {}", spec.display());
    }
    println!("{}", summary_table(report));
}

fn summary_table(report: &RunReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Block"),
        header_cell("Output"),
        header_cell("Data"),
        header_cell("Reflections"),
        header_cell("Columns"),
        header_cell("Warnings"),
        header_cell("Status"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Center);

    let mut total_reflections = 0;
    let mut total_warnings = 0;
    for block in &report.blocks {
        total_reflections += block.reflections;
        total_warnings += block.warnings.len();
        table.add_row(vec![
            Cell::new(&block.block).add_attribute(Attribute::Bold),
            Cell::new(block.output.display()),
            mode_cell(block),
            Cell::new(block.reflections),
            Cell::new(block.columns.join(" ")),
            count_cell(block.warnings.len(), Color::Yellow),
            status_cell(block.failure),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_reflections).add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(total_warnings, Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::DarkGrey)
}

fn mode_cell(block: &BlockReport) -> Cell {
    match (block.is_ok(), block.unmerged) {
        (false, _) => dim_cell("-"),
        (true, true) => Cell::new("unmerged"),
        (true, false) => Cell::new("merged"),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

fn status_cell(failure: Option<Failure>) -> Cell {
    match failure {
        None => Cell::new("✓").fg(Color::Green).add_attribute(Attribute::Bold),
        Some(Failure::Write) => Cell::new("write failed").fg(Color::Red),
        Some(_) => Cell::new("failed").fg(Color::Red),
    }
}
