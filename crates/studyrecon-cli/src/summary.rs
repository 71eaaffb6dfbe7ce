use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use studyrecon_cli::pipeline::DesignLookup;
use studyrecon_compare::{Comparison, enumerate};

use crate::types::CompareResult;

pub fn print_summary(result: &CompareResult) {
    let context = &result.context;
    if let Some(description) = &context.study_description {
        println!("Study: {description}");
    }
    if !context.protocols.is_empty() {
        println!("Protocols: {}", context.protocols.join(", "));
    }
    if let Some(design_id) = &context.design_id {
        println!("Design: {design_id}");
    }
    match &result.output_dir {
        Some(dir) => println!("Output: {}", dir.display()),
        None => println!("Output: (dry run)"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Granularity"),
        header_cell("Metadata"),
        header_cell("Design"),
        header_cell("Metadata only"),
        header_cell("Design only"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let reconciliation = &result.reconciliation;
    for comparison in &reconciliation.comparisons {
        table.add_row(vec![
            Cell::new(comparison.granularity.title()),
            Cell::new(comparison.left_total),
            Cell::new(comparison.right_total),
            count_cell(comparison.diff.left_only.len(), Color::Red),
            count_cell(comparison.diff.right_only.len(), Color::Yellow),
        ]);
    }
    println!("{table}");

    for comparison in &reconciliation.comparisons {
        print_differences(comparison);
    }

    if !reconciliation.integrity_gaps.is_empty() {
        eprintln!("Integrity gaps:");
        for gap in &reconciliation.integrity_gaps {
            eprintln!("- {gap}");
        }
    }
    if reconciliation.is_consistent() {
        println!("Metadata and design are consistent.");
    }
}

fn print_differences(comparison: &Comparison) {
    let diff = &comparison.diff;
    if diff.is_empty() {
        return;
    }
    println!();
    println!("{}:", comparison.granularity.title());
    if !diff.left_only.is_empty() {
        println!("Only in metadata:");
        println!("{}", enumerate(&diff.left_only));
    }
    if !diff.right_only.is_empty() {
        println!("Only in design:");
        println!("{}", enumerate(&diff.right_only));
    }
}

pub fn print_design_lookup(lookup: &DesignLookup) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Protocol")]);
    apply_table_style(&mut table);
    for protocol in &lookup.protocols {
        table.add_row(vec![protocol]);
    }
    println!("{table}");

    let mut table = Table::new();
    table.set_header(vec![header_cell("Design id"), header_cell("Latest")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Center);
    for id in &lookup.matching {
        let latest = if lookup.latest.as_deref() == Some(id.as_str()) {
            Cell::new("✓")
                .fg(Color::Green)
                .add_attribute(Attribute::Bold)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![Cell::new(id), latest]);
    }
    println!("{table}");

    match &lookup.latest {
        Some(id) => println!("Latest design: {id}"),
        None => println!("Latest design: none matches the study protocols"),
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

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
