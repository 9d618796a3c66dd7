//! Terminal tables for command results.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use edi837_core::{ClaimModel, FieldIssue, IssueKind};

use crate::commands::ConvertOutcome;

pub fn print_conversion(outcome: &ConvertOutcome) {
    // The document itself went to stdout; keep it clean.
    let Some(path) = &outcome.output else {
        return;
    };
    println!("Output: {}", path.display());
    println!("{}", conversion_table(outcome));
}

pub fn conversion_table(outcome: &ConvertOutcome) -> Table {
    let conversion = &outcome.conversion;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Claim"),
        header_cell("Service lines"),
        header_cell("Segments (ST..SE)"),
        header_cell("Segments (total)"),
        header_cell("Time"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(&conversion.claim_number)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(conversion.service_lines),
        Cell::new(conversion.document.transaction_set_segments()),
        Cell::new(conversion.document.segment_count()),
        dim_cell(format!("{} ms", conversion.elapsed.as_millis())),
    ]);
    table
}

pub fn print_valid_claim(model: &ClaimModel) {
    let claim = model.claim();
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    let patient = if model.has_dependent_patient() {
        "dependent"
    } else {
        "subscriber"
    };
    for (field, value) in [
        ("Claim", claim.claim_number.clone()),
        ("Total charge", claim.total_charge.to_string()),
        ("Service lines", model.service_lines().len().to_string()),
        ("Diagnoses", claim.diagnoses.len().to_string()),
        ("Patient", patient.to_string()),
    ] {
        table.add_row(vec![Cell::new(field), Cell::new(value)]);
    }
    println!("Claim is valid");
    println!("{table}");
}

pub fn issue_table(issues: &[FieldIssue]) -> Table {
    let mut ordered: Vec<&FieldIssue> = issues.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, issue) in ordered.into_iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(&issue.path).add_attribute(Attribute::Bold),
            kind_cell(issue.kind),
            Cell::new(&issue.message),
        ]);
    }
    table
}

pub fn print_issues(issues: &[FieldIssue]) {
    eprintln!("{} validation issue(s):", issues.len());
    eprintln!("{}", issue_table(issues));
}

fn kind_cell(kind: IssueKind) -> Cell {
    let color = match kind {
        IssueKind::Missing => Color::Red,
        IssueKind::InvalidFormat => Color::Yellow,
        IssueKind::OutOfRange => Color::Magenta,
        IssueKind::Inconsistent => Color::Cyan,
    };
    Cell::new(kind.as_str()).fg(color)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
            ColumnConstraint::LowerBoundary(Width::Fixed(10)),
            ColumnConstraint::UpperBoundary(Width::Percentage(45)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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
