use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, Row, Table};
use sieve::{BatchResults, EvaluationFailure, Registry};

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    /// One row per expression, in declaration order
    pub fn format_results(&self, results: &BatchResults) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Expression").set_alignment(CellAlignment::Left),
            Cell::new("Result").set_alignment(CellAlignment::Left),
        ]));

        for (name, value) in results.iter() {
            let color = if value { Color::Green } else { Color::Red };
            table.add_row(Row::from(vec![
                Cell::new(name),
                Cell::new(value).fg(color),
            ]));
        }

        format!("{}\n", table)
    }

    pub fn format_failures(&self, failures: &[EvaluationFailure]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Failed"),
            Cell::new("Kind"),
            Cell::new("Error"),
        ]));

        for failure in failures {
            table.add_row(Row::from(vec![
                Cell::new(&failure.name),
                Cell::new(failure.error.kind()),
                Cell::new(&failure.error),
            ]));
        }

        format!("{}\n", table)
    }

    pub fn format_operations(&self, registry: &Registry) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Operation").set_alignment(CellAlignment::Left),
            Cell::new("Arguments").set_alignment(CellAlignment::Left),
        ]));

        for operation in registry.operations() {
            table.add_row(Row::from(vec![
                operation.name().to_string(),
                operation.canonical_args().join(", "),
            ]));
        }

        format!("{}\n", table)
    }
}
