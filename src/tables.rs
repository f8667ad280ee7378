use comfy_table::{Attribute, Cell, CellAlignment, Table, modifiers, presets};
use itertools::Itertools;
use rate_ledger::{KilowattHourRate, Minute, RateDocument};

pub fn build_rates_table(document: &RateDocument) -> Table {
    let frozen_before_minute = document.frozen_before_minute.unwrap_or(Minute::MIN);

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Minute", "Offset", "Import", "Export"]);
    let minutes = document.rates_import.keys().merge(document.rates_export.keys()).dedup();
    for &minute in minutes {
        let mut cells = vec![
            Cell::new(minute).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:02}:{:02}", minute / 60, minute % 60)),
            rate_cell(document.rates_import.get(&minute)),
            rate_cell(document.rates_export.get(&minute)),
        ];
        if minute < frozen_before_minute {
            cells = cells.into_iter().map(|cell| cell.add_attribute(Attribute::Dim)).collect();
        }
        table.add_row(cells);
    }
    table
}

fn rate_cell(rate: Option<&KilowattHourRate>) -> Cell {
    rate.map_or_else(|| Cell::new("-"), Cell::new).set_alignment(CellAlignment::Right)
}
