//! Test utilities for the sheet normalizer
//!
//! Builders for raw sheets in the shapes the upstream spreadsheet has taken
//! over time: the current headed layout, the legacy positional layout, and
//! queue-only layouts without totals.

use crate::models::{Cell, QueueDefinition, RawSheet};
use crate::normalizer::{NormalizedSheet, SheetNormalizer};


/// Build a sheet from string headers and rows of cells
pub fn sheet(columns: &[&str], rows: Vec<Vec<Cell>>) -> RawSheet {
    RawSheet::new(columns.iter().map(|c| c.to_string()).collect(), rows)
}

pub fn text(value: &str) -> Cell {
    Cell::from(value)
}

pub fn num(value: f64) -> Cell {
    Cell::Number(value)
}

/// Normalize with the support sheet's queue catalog
pub fn normalize(raw: &RawSheet) -> NormalizedSheet {
    let catalog = QueueDefinition::catalog(crate::constants::SUPPORT_QUEUES);
    SheetNormalizer::new().normalize("Suporte", raw, &catalog)
}

/// Current layout with every primary metric column
pub fn current_layout() -> RawSheet {
    sheet(
        &[
            "Nome",
            "Equipe",
            "Horario",
            "QTDE_CHAT_TOTAL",
            "nota_chat",
            "%_nota_chat",
            "tme_chat",
            "total_pbx",
            "nota_pbx",
            "%_nota_pbx",
            "tme_pbx",
            "qtde_pbx_r",
            "qtde_pbx_e",
        ],
        vec![
            vec![
                text("Ana Souza"),
                text("Alpha"),
                text("08:00-14:00"),
                num(120.0),
                num(4.7),
                text("62%"),
                text("00:00:45"),
                num(30.0),
                num(9.2),
                text("0,4"),
                text("00:00:08"),
                num(18.0),
                num(12.0),
            ],
            vec![
                text("Bruno Lima"),
                text("Beta"),
                text("14:00-20:00"),
                text("80"),
                text("-"),
                text(""),
                text("-"),
                num(0.0),
                Cell::Empty,
                Cell::Empty,
                text("-"),
                Cell::Empty,
                Cell::Empty,
            ],
        ],
    )
}
