use eframe::egui::{Align, Color32, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::{category_style, ClassColorMap};
use crate::data::category::CellCategory;
use crate::data::compare::{ColumnRole, FilteredTable, ViewCell};
use crate::data::lookup::{CoverageList, LookupResult};
use crate::state::{AppState, Tab};

const ROW_HEIGHT: f32 = 22.0;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the result of the active tab.
pub fn central_view(ui: &mut Ui, state: &AppState) {
    if state.table.is_empty() {
        prompt(ui, "No data available. Open a sheet (File → Open…)");
        return;
    }
    match state.tab {
        Tab::Compare => comparison_view(ui, state),
        Tab::Search => lookup_view(ui, state),
    }
}

fn prompt(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}

// ---------------------------------------------------------------------------
// Compare tab
// ---------------------------------------------------------------------------

fn comparison_view(ui: &mut Ui, state: &AppState) {
    ui.heading("Compare Coverage");
    let Some(view) = &state.comparison else {
        prompt(ui, "Select antibiotics to see their spectrum");
        return;
    };
    if view.is_empty() {
        ui.label(RichText::new("No bacteria have data for the selected antibiotics.").italics());
        return;
    }
    ui.label(format!("{} bacteria", view.len()));
    comparison_table(ui, view, &state.class_colors);
}

fn comparison_table(ui: &mut Ui, view: &FilteredTable, class_colors: &ClassColorMap) {
    let antibiotic_count = view
        .columns
        .iter()
        .filter(|c| c.role == ColumnRole::Antibiotic)
        .count();
    let prefix_count = view.columns.len() - antibiotic_count;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto().at_least(90.0), prefix_count)
        .columns(Column::auto().at_least(80.0), antibiotic_count)
        .header(ROW_HEIGHT, |mut header| {
            for col in &view.columns {
                header.col(|ui| {
                    ui.strong(&col.name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.rows.len(), |mut row| {
                let view_row = &view.rows[row.index()];
                for (col, cell) in view.columns.iter().zip(&view_row.cells) {
                    row.col(|ui| match col.role {
                        ColumnRole::Antibiotic => category_cell(ui, cell),
                        ColumnRole::Classification => {
                            let mut text = RichText::new(&cell.text);
                            if let Some(c) = class_colors.color_for(&cell.text) {
                                text = text.color(c);
                            }
                            ui.label(text);
                        }
                        ColumnRole::Identifier => {
                            ui.label(RichText::new(&cell.text).strong());
                        }
                    });
                }
            });
        });
}

fn category_cell(ui: &mut Ui, cell: &ViewCell) {
    let category = cell.category.unwrap_or(CellCategory::NoData);
    paint_cell(ui, category, &cell.text);
}

/// Fill the whole cell with the category colour and draw `text` on top.
fn paint_cell(ui: &mut Ui, category: CellCategory, text: &str) {
    let style = category_style(category);
    ui.painter().rect_filled(ui.max_rect(), 0.0, style.fill);
    ui.label(RichText::new(text).color(style.text));
}

// ---------------------------------------------------------------------------
// Search tab
// ---------------------------------------------------------------------------

fn lookup_view(ui: &mut Ui, state: &AppState) {
    ui.heading("What covers this bacterium?");
    let (Some(name), Some(result)) = (&state.bacterium, &state.lookup) else {
        prompt(ui, "Search for a bacterium");
        return;
    };

    match result {
        LookupResult::NotFound => {
            warning(ui, &format!("'{name}' is not in the current database."));
        }
        LookupResult::NoData { classification } => {
            classification_line(ui, classification.as_deref(), &state.class_colors);
            warning(
                ui,
                "No antibiotic data found for this organism in the current database.",
            );
        }
        LookupResult::Found(list) => {
            classification_line(ui, list.classification.as_deref(), &state.class_colors);
            coverage_table(ui, list);
        }
    }
}

fn warning(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(format!("⚠ {text}")).color(Color32::from_rgb(0x85, 0x64, 0x04)));
}

fn classification_line(ui: &mut Ui, classification: Option<&str>, class_colors: &ClassColorMap) {
    let Some(label) = classification else {
        return;
    };
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Classification:");
        let mut text = RichText::new(label);
        if let Some(c) = class_colors.color_for(label) {
            text = text.color(c);
        }
        ui.label(text);
    });
}

fn coverage_table(ui: &mut Ui, list: &CoverageList) {
    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(160.0))
        .column(Column::remainder().at_least(100.0))
        .header(ROW_HEIGHT, |mut header| {
            header.col(|ui| {
                ui.strong("Antibiotic");
            });
            header.col(|ui| {
                ui.strong("Effectiveness");
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, list.entries.len(), |mut row| {
                let entry = &list.entries[row.index()];
                row.col(|ui| {
                    ui.label(&entry.antibiotic);
                });
                row.col(|ui| paint_cell(ui, entry.category, &entry.value));
            });
        });
}
