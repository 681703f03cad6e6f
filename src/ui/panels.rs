use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::legend_entries;
use crate::data::cache::source_label;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left panel for the active tab.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    match state.tab {
        Tab::Compare => antibiotic_picker(ui, state),
        Tab::Search => bacterium_picker(ui, state),
    }

    ui.add_space(8.0);
    ui.separator();
    legend(ui);
}

fn antibiotic_picker(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Antibiotics");
    ui.separator();

    if state.table.antibiotic_columns().next().is_none() {
        ui.label("No antibiotics loaded.");
        return;
    }

    // ---- Current selection, in display order ----
    if !state.selection.is_empty() {
        let mut removed = None;
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for name in &state.selection {
                if ui.small_button(format!("{name} ✕")).clicked() {
                    removed = Some(name.clone());
                }
            }
        });
        if let Some(name) = removed {
            state.toggle_antibiotic(&name);
        }
        if ui.small_button("Clear").clicked() {
            state.clear_selection();
        }
        ui.separator();
    }

    ui.add(
        egui::TextEdit::singleline(&mut state.antibiotic_query)
            .hint_text("Choose antibiotics…"),
    );

    let options = state.matching_antibiotics();
    ScrollArea::vertical()
        .id_salt("antibiotic_list")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for name in &options {
                let mut checked = state.is_selected(name);
                if ui.checkbox(&mut checked, name).changed() {
                    state.toggle_antibiotic(name);
                }
            }
        });
}

fn bacterium_picker(ui: &mut Ui, state: &mut AppState) {
    ui.heading(state.table.identifier_column().unwrap_or("Bacteria"));
    ui.separator();

    if state.table.is_empty() {
        ui.label("No bacteria loaded.");
        return;
    }

    ui.add(
        egui::TextEdit::singleline(&mut state.bacterium_query)
            .hint_text("Type bacteria name here…"),
    );

    let options = state.matching_bacteria();
    let selected_text = state
        .bacterium
        .clone()
        .unwrap_or_else(|| "Search for a bacterium".to_string());

    let mut choice = state.bacterium.clone();
    egui::ComboBox::from_id_salt("bacterium_select")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for name in &options {
                ui.selectable_value(&mut choice, Some(name.clone()), name);
            }
        });

    if state.bacterium.is_some() && ui.small_button("Clear").clicked() {
        choice = None;
    }
    if choice != state.bacterium {
        state.set_bacterium(choice);
    }
}

fn legend(ui: &mut Ui) {
    ui.strong("Legend");
    for (label, style) in legend_entries() {
        ui.label(
            RichText::new(format!("  {label}  "))
                .background_color(style.fill)
                .color(style.text),
        );
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Copy view as JSON").clicked() {
                if let Some(json) = state.current_view_json() {
                    ui.ctx().copy_text(json);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.tab, Tab::Compare, "💊 Compare Antibiotics");
        ui.selectable_value(&mut state.tab, Tab::Search, "🦠 Search Bacteria");

        ui.separator();

        let table = &state.table;
        if !table.is_empty() {
            ui.label(format!("{}: {table}", state.cache.source()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open antibiotic sheet")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "ods", "csv", "json", "parquet", "pq"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let label = source_label(&path);
        state.open_path(path);
        if state.table.is_empty() {
            log::error!("No rows loaded from {label}");
        }
    }
}
