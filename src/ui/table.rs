use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::export::{record_fields, table_columns};
use crate::state::{AppState, PAGE_SIZE};

// ---------------------------------------------------------------------------
// Paginated table over the filtered view
// ---------------------------------------------------------------------------

/// Render the data table: a fixed-size page of the filtered view plus
/// prev/next controls. The table never shows the whole view at once.
pub fn table_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let total = state.visible_indices.len();
    let pages = state.page_count();

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("◀ Prev").clicked() && state.table_page > 0 {
            state.table_page -= 1;
        }
        ui.label(format!(
            "Page {}/{}  ·  {} rows  ·  {} per page",
            state.table_page + 1,
            pages,
            total,
            PAGE_SIZE
        ));
        if ui.button("Next ▶").clicked() && state.table_page + 1 < pages {
            state.table_page += 1;
        }
    });

    let Some(dataset) = &state.dataset else {
        return;
    };
    let columns = table_columns(dataset.has_date_axis);
    let page_rows = state.page_rows();

    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::remainder().resizable(true), columns.len())
        .header(18.0, |mut header| {
            for column in columns {
                header.col(|ui| {
                    ui.strong(*column);
                });
            }
        })
        .body(|mut body| {
            for &i in page_rows {
                body.row(16.0, |mut row| {
                    for (_, value) in record_fields(&dataset.records[i], dataset.has_date_axis) {
                        row.col(|ui| {
                            ui.label(value);
                        });
                    }
                });
            }
        });
}
