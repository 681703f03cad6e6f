use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::category::CellCategory;

// ---------------------------------------------------------------------------
// Category colours: cell category → background / text
// ---------------------------------------------------------------------------

/// Fill and text colour used to paint one table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fill: Color32,
    pub text: Color32,
}

/// Green for covered, yellow for variable, gray for no data.
pub fn category_style(category: CellCategory) -> CellStyle {
    match category {
        CellCategory::Covered => CellStyle {
            fill: Color32::from_rgb(0xd4, 0xed, 0xda),
            text: Color32::BLACK,
        },
        CellCategory::Variable => CellStyle {
            fill: Color32::from_rgb(0xff, 0xee, 0xba),
            text: Color32::BLACK,
        },
        CellCategory::NoData => CellStyle {
            fill: Color32::from_rgb(0xf0, 0xf2, 0xf6),
            text: Color32::from_rgb(0x99, 0x99, 0x99),
        },
    }
}

/// Legend text for a category.
pub fn category_label(category: CellCategory) -> &'static str {
    match category {
        CellCategory::Covered => "Covered (susceptible)",
        CellCategory::Variable => "Variable (V)",
        CellCategory::NoData => "No data / resistant",
    }
}

/// Legend entries in display order.
pub fn legend_entries() -> Vec<(&'static str, CellStyle)> {
    CellCategory::ALL
        .iter()
        .map(|&c| (category_label(c), category_style(c)))
        .collect()
}

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.40);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Classification colours: label → text tint
// ---------------------------------------------------------------------------

/// Maps each classification label (e.g. "Gram Negative") to a distinct hue.
#[derive(Debug, Clone, Default)]
pub struct ClassColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ClassColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let labels: Vec<&str> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        let mapping = labels
            .into_iter()
            .zip(palette)
            .map(|(l, c)| (l.to_string(), c))
            .collect();
        Self { mapping }
    }

    pub fn color_for(&self, label: &str) -> Option<Color32> {
        self.mapping.get(label).copied()
    }
}
