//! PDF assembly for the analysis report.
//!
//! A fixed A4 layout: title header, generation stamp, the captured sample
//! (when one could be fetched), a label/value block with a colored risk
//! badge, the four-bar polymer chart, and a footer. Every field is
//! optional so a partially populated record still renders with `"-"`
//! placeholders, and a sample that fails to decode is simply left out.

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference,
    Point, Rect, Rgb,
};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

use super::chart::bar_percent;
use crate::tasks::analysis::{AnalysisResult, Distribution, RiskLevel};

pub const REPORT_TITLE: &str = "Microplastic Analysis Report";

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 20.0;

/// Sample image bounding box, in mm.
const IMAGE_MAX_W: f32 = 80.0;
const IMAGE_MAX_H: f32 = 55.0;
const IMAGE_TOP: f32 = 248.0;

/// Chart area, in mm.
const CHART_LEFT: f32 = 30.0;
const CHART_BOTTOM: f32 = 62.0;
const CHART_HEIGHT: f32 = 58.0;
const BAR_WIDTH: f32 = 22.0;
const BAR_PITCH: f32 = 38.0;

/// Render-ready view of a result. Mirrors the panel's render-time
/// optionality so missing fields come out as `"-"` rows.
#[derive(Debug, Clone, Default)]
pub struct ReportData {
    pub particle_count: Option<String>,
    pub avg_size: Option<String>,
    pub contamination_level: Option<String>,
    pub polymer_type: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub distribution: Option<Distribution>,
}

impl From<&AnalysisResult> for ReportData {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            particle_count: Some(result.particle_count.clone()),
            avg_size: Some(result.avg_size.clone()),
            contamination_level: Some(result.contamination_level.label().to_string()),
            polymer_type: Some(result.polymer_type.clone()),
            risk_level: Some(result.risk_level),
            distribution: Some(result.distribution),
        }
    }
}

/// Download name: the ISO timestamp's `:` and `T` are swapped for `-` so
/// the name survives every filesystem.
pub fn report_filename(at: OffsetDateTime) -> String {
    let stamp = at
        .replace_millisecond(0)
        .unwrap_or(at)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "report".to_string());
    format!("Microplastic_Report_{}.pdf", stamp.replace([':', 'T'], "-"))
}

/// Build the document. `image` holds the raw bytes of the captured sample
/// when one was fetched; decode failures are swallowed and the layout
/// collapses to a single column.
pub fn compose(
    image: Option<&[u8]>,
    data: &ReportData,
    generated_at: OffsetDateTime,
) -> Result<Vec<u8>, String> {
    let (doc, page, layer) = PdfDocument::new(REPORT_TITLE, Mm(PAGE_W), Mm(PAGE_H), "report");
    let layer = doc.get_page(page).get_layer(layer);

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|err| err.to_string())?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|err| err.to_string())?;

    draw_header(&layer, &bold, &regular, generated_at);

    let image_drawn = image
        .map(|bytes| embed_sample(&layer, &regular, bytes))
        .unwrap_or(false);

    // With a sample inlined the field block sits beside it; without one the
    // rows take the full width.
    let rows_x = if image_drawn { MARGIN + IMAGE_MAX_W + 12.0 } else { MARGIN };
    draw_fields(&layer, &bold, &regular, data, rows_x);

    if let Some(distribution) = data.distribution {
        draw_chart(&layer, &bold, &regular, distribution);
    }

    draw_footer(&layer, &regular);

    doc.save_to_bytes().map_err(|err| err.to_string())
}

fn draw_header(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
    generated_at: OffsetDateTime,
) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.10, 0.12, 0.18, None)));
    layer.use_text(REPORT_TITLE, 20.0, Mm(MARGIN), Mm(272.0), bold);

    layer.set_fill_color(Color::Rgb(Rgb::new(0.13, 0.59, 0.65, None)));
    layer.add_rect(
        Rect::new(Mm(MARGIN), Mm(268.0), Mm(MARGIN + 52.0), Mm(269.2))
            .with_mode(PaintMode::Fill),
    );

    layer.set_fill_color(Color::Rgb(Rgb::new(0.40, 0.42, 0.48, None)));
    layer.use_text(
        format!("Generated {}", crate::core::format::format_report_stamp(generated_at)),
        10.0,
        Mm(MARGIN),
        Mm(261.0),
        regular,
    );
}

/// Decode and place the sample image. Returns false (and leaves the page
/// untouched) when the bytes are not a decodable image.
fn embed_sample(layer: &PdfLayerReference, caption_font: &IndirectFontRef, bytes: &[u8]) -> bool {
    use printpdf::image_crate::GenericImageView;

    let decoded = match printpdf::image_crate::load_from_memory(bytes) {
        Ok(decoded) => decoded,
        Err(err) => {
            debug!(%err, "sample image skipped");
            return false;
        }
    };

    let (px_w, px_h) = decoded.dimensions();
    if px_w == 0 || px_h == 0 {
        return false;
    }

    const DPI: f32 = 300.0;
    let natural_w = px_w as f32 * 25.4 / DPI;
    let natural_h = px_h as f32 * 25.4 / DPI;
    let scale = (IMAGE_MAX_W / natural_w).min(IMAGE_MAX_H / natural_h).min(4.0);
    let drawn_h = natural_h * scale;

    let pdf_image = printpdf::Image::from_dynamic_image(&decoded);
    pdf_image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(MARGIN)),
            translate_y: Some(Mm(IMAGE_TOP - drawn_h)),
            scale_x: Some(scale),
            scale_y: Some(scale),
            dpi: Some(DPI),
            ..Default::default()
        },
    );

    layer.set_fill_color(Color::Rgb(Rgb::new(0.40, 0.42, 0.48, None)));
    layer.use_text(
        "Captured sample",
        9.0,
        Mm(MARGIN),
        Mm(IMAGE_TOP - drawn_h - 5.0),
        caption_font,
    );
    true
}

fn draw_fields(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
    data: &ReportData,
    x: f32,
) {
    let dash = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or("-")
            .to_string()
    };

    let rows = [
        ("Microplastic Count", dash(&data.particle_count)),
        ("Average Size", dash(&data.avg_size)),
        ("Contamination Level", dash(&data.contamination_level)),
        ("Dominant Polymer", dash(&data.polymer_type)),
    ];

    let mut y = 245.0;
    for (label, value) in rows {
        layer.set_fill_color(Color::Rgb(Rgb::new(0.10, 0.12, 0.18, None)));
        layer.use_text(label, 11.0, Mm(x), Mm(y), bold);
        layer.set_fill_color(Color::Rgb(Rgb::new(0.25, 0.27, 0.33, None)));
        layer.use_text(value, 11.0, Mm(x + 48.0), Mm(y), regular);
        y -= 9.0;
    }

    // Risk row: colored badge behind the level text.
    layer.set_fill_color(Color::Rgb(Rgb::new(0.10, 0.12, 0.18, None)));
    layer.use_text("Risk Assessment", 11.0, Mm(x), Mm(y), bold);
    match data.risk_level {
        Some(risk) => {
            let [r, g, b] = risk_color(risk);
            layer.set_fill_color(Color::Rgb(Rgb::new(r, g, b, None)));
            layer.add_rect(
                Rect::new(Mm(x + 48.0), Mm(y - 1.6), Mm(x + 48.0 + 22.0), Mm(y + 4.4))
                    .with_mode(PaintMode::Fill),
            );
            layer.set_fill_color(Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)));
            layer.use_text(risk.label(), 11.0, Mm(x + 50.5), Mm(y), bold);
        }
        None => {
            layer.set_fill_color(Color::Rgb(Rgb::new(0.25, 0.27, 0.33, None)));
            layer.use_text("-", 11.0, Mm(x + 48.0), Mm(y), regular);
        }
    }
}

fn risk_color(risk: RiskLevel) -> [f32; 3] {
    match risk {
        RiskLevel::Low => [0.16, 0.65, 0.27],
        RiskLevel::Medium => [1.0, 0.65, 0.30],
        RiskLevel::High => [0.86, 0.21, 0.27],
    }
}

fn draw_chart(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
    distribution: Distribution,
) {
    layer.set_fill_color(Color::Rgb(Rgb::new(0.10, 0.12, 0.18, None)));
    layer.use_text(
        "Polymer Distribution",
        12.0,
        Mm(MARGIN),
        Mm(CHART_BOTTOM + CHART_HEIGHT + 8.0),
        bold,
    );

    // Baseline.
    layer.set_outline_color(Color::Rgb(Rgb::new(0.70, 0.72, 0.78, None)));
    layer.set_outline_thickness(0.6);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(CHART_BOTTOM)), false),
            (Point::new(Mm(PAGE_W - MARGIN), Mm(CHART_BOTTOM)), false),
        ],
        is_closed: false,
    });

    for (i, (code, value)) in distribution.labelled().into_iter().enumerate() {
        let x = CHART_LEFT + BAR_PITCH * i as f32;
        let height = CHART_HEIGHT * f32::from(bar_percent(value)) / 100.0;

        layer.set_fill_color(Color::Rgb(Rgb::new(0.54, 0.17, 0.89, None)));
        layer.add_rect(
            Rect::new(Mm(x), Mm(CHART_BOTTOM), Mm(x + BAR_WIDTH), Mm(CHART_BOTTOM + height))
                .with_mode(PaintMode::Fill),
        );

        layer.set_fill_color(Color::Rgb(Rgb::new(0.25, 0.27, 0.33, None)));
        layer.use_text(
            format!("{value}%"),
            9.0,
            Mm(x + BAR_WIDTH / 2.0 - 3.5),
            Mm(CHART_BOTTOM + height + 2.5),
            regular,
        );
        layer.use_text(
            code,
            10.0,
            Mm(x + BAR_WIDTH / 2.0 - 3.0),
            Mm(CHART_BOTTOM - 6.0),
            bold,
        );
    }
}

fn draw_footer(layer: &PdfLayerReference, regular: &IndirectFontRef) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.80, 0.82, 0.86, None)));
    layer.set_outline_thickness(0.4);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(18.0)), false),
            (Point::new(Mm(PAGE_W - MARGIN), Mm(18.0)), false),
        ],
        is_closed: false,
    });

    layer.set_fill_color(Color::Rgb(Rgb::new(0.40, 0.42, 0.48, None)));
    layer.use_text(
        "PlastiScan · Advancing environmental protection through innovation",
        9.0,
        Mm(MARGIN),
        Mm(12.0),
        regular,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::analysis::{ContaminationLevel, Distribution, RiskLevel};
    use time::macros::datetime;

    fn scenario_result() -> AnalysisResult {
        AnalysisResult {
            particle_count: "200 particles/L".into(),
            avg_size: "4.0 μm".into(),
            contamination_level: ContaminationLevel::Low,
            polymer_type: "PVC".into(),
            risk_level: RiskLevel::High,
            distribution: Distribution {
                pp: 30,
                pe: 20,
                ps: 35,
                pvc: 15,
            },
        }
    }

    #[test]
    fn composes_without_an_image() {
        let data = ReportData::from(&scenario_result());
        let bytes = compose(None, &data, datetime!(2026-08-07 14:03:22 UTC)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1_000);
    }

    #[test]
    fn composes_with_every_field_missing() {
        let bytes = compose(None, &ReportData::default(), datetime!(2026-08-07 14:03:22 UTC))
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn undecodable_sample_bytes_are_swallowed() {
        let data = ReportData::from(&scenario_result());
        let bytes = compose(
            Some(b"not an image at all"),
            &data,
            datetime!(2026-08-07 14:03:22 UTC),
        )
        .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn filename_is_filesystem_safe() {
        let name = report_filename(datetime!(2026-08-07 14:03:22 UTC));
        assert!(name.starts_with("Microplastic_Report_"));
        assert!(name.ends_with(".pdf"));
        let stamp = &name["Microplastic_Report_".len()..name.len() - ".pdf".len()];
        assert!(!stamp.contains(':'));
        assert!(!stamp.contains('T'));
        assert!(stamp.starts_with("2026-08-07"));
    }
}
