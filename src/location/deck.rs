//! Slide deck export: title slide, metadata slide and image-grid slides.

use tracing::{debug, info};

use crate::common::unit::{Emu, inches};
use crate::error::Result;
use crate::location::category::Category;
use crate::location::config::ReportConfig;
use crate::location::export::{ExportArtifact, PPTX_MIME_TYPE};
use crate::location::layout::{GridShape, Rect, fit, grid_cells, thumbnail_rect};
use crate::location::record::LocationRecord;
use crate::location::store::{ImageEntry, Session};
use crate::ooxml::common::DocumentProperties;
use crate::ooxml::pptx::{MutablePresentation, MutableShape, MutableSlide, TextAlign, TextFormat};

pub const FILE_NAME: &str = "location_pictures.pptx";
/// Heading of the metadata slide.
pub const METADATA_HEADING: &str = "ロケ地情報";

const LABEL_WIDTH: f64 = 2.2;
const ROW_HEIGHT: f64 = 0.3;
const TABLE_TOP: f64 = 1.3;
const TABLE_BOTTOM_MARGIN: f64 = 0.2;

/// Build the whole presentation in memory.
pub fn build_presentation(
    record: &LocationRecord,
    session: &Session,
    config: &ReportConfig,
) -> Result<MutablePresentation> {
    let shape = config.validate()?;
    let mut deck = Deck {
        presentation: MutablePresentation::new(),
        record,
        config,
    };

    deck.title_slide(session)?;
    deck.metadata_slide(session);

    for category in Category::ALL.into_iter().filter(|c| c.allows_multiple()) {
        let included: Vec<&ImageEntry> = session.included_images(category).collect();
        if included.is_empty() {
            continue;
        }
        for chunk in included.chunks(shape.capacity()) {
            deck.grid_slide(category, chunk, shape)?;
        }
        debug!(
            category = category.key(),
            images = included.len(),
            "added image slides"
        );
    }

    Ok(deck.presentation)
}

/// Export the report as `location_pictures.pptx`.
pub fn assemble_deck(
    record: &LocationRecord,
    session: &Session,
    config: &ReportConfig,
) -> Result<ExportArtifact> {
    let presentation = build_presentation(record, session, config)?;
    let properties = DocumentProperties::now().title(record.name());
    let bytes = presentation.to_bytes(&properties)?;
    info!(
        file = FILE_NAME,
        slides = presentation.slide_count(),
        size = bytes.len(),
        "exported slide deck"
    );
    Ok(ExportArtifact {
        file_name: FILE_NAME,
        mime_type: PPTX_MIME_TYPE,
        bytes,
    })
}

struct Deck<'a> {
    presentation: MutablePresentation,
    record: &'a LocationRecord,
    config: &'a ReportConfig,
}

impl Deck<'_> {
    fn size(&self) -> (Emu, Emu) {
        (
            self.presentation.slide_width(),
            self.presentation.slide_height(),
        )
    }

    fn title_slide(&mut self, session: &Session) -> Result<()> {
        let (width, height) = self.size();
        let config = self.config;
        let name = self.record.name();
        let slide = self.presentation.add_slide();

        let title = slide.add_text_box(name, inches(1.0), inches(0.3), width - inches(2.0), inches(0.8));
        style(title, config, config.title_font_size, TextAlign::Center);

        if let Some(entry) = session.included_images(Category::Thumbnail).next() {
            let area = Rect::new(
                0.0,
                inches(1.3) as f64,
                width as f64,
                (height - inches(1.3) - inches(0.3)) as f64,
            );
            let (w, h) = entry.image().dimensions();
            let (x, y, cx, cy) = thumbnail_rect((w as f64, h as f64), width, area).to_emu();
            slide.add_picture(entry.image().bytes().clone(), x, y, cx, cy, entry.filename())?;
        }
        Ok(())
    }

    fn metadata_slide(&mut self, session: &Session) {
        let (width, height) = self.size();
        let config = self.config;

        let mut rows: Vec<(String, String)> = self
            .record
            .fields()
            .into_iter()
            .map(|(label, value)| (label.to_string(), value.display()))
            .collect();
        if config.include_category_summary {
            rows.extend(Category::ALL.into_iter().map(|c| {
                (c.label().to_string(), format!("{}枚", session.images(c).len()))
            }));
        }

        let slide = self.presentation.add_slide();
        heading(slide, config, width, METADATA_HEADING, self.record.name());

        let (left, right) = rows.split_at(rows.len().div_ceil(2));
        let row_height = table_row_height(height, left.len());
        let column_width = width / 2 - inches(0.7);
        let label_width = inches(LABEL_WIDTH);
        let columns = [(inches(0.5), left), (width / 2 + inches(0.2), right)];
        for (x, column) in columns {
            for (row, (label, value)) in column.iter().enumerate() {
                let y = inches(TABLE_TOP) + row as Emu * row_height;
                let label_box = slide.add_text_box(label, x, y, label_width, row_height);
                style(label_box, config, config.table_font_size, TextAlign::Left).bold(true);
                let value_box = slide.add_text_box(
                    value,
                    x + label_width,
                    y,
                    column_width - label_width,
                    row_height,
                );
                style(value_box, config, config.table_font_size, TextAlign::Left);
            }
        }
    }

    fn grid_slide(
        &mut self,
        category: Category,
        images: &[&ImageEntry],
        shape: GridShape,
    ) -> Result<()> {
        let (width, height) = self.size();
        let config = self.config;
        let slide = self.presentation.add_slide();
        heading(slide, config, width, category.label(), self.record.name());

        for (cell, entry) in grid_cells(width, height, shape).iter().zip(images) {
            let (w, h) = entry.image().dimensions();
            let placement = fit((w as f64, h as f64), (cell.width, cell.height));

            if let Some(fill) = &config.letterbox_fill {
                if placement.is_letterboxed((cell.width, cell.height)) {
                    let (x, y, cx, cy) = cell.to_emu();
                    slide.add_rectangle(x, y, cx, cy, Some(fill.as_str()));
                }
            }

            let (x, y, cx, cy) = cell.inset(&placement).to_emu();
            slide.add_picture(entry.image().bytes().clone(), x, y, cx, cy, entry.filename())?;
        }
        Ok(())
    }
}

/// Rows keep their nominal height until the column would run off the slide.
fn table_row_height(slide_height: Emu, rows: usize) -> Emu {
    let available = slide_height - inches(TABLE_TOP) - inches(TABLE_BOTTOM_MARGIN);
    match Emu::try_from(rows) {
        Ok(n) if n > 0 => inches(ROW_HEIGHT).min(available / n),
        _ => inches(ROW_HEIGHT),
    }
}

/// Heading on the left and the location name centered, as on every content slide.
fn heading(slide: &mut MutableSlide, config: &ReportConfig, width: Emu, text: &str, name: &str) {
    let title = slide.add_text_box(text, inches(0.5), inches(0.3), inches(3.0), inches(0.5));
    style(title, config, config.heading_font_size, TextAlign::Left);

    let location = slide.add_text_box(name, inches(3.5), inches(0.3), width - inches(4.0), inches(0.5));
    style(location, config, config.heading_font_size, TextAlign::Center);
}

fn style<'s>(
    shape: &'s mut MutableShape,
    config: &ReportConfig,
    size: f64,
    align: TextAlign,
) -> &'s mut MutableShape {
    shape.set_text_format(TextFormat {
        font: Some(config.font.clone()),
        size: Some(size),
        align: Some(align),
        ..TextFormat::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::xml::escape_xml;
    use crate::location::image::test_png;
    use crate::location::record::RecordInput;
    use std::io::{Cursor, Read};

    fn record(name: &str) -> LocationRecord {
        RecordInput {
            name: name.into(),
            address: "東京都港区 <2F> & 屋上".into(),
            area_m2: 45.5,
            ..RecordInput::default()
        }
        .capture()
        .unwrap()
    }

    fn photos(session: &mut Session, count: usize) {
        let files: Vec<_> = (0..count)
            .map(|i| (format!("p{:02}.png", i), test_png(40, 30)))
            .collect();
        session.add_images(Category::Photos, files).unwrap();
    }

    fn pictures(slide: &MutableSlide) -> usize {
        slide.shapes().iter().filter(|s| s.is_picture()).count()
    }

    #[test]
    fn test_included_photos_chunked_into_slides() {
        let mut session = Session::with_page_size(8);
        photos(&mut session, 10);
        for name in ["p01.png", "p04.png", "p09.png"] {
            session.set_inclusion(Category::Photos, name, false);
        }

        let deck = build_presentation(&record("倉庫"), &session, &ReportConfig::default()).unwrap();
        let slides = deck.slides();
        assert_eq!(slides.len(), 4);
        assert_eq!(pictures(&slides[2]), 6);
        assert_eq!(pictures(&slides[3]), 1);

        let headings: Vec<_> = slides[2].texts().collect();
        assert_eq!(headings, ["ロケ地写真", "倉庫"]);
    }

    #[test]
    fn test_nine_per_slide() {
        let mut session = Session::new();
        photos(&mut session, 10);
        let config = ReportConfig {
            images_per_slide: 9,
            ..ReportConfig::default()
        };
        let deck = build_presentation(&record("倉庫"), &session, &config).unwrap();
        assert_eq!(deck.slide_count(), 4);
        assert_eq!(pictures(&deck.slides()[2]), 9);
    }

    #[test]
    fn test_title_slide_without_thumbnail() {
        let session = Session::new();
        let deck = build_presentation(&record("旧校舎"), &session, &ReportConfig::default()).unwrap();

        assert_eq!(deck.slide_count(), 2);
        let title = &deck.slides()[0];
        assert_eq!(title.shape_count(), 1);
        assert_eq!(title.texts().collect::<Vec<_>>(), ["旧校舎"]);
    }

    #[test]
    fn test_title_slide_thumbnail() {
        let mut session = Session::new();
        session
            .add_images(Category::Thumbnail, [("t.png", test_png(160, 90))])
            .unwrap();
        let deck = build_presentation(&record("旧校舎"), &session, &ReportConfig::default()).unwrap();

        let title = &deck.slides()[0];
        let picture = title.shapes().iter().find(|s| s.is_picture()).unwrap();
        let (x, _, cx, _) = picture.bounds();
        assert_eq!(cx, 7_315_200);
        assert_eq!(x, (deck.slide_width() - cx) / 2);
    }

    #[test]
    fn test_excluded_thumbnail_is_skipped() {
        let mut session = Session::new();
        session
            .add_images(Category::Thumbnail, [("t.png", test_png(16, 9))])
            .unwrap();
        session.set_inclusion(Category::Thumbnail, "t.png", false);
        let deck = build_presentation(&record("x"), &session, &ReportConfig::default()).unwrap();
        assert_eq!(pictures(&deck.slides()[0]), 0);
    }

    #[test]
    fn test_letterbox_fill() {
        let mut session = Session::new();
        photos(&mut session, 2);

        let deck = build_presentation(&record("x"), &session, &ReportConfig::default()).unwrap();
        let rectangles = deck.slides()[2]
            .shapes()
            .iter()
            .filter(|s| !s.is_picture() && s.text().is_none())
            .count();
        assert_eq!(rectangles, 2);

        let config = ReportConfig {
            letterbox_fill: None,
            ..ReportConfig::default()
        };
        let deck = build_presentation(&record("x"), &session, &config).unwrap();
        assert_eq!(deck.slides()[2].shape_count(), 2 + 2);
    }

    #[test]
    fn test_metadata_columns() {
        let deck = build_presentation(&record("x"), &Session::new(), &ReportConfig::default()).unwrap();
        let slide = &deck.slides()[1];
        // heading + name + 36 label/value pairs
        assert_eq!(slide.shape_count(), 2 + 36 * 2);

        let boxes: Vec<_> = slide.shapes()[2..].iter().map(|s| s.bounds()).collect();
        let left_x = boxes[0].0;
        let right_start = boxes.iter().position(|b| b.0 != left_x && b.0 != left_x + inches(LABEL_WIDTH));
        assert_eq!(right_start, Some(36));
        assert_eq!(boxes[36].1, inches(TABLE_TOP));
    }

    #[test]
    fn test_category_summary() {
        let mut session = Session::new();
        photos(&mut session, 3);
        session.set_inclusion(Category::Photos, "p00.png", false);
        let config = ReportConfig {
            include_category_summary: true,
            ..ReportConfig::default()
        };
        let deck = build_presentation(&record("x"), &session, &config).unwrap();
        let texts: Vec<_> = deck.slides()[1].texts().collect();
        let at = texts.iter().position(|t| *t == "ロケ地写真").unwrap();
        // Every upload counts, included or not.
        assert_eq!(texts[at + 1], "3枚");
        assert!(texts.contains(&"サムネイル"));
    }

    #[test]
    fn test_metadata_rows_fit_on_slide() {
        let config = ReportConfig {
            include_category_summary: true,
            ..ReportConfig::default()
        };
        let deck = build_presentation(&record("x"), &Session::new(), &config).unwrap();
        let slide = &deck.slides()[1];
        let rows = (slide.shape_count() - 2) / 2;
        assert!(rows.div_ceil(2) > 20);

        for shape in &slide.shapes()[2..] {
            let (_, y, _, cy) = shape.bounds();
            assert!(y + cy <= deck.slide_height(), "{} + {}", y, cy);
        }

        // Without the summary rows keep their nominal height.
        let deck = build_presentation(&record("x"), &Session::new(), &ReportConfig::default()).unwrap();
        let (_, _, _, cy) = deck.slides()[1].shapes()[2].bounds();
        assert_eq!(cy, inches(ROW_HEIGHT));
    }

    #[test]
    fn test_control_characters_encoded_in_slides() {
        let record = RecordInput {
            name: "倉庫\u{0B}A棟".into(),
            transport: "駅から徒歩5分\u{1}".into(),
            ..RecordInput::default()
        }
        .capture()
        .unwrap();
        let artifact = assemble_deck(&record, &Session::new(), &ReportConfig::default()).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
        for part in ["ppt/slides/slide1.xml", "ppt/slides/slide2.xml", "docProps/core.xml"] {
            let mut xml = String::new();
            archive.by_name(part).unwrap().read_to_string(&mut xml).unwrap();
            assert!(xml.contains("倉庫_x000B_A棟"), "{}", part);
            assert!(
                !xml.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')),
                "{}",
                part
            );
            if part.ends_with("slide2.xml") {
                assert!(xml.contains("<a:t>駅から徒歩5分_x0001_</a:t>"));
            }
        }
    }

    #[test]
    fn test_fields_verbatim_on_metadata_slide() {
        let record = record("A&B スタジオ");
        let artifact = assemble_deck(&record, &Session::new(), &ReportConfig::default()).unwrap();
        assert_eq!(artifact.file_name, "location_pictures.pptx");
        assert_eq!(artifact.mime_type, PPTX_MIME_TYPE);

        let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide2.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        for (label, value) in record.fields() {
            assert!(xml.contains(&format!("<a:t>{}</a:t>", escape_xml(label))), "{}", label);
            assert!(
                xml.contains(&format!("<a:t>{}</a:t>", escape_xml(&value.display()))),
                "{}",
                label
            );
        }
        assert!(xml.contains("<a:t>45.5</a:t>"));
        assert!(xml.contains("<a:t>東京都港区 &lt;2F&gt; &amp; 屋上</a:t>"));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ReportConfig {
            images_per_slide: 4,
            ..ReportConfig::default()
        };
        assert!(build_presentation(&record("x"), &Session::new(), &config).is_err());
    }
}
