//! Slide geometry: grid cells and aspect-preserving image placement.
//!
//! All arithmetic is in `f64` EMUs; values are rounded only when converted
//! with [`Rect::to_emu`].

use smallvec::SmallVec;

use crate::common::unit::{Emu, inches, round_emu};

/// Left margin of the grid area.
pub const GRID_LEFT: f64 = 0.5;
/// Top of the grid area, below the heading.
pub const GRID_TOP: f64 = 1.5;
/// Gap between neighbouring cells.
pub const GRID_GAP: f64 = 0.2;

/// Columns and rows of an image-grid slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub cols: u32,
    pub rows: u32,
}

impl GridShape {
    /// The shape for a supported images-per-slide count: 6 is 3×2, 9 is 3×3.
    pub fn for_count(images_per_slide: u32) -> Option<Self> {
        match images_per_slide {
            6 => Some(Self { cols: 3, rows: 2 }),
            9 => Some(Self { cols: 3, rows: 3 }),
            _ => None,
        }
    }

    pub fn capacity(&self) -> usize {
        (self.cols * self.rows) as usize
    }
}

/// An axis-aligned rectangle in EMUs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rounded `(x, y, width, height)`.
    pub fn to_emu(&self) -> (Emu, Emu, Emu, Emu) {
        (
            round_emu(self.x),
            round_emu(self.y),
            round_emu(self.width),
            round_emu(self.height),
        )
    }

    /// Place `placement` inside this rectangle.
    pub fn inset(&self, placement: &Placement) -> Rect {
        Rect::new(
            self.x + placement.offset_x,
            self.y + placement.offset_y,
            placement.width,
            placement.height,
        )
    }
}

/// Size of a fitted image and its offset from the cell's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub width: f64,
    pub height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Placement {
    /// Whether the image leaves a visible band in its cell, i.e. it misses the
    /// cell size by more than one EMU in either direction.
    pub fn is_letterboxed(&self, cell: (f64, f64)) -> bool {
        cell.0 - self.width > 1.0 || cell.1 - self.height > 1.0
    }
}

/// Scale `image` to the largest size that fits in `cell` without changing its
/// aspect ratio, centered.
///
/// A wider-than-cell image is clamped to the cell width; otherwise the height
/// is clamped. Zero-sized input yields a zero-sized placement at the center.
pub fn fit(image: (f64, f64), cell: (f64, f64)) -> Placement {
    let (iw, ih) = image;
    let (cw, ch) = cell;
    if iw <= 0.0 || ih <= 0.0 || cw <= 0.0 || ch <= 0.0 {
        return Placement {
            width: 0.0,
            height: 0.0,
            offset_x: cw.max(0.0) / 2.0,
            offset_y: ch.max(0.0) / 2.0,
        };
    }

    let image_ratio = iw / ih;
    let (width, height) = if image_ratio > cw / ch {
        (cw, cw / image_ratio)
    } else {
        (ch * image_ratio, ch)
    };
    Placement {
        width,
        height,
        offset_x: (cw - width) / 2.0,
        offset_y: (ch - height) / 2.0,
    }
}

/// Cells of the image grid, row-major.
pub fn grid_cells(slide_width: Emu, slide_height: Emu, shape: GridShape) -> SmallVec<[Rect; 9]> {
    let left = inches(GRID_LEFT) as f64;
    let top = inches(GRID_TOP) as f64;
    let gap = inches(GRID_GAP) as f64;
    let usable_w = slide_width as f64 - inches(1.0) as f64;
    let usable_h = slide_height as f64 - top;

    let cols = shape.cols as f64;
    let rows = shape.rows as f64;
    let cell_w = (usable_w - gap * (cols - 1.0)) / cols;
    let cell_h = (usable_h - gap * (rows - 1.0)) / rows;

    let mut cells = SmallVec::new();
    for row in 0..shape.rows {
        for col in 0..shape.cols {
            cells.push(Rect::new(
                left + col as f64 * (cell_w + gap),
                top + row as f64 * (cell_h + gap),
                cell_w,
                cell_h,
            ));
        }
    }
    cells
}

/// Title-slide thumbnail: 60% of the slide width, centered in `area`.
///
/// When that height would overflow `area`, the image is fitted to the area
/// instead.
pub fn thumbnail_rect(image: (f64, f64), slide_width: Emu, area: Rect) -> Rect {
    let (iw, ih) = image;
    let width = slide_width as f64 * 0.6;
    let height = if iw > 0.0 { width * ih / iw } else { 0.0 };

    if height <= area.height && width <= area.width {
        return Rect::new(
            area.x + (area.width - width) / 2.0,
            area.y + (area.height - height) / 2.0,
            width,
            height,
        );
    }
    area.inset(&fit(image, (area.width, area.height)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::writer::pres::{WIDESCREEN_HEIGHT, WIDESCREEN_WIDTH};

    #[test]
    fn test_fit_wide_image() {
        let p = fit((400.0, 100.0), (300.0, 300.0));
        assert_eq!((p.width, p.height), (300.0, 75.0));
        assert_eq!((p.offset_x, p.offset_y), (0.0, 112.5));
        assert!(p.is_letterboxed((300.0, 300.0)));
    }

    #[test]
    fn test_fit_tall_image() {
        let p = fit((100.0, 200.0), (300.0, 300.0));
        assert_eq!((p.width, p.height), (150.0, 300.0));
        assert_eq!(p.offset_x, 75.0);
    }

    #[test]
    fn test_fit_exact_ratio_is_not_letterboxed() {
        let p = fit((640.0, 480.0), (400.0, 300.0));
        assert_eq!((p.width, p.height), (400.0, 300.0));
        assert!(!p.is_letterboxed((400.0, 300.0)));
    }

    #[test]
    fn test_fit_degenerate() {
        let p = fit((0.0, 10.0), (100.0, 50.0));
        assert_eq!((p.width, p.height), (0.0, 0.0));
        assert_eq!((p.offset_x, p.offset_y), (50.0, 25.0));
    }

    #[test]
    fn test_grid_shape() {
        assert_eq!(GridShape::for_count(6), Some(GridShape { cols: 3, rows: 2 }));
        assert_eq!(GridShape::for_count(9).map(|s| s.capacity()), Some(9));
        assert_eq!(GridShape::for_count(8), None);
    }

    #[test]
    fn test_grid_cells_3x2() {
        let cells = grid_cells(WIDESCREEN_WIDTH, WIDESCREEN_HEIGHT, GridShape { cols: 3, rows: 2 });
        assert_eq!(cells.len(), 6);

        let first = cells[0];
        assert_eq!((first.x, first.y), (457_200.0, 1_371_600.0));

        let gap = inches(GRID_GAP) as f64;
        assert!((cells[1].x - (first.x + first.width + gap)).abs() < 1e-6);
        assert!((cells[3].y - (first.y + first.height + gap)).abs() < 1e-6);

        let last = cells[5];
        let right = last.x + last.width;
        let bottom = last.y + last.height;
        assert!((right - (WIDESCREEN_WIDTH - inches(0.5)) as f64).abs() < 1e-6);
        assert!((bottom - WIDESCREEN_HEIGHT as f64).abs() < 1e-6);
    }

    #[test]
    fn test_thumbnail_rect() {
        let area = Rect::new(0.0, inches(1.3) as f64, WIDESCREEN_WIDTH as f64, inches(5.9) as f64);

        // Landscape: 60% of the slide width.
        let r = thumbnail_rect((1600.0, 900.0), WIDESCREEN_WIDTH, area);
        assert!((r.width - WIDESCREEN_WIDTH as f64 * 0.6).abs() < 1e-6);
        assert!((r.x + r.width / 2.0 - WIDESCREEN_WIDTH as f64 / 2.0).abs() < 1e-6);

        // Portrait would overflow, so it is fitted to the area height.
        let r = thumbnail_rect((900.0, 1600.0), WIDESCREEN_WIDTH, area);
        assert!((r.height - area.height).abs() < 1e-6);
        assert!(r.width < WIDESCREEN_WIDTH as f64 * 0.6);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn size() -> impl Strategy<Value = (f64, f64)> {
            (1.0f64..10_000.0, 1.0f64..10_000.0)
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_fit_stays_inside_cell(image in size(), cell in size()) {
                let p = fit(image, cell);
                prop_assert!(p.width <= cell.0 * (1.0 + 1e-9));
                prop_assert!(p.height <= cell.1 * (1.0 + 1e-9));
                prop_assert!(p.offset_x >= -1e-9 && p.offset_y >= -1e-9);
            }

            #[test]
            fn prop_fit_preserves_aspect_ratio(image in size(), cell in size()) {
                let p = fit(image, cell);
                let expected = image.0 / image.1;
                let actual = p.width / p.height;
                prop_assert!((actual - expected).abs() / expected < 1e-9);
            }

            #[test]
            fn prop_fit_is_centered_and_fills_one_side(image in size(), cell in size()) {
                let p = fit(image, cell);
                prop_assert!((p.offset_x * 2.0 + p.width - cell.0).abs() < 1e-6);
                prop_assert!((p.offset_y * 2.0 + p.height - cell.1).abs() < 1e-6);
                let fills_width = (p.width - cell.0).abs() < 1e-6;
                let fills_height = (p.height - cell.1).abs() < 1e-6;
                prop_assert!(fills_width || fills_height);
            }
        }
    }
}
