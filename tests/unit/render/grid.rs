use super::*;
use crate::foundation::core::ZoneMatrix;

fn setup(rows: Vec<Vec<u32>>) -> (ColoredMatrix, ColorMap, GrayscalePalette) {
    let zones = ZoneMatrix::from_rows(rows).unwrap();
    let colors = ColorMap::new([
        ("red".to_owned(), Rgb8::new(255, 0, 0)),
        ("blue".to_owned(), Rgb8::new(0, 0, 255)),
    ])
    .unwrap();
    let palette = GrayscalePalette::for_matrix(&zones).unwrap();
    (ColoredMatrix::unpainted(&zones), colors, palette)
}

fn paint(m: &mut ColoredMatrix, row: usize, col: usize, color: &str) {
    let cols = m.cols();
    m.cells_mut()[row * cols + col] = Cell::Painted(color.to_owned());
}

fn assert_px(img: &image::RgbImage, x: u32, y: u32, want: [u8; 3]) {
    let got = img.get_pixel(x, y).0;
    for ch in 0..3 {
        assert!(
            got[ch].abs_diff(want[ch]) <= 1,
            "pixel ({x},{y}) = {got:?}, want {want:?}"
        );
    }
}

#[test]
fn output_size_is_cols_by_rows_times_cell_size() {
    let (m, colors, palette) = setup(vec![vec![0, 1, 2], vec![2, 1, 0]]);
    for cell_size in [1, 7, 50] {
        let mut r = GridRenderer::new(RenderOpts::default().with_cell_size(cell_size), None).unwrap();
        let img = r.render(&m, &colors, &palette).unwrap();
        assert_eq!(img.dimensions(), (3 * cell_size, 2 * cell_size));
    }
}

#[test]
fn unpainted_cells_get_grayscale_fill_and_black_border() {
    let (m, colors, palette) = setup(vec![vec![0, 1, 2]]);
    let mut r = GridRenderer::new(RenderOpts::default(), None).unwrap();
    let img = r.render(&m, &colors, &palette).unwrap();

    // zone 0, zone 1 (127), zone 2 (254); sampled away from border and label
    assert_px(&img, 5, 5, [255, 255, 255]);
    assert_px(&img, 55, 5, [127, 127, 127]);
    assert_px(&img, 105, 5, [254, 254, 254]);

    for x0 in [0, 50, 100] {
        assert_px(&img, x0, 25, [0, 0, 0]);
        assert_px(&img, x0 + 49, 25, [0, 0, 0]);
        assert_px(&img, x0 + 25, 0, [0, 0, 0]);
        assert_px(&img, x0 + 25, 49, [0, 0, 0]);
    }
}

#[test]
fn painted_cells_are_flat_without_border() {
    let (mut m, colors, palette) = setup(vec![vec![1, 1]]);
    paint(&mut m, 0, 0, "red");
    paint(&mut m, 0, 1, "blue");
    let mut r = GridRenderer::new(RenderOpts::default(), None).unwrap();
    let img = r.render(&m, &colors, &palette).unwrap();

    assert_px(&img, 0, 0, [255, 0, 0]);
    assert_px(&img, 25, 25, [255, 0, 0]);
    assert_px(&img, 49, 49, [255, 0, 0]);
    assert_px(&img, 50, 0, [0, 0, 255]);
    assert_px(&img, 99, 49, [0, 0, 255]);
}

#[test]
fn unknown_color_name_falls_back_to_white() {
    let (mut m, colors, palette) = setup(vec![vec![1]]);
    paint(&mut m, 0, 0, "purple");
    let mut r = GridRenderer::new(RenderOpts::default(), None).unwrap();
    let img = r.render(&m, &colors, &palette).unwrap();
    assert_px(&img, 0, 0, [255, 255, 255]);
    assert_px(&img, 25, 25, [255, 255, 255]);
}

#[test]
fn rendering_does_not_change_the_matrix_and_is_repeatable() {
    let (mut m, colors, palette) = setup(vec![vec![0, 1], vec![1, 2]]);
    paint(&mut m, 1, 1, "red");
    let before = m.clone();
    let mut r = GridRenderer::new(RenderOpts::default().with_cell_size(10), None).unwrap();
    let a = r.render(&m, &colors, &palette).unwrap();
    let b = r.render(&m, &colors, &palette).unwrap();
    assert_eq!(m, before);
    assert_eq!(a.as_raw(), b.as_raw());
}

#[test]
fn zone_missing_from_palette_is_a_render_error() {
    let (m, colors, _) = setup(vec![vec![0, 3]]);
    let palette = GrayscalePalette::for_ids([0]).unwrap();
    let mut r = GridRenderer::new(RenderOpts::default(), None).unwrap();
    assert!(matches!(
        r.render(&m, &colors, &palette),
        Err(MalathError::Render(_))
    ));
}

#[test]
fn opts_validation() {
    assert!(RenderOpts::default().with_cell_size(0).validate().is_err());
    assert!(RenderOpts::default().with_label_size_px(0.0).validate().is_err());
    assert!(
        RenderOpts::default()
            .with_label_size_px(f32::NAN)
            .validate()
            .is_err()
    );
    assert!(GridRenderer::new(RenderOpts::default().with_cell_size(0), None).is_err());
    assert_eq!(RenderOpts::default().cell_size, 50);
}

#[test]
fn oversized_grid_is_rejected() {
    let (m, colors, palette) = setup(vec![vec![0; 2000]]);
    let mut r = GridRenderer::new(RenderOpts::default(), None).unwrap();
    assert!(r.render(&m, &colors, &palette).is_err());
}

fn label_font() -> Option<FontResource> {
    const CANDIDATES: [&str; 4] = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];
    FontResource::discover().or_else(|| {
        CANDIDATES
            .iter()
            .find_map(|p| FontResource::from_path(p).ok())
    })
}

/// `(min_x, min_y, max_x, max_y)` of dark pixels inside `[x0, x1) x [y0, y1)`.
fn dark_bounds(
    img: &image::RgbImage,
    (x0, y0, x1, y1): (u32, u32, u32, u32),
) -> Option<(u32, u32, u32, u32)> {
    let mut out: Option<(u32, u32, u32, u32)> = None;
    for y in y0..y1 {
        for x in x0..x1 {
            if img.get_pixel(x, y).0[0] >= 64 {
                continue;
            }
            out = Some(match out {
                None => (x, y, x, y),
                Some((a, b, c, d)) => (a.min(x), b.min(y), c.max(x), d.max(y)),
            });
        }
    }
    out
}

#[test]
fn label_ink_sits_below_the_line_top() {
    let Some(font) = label_font() else {
        eprintln!("no label font found; skipping");
        return;
    };
    let mut engine = TextLayoutEngine::new(&font).unwrap();
    let layout = engine
        .layout_line("8", DEFAULT_LABEL_SIZE_PX, Rgb8::BLACK.into())
        .unwrap();
    let ink = ink_bounds(&layout, engine.font(), DEFAULT_LABEL_SIZE_PX)
        .unwrap()
        .unwrap();

    // glyphs hang from the baseline, so the ink starts below the ascent line
    assert!(ink.y0 > 0.0, "ink {ink:?}");
    assert!(ink.y1 <= f64::from(layout.height()).ceil(), "ink {ink:?}");
    assert!(ink.width() > 0.0 && ink.height() > 0.0);

    let blank = engine
        .layout_line(" ", DEFAULT_LABEL_SIZE_PX, Rgb8::BLACK.into())
        .unwrap();
    assert!(
        ink_bounds(&blank, engine.font(), DEFAULT_LABEL_SIZE_PX)
            .unwrap()
            .is_none()
    );
}

#[test]
fn labels_are_centered_inside_their_cell() {
    let Some(font) = label_font() else {
        eprintln!("no label font found; skipping");
        return;
    };
    let (mut m, colors, palette) = setup(vec![vec![10, 11], vec![12, 10]]);
    paint(&mut m, 0, 0, "red");
    let mut r = GridRenderer::new(RenderOpts::default(), Some(&font)).unwrap();
    assert!(r.draws_labels());
    let img = r.render(&m, &colors, &palette).unwrap();

    // the painted neighbour above the "12" label stays a flat fill
    for y in 0..50 {
        for x in 0..50 {
            assert_px(&img, x, y, [255, 0, 0]);
        }
    }

    // cells (row 1, col 0) = "12", (row 0, col 1) = "11", (row 1, col 1) = "10"
    for (cx, cy) in [(0, 50), (50, 0), (50, 50)] {
        // border is intact around the label
        assert_px(&img, cx + 25, cy, [0, 0, 0]);
        assert_px(&img, cx + 25, cy + 49, [0, 0, 0]);

        let (min_x, min_y, max_x, max_y) = dark_bounds(&img, (cx + 1, cy + 1, cx + 49, cy + 49))
            .unwrap_or_else(|| panic!("no label ink in cell at ({cx},{cy})"));
        let (left, right) = (min_x - cx, cx + 49 - max_x);
        let (top, bottom) = (min_y - cy, cy + 49 - max_y);
        assert!(
            left.abs_diff(right) <= 3,
            "cell ({cx},{cy}): left {left} right {right}"
        );
        assert!(
            top.abs_diff(bottom) <= 3,
            "cell ({cx},{cy}): top {top} bottom {bottom}"
        );
        assert!(top >= 5 && bottom >= 5, "cell ({cx},{cy}): top {top} bottom {bottom}");
    }
}
