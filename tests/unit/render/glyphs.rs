use super::*;

#[test]
fn size_counts_known_glyphs_only() {
    assert_eq!(text_size("", 2.0), Size::ZERO);
    assert_eq!(text_size("1", 2.0), Size::new(6.0, 10.0));
    assert_eq!(text_size("1/8", 2.0), Size::new(22.0, 10.0));
    assert_eq!(text_size("1?8", 2.0), text_size("18", 2.0));
}

#[test]
fn cells_stay_inside_text_box() {
    let origin = Point::new(10.0, 20.0);
    let text = "12/340";
    let size = text_size(text, 2.0);
    let bounds = Rect::from_origin_size(origin, size);
    let cells = text_cells(text, origin, 2.0);
    assert!(!cells.is_empty());
    for c in cells {
        assert!(c.x0 >= bounds.x0 && c.x1 <= bounds.x1);
        assert!(c.y0 >= bounds.y0 && c.y1 <= bounds.y1);
    }
}

#[test]
fn one_has_expected_cell_count() {
    // 0b010, 0b110, 0b010, 0b010, 0b111
    assert_eq!(text_cells("1", Point::ORIGIN, 1.0).len(), 1 + 2 + 1 + 1 + 3);
}

#[test]
fn loading_label_is_fully_covered() {
    assert_eq!(text_size("Loading...", 1.0).width, 10.0 * 3.0 + 9.0);
}
