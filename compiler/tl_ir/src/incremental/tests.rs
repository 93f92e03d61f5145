use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_change_delta() {
    assert_eq!(TextChange::new(10, 10, 5).delta(), 5);
    assert_eq!(TextChange::new(10, 15, 0).delta(), -5);
    assert_eq!(TextChange::new(0, 3, 5).delta(), 2);
}

#[test]
fn test_edit_on_one_line() {
    // `local x = 1` with `x` renamed to `value`.
    let edit = InputEdit::new(6, 7, Point::new(0, 6), Point::new(0, 7), "value");
    assert_eq!(edit.change, TextChange::new(6, 7, 5));
    assert_eq!(edit.new_end_point, Point::new(0, 11));
}

#[test]
fn test_edit_across_lines() {
    let edit = InputEdit::new(4, 4, Point::new(2, 4), Point::new(2, 4), "a\nbb\nccc");
    assert_eq!(edit.change.new_len, 8);
    assert_eq!(edit.new_end_point, Point::new(4, 3));

    let edit = InputEdit::new(0, 0, Point::new(0, 0), Point::new(0, 0), "x\n");
    assert_eq!(edit.new_end_point, Point::new(1, 0));
}

#[test]
fn test_marker_reaches_back_to_previous_token() {
    let change = TextChange::new(100, 110, 15);
    assert_eq!(
        ChangeMarker::from_change(&change, 95),
        ChangeMarker::new(95, 110, 5)
    );
    // A token ending inside the change does not move the start.
    assert_eq!(ChangeMarker::from_change(&change, 105).affected_start, 100);
}

#[test]
fn test_adjust_position() {
    let marker = ChangeMarker::new(100, 110, 5);
    assert_eq!(marker.adjust_position(99), 99);
    assert_eq!(marker.adjust_position(105), 105);
    assert_eq!(marker.adjust_position(110), 115);

    let shrink = ChangeMarker::new(100, 120, -10);
    assert_eq!(shrink.adjust_position(120), 110);

    let insertion = ChangeMarker::new(100, 100, 10);
    assert_eq!(insertion.adjust_position(100), 110);
}

#[test]
fn test_reusable_spans() {
    let marker = ChangeMarker::new(100, 110, 5);
    assert!(marker.is_reusable(Span::new(10, 99)));
    assert!(!marker.is_reusable(Span::new(10, 100)));
    assert!(!marker.is_reusable(Span::new(105, 120)));
    assert!(marker.is_reusable(Span::new(110, 120)));
}
