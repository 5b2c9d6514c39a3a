//! Object lifecycle on a figure: deletion scopes, soft erase, cursor keys.

use drapo_core::{
    CanvasEvent, CursorOptions, DeleteScope, DrapoError, Figure, Interactive, Key, KeyPress,
    LineOptions, MotionPhase, MouseButton, RectOptions, RegionId, Rgba, ShapeKind, ViewLimits,
};
use drapo_render::HeadlessCanvas;
use kurbo::{Point, Rect};
use peniko::Color;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn two_region_figure() -> (Figure<HeadlessCanvas>, RegionId, RegionId) {
    init();
    let limits = ViewLimits::new(0.0, 1.0, 0.0, 1.0);
    let mut canvas = HeadlessCanvas::new();
    let left = canvas.add_region(Rect::new(0.0, 0.0, 200.0, 200.0), limits).unwrap();
    let right = canvas.add_region(Rect::new(250.0, 0.0, 450.0, 200.0), limits).unwrap();
    (Figure::new(canvas), left, right)
}

#[test]
fn test_delete_others_scopes() {
    let (mut figure, left, right) = two_region_figure();
    let a = figure.add_line(LineOptions::default().with_region(left)).unwrap();
    let b = figure.add_line(LineOptions::default().with_region(left)).unwrap();
    let c = figure.add_line(LineOptions::default().with_region(right)).unwrap();
    let rect = figure.add_rect(RectOptions::default().with_region(right)).unwrap();

    assert_eq!(figure.describe(c).as_deref(), Some("Draggable Line #3/3"));

    assert_eq!(figure.delete_others(a, DeleteScope::Region), 1);
    assert!(figure.get(b).is_none());
    assert!(figure.get(c).is_some());

    assert_eq!(figure.delete_others(a, DeleteScope::All), 1);
    assert_eq!(figure.objects_of(ShapeKind::Line), vec![a]);
    // Other types are left alone.
    assert!(figure.get(rect).is_some());
    assert_eq!(figure.canvas().artist_count(), 3 + 9);

    figure.clear();
    assert!(figure.is_empty());
    assert_eq!(figure.canvas().artist_count(), 0);
}

#[test]
fn test_unknown_region_falls_back_to_current() {
    let (mut figure, left, _) = two_region_figure();
    let id = figure
        .add_line(LineOptions::default().with_region(RegionId(42)))
        .unwrap();
    assert_eq!(figure.get(id).and_then(|o| o.region()), Some(left));
}

#[test]
fn test_erase_keeps_object_connected() {
    let (mut figure, _, _) = two_region_figure();
    let id = figure.add_rect(RectOptions::default()).unwrap();

    figure.erase(id).unwrap();
    let rect = figure.get(id).and_then(|o| o.as_rect()).unwrap();
    assert!(rect.is_erased());
    assert_eq!(rect.position(), None);
    assert_eq!(figure.canvas().artist_count(), 0);
    assert!(figure.is_subscribed(id, drapo_core::EventKind::Press));

    assert!(figure.delete(id).is_some());
    assert!(matches!(figure.erase(id), Err(DrapoError::UnknownShape(_))));
}

#[test]
fn test_cursor_keys() {
    let (mut figure, _, _) = two_region_figure();
    let id = figure.add_cursor(CursorOptions::default()).unwrap();
    let cursor = |figure: &Figure<HeadlessCanvas>| {
        figure.get(id).and_then(|o| o.as_cursor()).cloned().unwrap()
    };

    figure.canvas_mut().move_to(Point::new(100.0, 100.0));
    figure.process_events();
    assert_eq!(figure.canvas().artist_count(), 2);

    // Next palette color after the default near-black is red.
    figure.canvas_mut().key(KeyPress::shifted(Key::Right));
    figure.process_events();
    let red = Rgba::rgb(255, 0, 0);
    assert_eq!(cursor(&figure).color(), red);
    assert_eq!(figure.canvas().count_color(Color::from(red)), 2);
    assert_eq!(figure.canvas().artist_count(), 2);

    figure.canvas_mut().key(KeyPress::shifted(Key::Left));
    figure.canvas_mut().key(KeyPress::shifted(Key::Left));
    figure.process_events();
    assert_eq!(cursor(&figure).color(), Rgba::near_white());

    figure.canvas_mut().key(KeyPress::shifted(Key::Up));
    figure.process_events();
    assert_eq!(cursor(&figure).line_width(), 1.5);
    for _ in 0..4 {
        figure.canvas_mut().key(KeyPress::shifted(Key::Down));
    }
    figure.process_events();
    assert_eq!(cursor(&figure).line_width(), 0.5);

    figure.canvas_mut().key(KeyPress::new(Key::Space));
    figure.process_events();
    assert!(!cursor(&figure).is_visible());
    assert_eq!(figure.canvas().artist_count(), 0);

    figure.canvas_mut().key(KeyPress::new(Key::Space));
    figure.process_events();
    assert!(cursor(&figure).is_visible());
    assert_eq!(figure.canvas().artist_count(), 2);

    // Removing a point that does not exist does nothing.
    figure.canvas_mut().key(KeyPress::new(Key::Char('z')));
    figure.process_events();
    assert_eq!(cursor(&figure).click_count(), 0);
    assert!(figure.get(id).is_some());
}

#[test]
fn test_cursor_marks_and_data_are_erased_separately() {
    let (mut figure, _, _) = two_region_figure();
    let id = figure
        .add_cursor(
            CursorOptions::default()
                .with_record_clicks(true)
                .with_show_clicks(true),
        )
        .unwrap();

    figure.canvas_mut().move_to(Point::new(50.0, 50.0));
    figure.canvas_mut().click(Point::new(50.0, 50.0), MouseButton::Left);
    figure.canvas_mut().click(Point::new(80.0, 50.0), MouseButton::Left);
    figure.process_events();
    let cursor = figure.get(id).and_then(|o| o.as_cursor()).unwrap();
    assert_eq!((cursor.click_count(), cursor.mark_count()), (2, 2));
    assert_eq!(
        cursor.to_string(),
        "Cursor, marks left clicks, records left clicks (2/1000)"
    );

    figure.erase_marks(id).unwrap();
    let cursor = figure.get(id).and_then(|o| o.as_cursor()).unwrap();
    assert_eq!((cursor.click_count(), cursor.mark_count()), (2, 0));
    // Only the cursor lines are left.
    assert_eq!(figure.canvas().artist_count(), 2);

    figure.erase_data(id).unwrap();
    assert_eq!(figure.get(id).and_then(|o| o.as_cursor()).unwrap().click_count(), 0);
}

#[test]
fn test_stop_button_disconnects_cursor() {
    let (mut figure, _, _) = two_region_figure();
    let id = figure.add_cursor(CursorOptions::default()).unwrap();

    figure.canvas_mut().move_to(Point::new(50.0, 50.0));
    figure.canvas_mut().click(Point::new(50.0, 50.0), MouseButton::Middle);
    figure.process_events();

    assert!(figure.get(id).is_none());
    assert_eq!(figure.canvas().artist_count(), 0);
}

#[test]
fn test_leaving_the_region_cancels_a_drag() {
    let (mut figure, _, _) = two_region_figure();
    let id = figure.add_line(LineOptions::default()).unwrap();
    let ends = |figure: &Figure<HeadlessCanvas>| {
        figure.get(id).and_then(|o| o.as_line()).and_then(|l| l.endpoints()).unwrap()
    };
    let before = ends(&figure);

    figure.canvas_mut().press_at(Point::new(100.0, 100.0), MouseButton::Left);
    figure.process_events();
    assert_eq!(
        figure.coordinator(ShapeKind::Line).unwrap().phase(),
        MotionPhase::Dragging
    );

    // Into the gap between the two regions.
    figure.canvas_mut().move_to(Point::new(225.0, 100.0));
    figure.process_events();
    assert_eq!(figure.coordinator(ShapeKind::Line).unwrap().phase(), MotionPhase::Idle);
    assert_eq!(ends(&figure), before);

    // Coming back with the button still held does not resume the drag.
    figure.canvas_mut().move_to(Point::new(120.0, 130.0));
    figure.canvas_mut().release_at(Point::new(120.0, 130.0), MouseButton::Left);
    figure.process_events();
    assert_eq!(ends(&figure), before);
    assert_eq!(figure.canvas().visible(), figure.canvas().composed());
}

#[test]
fn test_resize_cancels_a_drag() {
    let (mut figure, left, _) = two_region_figure();
    let id = figure.add_rect(RectOptions::default()).unwrap();

    figure.canvas_mut().press_at(Point::new(100.0, 100.0), MouseButton::Left);
    figure.canvas_mut().move_to(Point::new(110.0, 100.0));
    figure.process_events();
    let dragged = figure.get(id).and_then(|o| o.as_rect()).unwrap().position().unwrap();
    assert!((dragged.0 - 0.3).abs() < 1e-9);

    figure
        .canvas_mut()
        .resize(left, Rect::new(0.0, 0.0, 100.0, 100.0))
        .unwrap();
    figure.canvas_mut().push_event(CanvasEvent::Resize);
    figure.canvas_mut().move_to(Point::new(60.0, 50.0));
    figure.process_events();

    let rect = figure.get(id).and_then(|o| o.as_rect()).unwrap();
    assert_eq!(rect.motion_mode(), None);
    assert_eq!(rect.position(), Some(dragged));
    assert_eq!(figure.coordinator(ShapeKind::Rect).unwrap().phase(), MotionPhase::Idle);
}
