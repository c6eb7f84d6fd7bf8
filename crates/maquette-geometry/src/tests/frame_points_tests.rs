use super::*;

#[test]
fn local_rect_round_trips_through_frame_points() {
    let parent = Size::new(100.0, 50.0);
    let rect = CanvasRect::new(10.0, 5.0, 30.0, 20.0);
    let points = FramePoints::from_local_rect(rect, parent);
    assert_eq!(points.right, 60.0);
    assert_eq!(points.bottom, 25.0);
    assert_eq!(points.to_local_rect(), rect);
}

#[test]
fn unconstrained_frame_scales_proportionally() {
    let old_size = Size::new(100.0, 100.0);
    let new_size = Size::new(200.0, 100.0);
    let frame = FramePoints::from_local_rect(CanvasRect::new(10.0, 0.0, 40.0, 100.0), old_size);
    let scaled = transform_constrained_frame(new_size, old_size, frame, &[]);
    assert_eq!(scaled.left, 20.0);
    assert_eq!(scaled.width, 80.0);
    assert_eq!(scaled.right, 100.0);
    assert_eq!(scaled.height, 100.0);
}

#[test]
fn constrained_width_is_pinned_while_pins_scale() {
    let old_size = Size::new(100.0, 100.0);
    let new_size = Size::new(160.0, 100.0);
    let frame = FramePoints::from_local_rect(CanvasRect::new(20.0, 0.0, 40.0, 100.0), old_size);
    let scaled =
        transform_constrained_frame(new_size, old_size, frame, &[FramePoint::Width]);
    assert_eq!(scaled.width, 40.0);
    // remaining space grows from 60 to 120, so left/right double
    assert_eq!(scaled.left, 40.0);
    assert_eq!(scaled.right, 80.0);
    assert_eq!(scaled.left + scaled.width + scaled.right, new_size.width);
}

#[test]
fn rounding_rounds_every_member() {
    let frame = FramePoints {
        left: 1.4,
        top: 2.6,
        right: 3.5,
        bottom: 4.4,
        width: 5.5,
        height: 6.6,
    };
    let rounded = frame.round_to_nearest_whole();
    assert_eq!(rounded.left, 1.0);
    assert_eq!(rounded.top, 3.0);
    assert_eq!(rounded.right, 4.0);
    assert_eq!(rounded.bottom, 4.0);
    assert_eq!(rounded.width, 6.0);
    assert_eq!(rounded.height, 7.0);
}
