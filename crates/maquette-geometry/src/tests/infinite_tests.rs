use super::*;

#[test]
fn all_finite_children_produce_finite_bounds() {
    let frames = [
        MaybeInfinite::Finite(CanvasRect::new(0.0, 0.0, 10.0, 10.0)),
        MaybeInfinite::Finite(CanvasRect::new(5.0, 5.0, 10.0, 10.0)),
    ];
    assert_eq!(
        bounding_frame_from_children(&frames),
        Some(MaybeInfinite::Finite(CanvasRect::new(0.0, 0.0, 15.0, 15.0)))
    );
}

#[test]
fn any_infinite_child_widens_to_infinity() {
    let frames = [
        MaybeInfinite::Finite(CanvasRect::new(0.0, 0.0, 10.0, 10.0)),
        MaybeInfinite::Infinity,
    ];
    assert_eq!(
        bounding_frame_from_children(&frames),
        Some(MaybeInfinite::Infinity)
    );
}

#[test]
fn no_children_produce_no_bounds() {
    assert_eq!(bounding_frame_from_children(&[]), None);
}
