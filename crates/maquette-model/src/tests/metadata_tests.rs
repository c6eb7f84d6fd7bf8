use super::*;
use maquette_geometry::{CanvasRect, MaybeInfinite};

fn entry(path: &str, frame: CanvasRect) -> ElementInstanceMetadata {
    ElementInstanceMetadata::measured(
        ElementPath::from_string(path),
        "div",
        MaybeInfinite::Finite(frame),
        MaybeInfinite::Finite(frame),
        SpecialSizeMeasurements::default(),
        None,
        None,
        None,
    )
}

#[test]
fn insert_keys_by_path_string() {
    let mut map = ElementInstanceMetadataMap::new();
    map.insert(entry("sb/a", CanvasRect::new(0.0, 0.0, 10.0, 10.0)));
    assert!(map.contains_key("sb/a"));
    assert_eq!(map.len(), 1);
    assert!(map.get(&ElementPath::from_string("sb/a")).is_some());
}

#[test]
fn replacement_is_wholesale_per_path() {
    let mut map = ElementInstanceMetadataMap::new();
    map.insert(entry("sb/a", CanvasRect::new(0.0, 0.0, 10.0, 10.0)));
    map.insert(entry("sb/a", CanvasRect::new(5.0, 5.0, 20.0, 20.0)));
    assert_eq!(map.len(), 1);
    let frame = map.frame_in_canvas_coords(&ElementPath::from_string("sb/a"));
    assert_eq!(
        frame,
        Some(MaybeInfinite::Finite(CanvasRect::new(5.0, 5.0, 20.0, 20.0)))
    );
}

#[test]
fn children_order_prefers_recorded_child_list() {
    let mut map = ElementInstanceMetadataMap::new();
    let mut parent = entry("sb/p", CanvasRect::new(0.0, 0.0, 100.0, 100.0));
    parent.children_paths = Some(vec![
        ElementPath::from_string("sb/p/b"),
        ElementPath::from_string("sb/p/a"),
    ]);
    map.insert(parent);
    map.insert(entry("sb/p/a", CanvasRect::new(0.0, 0.0, 10.0, 10.0)));
    map.insert(entry("sb/p/b", CanvasRect::new(10.0, 0.0, 10.0, 10.0)));

    let children = map.children_paths_ordered(&ElementPath::from_string("sb/p"));
    assert_eq!(
        children,
        vec![
            ElementPath::from_string("sb/p/b"),
            ElementPath::from_string("sb/p/a"),
        ]
    );
}

#[test]
fn children_order_falls_back_to_path_scan() {
    let mut map = ElementInstanceMetadataMap::new();
    map.insert(entry("sb/p/b", CanvasRect::new(10.0, 0.0, 10.0, 10.0)));
    map.insert(entry("sb/p/a", CanvasRect::new(0.0, 0.0, 10.0, 10.0)));

    let children = map.children_paths_ordered(&ElementPath::from_string("sb/p"));
    assert_eq!(
        children,
        vec![
            ElementPath::from_string("sb/p/a"),
            ElementPath::from_string("sb/p/b"),
        ]
    );
}

#[test]
fn patch_global_frame_only_touches_the_frame() {
    let mut metadata = entry("sb/a", CanvasRect::new(0.0, 0.0, 10.0, 10.0));
    let original_non_rounded = metadata.non_rounded_global_frame;
    metadata.patch_global_frame(CanvasRect::new(1.0, 2.0, 3.0, 4.0));
    assert_eq!(
        metadata.global_frame,
        Some(MaybeInfinite::Finite(CanvasRect::new(1.0, 2.0, 3.0, 4.0)))
    );
    assert_eq!(metadata.non_rounded_global_frame, original_non_rounded);
}

#[test]
fn local_frame_subtracts_coordinate_system_origin() {
    let mut metadata = entry("sb/a", CanvasRect::new(30.0, 40.0, 10.0, 10.0));
    metadata.special_size_measurements.coordinate_system_bounds =
        Some(CanvasRect::new(20.0, 20.0, 100.0, 100.0));
    assert_eq!(
        metadata.local_frame(),
        Some(CanvasRect::new(10.0, 20.0, 10.0, 10.0))
    );
}
