use super::*;

#[test]
fn generated_uids_avoid_collisions() {
    let mut existing = FxHashSet::default();
    assert_eq!(generate_consistent_uid(&existing), "aaa");
    existing.insert("aaa".to_owned());
    assert_eq!(generate_consistent_uid(&existing), "aab");
}

#[test]
fn existing_uids_cover_stores_order_and_metadata() {
    let mut state = EditorState::new();
    state
        .style_stores
        .insert("sb/card".to_owned(), StyleStore::default());
    state.child_order.insert(
        "sb".to_owned(),
        vec![ElementPath::from_string("sb/hero")],
    );

    let uids = state.existing_uids();
    assert!(uids.contains("card"));
    assert!(uids.contains("hero"));
}

#[test]
fn hug_detection_reads_authored_style() {
    let mut state = EditorState::new();
    let path = ElementPath::from_string("sb/a");
    let mut store = StyleStore::default();
    store.insert("width".to_owned(), StyleValue::keyword("max-content"));
    store.insert("height".to_owned(), StyleValue::Px(100.0));
    state.style_stores.insert(path.to_path_string(), store);

    assert!(state.is_hug_from_style(&path, "width"));
    assert!(!state.is_hug_from_style(&path, "height"));
}

#[test]
fn style_values_render_with_units() {
    assert_eq!(StyleValue::Px(12.0).to_string(), "12px");
    assert_eq!(StyleValue::Percent(50.0).to_string(), "50%");
    assert_eq!(StyleValue::Number(2.0).to_string(), "2");
    assert_eq!(StyleValue::keyword("auto").to_string(), "auto");
}
