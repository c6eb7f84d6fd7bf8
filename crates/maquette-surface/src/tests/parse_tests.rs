use super::*;

#[test]
fn px_lengths_parse_and_other_units_degrade_to_none() {
    assert_eq!(parse_css_px("12px"), Some(12.0));
    assert_eq!(parse_css_px(" 0.5px "), Some(0.5));
    assert_eq!(parse_css_px("1.5em"), None);
    assert_eq!(parse_css_px("50%"), None);
    assert_eq!(parse_css_px("auto"), None);
    assert_eq!(parse_css_px("garbage"), None);
}

#[test]
fn bare_zero_parses_as_length() {
    assert_eq!(parse_css_length("0"), Some(0.0));
    assert_eq!(parse_css_length("0px"), Some(0.0));
}

#[test]
fn layout_system_classification() {
    assert_eq!(element_layout_system(None), DetectedLayoutSystem::None);
    assert_eq!(element_layout_system(Some("flex")), DetectedLayoutSystem::Flex);
    assert_eq!(
        element_layout_system(Some("inline-flex")),
        DetectedLayoutSystem::Flex
    );
    assert_eq!(element_layout_system(Some("grid")), DetectedLayoutSystem::Grid);
    assert_eq!(element_layout_system(Some("block")), DetectedLayoutSystem::Flow);
}

#[test]
fn grid_positions_parse_auto_and_lines() {
    assert_eq!(parse_grid_position("auto"), Some(GridPosition::Auto));
    assert_eq!(parse_grid_position("3"), Some(GridPosition::Numeric(3)));
    assert_eq!(parse_grid_position("-1"), Some(GridPosition::Numeric(-1)));
    assert_eq!(parse_grid_position(""), None);
    assert_eq!(parse_grid_position("span 2"), None);
}

#[test]
fn grid_range_splits_shorthand() {
    assert_eq!(
        parse_grid_range("2 / 4"),
        (Some(GridPosition::Numeric(2)), Some(GridPosition::Numeric(4)))
    );
    assert_eq!(parse_grid_range("2"), (Some(GridPosition::Numeric(2)), None));
    assert_eq!(
        parse_grid_range("auto / 3"),
        (Some(GridPosition::Auto), Some(GridPosition::Numeric(3)))
    );
}

#[test]
fn sides_keep_only_px_values() {
    let sides = parse_sides_px(Some("10px"), Some("1em"), None, Some("0"));
    assert_eq!(sides.top, Some(10.0));
    assert_eq!(sides.right, None);
    assert_eq!(sides.bottom, None);
    assert_eq!(sides.left, Some(0.0));
}

#[test]
fn default_inset_values_are_detected() {
    assert!(position_value_is_default("auto"));
    assert!(position_value_is_default("0px"));
    assert!(!position_value_is_default("12px"));
}
