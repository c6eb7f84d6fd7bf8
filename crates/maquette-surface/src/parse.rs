//! CSS-ish value parsing with degrade-to-neutral semantics
//!
//! Malformed values never abort a walk: every parser here returns `None` (or
//! a neutral default) on input it does not understand, and only pixel
//! lengths resolve to numbers.

use maquette_geometry::Sides;
use maquette_model::{
    DetectedLayoutSystem, FlexAlignment, FlexDirection, FlexJustifyContent, GridAutoFlow,
    GridPosition, Position, TextDirection,
};

/// Parses a pixel length (`"12px"`, `"0.5px"`). Any other unit or keyword
/// yields `None`.
pub fn parse_css_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px")?;
    number.trim().parse::<f64>().ok()
}

/// Parses a length, accepting bare zero alongside pixel values.
pub fn parse_css_length(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed == "0" {
        return Some(0.0);
    }
    parse_css_px(trimmed)
}

/// Builds [`Sides`] from four per-side values; non-px sides stay `None`.
pub fn parse_sides_px(
    top: Option<&str>,
    right: Option<&str>,
    bottom: Option<&str>,
    left: Option<&str>,
) -> Sides {
    Sides {
        top: top.and_then(parse_css_length),
        right: right.and_then(parse_css_length),
        bottom: bottom.and_then(parse_css_length),
        left: left.and_then(parse_css_length),
    }
}

/// Classifies the layout system an element imposes on its children.
pub fn element_layout_system(display: Option<&str>) -> DetectedLayoutSystem {
    match display {
        None => DetectedLayoutSystem::None,
        Some(display) if display.contains("flex") => DetectedLayoutSystem::Flex,
        Some(display) if display.contains("grid") => DetectedLayoutSystem::Grid,
        Some(_) => DetectedLayoutSystem::Flow,
    }
}

pub fn parse_position(value: &str) -> Option<Position> {
    match value.trim() {
        "static" => Some(Position::Static),
        "relative" => Some(Position::Relative),
        "absolute" => Some(Position::Absolute),
        "sticky" => Some(Position::Sticky),
        "fixed" => Some(Position::Fixed),
        _ => None,
    }
}

pub fn parse_flex_direction(value: &str) -> Option<FlexDirection> {
    match value.trim() {
        "row" => Some(FlexDirection::Row),
        "row-reverse" => Some(FlexDirection::RowReverse),
        "column" => Some(FlexDirection::Column),
        "column-reverse" => Some(FlexDirection::ColumnReverse),
        _ => None,
    }
}

pub fn parse_justify_content(value: &str) -> Option<FlexJustifyContent> {
    match value.trim() {
        "flex-start" | "start" => Some(FlexJustifyContent::FlexStart),
        "center" => Some(FlexJustifyContent::Center),
        "flex-end" | "end" => Some(FlexJustifyContent::FlexEnd),
        "space-between" => Some(FlexJustifyContent::SpaceBetween),
        "space-around" => Some(FlexJustifyContent::SpaceAround),
        "space-evenly" => Some(FlexJustifyContent::SpaceEvenly),
        _ => None,
    }
}

pub fn parse_align_items(value: &str) -> Option<FlexAlignment> {
    match value.trim() {
        "auto" => Some(FlexAlignment::Auto),
        "flex-start" | "start" => Some(FlexAlignment::FlexStart),
        "center" => Some(FlexAlignment::Center),
        "flex-end" | "end" => Some(FlexAlignment::FlexEnd),
        "stretch" | "normal" => Some(FlexAlignment::Stretch),
        "baseline" => Some(FlexAlignment::Baseline),
        _ => None,
    }
}

pub fn parse_direction(value: &str) -> Option<TextDirection> {
    match value.trim() {
        "ltr" => Some(TextDirection::Ltr),
        "rtl" => Some(TextDirection::Rtl),
        _ => None,
    }
}

/// Parses one end of a grid placement: `auto` or an explicit line number.
pub fn parse_grid_position(value: &str) -> Option<GridPosition> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed == "auto" {
        return Some(GridPosition::Auto);
    }
    trimmed.parse::<i64>().ok().map(GridPosition::Numeric)
}

/// Parses a `grid-row`/`grid-column` shorthand (`"2 / 4"` or `"2"`).
pub fn parse_grid_range(value: &str) -> (Option<GridPosition>, Option<GridPosition>) {
    let mut ends = value.splitn(2, '/');
    let start = ends.next().and_then(parse_grid_position);
    let end = ends.next().and_then(parse_grid_position);
    (start, end)
}

pub fn parse_grid_auto_flow(value: &str) -> Option<GridAutoFlow> {
    match value.trim() {
        "row" => Some(GridAutoFlow::Row),
        "column" => Some(GridAutoFlow::Column),
        "row dense" | "dense" => Some(GridAutoFlow::RowDense),
        "column dense" => Some(GridAutoFlow::ColumnDense),
        _ => None,
    }
}

/// `auto` and `0px` are the defaults for inset properties; anything else is
/// an explicit position offset.
pub fn position_value_is_default(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed == "auto" || trimmed == "0px" || trimmed == "0"
}

#[cfg(test)]
#[path = "tests/parse_tests.rs"]
mod tests;
