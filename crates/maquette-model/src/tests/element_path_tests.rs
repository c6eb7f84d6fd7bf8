use super::*;

fn path(value: &str) -> ElementPath {
    ElementPath::from_string(value)
}

#[test]
fn string_form_round_trips() {
    let original = "sb/scene:app/card/title";
    let parsed = path(original);
    assert_eq!(parsed.to_path_string(), original);
    assert_eq!(parsed.parts().len(), 2);
    assert_eq!(parsed.uid(), Some("title"));
}

#[test]
fn parent_drops_last_segment() {
    assert_eq!(path("sb/scene:app/card").parent(), path("sb/scene:app"));
    assert_eq!(path("sb/scene:app").parent(), path("sb/scene"));
    assert_eq!(path("sb").parent(), ElementPath::empty());
    assert_eq!(ElementPath::empty().parent(), ElementPath::empty());
}

#[test]
fn append_extends_last_part() {
    let base = path("sb/scene");
    assert_eq!(base.append("card"), path("sb/scene/card"));
    assert_eq!(
        base.append_part(["root", "child"]),
        path("sb/scene:root/child")
    );
}

#[test]
fn descendant_checks_use_prefix_containment() {
    let ancestor = path("sb/scene");
    let child = path("sb/scene/card");
    let nested = path("sb/scene:root/inner");
    let unrelated = path("sb/other");

    assert!(child.is_descendant_of(&ancestor));
    assert!(nested.is_descendant_of(&ancestor));
    assert!(!unrelated.is_descendant_of(&ancestor));
    assert!(!ancestor.is_descendant_of(&child));

    assert!(ancestor.is_descendant_of_or_equal_to(&ancestor));
    assert!(!ancestor.is_descendant_of(&ancestor));
}

#[test]
fn generated_elements_are_detected_by_instance_suffix() {
    assert!(path("sb/scene/card~~~2").is_root_of_generated_element());
    assert!(!path("sb/scene/card").is_root_of_generated_element());
    assert_eq!(
        path("sb/scene/card~~~2").static_uid(),
        Some("card".to_owned())
    );
}

#[test]
fn make_last_part_static_collapses_suffixes() {
    let generated = path("sb/scene:list/card~~~3");
    assert_eq!(generated.make_last_part_static(), path("sb/scene:list/card"));
    // earlier parts keep their instance identity
    let nested = path("sb/list~~~1:card/label~~~2");
    assert_eq!(
        nested.make_last_part_static(),
        path("sb/list~~~1:card/label")
    );
}

#[test]
fn depth_counts_segments_across_parts() {
    assert_eq!(path("sb/scene:app/card").depth(), 4);
    assert_eq!(ElementPath::empty().depth(), 0);
}

#[test]
fn path_with_string_caches_the_string_form() {
    let p = path("sb/scene/card");
    let pws = PathWithString::new(p.clone());
    assert_eq!(pws.as_string, "sb/scene/card");
    assert_eq!(pws.path, p);
}
