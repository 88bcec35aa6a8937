use super::*;

fn chain() -> Snapshot {
    Snapshot::new(
        vec![
            Point::new("a", 70.0, 76.0, PointKind::Primary),
            Point::new("b", 70.0, 69.0, PointKind::Primary).with_caption("feat: home"),
        ],
        vec![Connection::new("l1", "a", "b", ConnectionKind::Primary)],
        vec![Annotation::new(
            "note",
            "b",
            Placement::Left,
            AnnotationCategory::OpenIssue,
            "slow",
            "images are huge",
        )],
    )
}

#[test]
fn valid_snapshot_passes() {
    chain().validate().unwrap();
    assert!(chain().dangling_references().is_empty());
}

#[test]
fn duplicate_point_ids_are_rejected() {
    let mut s = chain();
    s.points.push(Point::new("a", 10.0, 10.0, PointKind::Side));
    let err = s.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate point id 'a'"));
}

#[test]
fn non_finite_coordinates_are_rejected() {
    let mut s = chain();
    s.points[0].x = f64::NAN;
    assert!(s.validate().is_err());
}

#[test]
fn dangling_references_are_reported_not_rejected() {
    let mut s = chain();
    s.connections
        .push(Connection::new("l2", "b", "ghost", ConnectionKind::Side));
    s.annotations[0].anchor_point = "nowhere".to_string();
    s.validate().unwrap();

    let dangling = s.dangling_references();
    assert_eq!(dangling.len(), 2);
    assert_eq!(dangling[0].owner, "l2");
    assert_eq!(dangling[0].field, "to");
    assert_eq!(dangling[1].field, "anchor_point");
}

#[test]
fn mirrored_counterpart_defaults_to_prefix_convention() {
    let p = Point::new("r-c1", 82.0, 69.0, PointKind::Mirrored);
    assert_eq!(p.counterpart_id(), Some("c1"));

    let p = Point::new("remote-tip", 82.0, 69.0, PointKind::Mirrored).with_mirror_of("c3");
    assert_eq!(p.counterpart_id(), Some("c3"));

    let local = Point::new("r-c1", 82.0, 69.0, PointKind::Primary);
    assert_eq!(local.counterpart_id(), None);
}

#[test]
fn serde_uses_snake_case_kinds_and_optional_annotations() {
    let json = r#"{
        "points": [{ "id": "o", "x": 70, "y": 76, "kind": "origin", "caption": "init" }],
        "connections": []
    }"#;
    let s: Snapshot = serde_json::from_str(json).unwrap();
    assert_eq!(s.points[0].kind, PointKind::Origin);
    assert!(s.annotations.is_empty());
    assert!(!s.has_mirrored());
}
