use super::*;
use crate::model::snapshot::{Point, PointKind};

#[test]
fn bundled_dataset_loads_and_validates() {
    let set = ChapterSet::bundled().unwrap();
    assert!(set.get("intro").unwrap().is_empty());
    assert!(set.get("ch3-sync").unwrap().has_mirrored());
    assert!(set.get("no-such-chapter").is_none());
}

#[test]
fn bundled_dataset_has_no_dangling_references() {
    let set = ChapterSet::bundled().unwrap();
    for id in set.ids() {
        assert!(
            set.get(id).unwrap().dangling_references().is_empty(),
            "chapter {id} has dangling references"
        );
    }
}

#[test]
fn validation_errors_name_the_chapter() {
    let dup = Snapshot::new(
        vec![
            Point::new("a", 0.0, 0.0, PointKind::Primary),
            Point::new("a", 1.0, 1.0, PointKind::Primary),
        ],
        vec![],
        vec![],
    );
    let err = ChapterSet::new([("broken".to_string(), dup)]).unwrap_err();
    assert!(err.to_string().contains("chapter 'broken'"));
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = ChapterSet::from_json("{ \"chapters\": 3 }").unwrap_err();
    assert!(matches!(err, ConstellationError::Serde(_)));
}
