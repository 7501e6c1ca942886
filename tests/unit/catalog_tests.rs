use std::path::PathBuf;

use ffcs_buddy::FfcsError;
use ffcs_buddy::catalog::Catalog;
use ffcs_buddy::config::ColumnsConfig;
use ffcs_buddy::test_utils::UnitTestFixture;

fn fixture_catalog() -> Catalog {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog.csv");
    Catalog::load(path, &ColumnsConfig::default()).expect("load fixture catalog")
}

#[test]
fn fixture_snapshot_loads_in_file_order() {
    let catalog = fixture_catalog();
    assert_eq!(catalog.len(), 6);
    assert_eq!(catalog.attribute_names(), ["course_code", "slot"]);

    let names: Vec<&str> = catalog.iter().map(|(_, item)| item.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Dr. Anitha R",
            "Dr. Bharath K",
            "Dr. Chitra S",
            "Dr. Deepak M",
            "Dr. Elango V",
            "Dr. Farah N",
        ]
    );
    assert_eq!(catalog.fingerprint().len(), 64);
    assert!(catalog.source().is_some());
}

#[test]
fn fixture_rows_carry_every_field() {
    let catalog = fixture_catalog();
    let deepak = catalog.get(3).expect("fourth row");
    assert_eq!(deepak.department, "SCOPE");
    assert_eq!(deepak.attribute("course_code"), Some("CSE1004"));
    assert_eq!(deepak.attribute("slot"), Some("C1"));
    assert_eq!(deepak.tags, ["engaging", "hands-on", "project-based"]);
    assert_eq!(deepak.tags_text, "engaging,hands-on,project-based");
    assert!((deepak.quality_score - 8.7).abs() < f64::EPSILON);

    let farah = catalog.get(5).expect("last row");
    assert_eq!(farah.attribute("slot"), None);
    assert!(farah.has_tag("chill"));
}

#[test]
fn fingerprint_tracks_content() {
    let fixture = UnitTestFixture::new();
    let first = fixture.create_catalog("one.csv", &["A,SCOPE,CSE1004,A1,strict,8.0"]);
    let same = fixture.create_catalog("two.csv", &["A,SCOPE,CSE1004,A1,strict,8.0"]);
    let other = fixture.create_catalog("three.csv", &["A,SCOPE,CSE1004,A1,strict,8.5"]);
    let columns = ColumnsConfig::default();

    let first = Catalog::load(first, &columns).expect("load");
    let same = Catalog::load(same, &columns).expect("load");
    let other = Catalog::load(other, &columns).expect("load");
    assert_eq!(first.fingerprint(), same.fingerprint());
    assert_ne!(first.fingerprint(), other.fingerprint());
}

#[test]
fn renamed_columns_are_honoured() {
    let columns = ColumnsConfig {
        name: "professor".to_string(),
        department: "school".to_string(),
        tags: "tags".to_string(),
        quality_score: "score".to_string(),
        attributes: vec!["course".to_string()],
    };
    let snapshot = "professor,school,course,tags,score\nX,SAS,MAT1011,\"tough,fair\",7.5\n";
    let catalog = Catalog::from_reader(snapshot.as_bytes(), &columns).expect("parse");

    let item = catalog.get(0).expect("row");
    assert_eq!(item.name, "X");
    assert_eq!(item.attribute("course"), Some("MAT1011"));
    assert_eq!(item.tags, ["tough", "fair"]);
}

#[test]
fn ragged_row_is_a_catalog_error() {
    let snapshot = "faculty_name,department,course_code,slot,style_tags,rating\nA,SCOPE,CSE1004\n";
    let err = Catalog::from_reader(snapshot.as_bytes(), &ColumnsConfig::default())
        .expect_err("ragged row");
    assert!(matches!(err, FfcsError::Catalog(_)));
    assert!(err.is_startup_fatal());
}

#[test]
fn blank_rating_is_rejected() {
    let fixture = UnitTestFixture::new();
    let path = fixture.create_catalog("blank.csv", &["A,SCOPE,CSE1004,A1,strict,"]);
    let err = Catalog::load(path, &ColumnsConfig::default()).expect_err("blank rating");
    assert_eq!(err.code(), "catalog_error");
}
