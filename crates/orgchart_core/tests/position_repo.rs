use orgchart_core::db::open_db_in_memory;
use orgchart_core::{
    DeleteOutcome, NewPosition, PositionChanges, PositionRepoError, PositionRepository,
    SqlitePositionRepository,
};
use uuid::Uuid;

fn new_position(name: &str, parent_id: Option<Uuid>) -> NewPosition {
    NewPosition {
        name: name.to_string(),
        description: format!("{name} description"),
        parent_id,
    }
}

#[test]
fn insert_assigns_id_and_roundtrips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::try_new(&conn).unwrap();

    let root = repo.insert(&new_position("CEO", None)).unwrap();
    assert!(!root.id.is_nil());
    assert!(root.created_at > 0);
    assert_eq!(root.parent_id, None);

    let loaded = repo.find_by_id(root.id).unwrap().unwrap();
    assert_eq!(loaded, root);
    assert_eq!(repo.find_by_name("CEO").unwrap(), Some(root));
    assert_eq!(repo.find_by_name("CTO").unwrap(), None);
    assert_eq!(repo.find_by_id(Uuid::new_v4()).unwrap(), None);
}

#[test]
fn count_and_find_all_track_inserts() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::try_new(&conn).unwrap();
    assert_eq!(repo.count().unwrap(), 0);
    assert!(repo.find_all().unwrap().is_empty());

    let root = repo.insert(&new_position("CEO", None)).unwrap();
    let cto = repo.insert(&new_position("CTO", Some(root.id))).unwrap();
    let cfo = repo.insert(&new_position("CFO", Some(root.id))).unwrap();

    assert_eq!(repo.count().unwrap(), 3);
    let mut all_ids: Vec<_> = repo.find_all().unwrap().into_iter().map(|p| p.id).collect();
    all_ids.sort();
    let mut expected = vec![root.id, cto.id, cfo.id];
    expected.sort();
    assert_eq!(all_ids, expected);

    let mut child_ids: Vec<_> = repo
        .find_children_of(root.id)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    child_ids.sort();
    let mut expected_children = vec![cto.id, cfo.id];
    expected_children.sort();
    assert_eq!(child_ids, expected_children);
    assert!(repo.find_children_of(cto.id).unwrap().is_empty());
}

#[test]
fn insert_maps_unique_name_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::try_new(&conn).unwrap();
    let root = repo.insert(&new_position("CEO", None)).unwrap();

    let err = repo
        .insert(&new_position("CEO", Some(root.id)))
        .unwrap_err();
    assert!(matches!(err, PositionRepoError::DuplicateName(name) if name == "CEO"));
}

#[test]
fn insert_maps_missing_parent_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::try_new(&conn).unwrap();
    let missing = Uuid::new_v4();

    let err = repo
        .insert(&new_position("CTO", Some(missing)))
        .unwrap_err();
    assert!(matches!(err, PositionRepoError::ParentMissing(id) if id == missing));
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn update_writes_only_changed_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::try_new(&conn).unwrap();
    let root = repo.insert(&new_position("CEO", None)).unwrap();
    let cto = repo.insert(&new_position("CTO", Some(root.id))).unwrap();
    let cfo = repo.insert(&new_position("CFO", Some(root.id))).unwrap();

    let changes = PositionChanges {
        name: Some("Finance Lead".to_string()),
        parent_id: Some(cto.id),
        ..PositionChanges::default()
    };
    let updated = repo.update(cfo.id, &changes).unwrap();

    assert_eq!(updated.id, cfo.id);
    assert_eq!(updated.created_at, cfo.created_at);
    assert_eq!(updated.name, "Finance Lead");
    assert_eq!(updated.description, cfo.description);
    assert_eq!(updated.parent_id, Some(cto.id));

    let description_only = PositionChanges {
        description: Some("Owns the books".to_string()),
        ..PositionChanges::default()
    };
    let updated = repo.update(cfo.id, &description_only).unwrap();
    assert_eq!(updated.name, "Finance Lead");
    assert_eq!(updated.description, "Owns the books");
    assert_eq!(updated.parent_id, Some(cto.id));
}

#[test]
fn update_reports_not_found_and_constraint_errors() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::try_new(&conn).unwrap();
    let root = repo.insert(&new_position("CEO", None)).unwrap();
    let cto = repo.insert(&new_position("CTO", Some(root.id))).unwrap();

    let ghost = Uuid::new_v4();
    let rename = PositionChanges {
        name: Some("Ghost".to_string()),
        ..PositionChanges::default()
    };
    assert!(matches!(
        repo.update(ghost, &rename).unwrap_err(),
        PositionRepoError::NotFound(id) if id == ghost
    ));

    let clash = PositionChanges {
        name: Some("CEO".to_string()),
        ..PositionChanges::default()
    };
    assert!(matches!(
        repo.update(cto.id, &clash).unwrap_err(),
        PositionRepoError::DuplicateName(name) if name == "CEO"
    ));

    let missing = Uuid::new_v4();
    let dangling = PositionChanges {
        parent_id: Some(missing),
        ..PositionChanges::default()
    };
    assert!(matches!(
        repo.update(cto.id, &dangling).unwrap_err(),
        PositionRepoError::ParentMissing(id) if id == missing
    ));
}

#[test]
fn delete_restricts_parents_and_reports_missing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePositionRepository::try_new(&conn).unwrap();
    let root = repo.insert(&new_position("CEO", None)).unwrap();
    let cto = repo.insert(&new_position("CTO", Some(root.id))).unwrap();

    assert_eq!(repo.delete(root.id).unwrap(), DeleteOutcome::HasChildren);
    assert!(repo.find_by_id(root.id).unwrap().is_some());

    assert_eq!(repo.delete(cto.id).unwrap(), DeleteOutcome::Deleted);
    assert_eq!(repo.delete(cto.id).unwrap(), DeleteOutcome::NotFound);
    assert_eq!(repo.delete(root.id).unwrap(), DeleteOutcome::Deleted);
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn invalid_persisted_uuid_is_reported() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO positions (id, name, description) VALUES ('not-a-uuid', 'Broken', 'broken row');",
        [],
    )
    .unwrap();
    let repo = SqlitePositionRepository::try_new(&conn).unwrap();

    let err = repo.find_all().unwrap_err();
    assert!(matches!(err, PositionRepoError::InvalidData(message) if message.contains("positions.id")));
}
