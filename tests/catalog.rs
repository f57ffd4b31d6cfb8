use folio::app::{filter_by_category, Catalog, CategoryFilter};
use folio::domain::{FolioError, ImageInfo, Orientation, ProjectPatch, ProjectRecord};
use folio::storage::{MemoryStorage, Storage};

fn fixed_clock() -> i64 {
    1_700_000_000_000
}

fn later_clock() -> i64 {
    1_800_000_000_000
}

fn image() -> ImageInfo {
    ImageInfo::new("u", 10, 10)
}

fn catalog() -> Catalog<MemoryStorage> {
    Catalog::with_storage(MemoryStorage::new()).with_clock(fixed_clock)
}

fn add(catalog: &mut Catalog<MemoryStorage>, title: &str, priority: u8) -> ProjectRecord {
    catalog
        .upsert(ProjectPatch::default().title(title).image(image()).priority(priority))
        .unwrap()
}

#[test]
fn first_id_is_one_and_ids_increase() {
    let mut catalog = catalog();

    let first = add(&mut catalog, "A", 0);
    assert_eq!(first.id, 1);

    for title in ["B", "C", "D"] {
        let max_before = catalog.list_all().iter().map(|r| r.id).max().unwrap();
        let record = add(&mut catalog, title, 0);
        assert!(record.id > max_before);
    }
}

#[test]
fn ids_are_not_reused_after_removing_a_middle_record() {
    let mut catalog = catalog();
    add(&mut catalog, "A", 0);
    add(&mut catalog, "B", 0);
    add(&mut catalog, "C", 0);

    assert!(catalog.remove(2));
    assert_eq!(add(&mut catalog, "D", 0).id, 4);
}

#[test]
fn new_record_gets_defaults_and_creation_time() {
    let mut catalog = catalog();
    let record = add(&mut catalog, "A", 0);

    assert_eq!(record.description, "");
    assert_eq!(record.category, folio::domain::DEFAULT_CATEGORY);
    assert_eq!(record.orientation, Orientation::Landscape);
    assert_eq!(record.priority, 0);
    assert_eq!(record.created_at, fixed_clock());
}

#[test]
fn update_changes_only_supplied_fields() {
    let mut catalog = catalog();
    let original = catalog
        .upsert(
            ProjectPatch::default()
                .title("A")
                .description("first")
                .category("Branding")
                .image(image())
                .priority(2),
        )
        .unwrap();

    let mut catalog = catalog.with_clock(later_clock);
    let updated = catalog.upsert(ProjectPatch::for_id(1).title("B")).unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(updated.title, "B");
    assert_eq!(updated.description, "first");
    assert_eq!(updated.category, "Branding");
    assert_eq!(updated.priority, 2);
    assert_eq!(catalog.list_all(), vec![updated]);
}

#[test]
fn update_of_missing_id_creates_a_record_with_a_fresh_id() {
    let mut catalog = catalog();
    add(&mut catalog, "A", 0);

    let created = catalog
        .upsert(ProjectPatch::for_id(50).title("B").image(image()))
        .unwrap();
    assert_eq!(created.id, 2);
    assert_eq!(catalog.list_all().len(), 2);
}

#[test]
fn update_of_missing_id_without_image_is_rejected() {
    let mut catalog = catalog();
    let err = catalog.upsert(ProjectPatch::for_id(3).title("B")).unwrap_err();

    assert!(matches!(err, FolioError::Validation(ref fields) if fields.contains("image")));
    assert!(catalog.list_all().is_empty());
}

#[test]
fn remove_of_unknown_id_leaves_collection_unchanged() {
    let mut catalog = catalog();
    add(&mut catalog, "A", 0);
    add(&mut catalog, "B", 3);
    let before = catalog.list_all();

    assert!(!catalog.remove(999));
    assert_eq!(catalog.list_all(), before);
}

#[test]
fn remove_on_empty_catalog_returns_false() {
    let mut catalog = catalog();
    assert!(!catalog.remove(1));
    assert!(catalog.list_all().is_empty());
}

#[test]
fn reset_then_list_is_empty() {
    let mut catalog = catalog();
    add(&mut catalog, "A", 0);
    add(&mut catalog, "B", 0);

    catalog.reset();
    assert!(catalog.list_all().is_empty());
}

#[test]
fn priority_above_five_is_rejected() {
    let mut catalog = catalog();
    let err = catalog
        .upsert(ProjectPatch::default().title("A").image(image()).priority(6))
        .unwrap_err();

    assert!(matches!(err, FolioError::Validation(ref fields) if fields.contains("priority")));
    assert!(catalog.list_all().is_empty());
}

#[test]
fn blank_title_update_is_rejected() {
    let mut catalog = catalog();
    add(&mut catalog, "A", 0);

    assert!(catalog.upsert(ProjectPatch::for_id(1).title("  ")).is_err());
    assert_eq!(catalog.get(1).unwrap().title, "A");
}

#[test]
fn get_unknown_id_is_not_found() {
    let catalog = catalog();
    assert!(matches!(catalog.get(7), Err(FolioError::NotFound(7))));
}

#[test]
fn category_filter_keeps_matching_records_in_order() {
    let mut catalog = catalog();
    for (title, category) in [("A", "Branding"), ("B", "Illustration"), ("C", "Branding")] {
        catalog
            .upsert(ProjectPatch::default().title(title).category(category).image(image()))
            .unwrap();
    }

    let branding = filter_by_category(catalog.list_all(), &"Branding".parse().unwrap());
    let titles: Vec<&str> = branding.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["A", "C"]);

    let all = filter_by_category(catalog.list_all(), &CategoryFilter::All);
    assert_eq!(all.len(), 3);
}

#[test]
fn search_ranks_closer_titles_first() {
    let mut catalog = catalog();
    add(&mut catalog, "Coffee shop branding", 0);
    add(&mut catalog, "Mountain poster", 0);
    add(&mut catalog, "Poster series", 0);

    let found = catalog.search("poster");
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|r| r.title.to_lowercase().contains("poster")));

    assert_eq!(catalog.search("   ").len(), 3);
    assert!(catalog.search("zzzz").is_empty());
}

#[test]
fn out_of_range_stored_priority_does_not_hide_the_collection() {
    let payload = r#"[
        {"id":1,"title":"Keep me","image":{"src":"u","width":10,"height":10}},
        {"id":2,"title":"Legacy","image":{"src":"u","width":10,"height":10},"priority":-1,"orientation":"panorama"}
    ]"#;
    let storage = MemoryStorage::new().with_entry(folio::storage::DEFAULT_STORAGE_KEY, payload);
    let mut catalog = Catalog::with_storage(storage).with_clock(fixed_clock);

    assert_eq!(catalog.list_all().len(), 2);

    let created = add(&mut catalog, "New", 0);
    assert_eq!(created.id, 3);

    let titles: Vec<String> = catalog.list_all().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, vec!["Keep me", "Legacy", "New"]);
}

#[test]
fn unreadable_collection_is_never_overwritten() {
    let payload = r#"[{"id":1,"title":"Keep me","image":{"src":"u","width":10,"height":10}},{"id":"two"}]"#;
    let storage = MemoryStorage::new().with_entry(folio::storage::DEFAULT_STORAGE_KEY, payload);
    let mut catalog = Catalog::with_storage(storage);

    assert!(catalog.list_all().is_empty());

    let err = catalog
        .upsert(ProjectPatch::default().title("New").image(image()))
        .unwrap_err();
    assert!(matches!(err, FolioError::Serialization(_)));
    assert!(!catalog.remove(1));
    assert!(catalog.try_remove(1).is_err());

    let stored = catalog
        .store()
        .storage()
        .read(folio::storage::DEFAULT_STORAGE_KEY)
        .unwrap();
    assert_eq!(stored.as_deref(), Some(payload));
}

#[test]
fn strict_writes_report_quota_failures() {
    let mut lenient = Catalog::with_storage(MemoryStorage::new().with_quota(64));
    let big = ProjectPatch::default().title("A").description("x".repeat(200)).image(image());

    assert!(lenient.upsert(big.clone()).is_ok());
    assert!(lenient.list_all().is_empty());

    let mut strict = Catalog::with_storage(MemoryStorage::new().with_quota(64)).with_strict_writes(true);
    assert!(matches!(strict.upsert(big), Err(FolioError::Storage(_))));
    assert!(strict.list_all().is_empty());
}

#[test]
fn unavailable_medium_still_returns_the_record_unless_strict() {
    let mut catalog = Catalog::with_storage(MemoryStorage::unavailable());
    let record = add(&mut catalog, "A", 0);
    assert_eq!(record.id, 1);
    assert!(catalog.list_all().is_empty());
    assert!(!catalog.remove(1));

    let mut strict = Catalog::with_storage(MemoryStorage::unavailable()).with_strict_writes(true);
    let err = strict
        .upsert(ProjectPatch::default().title("A").image(image()))
        .unwrap_err();
    assert!(matches!(err, FolioError::StorageUnavailable(_)));
}
