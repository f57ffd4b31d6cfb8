use folio::app::{handle_request, Catalog, CategoryFilter, ListOrder, Request, Response};
use folio::domain::{FolioError, ImageInfo, ProjectDraft, ProjectPatch, UrlShapeProbe};
use folio::storage::MemoryStorage;

fn seeded() -> Catalog<MemoryStorage> {
    let mut catalog = Catalog::with_storage(MemoryStorage::new());
    for (title, category, priority) in [
        ("Alpha", "Branding", 0),
        ("Beta", "Illustration", 2),
        ("Gamma", "Branding", 5),
    ] {
        catalog
            .upsert(
                ProjectPatch::default()
                    .title(title)
                    .category(category)
                    .image(ImageInfo::new("u", 10, 10))
                    .priority(priority),
            )
            .unwrap();
    }
    catalog
}

fn titles(response: &Response) -> Vec<String> {
    match response {
        Response::Projects { projects } => projects.iter().map(|p| p.title.clone()).collect(),
        other => panic!("expected projects, got {other:?}"),
    }
}

#[test]
fn list_in_display_order() {
    let mut catalog = seeded();
    let response = handle_request(
        &mut catalog,
        Request::List {
            category: CategoryFilter::All,
            order: ListOrder::Display,
            seed: Some(9),
        },
    );
    assert_eq!(titles(&response), vec!["Gamma", "Beta", "Alpha"]);
}

#[test]
fn list_stored_order_filtered_by_category() {
    let mut catalog = seeded();
    let response = handle_request(
        &mut catalog,
        Request::List {
            category: CategoryFilter::Category("Branding".to_string()),
            order: ListOrder::Stored,
            seed: None,
        },
    );
    assert_eq!(titles(&response), vec!["Alpha", "Gamma"]);
}

#[test]
fn save_reports_created_then_updated() {
    let mut catalog = seeded();

    let created = handle_request(
        &mut catalog,
        Request::Save {
            patch: ProjectPatch::default().title("Delta").image(ImageInfo::new("u", 10, 10)),
        },
    );
    assert!(matches!(created, Response::Saved { ref project, created: true } if project.id == 4));

    let updated = handle_request(
        &mut catalog,
        Request::Save {
            patch: ProjectPatch::for_id(4).priority(1),
        },
    );
    assert!(matches!(updated, Response::Saved { ref project, created: false } if project.priority == 1));
}

#[test]
fn invalid_save_is_an_error_response() {
    let mut catalog = seeded();
    let response = handle_request(
        &mut catalog,
        Request::Save {
            patch: ProjectPatch::for_id(1).priority(9),
        },
    );
    assert!(response.is_failure());
    assert!(matches!(response, Response::Error { .. }));
}

#[test]
fn delete_and_show_report_missing_ids() {
    let mut catalog = seeded();

    assert_eq!(handle_request(&mut catalog, Request::Delete { id: 999 }), Response::NotFound { id: 999 });
    assert_eq!(handle_request(&mut catalog, Request::Delete { id: 2 }), Response::Deleted { id: 2 });
    assert_eq!(handle_request(&mut catalog, Request::Show { id: 2 }), Response::NotFound { id: 2 });
}

#[test]
fn reset_then_list_is_empty() {
    let mut catalog = seeded();
    assert_eq!(handle_request(&mut catalog, Request::Reset), Response::Reset);

    let response = handle_request(
        &mut catalog,
        Request::List {
            category: CategoryFilter::All,
            order: ListOrder::Display,
            seed: None,
        },
    );
    assert!(titles(&response).is_empty());
}

#[test]
fn requests_deserialize_from_tagged_json() {
    let request: Request = serde_json::from_str(r#"{"type":"list"}"#).unwrap();
    assert_eq!(
        request,
        Request::List {
            category: CategoryFilter::All,
            order: ListOrder::Display,
            seed: None,
        }
    );

    let request: Request = serde_json::from_str(r#"{"type":"save","patch":{"id":1,"title":"B"}}"#).unwrap();
    assert_eq!(request, Request::Save { patch: ProjectPatch::for_id(1).title("B") });
}

#[test]
fn validated_draft_flows_into_a_saved_project() {
    let mut catalog = Catalog::with_storage(MemoryStorage::new());
    let draft = ProjectDraft {
        id: None,
        title: " Poster ".to_string(),
        description: "Screen print".to_string(),
        category: "Illustration".to_string(),
        image_url: "https://example.com/poster.png".to_string(),
        image_size: "800x1200".to_string(),
        priority: "3".to_string(),
    };

    let patch = draft.validate(&UrlShapeProbe).unwrap();
    let response = handle_request(&mut catalog, Request::Save { patch });

    let Response::Saved { project, created: true } = response else {
        panic!("expected a created project, got {response:?}");
    };
    assert_eq!(project.title, "Poster");
    assert_eq!(project.image.alt.as_deref(), Some("Poster"));
    assert_eq!(project.priority, 3);
}

#[test]
fn draft_with_unknown_size_is_invalid_size() {
    let draft = ProjectDraft {
        id: None,
        title: "Poster".to_string(),
        description: "d".to_string(),
        category: "Illustration".to_string(),
        image_url: "https://example.com/poster.png".to_string(),
        image_size: "640x480".to_string(),
        priority: String::new(),
    };
    assert!(matches!(draft.validate(&UrlShapeProbe), Err(FolioError::InvalidSize(_))));

    let blank_title = ProjectDraft {
        title: "   ".to_string(),
        ..draft
    };
    assert!(matches!(
        blank_title.validate(&|_: &str| true),
        Err(FolioError::Validation(ref fields)) if fields.contains("title")
    ));
}

#[test]
fn write_failures_surface_as_error_responses() {
    let mut catalog = Catalog::with_storage(MemoryStorage::new().with_quota(64)).with_strict_writes(true);
    let response = handle_request(
        &mut catalog,
        Request::Save {
            patch: ProjectPatch::default().title("Delta").image(ImageInfo::new("u", 10, 10)),
        },
    );
    assert!(matches!(response, Response::Error { .. }));
    assert!(response.is_failure());
}

#[test]
fn delete_on_unreadable_collection_is_an_error_not_a_miss() {
    let storage = MemoryStorage::new().with_entry(folio::storage::DEFAULT_STORAGE_KEY, "[{\"id\":true}]");
    let mut catalog = Catalog::with_storage(storage);

    let response = handle_request(&mut catalog, Request::Delete { id: 1 });
    assert!(matches!(response, Response::Error { ref message } if message.starts_with("delete project")));
}

#[test]
fn reset_without_a_medium_is_reported() {
    let mut catalog = Catalog::with_storage(MemoryStorage::unavailable());
    assert!(handle_request(&mut catalog, Request::Reset).is_failure());
}
