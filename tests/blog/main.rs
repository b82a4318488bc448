//! Integration tests for the blog sample over the in-memory backend.

mod models;
mod service;

use crud_rust::{MemoryRepository, Query, Repository, RepositoryExtended};
use models::{blog, tag, Blog, Tag};
use service::TagService;

#[test]
fn inserted_blog_gets_a_key_and_reads_back_equal() {
    let repo = MemoryRepository::<Blog>::new();

    let saved = repo.insert(blog("ada", "Typed Storage")).unwrap();
    assert!(saved.id > 0);

    let loaded = repo.get_by_id(saved.id).unwrap().unwrap();
    assert_eq!(loaded, saved);
}

#[test]
fn seeded_tags_filter_to_the_single_matching_name() {
    let service = TagService::new(MemoryRepository::<Tag>::new());
    service.seed_data().unwrap();

    let matches = service
        .get(Query::new().filter(|t: &Tag| t.name == "C#"))
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].name, "C#");
    assert_eq!(matches[0].description, "All about C#");
}

#[test]
fn service_listing_applies_its_default_ordering() {
    let service = TagService::new(MemoryRepository::<Tag>::new());
    service.seed_data().unwrap();

    let names: Vec<String> = service
        .list(None, None)
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();

    assert_eq!(names, vec!["C#", "Data Access", "Rust", "Tutorial"]);
}

#[test]
fn service_listing_pages_after_ordering() {
    let service = TagService::new(MemoryRepository::<Tag>::new());
    service.seed_data().unwrap();

    let page = service.list(Some(1), Some(2)).unwrap();
    let names: Vec<&str> = page.iter().map(|t| t.name.as_str()).collect();

    assert_eq!(names, vec!["Data Access", "Rust"]);
}

#[test]
fn service_delegates_crud_to_the_backend() {
    let service = TagService::new(MemoryRepository::<Tag>::new());
    service.seed_data().unwrap();

    service.update(tag(4, "Guides", "Guides")).unwrap();
    assert_eq!(service.get_by_id(4).unwrap().unwrap().name, "Guides");

    assert!(service.delete_by_id(4).unwrap());
    assert!(service.get_by_id(4).unwrap().is_none());
    assert!(!service.delete_by_id(4).unwrap());
}

#[test]
fn projection_builds_a_narrower_view() {
    let service = TagService::new(MemoryRepository::<Tag>::new());
    service.seed_data().unwrap();

    #[derive(Debug, PartialEq)]
    struct TagLabel {
        name: String,
    }

    let labels = service
        .get_projection(
            |t| TagLabel { name: t.name },
            Query::new().order_by_key(|t: &Tag| t.name.clone()).take(2),
        )
        .unwrap();

    assert_eq!(
        labels,
        vec![
            TagLabel { name: "C#".into() },
            TagLabel {
                name: "Data Access".into()
            }
        ]
    );
}

#[test]
fn inserting_a_seeded_key_returns_the_stored_tag() {
    let service = TagService::new(MemoryRepository::<Tag>::new());
    service.seed_data().unwrap();

    let result = service.insert(tag(2, "Imposter", "nope")).unwrap();
    assert_eq!(result.name, "C#");
}

#[test]
fn posts_and_blogs_use_separate_key_sequences() {
    let blogs = MemoryRepository::<Blog>::new();
    let posts = MemoryRepository::<models::Post>::new();

    let b = blogs.insert(blog("grace", "Compilers")).unwrap();
    let p = posts
        .insert(models::Post {
            id: 0,
            blog_id: b.id,
            title: "Parsing".into(),
            content: "...".into(),
        })
        .unwrap();

    assert!(b.id > 0);
    assert!(p.id > 0);
    assert_eq!(posts.get_by_id(p.id).unwrap().unwrap().blog_id, b.id);
}
