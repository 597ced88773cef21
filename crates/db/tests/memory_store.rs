//! Behaviour of the in-memory content store.

use assert_matches::assert_matches;
use atrium_core::content::{PostCategory, Relation, Status};
use atrium_db::{
    ContentStore, MemoryContentStore, PageQuery, ParentFilter, PostQuery, PostSort, StoreError,
    Visibility,
};

const SEED: &str = r#"{
    "pages": [
        { "id": "p-home", "slug": "home", "title": { "en": "Home", "vi": "Trang chủ" }, "status": "published" },
        { "id": "p-about", "slug": "about", "title": { "en": "About" }, "status": "published",
          "sections": [{ "section_id": "intro" }] },
        { "id": "p-team", "slug": "team", "parent_page": "p-about", "title": { "en": "Team" }, "status": "published" },
        { "id": "p-draft", "slug": "secret", "title": { "en": "Secret" }, "status": "draft" }
    ],
    "posts": [
        { "id": "n2", "slug": "second", "title": "Second", "category": "news", "language": "en",
          "status": "published", "page": "p-about", "section_id": "intro", "sort_order": 2 },
        { "id": "n1", "slug": "first", "title": "First", "category": "news", "language": "en",
          "status": "published", "page": "p-about", "section_id": "intro", "sort_order": 1,
          "related_posts": ["n2"] },
        { "id": "JOB-001", "slug": "engineer", "title": "Engineer", "category": "careers",
          "language": "en", "status": "draft" }
    ]
}"#;

fn store() -> MemoryContentStore {
    MemoryContentStore::from_seed_str(SEED).unwrap()
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn finds_root_page_by_slug() {
    let query = PageQuery::new(Visibility::Published)
        .slug("about")
        .parent(ParentFilter::Root)
        .locale("en");
    let pages = store().find_pages(&query).await.unwrap();
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].id, "p-about");
}

#[tokio::test]
async fn child_page_needs_parent_filter() {
    let store = store();
    let root_only = PageQuery::new(Visibility::Published)
        .slug("team")
        .parent(ParentFilter::Root);
    assert!(store.find_pages(&root_only).await.unwrap().is_empty());

    let under_about = PageQuery::new(Visibility::Published)
        .slug("team")
        .parent(ParentFilter::Id("p-about".into()));
    assert_eq!(store.find_pages(&under_about).await.unwrap().len(), 1);
}

#[tokio::test]
async fn untranslated_page_is_hidden_for_locale() {
    let query = PageQuery::new(Visibility::Published)
        .slug("about")
        .locale("vi");
    assert!(store().find_pages(&query).await.unwrap().is_empty());
}

#[tokio::test]
async fn drafts_only_in_preview() {
    let store = store();
    let q = |v| PageQuery::new(v).slug("secret");
    assert!(store.find_pages(&q(Visibility::Published)).await.unwrap().is_empty());
    assert_eq!(
        store.find_pages(&q(Visibility::IncludeDrafts)).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn find_page_by_id_ignores_status() {
    let page = store().find_page_by_id("p-draft").await.unwrap().unwrap();
    assert_eq!(page.status, Status::Draft);
    assert!(store().find_page_by_id("nope").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn page_posts_are_sorted_by_order() {
    let query = PostQuery::new(Visibility::Published)
        .page_id("p-about")
        .language("en")
        .sort(PostSort::SortOrder);
    let posts = store().find_posts(&query).await.unwrap();
    let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["n1", "n2"]);
}

#[tokio::test]
async fn relations_come_back_as_inserted() {
    let query = PostQuery::new(Visibility::Published).slug("first");
    let posts = store().find_posts(&query).await.unwrap();
    assert_matches!(posts[0].related_posts.as_slice(), [Relation::Id(id)] if id == "n2");
}

#[tokio::test]
async fn batched_id_lookup_and_category() {
    let store = store();
    let batch = PostQuery::new(Visibility::IncludeDrafts).ids(vec!["n1".into(), "JOB-001".into()]);
    assert_eq!(store.find_posts(&batch).await.unwrap().len(), 2);

    let careers = batch.category(PostCategory::Careers);
    let found = store.find_posts(&careers).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "JOB-001");
}

#[tokio::test]
async fn limit_truncates_results() {
    let query = PostQuery::new(Visibility::Published).language("en").limit(1);
    assert_eq!(store().find_posts(&query).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Seeding and mutation helpers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upsert_replaces_by_id() {
    let store = store();
    let mut page = store.find_page_by_id("p-about").await.unwrap().unwrap();
    page.slug = "about-us".into();
    store.upsert_page(page).unwrap();

    let found = store.find_page_by_id("p-about").await.unwrap().unwrap();
    assert_eq!(found.slug, "about-us");
    let removed = store.remove_page("p-about").unwrap();
    assert!(removed.is_some());
    assert!(store.find_page_by_id("p-about").await.unwrap().is_none());
}

#[test]
fn malformed_seed_is_rejected() {
    assert_matches!(
        MemoryContentStore::from_seed_str("{ \"pages\": 3 }"),
        Err(StoreError::Seed(_))
    );
}

#[tokio::test]
async fn health_check_passes() {
    assert!(store().health_check().await.is_ok());
}
