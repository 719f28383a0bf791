use std::sync::Arc;

use jutsudex::db::Store;
use jutsudex::models::{Category, Element, JutsuDraft, JutsuFilter, JutsuPatch, Rank};
use jutsudex::services::{
    CatalogError, CatalogService, ImageService, SeaOrmCatalogService,
};

struct TestHarness {
    store: Store,
    images_dir: std::path::PathBuf,
    catalog: SeaOrmCatalogService,
}

impl TestHarness {
    async fn new() -> Self {
        let store = Store::new("sqlite::memory:").await.expect("store");
        let images_dir =
            std::env::temp_dir().join(format!("jutsudex-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&images_dir).expect("images dir");

        let images = Arc::new(ImageService::new(images_dir.clone()));
        let catalog = SeaOrmCatalogService::new(store.clone(), images);

        Self {
            store,
            images_dir,
            catalog,
        }
    }

    fn draft(name: &str, element: Element, category: Category, rank: Rank) -> JutsuDraft {
        JutsuDraft {
            name: name.to_string(),
            description: format!("{name} test scroll entry."),
            element,
            category,
            rank,
            image_url: None,
        }
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.images_dir);
    }
}

#[tokio::test]
async fn test_duplicate_name_leaves_store_unchanged() {
    let h = TestHarness::new().await;

    h.catalog
        .create(TestHarness::draft(
            "Rasengan",
            Element::Wind,
            Category::Offensive,
            Rank::A,
        ))
        .await
        .expect("first create");

    let err = h
        .catalog
        .create(TestHarness::draft(
            "Rasengan",
            Element::Fire,
            Category::Defensive,
            Rank::B,
        ))
        .await
        .expect_err("second create must fail");

    assert!(matches!(err, CatalogError::DuplicateName(name) if name == "Rasengan"));
    assert_eq!(h.store.total_jutsus().await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_removes_image_asset() {
    let h = TestHarness::new().await;

    let jutsu = h
        .catalog
        .create(TestHarness::draft(
            "Amaterasu",
            Element::Fire,
            Category::Offensive,
            Rank::S,
        ))
        .await
        .expect("create");

    // Attach an asset by hand, as if it had been fetched at create time.
    let filename = format!("{}.jpg", uuid::Uuid::new_v4());
    let asset_path = h.images_dir.join(&filename);
    std::fs::write(&asset_path, b"not really a jpeg").expect("write asset");

    let now = chrono::Utc::now().to_rfc3339();
    h.store
        .set_jutsu_image(jutsu.id, Some(filename), &now)
        .await
        .expect("set image");

    assert!(asset_path.exists());

    h.catalog.delete(jutsu.id).await.expect("delete");

    // No orphaned files: the asset is gone along with the record.
    assert!(!asset_path.exists());
    assert!(matches!(
        h.catalog.get(jutsu.id).await,
        Err(CatalogError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_detach_image_removes_asset_and_keeps_record() {
    let h = TestHarness::new().await;

    let jutsu = h
        .catalog
        .create(TestHarness::draft(
            "Susanoo",
            Element::YinYang,
            Category::Defensive,
            Rank::SS,
        ))
        .await
        .expect("create");

    let filename = format!("{}.png", uuid::Uuid::new_v4());
    let asset_path = h.images_dir.join(&filename);
    std::fs::write(&asset_path, b"pixels").expect("write asset");

    let now = chrono::Utc::now().to_rfc3339();
    h.store
        .set_jutsu_image(jutsu.id, Some(filename), &now)
        .await
        .expect("set image");

    let detached = h.catalog.detach_image(jutsu.id).await.expect("detach");
    assert!(detached.image.is_none());
    assert!(!asset_path.exists());

    let fetched = h.catalog.get(jutsu.id).await.expect("still present");
    assert_eq!(fetched.name, "Susanoo");
}

#[tokio::test]
async fn test_update_patch_applies_subset() {
    let h = TestHarness::new().await;

    let created = h
        .catalog
        .create(TestHarness::draft(
            "Chidori",
            Element::Lightning,
            Category::Offensive,
            Rank::A,
        ))
        .await
        .expect("create");
    assert_eq!(created.created_at, created.updated_at);

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let patch = JutsuPatch {
        rank: Some(Rank::S),
        ..JutsuPatch::default()
    };
    let updated = h.catalog.update(created.id, patch).await.expect("update");

    assert_eq!(updated.rank, Rank::S);
    assert_eq!(updated.name, "Chidori");
    assert_eq!(updated.element, Element::Lightning);
    assert_eq!(updated.created_at, created.created_at);

    let before = chrono::DateTime::parse_from_rfc3339(&created.updated_at).unwrap();
    let after = chrono::DateTime::parse_from_rfc3339(&updated.updated_at).unwrap();
    assert!(after > before);
}

#[tokio::test]
async fn test_update_validation_and_missing_record() {
    let h = TestHarness::new().await;

    let created = h
        .catalog
        .create(TestHarness::draft(
            "Mud Wall",
            Element::Earth,
            Category::Defensive,
            Rank::C,
        ))
        .await
        .expect("create");

    let patch = JutsuPatch {
        name: Some(String::new()),
        ..JutsuPatch::default()
    };
    let err = h
        .catalog
        .update(created.id, patch)
        .await
        .expect_err("empty name rejected");
    assert!(matches!(err, CatalogError::Validation(fields) if fields[0].field == "name"));

    let err = h
        .catalog
        .update(9999, JutsuPatch::default())
        .await
        .expect_err("missing record");
    assert!(matches!(err, CatalogError::NotFound(9999)));
}

#[tokio::test]
async fn test_list_filters_and_aggregates() {
    let h = TestHarness::new().await;

    for (name, element, category, rank) in [
        ("Fireball", Element::Fire, Category::Offensive, Rank::C),
        ("Flame Whip", Element::Fire, Category::Offensive, Rank::B),
        ("Ash Cloud", Element::Fire, Category::Supplementary, Rank::B),
        ("Water Bullet", Element::Water, Category::Offensive, Rank::E),
    ] {
        h.catalog
            .create(TestHarness::draft(name, element, category, rank))
            .await
            .expect("seed");
    }

    // Conjunction of element and category.
    let page = h
        .catalog
        .list(JutsuFilter {
            element: Some(Element::Fire),
            category: Some(Category::Offensive),
            ..JutsuFilter::default()
        })
        .await
        .expect("list");
    let names: Vec<&str> = page.items.iter().map(|j| j.name.as_str()).collect();
    assert_eq!(names, ["Fireball", "Flame Whip"]);
    assert_eq!(page.total, 2);

    // Aggregates over the whole store, not the filtered view.
    let elements = h.store.count_by_element().await.unwrap();
    assert_eq!(elements[0], (Element::Fire, 3));
    assert_eq!(elements[1], (Element::Water, 1));

    let ranks = h.store.count_by_rank().await.unwrap();
    assert_eq!(
        ranks,
        vec![(Rank::E, 1), (Rank::C, 1), (Rank::B, 2)]
    );

    let categories = h.store.count_by_category().await.unwrap();
    assert_eq!(categories[0], (Category::Offensive, 3));
}

#[tokio::test]
async fn test_out_of_range_page_is_empty() {
    let h = TestHarness::new().await;

    h.catalog
        .create(TestHarness::draft(
            "Flicker",
            Element::Other,
            Category::Supplementary,
            Rank::D,
        ))
        .await
        .expect("create");

    let page = h
        .catalog
        .list(JutsuFilter {
            page: 50,
            page_size: 10,
            ..JutsuFilter::default()
        })
        .await
        .expect("list");

    assert!(page.items.is_empty());
    assert_eq!(page.total, 1);
}
