// Integration tests for the persistence and query layer. They require a live
// Postgres instance and are skipped unless TIMELINE_TEST_DATABASE_URL is set,
// e.g. TIMELINE_TEST_DATABASE_URL=postgres://postgres@localhost/timeline_test.
use std::sync::OnceLock;

use chrono::{DateTime, Duration, Timelike, Utc};
use timeline_core::db::DatabasePool;
use timeline_protocol::{EntryDraft, EntryLabel};
use timeline_service::repository::TimelineRepository;
use tokio::sync::{Mutex, MutexGuard};

static DB_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

// Whole-second timestamps round-trip through TIMESTAMPTZ exactly.
fn hours_ago(hours: i64) -> DateTime<Utc> {
    (Utc::now() - Duration::hours(hours))
        .with_nanosecond(0)
        .expect("valid timestamp")
}

// The tests share one table, so they take turns.
struct TestContext {
    repository: TimelineRepository,
    pool: DatabasePool,
    _guard: MutexGuard<'static, ()>,
}

impl TestContext {
    async fn acquire() -> Option<TestContext> {
        let url = std::env::var("TIMELINE_TEST_DATABASE_URL").ok()?;
        let guard = DB_LOCK.get_or_init(|| Mutex::new(())).lock().await;

        let pool = DatabasePool::connect_with_url(&url)
            .await
            .expect("connect test database");
        let repository = TimelineRepository::from_pool(pool.clone())
            .await
            .expect("provision schema");
        sqlx::query("TRUNCATE TABLE timeline RESTART IDENTITY")
            .execute(pool.inner())
            .await
            .expect("truncate timeline table");

        Some(TestContext {
            repository,
            pool,
            _guard: guard,
        })
    }
}

#[tokio::test]
async fn inserted_entry_is_visible_with_its_fields() {
    let Some(ctx) = TestContext::acquire().await else {
        return;
    };

    let event_time = hours_ago(3);
    let draft = EntryDraft::new("Policy X", "a new regulation took effect")
        .with_label(EntryLabel::Policy)
        .with_event_time(event_time);
    let id = ctx
        .repository
        .create_entry(&draft)
        .await
        .expect("insert entry");

    let entries = ctx
        .repository
        .list_by_create_time()
        .await
        .expect("list entries");
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert_eq!(entry.id, id);
    assert_eq!(entry.title, "Policy X");
    assert_eq!(entry.value, "a new regulation took effect");
    assert_eq!(entry.label, EntryLabel::Policy);
    assert_eq!(entry.event_time, event_time);
    assert!(!entry.deleted);
    assert!(entry.create_time.is_some());
}

#[tokio::test]
async fn insert_without_event_time_stamps_the_insertion_instant() {
    let Some(ctx) = TestContext::acquire().await else {
        return;
    };

    let before = Utc::now() - Duration::minutes(5);
    ctx.repository
        .create_entry(&EntryDraft::new("untimed", "no explicit event time"))
        .await
        .expect("insert entry");

    let entries = ctx
        .repository
        .list_by_create_time()
        .await
        .expect("list entries");
    let entry = &entries[0];
    assert!(entry.event_time > before);
    assert!(entry.event_time <= Utc::now() + Duration::minutes(5));
}

#[tokio::test]
async fn create_time_and_event_time_orderings_are_independent() {
    let Some(ctx) = TestContext::acquire().await else {
        return;
    };

    // First insert carries the later real-world event, so the two orderings
    // come back inverted relative to each other.
    let first = ctx
        .repository
        .create_entry(
            &EntryDraft::new("older insert, newer event", "…").with_event_time(hours_ago(1)),
        )
        .await
        .expect("insert first");
    tokio::time::sleep(std::time::Duration::from_millis(25)).await;
    let second = ctx
        .repository
        .create_entry(
            &EntryDraft::new("newer insert, older event", "…").with_event_time(hours_ago(2)),
        )
        .await
        .expect("insert second");

    let by_create: Vec<u32> = ctx
        .repository
        .list_by_create_time()
        .await
        .expect("list by create time")
        .iter()
        .map(|entry| entry.id)
        .collect();
    let by_event: Vec<u32> = ctx
        .repository
        .list_by_event_time()
        .await
        .expect("list by event time")
        .iter()
        .map(|entry| entry.id)
        .collect();

    assert_eq!(by_create, vec![second, first]);
    assert_eq!(by_event, vec![first, second]);
}

#[tokio::test]
async fn soft_deleted_entry_disappears_from_every_listing_but_stays_stored() {
    let Some(ctx) = TestContext::acquire().await else {
        return;
    };

    let id = ctx
        .repository
        .create_entry(&EntryDraft::new("case", "…").with_label(EntryLabel::AntiGraft))
        .await
        .expect("insert entry");
    ctx.repository.soft_delete(id).await.expect("soft delete");

    assert!(ctx
        .repository
        .list_by_create_time()
        .await
        .expect("list by create time")
        .is_empty());
    assert!(ctx
        .repository
        .list_by_event_time()
        .await
        .expect("list by event time")
        .is_empty());
    assert!(ctx
        .repository
        .list_by_label(EntryLabel::AntiGraft)
        .await
        .expect("list by label")
        .is_empty());

    // The row itself survives; only the flag flipped.
    let stored: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM timeline WHERE id = $1")
        .bind(id as i32)
        .fetch_one(ctx.pool.inner())
        .await
        .expect("count stored rows");
    assert_eq!(stored, 1);
}

#[tokio::test]
async fn soft_delete_of_missing_id_reports_no_rows() {
    let Some(ctx) = TestContext::acquire().await else {
        return;
    };

    let err = ctx
        .repository
        .soft_delete(123_456)
        .await
        .expect_err("delete should fail");
    assert!(err.is_no_rows());
}

#[tokio::test]
async fn soft_delete_is_idempotent_for_existing_entries() {
    let Some(ctx) = TestContext::acquire().await else {
        return;
    };

    let id = ctx
        .repository
        .create_entry(&EntryDraft::new("twice", "…"))
        .await
        .expect("insert entry");
    ctx.repository.soft_delete(id).await.expect("first delete");
    ctx.repository
        .soft_delete(id)
        .await
        .expect("second delete still matches the row");
}

#[tokio::test]
async fn update_overwrites_fields_but_not_create_time_or_deleted() {
    let Some(ctx) = TestContext::acquire().await else {
        return;
    };

    let id = ctx
        .repository
        .create_entry(&EntryDraft::new("before", "old body").with_event_time(hours_ago(24)))
        .await
        .expect("insert entry");
    let original = ctx.repository.list_by_create_time().await.expect("list")[0].clone();

    let new_event_time = hours_ago(6);
    ctx.repository
        .update_entry(
            id,
            &EntryDraft::new("after", "new body")
                .with_label(EntryLabel::Statement)
                .with_event_time(new_event_time),
        )
        .await
        .expect("update entry");

    let updated = ctx.repository.list_by_create_time().await.expect("list")[0].clone();
    assert_eq!(updated.id, id);
    assert_eq!(updated.title, "after");
    assert_eq!(updated.value, "new body");
    assert_eq!(updated.label, EntryLabel::Statement);
    assert_eq!(updated.event_time, new_event_time);
    assert!(!updated.deleted);
    assert_eq!(updated.create_time, original.create_time);
}

#[tokio::test]
async fn update_of_missing_id_is_silent_success() {
    let Some(ctx) = TestContext::acquire().await else {
        return;
    };

    ctx.repository
        .update_entry(987_654, &EntryDraft::new("ghost", "…"))
        .await
        .expect("update misses are not reported");
}

#[tokio::test]
async fn label_listing_filters_and_projects_narrowly() {
    let Some(ctx) = TestContext::acquire().await else {
        return;
    };

    ctx.repository
        .create_entry(&EntryDraft::new("procurement rules", "…").with_label(EntryLabel::Policy))
        .await
        .expect("insert policy entry");
    ctx.repository
        .create_entry(&EntryDraft::new("press remarks", "…").with_label(EntryLabel::Statement))
        .await
        .expect("insert statement entry");

    let entries = ctx
        .repository
        .list_by_label(EntryLabel::Policy)
        .await
        .expect("list by label");
    assert_eq!(entries.len(), 1);
    for entry in &entries {
        assert_eq!(entry.label, EntryLabel::Policy);
        assert!(!entry.deleted);
        assert!(entry.create_time.is_none());
    }
}
