use chrono::{DateTime, Utc};
use sqlx::FromRow;
use timeline_core::config::CoreConfig;
use timeline_core::db::DatabasePool;
use timeline_core::errors::{Result, TimelineError};
use timeline_protocol::{EntryDraft, EntryLabel, TimelineEntry};

/// The fixed set of statements the repository executes.
///
/// Each operation maps to exactly one parameterized statement; sqlx keeps the
/// prepared form cached per connection, so the text here is the single source
/// of truth for what runs against the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Statement {
    Insert,
    SoftDelete,
    Update,
    ListByCreateTime,
    ListByEventTime,
    ListByLabel,
}

impl Statement {
    const fn sql(self) -> &'static str {
        match self {
            Statement::Insert => {
                "INSERT INTO timeline (title, deleted, value, label, event_time) \
                 VALUES ($1, FALSE, $2, $3, COALESCE($4, now())) \
                 RETURNING id"
            }
            Statement::SoftDelete => "UPDATE timeline SET deleted = TRUE WHERE id = $1",
            Statement::Update => {
                "UPDATE timeline SET title = $2, value = $3, label = $4, \
                 event_time = COALESCE($5, event_time) \
                 WHERE id = $1"
            }
            Statement::ListByCreateTime => {
                "SELECT id, title, value, label, deleted, event_time, create_time \
                 FROM timeline WHERE deleted = FALSE \
                 ORDER BY create_time DESC"
            }
            Statement::ListByEventTime => {
                "SELECT id, title, value, label, deleted, event_time, create_time \
                 FROM timeline WHERE deleted = FALSE \
                 ORDER BY event_time DESC"
            }
            Statement::ListByLabel => {
                "SELECT id, title, value, label, deleted, event_time \
                 FROM timeline WHERE deleted = FALSE AND label = $1 \
                 ORDER BY event_time DESC"
            }
        }
    }
}

/// Database-backed repository for timeline entries.
#[derive(Clone)]
pub struct TimelineRepository {
    pool: DatabasePool,
}

impl TimelineRepository {
    /// Connects to the database using the supplied configuration and ensures migrations ran.
    pub async fn from_config(config: &CoreConfig) -> Result<Self> {
        let pool = DatabasePool::connect(config).await?;
        Self::from_pool(pool).await
    }

    /// Builds the repository from an existing database pool.
    ///
    /// Runs the embedded migrations, which provision the timeline table
    /// idempotently; safe to call on every startup.
    pub async fn from_pool(pool: DatabasePool) -> Result<Self> {
        sqlx::migrate!("./migrations")
            .run(pool.inner())
            .await
            .map_err(|err| TimelineError::SchemaProvisionFailure(err.to_string()))?;
        Ok(Self { pool })
    }

    /// Inserts a new entry with `deleted = false` and returns the assigned id.
    ///
    /// An unset `event_time` is stamped with the insertion instant by the
    /// store.
    pub async fn create_entry(&self, draft: &EntryDraft) -> Result<u32> {
        let id: i32 = sqlx::query_scalar(Statement::Insert.sql())
            .bind(&draft.title)
            .bind(&draft.value)
            .bind(draft.label.as_str())
            .bind(draft.event_time)
            .fetch_one(self.pool.inner())
            .await
            .map_err(|err| match err {
                sqlx::Error::RowNotFound => {
                    TimelineError::NoRowsAffected("insert returned no row".into())
                }
                other => TimelineError::StorageUnavailable(other),
            })?;

        Ok(id as u32)
    }

    /// Flips the soft-delete flag for the entry matching `id`.
    ///
    /// Postgres reports a matched row as affected even when it was already
    /// deleted, so re-deleting is idempotent success; zero affected rows
    /// strictly means no such id.
    pub async fn soft_delete(&self, id: u32) -> Result<()> {
        let result = sqlx::query(Statement::SoftDelete.sql())
            .bind(id as i32)
            .execute(self.pool.inner())
            .await?;

        if result.rows_affected() == 0 {
            return Err(TimelineError::NoRowsAffected(format!(
                "no timeline entry with id {id}"
            )));
        }

        Ok(())
    }

    /// Overwrites title, value, label and event time for the entry matching `id`.
    ///
    /// Never touches `deleted` or `create_time`; an unset `event_time` keeps
    /// the stored one. A miss on `id` is silent success.
    pub async fn update_entry(&self, id: u32, draft: &EntryDraft) -> Result<()> {
        sqlx::query(Statement::Update.sql())
            .bind(id as i32)
            .bind(&draft.title)
            .bind(&draft.value)
            .bind(draft.label.as_str())
            .bind(draft.event_time)
            .execute(self.pool.inner())
            .await?;

        Ok(())
    }

    /// Lists every non-deleted entry, most recently inserted first.
    pub async fn list_by_create_time(&self) -> Result<Vec<TimelineEntry>> {
        let rows = sqlx::query_as::<_, TimelineRow>(Statement::ListByCreateTime.sql())
            .fetch_all(self.pool.inner())
            .await?;

        rows.into_iter().map(TimelineEntry::try_from).collect()
    }

    /// Lists every non-deleted entry, most recent real-world event first.
    pub async fn list_by_event_time(&self) -> Result<Vec<TimelineEntry>> {
        let rows = sqlx::query_as::<_, TimelineRow>(Statement::ListByEventTime.sql())
            .fetch_all(self.pool.inner())
            .await?;

        rows.into_iter().map(TimelineEntry::try_from).collect()
    }

    /// Lists non-deleted entries of one category, most recent event first.
    ///
    /// This projection omits `create_time`; returned entries carry `None`.
    pub async fn list_by_label(&self, label: EntryLabel) -> Result<Vec<TimelineEntry>> {
        let rows = sqlx::query_as::<_, LabeledRow>(Statement::ListByLabel.sql())
            .bind(label.as_str())
            .fetch_all(self.pool.inner())
            .await?;

        rows.into_iter().map(TimelineEntry::try_from).collect()
    }
}

fn parse_label(raw: &str) -> Result<EntryLabel> {
    EntryLabel::parse(raw).ok_or_else(|| {
        TimelineError::StorageUnavailable(sqlx::Error::Decode(
            format!("unrecognised label in storage: {raw}").into(),
        ))
    })
}

#[derive(FromRow)]
struct TimelineRow {
    id: i32,
    title: String,
    value: String,
    label: String,
    deleted: bool,
    event_time: DateTime<Utc>,
    create_time: DateTime<Utc>,
}

impl TryFrom<TimelineRow> for TimelineEntry {
    type Error = TimelineError;

    fn try_from(row: TimelineRow) -> Result<Self> {
        Ok(TimelineEntry {
            id: row.id as u32,
            title: row.title,
            value: row.value,
            label: parse_label(&row.label)?,
            deleted: row.deleted,
            event_time: row.event_time,
            create_time: Some(row.create_time),
        })
    }
}

/// Narrower row shape used by the label-filtered listing.
#[derive(FromRow)]
struct LabeledRow {
    id: i32,
    title: String,
    value: String,
    label: String,
    deleted: bool,
    event_time: DateTime<Utc>,
}

impl TryFrom<LabeledRow> for TimelineEntry {
    type Error = TimelineError;

    fn try_from(row: LabeledRow) -> Result<Self> {
        Ok(TimelineEntry {
            id: row.id as u32,
            title: row.title,
            value: row.value,
            label: parse_label(&row.label)?,
            deleted: row.deleted,
            event_time: row.event_time,
            create_time: None,
        })
    }
}
