use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use quill_core::domain::{Article, ArticleForm, ArticleStatus, StatusViolation};
use quill_core::error::{DomainError, RepoError};
use quill_core::ports::{ArticleRepository, BaseRepository, TaskScheduler};
use quill_core::publication::{
    AutoPublicationScheduler, AutoPublicationTaskFactory, AutoPublicationTrigger,
};
use quill_core::test_utils::{ManualClock, RecordingTaskScheduler};
use quill_core::ArticleUpdater;
use quill_infra::InMemoryArticleRepository;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn form(status: ArticleStatus, publication_timestamp: Option<DateTime<Utc>>) -> ArticleForm {
    ArticleForm {
        title: "Release notes".to_string(),
        slug: "release-notes".to_string(),
        content: "What changed".to_string(),
        introduction: Some("Summary".to_string()),
        post: true,
        status,
        publication_timestamp,
    }
}

/// Store whose updates always lose the version race.
struct AlwaysStale {
    inner: Arc<InMemoryArticleRepository>,
}

#[async_trait]
impl BaseRepository<Article, i64> for AlwaysStale {
    async fn find_by_id(&self, id: i64) -> Result<Option<Article>, RepoError> {
        self.inner.find_by_id(id).await
    }

    async fn save(&self, article: Article) -> Result<Article, RepoError> {
        match article.id() {
            Some(id) => Err(RepoError::VersionConflict {
                id,
                expected: article.version(),
            }),
            None => self.inner.save(article).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.inner.delete(id).await
    }
}

#[async_trait]
impl ArticleRepository for AlwaysStale {
    async fn find_all_scheduled(&self) -> Result<Vec<Article>, RepoError> {
        self.inner.find_all_scheduled().await
    }

    async fn find_next_scheduled_publication_time(
        &self,
    ) -> Result<Option<DateTime<Utc>>, RepoError> {
        self.inner.find_next_scheduled_publication_time().await
    }

    async fn find_due_for_publication(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>, RepoError> {
        self.inner.find_due_for_publication(now).await
    }
}

struct Setup {
    store: Arc<InMemoryArticleRepository>,
    clock: Arc<ManualClock>,
    timers: Arc<RecordingTaskScheduler>,
    updater: ArticleUpdater,
}

fn setup_with(repository: Arc<dyn ArticleRepository>, store: Arc<InMemoryArticleRepository>) -> Setup {
    let clock = Arc::new(ManualClock::new(start()));
    let timers = Arc::new(RecordingTaskScheduler::new());
    let scheduler = Arc::new(AutoPublicationScheduler::new(
        AutoPublicationTrigger::new(repository.clone()),
        AutoPublicationTaskFactory::new(repository.clone(), clock.clone()),
        timers.clone() as Arc<dyn TaskScheduler>,
    ));
    let updater = ArticleUpdater::new(repository, scheduler, clock.clone());
    Setup {
        store,
        clock,
        timers,
        updater,
    }
}

fn setup() -> Setup {
    let store = Arc::new(InMemoryArticleRepository::new());
    setup_with(store.clone(), store)
}

#[tokio::test]
async fn test_create_scheduled_article_arms_timer() {
    let s = setup();
    let at = start() + Duration::hours(2);

    let saved = s
        .updater
        .create(&form(ArticleStatus::ScheduledForPublication, Some(at)))
        .await
        .unwrap();

    assert_eq!(saved.status(), ArticleStatus::ScheduledForPublication);
    let pending = s.timers.pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].1, at);
}

#[tokio::test]
async fn test_create_draft_leaves_schedule_alone() {
    let s = setup();

    s.updater.create(&form(ArticleStatus::Draft, None)).await.unwrap();

    assert!(s.timers.armed().is_empty());
}

#[tokio::test]
async fn test_create_published_without_timestamp_is_stamped_now() {
    let s = setup();

    let saved = s.updater.create(&form(ArticleStatus::Published, None)).await.unwrap();

    assert_eq!(saved.publication_timestamp(), Some(start()));
    assert!(s.timers.armed().is_empty());
}

#[tokio::test]
async fn test_scheduling_in_the_past_is_rejected() {
    let s = setup();

    let err = s
        .updater
        .create(&form(
            ArticleStatus::ScheduledForPublication,
            Some(start() - Duration::hours(1)),
        ))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DomainError::Validation(StatusViolation::TimestampNotFuture)
    ));
    assert!(s.store.find_by_id(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_blank_content_cannot_be_scheduled() {
    let s = setup();
    let mut blank = form(
        ArticleStatus::ScheduledForPublication,
        Some(start() + Duration::hours(1)),
    );
    blank.content = "   ".to_string();

    let err = s.updater.create(&blank).await.unwrap_err();

    assert!(matches!(
        err,
        DomainError::Validation(StatusViolation::BlankContentForScheduling)
    ));
    assert!(s.timers.armed().is_empty());
}

#[tokio::test]
async fn test_update_without_schedule_change_does_not_reschedule() {
    let s = setup();
    let at = start() + Duration::hours(2);
    let created = s
        .updater
        .create(&form(ArticleStatus::ScheduledForPublication, Some(at)))
        .await
        .unwrap();

    let mut edit = form(ArticleStatus::ScheduledForPublication, Some(at));
    edit.title = "Release notes, revised".to_string();
    let saved = s.updater.update(created.id().unwrap(), &edit).await.unwrap();

    assert_eq!(saved.title, "Release notes, revised");
    assert_eq!(saved.version(), 1);
    assert_eq!(s.timers.armed().len(), 1);
}

#[tokio::test]
async fn test_unscheduling_cancels_timer() {
    let s = setup();
    let created = s
        .updater
        .create(&form(
            ArticleStatus::ScheduledForPublication,
            Some(start() + Duration::hours(2)),
        ))
        .await
        .unwrap();

    s.updater
        .update(created.id().unwrap(), &form(ArticleStatus::Draft, None))
        .await
        .unwrap();

    assert_eq!(s.timers.cancelled().len(), 1);
    assert!(s.timers.pending().is_empty());
}

#[tokio::test]
async fn test_delete_scheduled_article_cancels_timer() {
    let s = setup();
    let created = s
        .updater
        .create(&form(
            ArticleStatus::ScheduledForPublication,
            Some(start() + Duration::hours(2)),
        ))
        .await
        .unwrap();
    let id = created.id().unwrap();

    let deleted = s.updater.delete(id).await.unwrap();

    assert_eq!(deleted.id(), Some(id));
    assert!(s.timers.pending().is_empty());
    assert!(matches!(
        s.updater.find(id).await,
        Err(DomainError::NotFound { id: missing, .. }) if missing == id
    ));
}

#[tokio::test]
async fn test_admin_edit_merges_with_auto_publication() {
    let s = setup();
    let at = start() + Duration::minutes(1);
    let created = s
        .updater
        .create(&form(ArticleStatus::ScheduledForPublication, Some(at)))
        .await
        .unwrap();
    let id = created.id().unwrap();

    // The admin opens the editor while the article is still scheduled.
    let mut opened = s.updater.find(id).await.unwrap();

    s.clock.advance(Duration::minutes(1));
    assert_eq!(s.timers.fire_all().await, 1);
    assert_eq!(
        s.store.find_by_id(id).await.unwrap().unwrap().status(),
        ArticleStatus::Published
    );

    opened.title = "Edited while publishing".to_string();
    opened.content = "New body".to_string();
    let merged = s.updater.save(opened).await.unwrap();

    assert_eq!(merged.status(), ArticleStatus::Published);
    assert_eq!(merged.title, "Edited while publishing");
    assert_eq!(merged.content, "New body");
    assert_eq!(merged.publication_timestamp(), Some(at));
    assert_eq!(merged.version(), 2);
}

#[tokio::test]
async fn test_second_conflict_is_reported() {
    let store = Arc::new(InMemoryArticleRepository::new());
    let repository = Arc::new(AlwaysStale {
        inner: store.clone(),
    });
    let s = setup_with(repository, store);
    let created = s.updater.create(&form(ArticleStatus::Draft, None)).await.unwrap();

    let err = s
        .updater
        .update(created.id().unwrap(), &form(ArticleStatus::Draft, None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn test_update_of_missing_article_is_not_found() {
    let s = setup();

    let err = s
        .updater
        .update(42, &form(ArticleStatus::Draft, None))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::NotFound { id: 42, .. }));
}
