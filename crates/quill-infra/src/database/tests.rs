#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use quill_core::domain::{Article, ArticleStatus};
    use quill_core::error::RepoError;
    use quill_core::ports::{ArticleRepository, BaseRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use crate::database::entity::article::{self, Status};
    use crate::database::postgres_repo::PostgresArticleRepository;

    fn model(id: i64, version: i32, status: Status) -> article::Model {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        article::Model {
            id,
            title: "Test Article".to_owned(),
            slug: "test-article".to_owned(),
            content: "Content".to_owned(),
            introduction: None,
            is_blog_post: true,
            status,
            publication_timestamp: Some((now + Duration::hours(1)).into()),
            version,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn exec_result(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_find_article_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(7, 2, Status::ScheduledForPublication)]])
            .into_connection();

        let repo = PostgresArticleRepository::new(db);

        let article = repo.find_by_id(7).await.unwrap().unwrap();

        assert_eq!(article.id(), Some(7));
        assert_eq!(article.version(), 2);
        assert_eq!(article.title, "Test Article");
        assert_eq!(article.status(), ArticleStatus::ScheduledForPublication);
        assert_eq!(
            article.publication_timestamp(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_insert_returns_stored_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(1, 0, Status::Draft)]])
            .into_connection();

        let repo = PostgresArticleRepository::new(db);

        let saved = repo.save(Article::new("Test Article", "Content")).await.unwrap();

        assert_eq!(saved.id(), Some(1));
        assert_eq!(saved.version(), 0);
    }

    #[tokio::test]
    async fn test_update_bumps_version() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![exec_result(1)])
            .into_connection();

        let repo = PostgresArticleRepository::new(db);
        let article: Article = model(7, 2, Status::ScheduledForPublication).into();

        let saved = repo.save(article).await.unwrap();

        assert_eq!(saved.version(), 3);
    }

    #[tokio::test]
    async fn test_update_with_stale_version_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![exec_result(0)])
            .append_query_results(vec![vec![model(7, 3, Status::Published)]])
            .into_connection();

        let repo = PostgresArticleRepository::new(db);
        let stale: Article = model(7, 2, Status::ScheduledForPublication).into();

        let err = repo.save(stale).await.unwrap_err();

        assert!(matches!(err, RepoError::VersionConflict { id: 7, expected: 2 }));
    }

    #[tokio::test]
    async fn test_update_of_deleted_article_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![exec_result(0)])
            .append_query_results(vec![Vec::<article::Model>::new()])
            .into_connection();

        let repo = PostgresArticleRepository::new(db);
        let article: Article = model(7, 2, Status::Draft).into();

        assert!(matches!(repo.save(article).await, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_next_scheduled_publication_time() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(3, 0, Status::ScheduledForPublication)]])
            .append_query_results(vec![Vec::<article::Model>::new()])
            .into_connection();

        let repo = PostgresArticleRepository::new(db);

        assert_eq!(
            repo.find_next_scheduled_publication_time().await.unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap())
        );
        assert_eq!(repo.find_next_scheduled_publication_time().await.unwrap(), None);
    }
}
