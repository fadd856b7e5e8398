pub mod helpers {
    use crate::PhenoDb;

    const SEED: &str = include_str!("../tests/fixtures/seed.sql");

    /// Empty in-memory database with the schema applied.
    pub async fn test_db() -> PhenoDb {
        PhenoDb::open_local(":memory:").await.unwrap()
    }

    /// In-memory database loaded with the shared fixture.
    pub async fn seeded_db() -> PhenoDb {
        let db = test_db().await;
        db.conn().execute_batch(SEED).await.unwrap();
        db
    }
}
