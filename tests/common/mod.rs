#![allow(dead_code)]

pub mod runtime;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbBackend, Statement};
use sea_orm_lateral::{Config, config::DATABASE_URL};
use tracing_subscriber::EnvFilter;

pub struct TestContext {
    base_url: String,
    db_name: String,
    pub db: DatabaseConnection,
}

impl TestContext {
    /// Connect to `DATABASE_URL`, in-memory SQLite by default.
    ///
    /// On PostgreSQL and MySQL the URL names the server only; every test gets a fresh database
    /// called after it.
    pub async fn new(test_name: &str) -> Self {
        init_tracing();
        let base_url =
            std::env::var(DATABASE_URL).unwrap_or_else(|_| "sqlite::memory:".to_owned());
        let db = setup(&base_url, test_name).await;

        Self {
            base_url,
            db_name: test_name.to_owned(),
            db,
        }
    }

    pub fn backend(&self) -> DbBackend {
        self.db.get_database_backend()
    }

    pub async fn delete(self) {
        let backend = self.backend();
        self.db.close().await.unwrap();
        match backend {
            DbBackend::Postgres => {
                let db = Database::connect(format!("{}/postgres", self.base_url))
                    .await
                    .unwrap();
                db.execute(Statement::from_string(
                    backend,
                    format!(r#"DROP DATABASE IF EXISTS "{}";"#, self.db_name),
                ))
                .await
                .unwrap();
            }
            DbBackend::MySql => {
                let db = Database::connect(self.base_url.as_str()).await.unwrap();
                db.execute(Statement::from_string(
                    backend,
                    format!("DROP DATABASE IF EXISTS `{}`;", self.db_name),
                ))
                .await
                .unwrap();
            }
            DbBackend::Sqlite => {}
        }
    }
}

pub async fn setup(base_url: &str, db_name: &str) -> DatabaseConnection {
    let url = match Config::new(base_url).backend() {
        Some(DbBackend::Postgres) => {
            let db = Database::connect(format!("{base_url}/postgres")).await.unwrap();
            db.execute(Statement::from_string(
                DbBackend::Postgres,
                format!(r#"DROP DATABASE IF EXISTS "{db_name}";"#),
            ))
            .await
            .unwrap();
            db.execute(Statement::from_string(
                DbBackend::Postgres,
                format!(r#"CREATE DATABASE "{db_name}";"#),
            ))
            .await
            .unwrap();
            format!("{base_url}/{db_name}")
        }
        Some(DbBackend::MySql) => {
            let db = Database::connect(base_url).await.unwrap();
            db.execute(Statement::from_string(
                DbBackend::MySql,
                format!("DROP DATABASE IF EXISTS `{db_name}`;"),
            ))
            .await
            .unwrap();
            db.execute(Statement::from_string(
                DbBackend::MySql,
                format!("CREATE DATABASE `{db_name}`;"),
            ))
            .await
            .unwrap();
            format!("{base_url}/{db_name}")
        }
        Some(DbBackend::Sqlite) | None => base_url.to_owned(),
    };

    Config::new(url).connect().await.unwrap()
}

/// Log to the test writer, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
