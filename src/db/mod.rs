use crate::config::SecurityConfig;
use crate::domain::{
    Principal, RequestId, RequestQuery, RequestStatus, Role, Ticket, TicketChanges, TicketDraft,
    UserId,
};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tokio::task;
use tracing::info;

pub mod migrator;
pub mod repositories;

pub use repositories::user::hash_password;

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = db_url.contains(":memory:");
        let (max_connections, min_connections) = if in_memory {
            // Every connection would otherwise open its own empty database
            (1, 1)
        } else {
            (max_connections, min_connections)
        };

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn request_repo(&self) -> repositories::request::RequestRepository {
        repositories::request::RequestRepository::new(self.conn.clone())
    }

    /// Hashes the password off the async runtime, then inserts the user.
    /// `None` means the email is already registered.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<Option<Principal>> {
        let password = password.to_string();
        let security = security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&security)))
            .await??;

        self.user_repo()
            .create(name, email, password_hash, role)
            .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<Principal>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_users_by_role(&self, role: Role) -> Result<Vec<Principal>> {
        self.user_repo().list_by_role(role).await
    }

    pub async fn verify_user_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn create_owned_request(&self, owner: UserId, draft: &TicketDraft) -> Result<Ticket> {
        self.request_repo().create_owned(owner, draft).await
    }

    pub async fn get_owned_request(&self, owner: UserId, id: RequestId) -> Result<Option<Ticket>> {
        self.request_repo().get_owned(owner, id).await
    }

    pub async fn update_owned_request(
        &self,
        owner: UserId,
        id: RequestId,
        changes: &TicketChanges,
    ) -> Result<Option<Ticket>> {
        self.request_repo().update_owned(owner, id, changes).await
    }

    pub async fn get_request_and_mark_viewed(&self, id: RequestId) -> Result<Option<Ticket>> {
        self.request_repo().get_and_mark_viewed(id).await
    }

    pub async fn set_request_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<Option<Ticket>> {
        self.request_repo().set_status(id, status).await
    }

    pub async fn list_requests(&self, query: &RequestQuery) -> Result<Vec<Ticket>> {
        self.request_repo().list(query).await
    }

    pub async fn list_owned_requests(
        &self,
        owner: UserId,
        query: &RequestQuery,
    ) -> Result<Vec<Ticket>> {
        self.request_repo().list_owned(owner, query).await
    }

    pub async fn count_request_links(&self, id: RequestId) -> Result<u64> {
        self.request_repo().count_links(id).await
    }
}
