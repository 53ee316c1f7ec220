//! `SeaORM` implementation of the `AuthService` trait.

use crate::auth::TokenCodec;
use crate::config::SecurityConfig;
use crate::db::Store;
use crate::domain::{Principal, role_for_email};
use crate::services::auth_service::{AuthError, AuthService, LoginResult};
use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, info};

pub struct SeaOrmAuthService {
    store: Store,
    tokens: TokenCodec,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        let tokens = TokenCodec::new(&security.secret_key);
        Self {
            store,
            tokens,
            security,
        }
    }

    fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::Validation("Name is required".to_string()));
        }

        if !is_email_shaped(email) {
            return Err(AuthError::Validation(format!(
                "Invalid email address: {email}"
            )));
        }

        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        Ok(())
    }
}

/// `local@domain` with both parts non-empty and no whitespace.
fn is_email_shaped(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Principal, AuthError> {
        Self::validate_signup(name, email, password)?;

        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::DuplicateIdentity);
        }

        let role = role_for_email(email);
        self.store
            .create_user(name.trim(), email, password, role, &self.security)
            .await?
            .ok_or(AuthError::DuplicateIdentity)
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        let principal = self
            .store
            .verify_user_password(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        debug!("Authenticated {}", principal.email);
        Ok(principal)
    }

    fn issue_token(
        &self,
        principal: &Principal,
        ttl: Option<Duration>,
    ) -> Result<String, AuthError> {
        Ok(self.tokens.issue(&principal.email, ttl)?)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let principal = self.authenticate(email, password).await?;
        let ttl = Duration::minutes(self.security.access_token_expire_minutes);
        let access_token = self.issue_token(&principal, Some(ttl))?;

        info!("User logged in: {}", principal.email);

        Ok(LoginResult {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    async fn resolve_token(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.tokens.verify(token)?;

        self.store
            .get_user_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    async fn service() -> SeaOrmAuthService {
        let store = Store::new("sqlite::memory:").await.unwrap();
        let security = SecurityConfig {
            secret_key: "unit-test-secret".to_string(),
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        };
        SeaOrmAuthService::new(store, security)
    }

    #[test]
    fn email_shape_check() {
        assert!(is_email_shaped("a@b.c"));
        assert!(is_email_shaped("agent@support"));
        assert!(!is_email_shaped("plain"));
        assert!(!is_email_shaped("@example.com"));
        assert!(!is_email_shaped("a@"));
        assert!(!is_email_shaped("a b@example.com"));
        assert!(!is_email_shaped("a@b@c"));
    }

    #[tokio::test]
    async fn register_derives_role_from_email() {
        let service = service().await;

        let client = service
            .register("Ann", "ann@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(client.role, Role::Client);

        let agent = service
            .register("Sam", "sam@Support.example.com", "pw")
            .await
            .unwrap();
        assert_eq!(agent.role, Role::Support);
        assert_eq!(agent.email, "sam@support.example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let service = service().await;
        service
            .register("Ann", "ann@example.com", "pw")
            .await
            .unwrap();

        let err = service
            .register("Ann Again", "ANN@example.com", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateIdentity));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let service = service().await;
        let err = service.register("", "x@y.z", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        let err = service.register("X", "nope", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        let err = service.register("X", "x@y.z", "").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn authenticate_checks_password() {
        let service = service().await;
        service
            .register("Ann", "ann@example.com", "right")
            .await
            .unwrap();

        let principal = service.authenticate("ann@example.com", "right").await.unwrap();
        assert_eq!(principal.name, "Ann");

        let err = service
            .authenticate("ann@example.com", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let err = service
            .authenticate("nobody@example.com", "right")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn token_round_trip_resolves_same_principal() {
        let service = service().await;
        let principal = service
            .register("Ann", "ann@example.com", "pw")
            .await
            .unwrap();

        let token = service.issue_token(&principal, None).unwrap();
        let resolved = service.resolve_token(&token).await.unwrap();
        assert_eq!(resolved.email, principal.email);
        assert_eq!(resolved.id, principal.id);
    }

    #[tokio::test]
    async fn expired_token_is_unauthenticated() {
        let service = service().await;
        let principal = service
            .register("Ann", "ann@example.com", "pw")
            .await
            .unwrap();

        let token = service
            .issue_token(&principal, Some(Duration::seconds(-1)))
            .unwrap();
        let err = service.resolve_token(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn token_for_unknown_user_is_unauthenticated() {
        let service = service().await;
        let ghost = Principal {
            id: crate::domain::UserId::new(99),
            name: "Ghost".to_string(),
            email: "ghost@example.com".to_string(),
            role: Role::Client,
        };

        let token = service.issue_token(&ghost, None).unwrap();
        let err = service.resolve_token(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn login_issues_bearer_token() {
        let service = service().await;
        service
            .register("Ann", "ann@example.com", "pw")
            .await
            .unwrap();

        let result = service.login("ann@example.com", "pw").await.unwrap();
        assert_eq!(result.token_type, "bearer");
        let resolved = service.resolve_token(&result.access_token).await.unwrap();
        assert_eq!(resolved.email, "ann@example.com");
    }
}
