//! Shared fixtures for service tests: in-memory store, manual clock, real
//! JWT codec and Argon2 hasher.

use std::sync::Arc;

use account_common::{JwtService, ManualClock, PasswordService};
use account_core::entities::{Role, User};
use account_core::traits::{Clock, Database, PasswordHasher, UnitOfWork};
use account_db::MemoryDatabase;
use chrono::Duration;
use uuid::Uuid;

use crate::dto::{CredentialsResponse, SignInRequest};

use super::auth::AuthService;
use super::context::{ServiceContext, ServiceContextBuilder};
use super::scope::RequestScope;

pub(crate) struct Harness {
    pub ctx: ServiceContext,
    pub clock: Arc<ManualClock>,
    pub db: MemoryDatabase,
}

impl Harness {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::starting_now());
        let db = MemoryDatabase::new();
        let ctx = ServiceContextBuilder::new()
            .database(Arc::new(db.clone()))
            .codec(Arc::new(JwtService::new("service-test-secret", clock.clone())))
            .hasher(Arc::new(PasswordService::new()))
            .clock(clock.clone())
            .access_ttl(Duration::minutes(15))
            .refresh_ttl(Duration::days(7))
            .build()
            .unwrap();

        Self { ctx, clock, db }
    }

    pub async fn scope(&self, bearer: Option<String>) -> RequestScope {
        self.ctx.scope(bearer).await.unwrap()
    }

    pub async fn begin(&self) -> Box<dyn UnitOfWork> {
        self.db.begin().await.unwrap()
    }

    /// Store an active user directly. The clock moves one second afterwards
    /// so creation order is strict.
    pub async fn seed_named(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        roles: &[Role],
    ) -> User {
        self.seed(first_name, last_name, username, username, roles)
            .await
    }

    pub async fn seed_user(&self, username: &str, password: &str, roles: &[Role]) -> User {
        self.seed("Test", "User", username, password, roles).await
    }

    async fn seed(
        &self,
        first_name: &str,
        last_name: &str,
        username: &str,
        password: &str,
        roles: &[Role],
    ) -> User {
        let user = User::new(
            first_name.to_string(),
            last_name.to_string(),
            username.to_string(),
            PasswordService::new().hash(password).unwrap(),
            roles.iter().copied().collect(),
            self.clock.now(),
        );

        let uow = self.begin().await;
        uow.users().add(&user).await.unwrap();
        uow.commit().await.unwrap();

        self.clock.advance(Duration::seconds(1));
        user
    }

    pub async fn deactivate(&self, id: Uuid) {
        let uow = self.begin().await;
        let mut user = uow.users().find_by_id(id).await.unwrap().unwrap();
        user.deactivate(self.clock.now());
        uow.users().update(&user).await.unwrap();
        uow.commit().await.unwrap();
    }

    pub async fn grant(&self, id: Uuid, roles: &[Role]) {
        let uow = self.begin().await;
        let mut user = uow.users().find_by_id(id).await.unwrap().unwrap();
        user.set_roles(roles.iter().copied().collect(), self.clock.now());
        uow.users().update(&user).await.unwrap();
        uow.commit().await.unwrap();
    }

    pub async fn sign_in(&self, username: &str, password: &str) -> CredentialsResponse {
        let scope = self.scope(None).await;
        AuthService::new(&scope)
            .sign_in(SignInRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn access_token(&self, username: &str, password: &str) -> String {
        self.sign_in(username, password).await.access_token
    }
}
