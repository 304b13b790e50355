//! Demo account seeding
//!
//! Ensures a fixed set of accounts exists at startup. Accounts whose
//! username is already taken are skipped; everything else is written in a
//! single commit.

use account_core::{Role, RoleSet, User};
use account_service::{ServiceContext, ServiceResult};
use tracing::{debug, info, instrument};

/// Demo account: first name, last name, username/password, role
struct DemoAccount {
    first_name: &'static str,
    last_name: &'static str,
    username: &'static str,
    password: &'static str,
    role: Role,
}

const DEMO_ACCOUNTS: [DemoAccount; 4] = [
    DemoAccount {
        first_name: "Admin",
        last_name: "Admin",
        username: "admin",
        password: "admin",
        role: Role::Admin,
    },
    DemoAccount {
        first_name: "Manager",
        last_name: "Manager",
        username: "manager",
        password: "manager",
        role: Role::Manager,
    },
    DemoAccount {
        first_name: "Doctor",
        last_name: "Doctor",
        username: "doctor",
        password: "doctor",
        role: Role::Doctor,
    },
    DemoAccount {
        first_name: "User",
        last_name: "User",
        username: "user",
        password: "user",
        role: Role::User,
    },
];

/// Create the demo accounts that do not exist yet, returning how many were
/// created
#[instrument(skip(ctx))]
pub async fn seed_demo_accounts(ctx: &ServiceContext) -> ServiceResult<usize> {
    let uow = ctx.database().begin().await?;
    let users = uow.users();
    let mut created = 0;

    for account in &DEMO_ACCOUNTS {
        if users.username_exists(account.username).await? {
            debug!(username = account.username, "Demo account already present");
            continue;
        }

        let user = User::new(
            account.first_name.to_string(),
            account.last_name.to_string(),
            account.username.to_string(),
            ctx.hasher().hash(account.password)?,
            RoleSet::from([account.role]),
            ctx.clock().now(),
        );
        users.add(&user).await?;
        created += 1;
    }

    uow.commit().await?;

    info!(created, "Demo accounts seeded");
    Ok(created)
}
