//! Administrator account creation.

use anyhow::{Context, bail};
use edudesk_core::hash_password_with_cost;
use edudesk_db::{PgPool, PgUserRepository, UserRepository};
use edudesk_models::{NewUser, User, UserRole};

/// Input for a new administrator. Administrators are teachers with the
/// admin flag set and no creator.
pub struct AdminAccount {
    pub name: String,
    pub nickname: String,
    pub phone: String,
    pub email: String,
    pub password: String,
}

/// Creates an administrator, refusing duplicates of name, phone or email.
pub async fn create_admin(db: &PgPool, account: AdminAccount, bcrypt_cost: u32) -> anyhow::Result<User> {
    let repo = PgUserRepository::new(db.clone());

    if repo.is_name_exist(&account.name, None).await? {
        bail!("name '{}' already exists", account.name);
    }
    if repo.is_phone_exist(&account.phone, None).await? {
        bail!("phone '{}' already exists", account.phone);
    }
    if repo.is_email_exist(&account.email, None).await? {
        bail!("email '{}' already exists", account.email);
    }

    let password = hash_password_with_cost(&account.password, bcrypt_cost)
        .map_err(|e| anyhow::anyhow!(e.message))
        .context("failed to hash password")?;

    let user = repo
        .create(NewUser {
            name: account.name,
            nickname: account.nickname,
            phone: account.phone,
            email: account.email,
            password,
            role: UserRole::Teacher,
            is_admin: true,
            class_id: None,
            created_by_id: None,
        })
        .await?;

    Ok(user)
}
