use std::sync::Arc;

use tracing::{debug, info, instrument};

use edudesk_auth::{TokenSubject, create_access_token};
use edudesk_config::SettingsHandle;
use edudesk_core::{AppError, verify_password};
use edudesk_db::{DbError, UserRepository};
use edudesk_models::auth::{LoginResponse, LoginUser};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    settings: SettingsHandle,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, settings: SettingsHandle) -> Self {
        Self { users, settings }
    }

    /// An unknown name and a wrong password fail with the same error.
    #[instrument(skip(self, password))]
    pub async fn login(&self, name: &str, password: &str) -> Result<LoginResponse, AppError> {
        let user = match self.users.get_by_name(name).await {
            Ok(user) => user,
            Err(DbError::NotFound) => {
                debug!("login for unknown user");
                return Err(AppError::bad_credentials());
            }
            Err(e) => return Err(e.into()),
        };

        if !verify_password(password, &user.password)? {
            debug!(user_id = user.id, "login with wrong password");
            return Err(AppError::bad_credentials());
        }

        let settings = self.settings.current();
        let token = create_access_token(
            &TokenSubject {
                user_id: user.id,
                name: &user.name,
                role: user.role.as_str(),
                is_admin: user.is_admin,
            },
            &settings.jwt,
        )?;

        info!(user_id = user.id, "user logged in");

        Ok(LoginResponse {
            token,
            expires_in: settings.jwt.expire_secs,
            user: LoginUser::from(&user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edudesk_auth::verify_token;
    use edudesk_config::Settings;
    use edudesk_core::{ErrorCode, hash_password_with_cost};
    use edudesk_db::memory::InMemoryUserRepository;
    use edudesk_models::{NewUser, UserRole};

    async fn setup() -> (AuthService, SettingsHandle) {
        let mut settings = Settings::default();
        settings.jwt.secret = "unit-test-secret".to_string();
        let handle = SettingsHandle::new(settings);

        let repo = Arc::new(InMemoryUserRepository::new());
        repo.create(NewUser {
            name: "ann".into(),
            nickname: "Ann".into(),
            phone: "111111".into(),
            email: "ann@example.com".into(),
            password: hash_password_with_cost("secret1", 4).unwrap(),
            role: UserRole::Teacher,
            is_admin: true,
            class_id: None,
            created_by_id: None,
        })
        .await
        .unwrap();

        (AuthService::new(repo, handle.clone()), handle)
    }

    #[tokio::test]
    async fn test_login_issues_token_with_role_claims() {
        let (svc, settings) = setup().await;
        let response = svc.login("ann", "secret1").await.unwrap();

        assert_eq!(response.expires_in, settings.current().jwt.expire_secs);
        assert_eq!(response.user.name, "ann");

        let claims = verify_token(&response.token, &settings.current().jwt).unwrap();
        assert_eq!(claims.user_id().unwrap(), response.user.id);
        assert_eq!(claims.role, "teacher");
        assert!(claims.is_admin);
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_look_the_same() {
        let (svc, _) = setup().await;

        let unknown = svc.login("nobody", "x").await.unwrap_err();
        let wrong = svc.login("ann", "wrong").await.unwrap_err();

        assert_eq!(unknown.code, ErrorCode::BadCredentials);
        assert_eq!(unknown.code, wrong.code);
        assert_eq!(unknown.message, wrong.message);
    }
}
