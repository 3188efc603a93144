//! User accounts in the `"User"` table.

use super::{is_unique_violation, release, ConnectionSource, RepoError, RepoResult};
use crate::models::{CreateUserRequest, User, UserId};
use crate::password;

const INSERT_USER: &str = r#"
    INSERT INTO "User" (Email, PasswordHash)
    VALUES ($1, $2)
    RETURNING UserId, Email, PasswordHash, CreatedAt::timestamptz AS CreatedAt
"#;

const SELECT_USER_BY_ID: &str = r#"
    SELECT UserId, Email, PasswordHash, CreatedAt::timestamptz AS CreatedAt
    FROM "User"
    WHERE UserId = $1
"#;

const SELECT_USER_BY_EMAIL: &str = r#"
    SELECT UserId, Email, PasswordHash, CreatedAt::timestamptz AS CreatedAt
    FROM "User"
    WHERE Email = $1
"#;

const UPDATE_USER_EMAIL: &str = r#"
    UPDATE "User"
    SET Email = $1
    WHERE UserId = $2
"#;

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn validate_email(email: &str) -> RepoResult<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(RepoError::Validation(
            "Valid email address is required".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> RepoResult<()> {
    if password.trim().is_empty() || password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RepoError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    Ok(())
}

pub(crate) fn validate_user_id(id: UserId) -> RepoResult<()> {
    if id <= 0 {
        return Err(RepoError::Validation(
            "User ID must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

pub struct UserRepository<S> {
    source: S,
}

impl<S: ConnectionSource> UserRepository<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Insert a user with a hashed password and return the stored row.
    pub async fn create_user(&self, request: &CreateUserRequest) -> RepoResult<User> {
        validate_email(&request.email)?;
        validate_password(&request.password)?;
        let hash = password::hash_password(&request.password);

        let mut conn = self.source.acquire().await?;
        let res = sqlx::query_as::<_, User>(INSERT_USER)
            .bind(&request.email)
            .bind(&hash)
            .fetch_optional(&mut *conn)
            .await;
        release(conn).await;

        match res {
            Ok(Some(user)) => {
                tracing::info!(user_id = user.user_id, "created user");
                Ok(user)
            }
            Ok(None) => Err(RepoError::NoRowReturned("create user")),
            Err(e) if is_unique_violation(&e) => {
                Err(RepoError::DuplicateEmail(request.email.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn get_user_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        validate_user_id(id)?;

        let mut conn = self.source.acquire().await?;
        let res = sqlx::query_as::<_, User>(SELECT_USER_BY_ID)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await;
        release(conn).await;
        Ok(res?)
    }

    pub async fn get_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        if email.trim().is_empty() {
            return Err(RepoError::Validation(
                "Email address is required".to_string(),
            ));
        }

        let mut conn = self.source.acquire().await?;
        let res = sqlx::query_as::<_, User>(SELECT_USER_BY_EMAIL)
            .bind(email)
            .fetch_optional(&mut *conn)
            .await;
        release(conn).await;
        Ok(res?)
    }

    /// Returns `true` when a row was updated, `false` when no such user exists.
    pub async fn update_user_email(&self, id: UserId, new_email: &str) -> RepoResult<bool> {
        validate_user_id(id)?;
        validate_email(new_email)?;

        let mut conn = self.source.acquire().await?;
        let res = sqlx::query(UPDATE_USER_EMAIL)
            .bind(new_email)
            .bind(id)
            .execute(&mut *conn)
            .await;
        release(conn).await;

        match res {
            Ok(done) => Ok(done.rows_affected() > 0),
            Err(e) if is_unique_violation(&e) => Err(RepoError::DuplicateEmail(new_email.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    /// Look up a user by email and check the password. `None` on unknown email or mismatch.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> RepoResult<Option<User>> {
        let user = self.get_user_by_email(email).await?;
        Ok(user.filter(|u| password::verify_password(password, &u.password_hash)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::testing;

    fn request(email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn validation_message(err: RepoError) -> String {
        match err {
            RepoError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_rejects_bad_email_without_connecting() {
        let src = testing::source();
        let repo = UserRepository::new(src.clone());
        for email in ["invalid-email", "", "   "] {
            let err = repo
                .create_user(&request(email, "testpassword123"))
                .await
                .unwrap_err();
            assert!(validation_message(err).contains("Valid email address is required"));
        }
        assert_eq!(src.calls(), 0);
    }

    #[tokio::test]
    async fn create_rejects_short_password() {
        let src = testing::source();
        let repo = UserRepository::new(src.clone());
        let err = repo
            .create_user(&request("test@example.com", "123"))
            .await
            .unwrap_err();
        assert!(validation_message(err).contains("at least 8 characters"));
        assert_eq!(src.calls(), 0);
    }

    #[tokio::test]
    async fn valid_create_reaches_connection_layer() {
        let src = testing::source();
        let repo = UserRepository::new(src.clone());
        let err = repo
            .create_user(&request("test@example.com", "testpassword123"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Connection(_)));
        assert_eq!(src.calls(), 1);
    }

    #[tokio::test]
    async fn get_by_id_requires_positive_id() {
        let src = testing::source();
        let repo = UserRepository::new(src.clone());
        for id in [0, -1] {
            let err = repo.get_user_by_id(id).await.unwrap_err();
            assert_eq!(validation_message(err), "User ID must be a positive integer");
        }
        assert_eq!(src.calls(), 0);

        let err = repo.get_user_by_id(1).await.unwrap_err();
        assert!(matches!(err, RepoError::Connection(_)));
        assert_eq!(src.calls(), 1);
    }

    #[tokio::test]
    async fn get_by_email_requires_email() {
        let src = testing::source();
        let repo = UserRepository::new(src.clone());
        for email in ["", "   "] {
            let err = repo.get_user_by_email(email).await.unwrap_err();
            assert_eq!(validation_message(err), "Email address is required");
        }
        assert_eq!(src.calls(), 0);

        let err = repo.get_user_by_email("test@example.com").await.unwrap_err();
        assert!(matches!(err, RepoError::Connection(_)));
    }

    #[tokio::test]
    async fn update_email_validates_both_arguments() {
        let src = testing::source();
        let repo = UserRepository::new(src.clone());
        assert!(matches!(
            repo.update_user_email(0, "a@b.c").await,
            Err(RepoError::Validation(_))
        ));
        assert!(matches!(
            repo.update_user_email(3, "nope").await,
            Err(RepoError::Validation(_))
        ));
        assert_eq!(src.calls(), 0);
    }

    #[tokio::test]
    async fn verify_credentials_looks_up_by_email() {
        let src = testing::source();
        let repo = UserRepository::new(src.clone());
        let err = repo.verify_credentials(" ", "testpassword123").await.unwrap_err();
        assert_eq!(validation_message(err), "Email address is required");
        assert_eq!(src.calls(), 0);

        let err = repo
            .verify_credentials("test@example.com", "testpassword123")
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Connection(_)));
        assert_eq!(src.calls(), 1);
    }

    #[test]
    fn duplicate_email_message() {
        let e = RepoError::DuplicateEmail("a@b.c".into());
        assert_eq!(e.to_string(), "a user with email 'a@b.c' already exists");
    }
}
