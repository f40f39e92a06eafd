//! User service
//!
//! Account creation and lookup. Authentication happens outside this crate;
//! every other service receives an already-resolved user id.

use tracing::{info, instrument};
use validator::Validate;
use vidshare_core::entities::User;
use vidshare_core::{DomainError, Snowflake};

use crate::dto::{CreateUserRequest, UserResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create an account with no channels and no subscriptions
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_user(&self, request: CreateUserRequest) -> ServiceResult<UserResponse> {
        request.validate()?;

        let mut user = User::new(
            self.ctx.generate_id(),
            request.username,
            request.email.to_lowercase(),
        );
        user.avatar = request.avatar;

        self.ctx.user_repo().create(&user).await?;

        info!(user_id = %user.id, "User created");
        Ok(UserResponse::from(&user))
    }

    /// Get user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<UserResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        Ok(UserResponse::from(&user))
    }
}
