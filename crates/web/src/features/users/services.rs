use sqlx::PgPool;
use storage::{
    dto::user::{CreateUserRequest, UserFilter},
    error::Result,
    models::User,
    repository::user::UserRepository,
};
use uuid::Uuid;

pub async fn list_users(pool: &PgPool, filter: &UserFilter) -> Result<Vec<User>> {
    let repo = UserRepository::new(pool);
    repo.list(filter).await
}

pub async fn get_user(pool: &PgPool, id: Uuid) -> Result<User> {
    let repo = UserRepository::new(pool);
    repo.find_by_id(id).await
}

pub async fn create_user(pool: &PgPool, request: &CreateUserRequest) -> Result<User> {
    let repo = UserRepository::new(pool);
    let user = repo.create(request).await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User created");

    Ok(user)
}
