use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::user::{CreateUserRequest, UserFilter};
use crate::error::{Result, StorageError};
use crate::models::User;

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List users by name, optionally only one role
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let mut query =
            QueryBuilder::<Postgres>::new("SELECT id, email, name, role, created_at FROM users");

        if let Some(ref role) = filter.role {
            query.push(" WHERE role = ");
            query.push_bind(role.clone());
        }

        query.push(" ORDER BY name, email");

        let users = query.build_query_as::<User>().fetch_all(self.pool).await?;

        Ok(users)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    pub async fn create(&self, req: &CreateUserRequest) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(req.email.trim().to_lowercase())
        .bind(req.name.trim())
        .bind(&req.role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| StorageError::on_unique_violation(e, "Email already exists"))?;

        Ok(user)
    }
}
