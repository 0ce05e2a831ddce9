use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;

use pulse_core::models::{Role, User};
use pulse_core::repository::UserRepository;
use pulse_core::{RepositoryError, RepositoryResult};

use crate::database::map_db_err;

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
}

impl UserRow {
    fn into_user(self) -> RepositoryResult<User> {
        let role =
            Role::from_str(&self.role).map_err(|e| RepositoryError::Database(e.to_string()))?;
        Ok(User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role,
        })
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> RepositoryResult<User> {
        let result =
            sqlx::query("INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?)")
                .bind(name)
                .bind(email)
                .bind(password_hash)
                .bind(role.as_str())
                .execute(&self.pool)
                .await
                .map_err(map_db_err)?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
        })
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)?;

        row.map(UserRow::into_user).transpose()
    }
}
