//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{User, UserCreate, UserUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY name")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record_id = parse_record_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(record_id).await?;
        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Register a new user. The raw password is hashed here and never
    /// persisted; a duplicate email is rejected.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if self.find_by_email(&data.email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                data.email
            )));
        }

        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;

        let user = User {
            id: None,
            name: data.name,
            email: data.email,
            password_hash,
            phone: data.phone.unwrap_or_default(),
            is_admin: data.is_admin.unwrap_or(false),
            street: data.street.unwrap_or_default(),
            apartment: data.apartment.unwrap_or_default(),
            zip: data.zip.unwrap_or_default(),
            city: data.city.unwrap_or_default(),
            country: data.country.unwrap_or_default(),
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update a user. A supplied password is re-hashed; otherwise the
    /// stored hash is kept.
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let record_id = parse_record_id(TABLE, id)?;

        let password_hash = match &data.password {
            Some(password) => Some(
                User::hash_password(password)
                    .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?,
            ),
            None => None,
        };

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() { set_parts.push("name = $name"); }
        if data.email.is_some() { set_parts.push("email = $email"); }
        if password_hash.is_some() { set_parts.push("password_hash = $password_hash"); }
        if data.phone.is_some() { set_parts.push("phone = $phone"); }
        if data.is_admin.is_some() { set_parts.push("is_admin = $is_admin"); }
        if data.street.is_some() { set_parts.push("street = $street"); }
        if data.apartment.is_some() { set_parts.push("apartment = $apartment"); }
        if data.zip.is_some() { set_parts.push("zip = $zip"); }
        if data.city.is_some() { set_parts.push("city = $city"); }
        if data.country.is_some() { set_parts.push("country = $country"); }

        if set_parts.is_empty() {
            return self
                .find_by_id(id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("User {}", id)));
        }

        let query_str = format!("UPDATE $id SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self.base.db().query(query_str).bind(("id", record_id));
        if let Some(v) = data.name { query = query.bind(("name", v)); }
        if let Some(v) = data.email { query = query.bind(("email", v)); }
        if let Some(v) = password_hash { query = query.bind(("password_hash", v)); }
        if let Some(v) = data.phone { query = query.bind(("phone", v)); }
        if let Some(v) = data.is_admin { query = query.bind(("is_admin", v)); }
        if let Some(v) = data.street { query = query.bind(("street", v)); }
        if let Some(v) = data.apartment { query = query.bind(("apartment", v)); }
        if let Some(v) = data.zip { query = query.bind(("zip", v)); }
        if let Some(v) = data.city { query = query.bind(("city", v)); }
        if let Some(v) = data.country { query = query.bind(("country", v)); }

        let mut result = query.await?;
        let users: Vec<User> = result.take(0)?;

        users
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {}", id)))
    }

    /// Hard delete a user
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let record_id = parse_record_id(TABLE, id)?;
        let deleted: Option<User> = self.base.db().delete(record_id).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("User {}", id)));
        }
        Ok(())
    }

    /// Total user count
    pub async fn count(&self) -> RepoResult<i64> {
        self.base.count(TABLE).await
    }
}
