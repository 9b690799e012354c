//! # Staff Directory
//!
//! User lookup for the acting user, and admin-only account creation.

use std::sync::Arc;
use tracing::info;

use crate::error::DbResult;
use crate::store::PersistenceStore;
use hotel_core::validation::validate_username;
use hotel_core::{CoreError, Role, User};

#[derive(Clone)]
pub struct StaffDirectory {
    store: Arc<dyn PersistenceStore>,
}

impl StaffDirectory {
    pub fn new(store: Arc<dyn PersistenceStore>) -> Self {
        StaffDirectory { store }
    }

    pub async fn find_user(&self, username: &str) -> DbResult<Option<User>> {
        self.store.find_user(username).await
    }

    /// Creates an account. Only admins may do this.
    pub async fn add_user(&self, actor: &User, username: &str, role: Role) -> DbResult<User> {
        actor.require_admin("Adding users")?;
        validate_username(username).map_err(CoreError::from)?;

        let user = User::new(username, role);
        self.store.insert_user(&user).await?;

        info!(username, role = %role, by = %actor.username, "User added");
        Ok(user)
    }
}
