//! Account registration, login and credit top-ups.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{NewUser, Role, User};
use crate::money::Money;
use crate::password::{check_password, new_encoded_password};
use crate::ports::{CoreError, RepositoryError, SettingsRepository, UserRepository};

/// Service for user accounts.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    settings: Arc<dyn SettingsRepository>,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(users: Arc<dyn UserRepository>, settings: Arc<dyn SettingsRepository>) -> Self {
        Self { users, settings }
    }

    /// Register a new account.
    ///
    /// Clients start with the configured starting credit, deliverymen and
    /// restaurants with zero, admins with no credit at all. An admin account
    /// can only be created by another admin, except for the very first one.
    pub async fn register(&self, actor: Option<&User>, new_user: NewUser) -> Result<User, CoreError> {
        new_user.validate()?;

        if new_user.role == Role::Admin && !actor.is_some_and(|a| a.is(Role::Admin)) {
            let admins = self.users.count_by_role(Role::Admin).await?;
            if admins > 0 {
                return Err(CoreError::denied("only an admin can create admin accounts"));
            }
        }

        let credit = match new_user.role {
            Role::Admin => None,
            Role::Client => Some(self.settings.load().await?.effective_client_starting_credit()),
            Role::Restaurant | Role::Deliveryman => Some(Money::ZERO),
        };

        let user = User {
            username: new_user.username.trim().to_string(),
            password_hash: new_encoded_password(&new_user.password),
            profile: new_user.profile,
            role: new_user.role,
            credit,
        };

        self.users.insert(&user).await.map_err(|e| match e {
            RepositoryError::AlreadyExists(_) => {
                CoreError::Validation(format!("User '{}' already exists", user.username))
            }
            other => other.into(),
        })?;

        info!(username = %user.username, role = %user.role, "Registered user");
        Ok(user)
    }

    /// Check credentials and return the account.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, CoreError> {
        let user = match self.users.get(username).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound(_)) => {
                warn!(username, "Login attempt for unknown user");
                return Err(CoreError::Authentication);
            }
            Err(e) => return Err(e.into()),
        };

        if check_password(password, &user.password_hash)? {
            Ok(user)
        } else {
            warn!(username, "Login attempt with wrong password");
            Err(CoreError::Authentication)
        }
    }

    /// Get a user by username, returning `None` if it does not exist.
    pub async fn get(&self, username: &str) -> Result<Option<User>, CoreError> {
        match self.users.get(username).await {
            Ok(user) => Ok(Some(user)),
            Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Show an account. Users see themselves; admins see everyone.
    pub async fn show(&self, actor: &User, username: &str) -> Result<User, CoreError> {
        if actor.username != username && !actor.is(Role::Admin) {
            return Err(CoreError::denied("you can only view your own account"));
        }
        Ok(self.users.get(username).await?)
    }

    /// List accounts (admin only).
    pub async fn list(&self, actor: &User, role: Option<Role>) -> Result<Vec<User>, CoreError> {
        if !actor.is(Role::Admin) {
            return Err(CoreError::denied("only an admin can list users"));
        }
        Ok(self.users.list(role).await?)
    }

    /// Add credit to a client account and return the new balance.
    pub async fn top_up(&self, actor: &User, amount: Money) -> Result<Money, CoreError> {
        if !actor.is(Role::Client) {
            return Err(CoreError::denied("only clients can top up credit"));
        }
        if !amount.is_positive() {
            return Err(CoreError::Validation("Top-up amount must be positive".into()));
        }
        let balance = self.users.adjust_credit(&actor.username, amount).await?;
        info!(username = %actor.username, %amount, %balance, "Topped up credit");
        Ok(balance)
    }

    /// Change the signed-in user's password.
    pub async fn change_password(
        &self,
        actor: &User,
        current: &str,
        new_password: &str,
    ) -> Result<(), CoreError> {
        let stored = self.users.get(&actor.username).await?;
        if !check_password(current, &stored.password_hash)? {
            return Err(CoreError::Authentication);
        }
        if new_password.chars().count() < NewUser::MIN_PASSWORD_LEN {
            return Err(CoreError::Validation(format!(
                "Password must be at least {} characters",
                NewUser::MIN_PASSWORD_LEN
            )));
        }
        let hash = new_encoded_password(new_password);
        self.users.update_password(&actor.username, &hash).await?;
        info!(username = %actor.username, "Changed password");
        Ok(())
    }

    /// Delete an account created moments ago, after a later step failed.
    pub(crate) async fn discard(&self, username: &str) {
        if let Err(e) = self.users.delete(username).await {
            warn!(username, error = %e, "Failed to remove partially registered user");
        }
    }
}
