use std::sync::Arc;

use log::info;

use super::passwords::{hash_password, verify_password};
use super::validation_result;
use crate::domain::cart::UserId;
use crate::domain::errors::DomainError;
use crate::domain::ports::{UserRepository, USER_NOT_FOUND};
use crate::domain::user::{Credentials, NewUser, Registration, Role, User};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Self-service sign-up. Accounts are always created with the `user`
    /// role.
    pub fn register(&self, registration: Registration) -> Result<User, DomainError> {
        validate_registration(&registration)?;

        let user = self.repo.create_user(NewUser {
            password_hash: hash_password(&registration.password)?,
            user_name: registration.user_name,
            email: registration.email,
            full_name: registration.full_name,
            phone_number: registration.phone_number,
            permission: Role::User,
        })?;
        info!("registered user {} ({})", user.id, user.user_name);
        Ok(user)
    }

    /// Checks a login and returns the account's id and role.
    pub fn authenticate(&self, credentials: &Credentials) -> Result<(UserId, Role), DomainError> {
        let login = credentials.user_name_or_email.trim();
        if login.is_empty() {
            return Err(DomainError::invalid("Username or email is required"));
        }
        if credentials.password.is_empty() {
            return Err(DomainError::invalid("Password is required"));
        }

        let stored = self
            .repo
            .find_credentials(login)?
            .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND))?;

        if !verify_password(&stored.password_hash, &credentials.password)? {
            return Err(DomainError::Unauthorized("Incorrect password.".to_string()));
        }
        Ok((stored.id, stored.permission))
    }

    pub fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repo.list_users()
    }

    pub fn get(&self, id: UserId) -> Result<User, DomainError> {
        self.repo.user_by_id(id)
    }

    pub fn delete(&self, id: UserId) -> Result<(), DomainError> {
        self.repo.delete_user(id)?;
        info!("deleted user {id}");
        Ok(())
    }
}

fn validate_registration(r: &Registration) -> Result<(), DomainError> {
    let mut errors = Vec::new();

    let mut name = r.user_name.chars();
    let well_formed = name.next().is_some_and(|c| c.is_ascii_alphabetic())
        && name.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !well_formed {
        errors.push("Username must start with a letter and contain only letters, digits and underscores");
    } else if !(5..=50).contains(&r.user_name.len()) {
        errors.push("Username must be between 5 and 50 characters");
    }

    let password = r.password.as_str();
    if !(6..=128).contains(&password.chars().count()) {
        errors.push("Password must be between 6 and 128 characters");
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain an uppercase letter");
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain a lowercase letter");
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain a digit");
    }

    if !is_email(&r.email) {
        errors.push("Please enter a valid email");
    }

    if !(2..=100).contains(&r.full_name.trim().chars().count()) {
        errors.push("Full name must be between 2 and 100 characters");
    }

    if !is_phone_number(&r.phone_number) {
        errors.push("Phone number must start with 09 and be 11 digits");
    }

    validation_result(&errors)
}

fn is_email(value: &str) -> bool {
    if value.len() > 254 || value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    }
}

fn is_phone_number(value: &str) -> bool {
    value.len() == 11 && value.starts_with("09") && value.bytes().all(|b| b.is_ascii_digit())
}
