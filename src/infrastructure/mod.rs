pub mod cart_repo;
pub mod models;
pub mod product_repo;
pub mod user_repo;

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use log::debug;

use crate::domain::errors::DomainError;
use crate::domain::ports::{PRODUCT_NOT_FOUND, USER_NOT_FOUND};

pub use cart_repo::DieselCartRepository;
pub use product_repo::DieselProductRepository;
pub use user_repo::DieselUserRepository;

// Constraint names as Postgres derives them from the migration.
fn unique_violation(constraint: Option<&str>) -> DomainError {
    DomainError::conflict(match constraint {
        Some("cart_user_product_unique") => "Product is already in the cart",
        Some("product_name_key") => "A product with this name already exists",
        Some("users_user_name_key") => "This username is already registered",
        Some("users_email_key") => "This email is already registered",
        _ => "Duplicate entry",
    })
}

fn foreign_key_violation(constraint: Option<&str>) -> DomainError {
    DomainError::not_found(match constraint {
        Some("cart_user_id_fkey") => USER_NOT_FOUND,
        Some("cart_product_id_fkey") => PRODUCT_NOT_FOUND,
        _ => "Referenced record not found",
    })
}

fn check_violation(constraint: Option<&str>) -> DomainError {
    DomainError::invalid(match constraint {
        Some("cart_quantity_check") => "Quantity must be at least 1",
        Some("product_price_check") => "Price must be greater than zero",
        Some("users_permission_check") => "Permission must be admin or user",
        _ => "Value is not allowed",
    })
}

/// SQLSTATE 22003 has no dedicated kind in Diesel.
fn is_out_of_range(info: &(dyn DatabaseErrorInformation + Send + Sync)) -> bool {
    info.message().contains("out of range")
}

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        match e {
            DieselError::NotFound => DomainError::not_found("Record not found"),
            DieselError::DatabaseError(kind, info) => {
                debug!("database rejected statement: {}", info.message());
                let constraint = info.constraint_name();
                match kind {
                    DatabaseErrorKind::UniqueViolation => unique_violation(constraint),
                    DatabaseErrorKind::ForeignKeyViolation => foreign_key_violation(constraint),
                    DatabaseErrorKind::CheckViolation => check_violation(constraint),
                    _ if is_out_of_range(&*info) => {
                        DomainError::invalid("Value is out of range")
                    }
                    _ => DomainError::Storage(info.message().to_string()),
                }
            }
            other => DomainError::Storage(other.to_string()),
        }
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Storage(e.to_string())
    }
}
