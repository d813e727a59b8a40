pub mod cart_service;
pub mod passwords;
pub mod product_service;
pub mod user_service;

pub use cart_service::CartService;
pub use product_service::ProductService;
pub use user_service::UserService;

use crate::domain::errors::DomainError;

/// One failed rule is reported as is; several are joined into one message.
fn validation_result(errors: &[&str]) -> Result<(), DomainError> {
    match errors {
        [] => Ok(()),
        [only] => Err(DomainError::invalid(*only)),
        many => Err(DomainError::invalid(format!(
            "{} validation errors: {}",
            many.len(),
            many.join("; ")
        ))),
    }
}
