use std::sync::Arc;

use log::info;

use super::validation_result;
use crate::domain::cart::ProductId;
use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product, ProductChanges, ProductFields};

const IMAGE_EXTENSIONS: [&str; 6] = ["jpeg", "jpg", "gif", "png", "webp", "svg"];

#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub fn list(&self) -> Result<Vec<Product>, DomainError> {
        self.repo.list()
    }

    pub fn get(&self, id: ProductId) -> Result<Product, DomainError> {
        self.repo.get_by_id(id)
    }

    pub fn create(&self, new: NewProduct) -> Result<Product, DomainError> {
        let fields = ProductFields::from(new);
        validate(&fields)?;
        let product = self.repo.create(fields)?;
        info!("created product {} ({})", product.id, product.name);
        Ok(product)
    }

    /// Applies only the provided fields. Fails when the result is identical
    /// to what is stored.
    pub fn update(&self, id: ProductId, changes: ProductChanges) -> Result<Product, DomainError> {
        let current = ProductFields::of(&self.repo.get_by_id(id)?);
        let merged = current.merge(changes);
        if merged == current {
            return Err(DomainError::invalid("Enter new information."));
        }
        validate(&merged)?;
        self.repo.update(id, merged)
    }

    pub fn delete(&self, id: ProductId) -> Result<(), DomainError> {
        self.repo.delete(id)?;
        info!("deleted product {id}");
        Ok(())
    }
}

fn validate(fields: &ProductFields) -> Result<(), DomainError> {
    let mut errors = Vec::new();

    let name_len = fields.name.chars().count();
    if !(2..=100).contains(&name_len) {
        errors.push("Product name must be between 2 and 100 characters");
    } else if !fields
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c.is_whitespace())
    {
        errors.push("Product name may only contain letters, digits and spaces");
    }

    if fields.price <= 0 {
        errors.push("Price must be greater than zero");
    }

    if let Some(title) = &fields.short_title {
        if !(2..=100).contains(&title.chars().count()) {
            errors.push("Short title must be between 2 and 100 characters");
        }
    }

    if let Some(description) = &fields.description {
        if !(5..=500).contains(&description.chars().count()) {
            errors.push("Description must be between 5 and 500 characters");
        }
    }

    if let Some(address) = &fields.image_address {
        if !is_image_address(address) {
            errors.push("Image address must be a URL, an absolute path or an image file name");
        }
    }

    validation_result(&errors)
}

fn is_image_address(address: &str) -> bool {
    let is_url = ["http://", "https://"]
        .iter()
        .any(|scheme| address.len() > scheme.len() && address.starts_with(scheme));
    let is_path = address.len() > 1 && address.starts_with('/');
    let has_image_extension = address
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    is_url || is_path || has_image_extension
}
