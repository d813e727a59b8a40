pub mod cart;
pub mod errors;
pub mod ports;
pub mod product;
pub mod user;
