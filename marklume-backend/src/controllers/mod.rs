pub mod admin;
pub mod articles;
pub mod health;
