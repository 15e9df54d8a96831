pub mod health;
pub mod link;
