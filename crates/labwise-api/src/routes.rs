pub mod export;
pub mod health;
pub mod interpret;
pub mod reports;
