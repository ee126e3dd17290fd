pub mod admin;
pub mod emails;
pub mod health;
pub mod identity;
pub mod subdomains;
pub mod usage;
