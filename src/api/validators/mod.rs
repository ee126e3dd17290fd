pub mod email;
pub mod label;
