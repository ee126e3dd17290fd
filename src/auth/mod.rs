pub mod basic;
pub mod gate;
