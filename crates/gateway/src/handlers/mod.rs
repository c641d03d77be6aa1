//! API handlers module

pub mod fact_check;
pub mod health;
