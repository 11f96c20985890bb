pub mod health;
pub mod stock;
pub mod task;
