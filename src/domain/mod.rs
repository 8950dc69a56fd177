pub mod aqi;
pub mod health;
