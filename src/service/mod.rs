pub mod health;
pub mod score;
