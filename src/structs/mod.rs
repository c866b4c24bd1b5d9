pub mod respond;
pub mod score;
pub mod upstream;
