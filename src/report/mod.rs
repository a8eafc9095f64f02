pub mod comparison;
pub mod export;
pub mod json;
pub mod text;
