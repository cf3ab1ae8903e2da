pub mod fallback;
pub mod health;
pub mod providers;
pub mod root;
