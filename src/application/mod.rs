pub mod aggregate;
pub mod fallback;
pub mod finbert;
pub mod hybrid;
