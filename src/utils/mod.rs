pub mod audit;
pub mod errors;
pub mod jwt;
pub mod notify;
pub mod pagination;
