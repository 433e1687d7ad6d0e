pub mod controller;
pub mod model;
pub mod resolver;
pub mod router;
pub mod service;
