pub mod dashboard;
pub mod events;
pub mod flows;
pub mod progress;
pub mod rbac;
pub mod students;
