//! # Frage EDU API
//!
//! A REST API built with Rust, Axum, and PostgreSQL that drives school
//! admission workflows: a flow catalog of ordered enrollment steps, a
//! per-student progress record advanced by domain events, and branch-scoped
//! role-based access control for administrators.
//!
//! ## Overview
//!
//! - **Enrollment Flows**: Named, ordered step sequences per branch and
//!   program type (seminar, forms, payments, consent, enrollment)
//! - **Flow Events**: An append-only event log; completion, payment, and
//!   placement events advance the student's progress record
//! - **Access Control**: Admin roles with branch defaults, per-admin branch
//!   assignments, and per-admin permission overrides on a seeded catalog
//! - **Student Listings**: Admin listings filtered to the caller's allowed
//!   branches, with the caller's own access echoed back
//! - **Dashboard**: Per-student card aggregation (progress, exam, placement,
//!   billing, homework, notices, guides)
//!
//! ## Architecture
//!
//! The codebase follows a modular architecture inspired by NestJS:
//!
//! ```text
//! src/
//! ├── config/           # Configuration modules (JWT, database, CORS)
//! ├── middleware/       # Auth extractors (parent and admin principals)
//! ├── modules/          # Feature modules
//! │   ├── flows/       # Flow catalog and bootstrap
//! │   ├── progress/    # Per-student enrollment progress
//! │   ├── events/      # Flow event log and transition processing
//! │   ├── rbac/        # Roles, branches, permission catalog
//! │   ├── students/    # Branch-filtered student listings
//! │   └── dashboard/   # Per-student dashboard aggregation
//! └── utils/           # Shared utilities (errors, JWT, audit, pagination)
//! ```
//!
//! Each feature module follows a consistent structure:
//!
//! - `mod.rs`: Module exports
//! - `controller.rs`: HTTP handlers (routes)
//! - `service.rs`: Business logic
//! - `model.rs`: Data models, DTOs, database structs
//! - `router.rs`: Axum router configuration
//!
//! ## Authentication
//!
//! Two principal kinds share one JWT scheme:
//!
//! - **Parent tokens** carry a `household_token` and may only touch students
//!   in their own household
//! - **Admin tokens** carry a role; visibility is resolved per request from
//!   role defaults, branch assignments, and permission overrides
//!
//! ### API Documentation
//!
//! When the server is running, API documentation is available at:
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
