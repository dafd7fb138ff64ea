//! Deployment and submission tooling for `SkrybeFactory`.

pub mod chain;
pub mod config;
pub mod deployments;
