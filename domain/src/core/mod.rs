//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level validation errors
//! - [`string::truncate`]: display helper

pub mod error;
pub mod string;
