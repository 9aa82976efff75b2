//! Infrastructure layer module
//!
//! This module contains the in-process implementations and plumbing:
//! - Text chunking, hashed embeddings and the in-memory vector backend
//! - Configuration management
//! - Logging infrastructure
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod logging;
pub mod vector;
