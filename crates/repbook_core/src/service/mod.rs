//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs: weekly volume
//!   aggregation and backup export/restore.
//! - Keep calling layers decoupled from storage details.

pub mod backup_service;
pub mod volume_service;
