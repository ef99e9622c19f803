//! insitu - Delivery lifecycle and role-gated authorization for construction logistics
//!
//! This library provides the core functionality for the insitu CLI, including:
//! - Schema definitions for profiles, deliveries, requests, assignments and work sites
//! - The workflow and authorization engine (transitions, visibility, stats)
//! - Record-store, identity and object-storage collaborators
//! - The coordinator service that wires them together

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fs;
pub mod identity;
pub mod schemas;
pub mod service;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use errors::{InsituError, Result};
pub use schemas::{Config, Delivery, DeliveryStatus, Role, UserProfile, WarehouseRequest, WorkAssignment};
pub use service::{Coordinator, DashboardSnapshot};
