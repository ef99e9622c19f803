//! Schema types for insitu
//!
//! Wire names match the backend's column names so rows round-trip through
//! the record store unchanged.

mod assignment;
mod config;
mod delivery;
mod notification;
mod profile;
mod request;
mod worksite;

pub use assignment::{AssignmentStatus, AssignmentType, Priority, WorkAssignment};
pub use config::{Config, FetchLimits, ImagePolicy, StoreBackend};
pub use delivery::{Delivery, DeliveryStatus};
pub use notification::{kinds, NewNotification, Notification};
pub use profile::{PermissionLevel, Role, UserProfile, ALL_ROLES, WORKER_ROLES};
pub use request::{RequestStatus, WarehouseRequest};
pub use worksite::WorkSite;
