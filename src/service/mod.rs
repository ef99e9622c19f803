//! Coordinator service wiring the domain engine to its collaborators

mod cache;
mod coordinator;


pub use cache::DashboardCache;
pub use coordinator::{
    Coordinator, DashboardSnapshot, ImageUpload, NewDelivery, NewRequest, NewWorkSite, WorkerPick,
};
