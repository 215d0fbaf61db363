pub mod dashboard;
pub mod resource;

pub use dashboard::{DashboardKpis, load_dashboard};
pub use resource::{EntityService, ListParams};
