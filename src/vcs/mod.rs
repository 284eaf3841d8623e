pub mod handlers;
pub mod model;
pub mod repo;
pub mod routes;

pub use handlers::VcsState;
pub use repo::{GitBackend, MergeOutcome, VcsError};
pub use routes::create_router;
