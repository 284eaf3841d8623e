pub mod handlers;
pub mod model;
pub mod routes;

pub use handlers::BugState;
pub use routes::create_router;
