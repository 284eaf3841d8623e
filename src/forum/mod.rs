pub mod handlers;
pub mod model;
pub mod routes;

pub use handlers::ForumState;
pub use routes::create_router;
