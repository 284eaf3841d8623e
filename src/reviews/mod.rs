pub mod auth;
pub mod handlers;
pub mod model;
pub mod routes;

pub use handlers::ReviewState;
pub use routes::create_router;
