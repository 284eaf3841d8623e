pub mod analyzer;
pub mod generators;
pub mod handlers;
pub mod routes;
pub mod visualizer;

pub use handlers::ModelState;
pub use routes::create_router;
