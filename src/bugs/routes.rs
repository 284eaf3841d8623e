use axum::{
    routing::{get, post},
    Router,
};

use crate::bugs::handlers::{self, BugState};
use crate::store::traits::TrackerStore;

pub fn create_router<S: TrackerStore + 'static>() -> Router<BugState<S>> {
    Router::new()
        .route("/", get(handlers::root))
        // Client surface
        .route("/client/bugs/create", post(handlers::create_bug::<S>))
        // Manager surface
        .route("/manager/client/create", post(handlers::create_client::<S>))
        .route(
            "/manager/employee/create",
            post(handlers::create_employee::<S>),
        )
        .route("/manager/employees", get(handlers::list_employees::<S>))
        .route("/manager/clients", get(handlers::list_clients::<S>))
        .route("/manager/bugs", get(handlers::list_bugs::<S>))
        .route("/manager/bugs/assign", post(handlers::assign_bug::<S>))
        // Employee surface
        .route(
            "/employee/:employee_id/bugs",
            get(handlers::list_employee_bugs::<S>),
        )
        .route(
            "/employee/:employee_id/bugs/completed",
            get(handlers::list_completed_bugs::<S>),
        )
        .route(
            "/employee/:employee_id/bugs/pending",
            get(handlers::list_pending_bugs::<S>),
        )
        .route(
            "/employee/:employee_id/bugs/update",
            post(handlers::update_bug_status::<S>),
        )
        // Forum integration
        .route(
            "/bugs/:bug_id/create-forum-topic",
            post(handlers::create_forum_topic::<S>),
        )
}
