//! Attendance Router

use crate::application::config::AttendanceConfig;
use crate::domain::clock::{Clock, SystemClock};
use crate::infra::json_file::JsonFileCatalog;
use crate::infra::memory::MemoryAttendanceStore;
use crate::presentation::handlers::{
    self, AttendanceAppState, AttendanceStore, ReferenceCatalog,
};
use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;

/// Create the attendance router with the in-memory store and file catalog
pub fn attendance_router(catalog: JsonFileCatalog, config: AttendanceConfig) -> Router {
    attendance_router_generic(
        MemoryAttendanceStore::new(),
        catalog,
        Arc::new(SystemClock),
        config,
    )
}

/// Create a generic attendance router for any repository implementation
pub fn attendance_router_generic<S, C>(
    store: S,
    catalog: C,
    clock: Arc<dyn Clock>,
    config: AttendanceConfig,
) -> Router
where
    S: AttendanceStore,
    C: ReferenceCatalog,
{
    let state = AttendanceAppState::new(store, catalog, clock, config);

    Router::new()
        .route("/generate_qr", post(handlers::generate_qr::<S, C>))
        .route("/attend", post(handlers::attend::<S, C>))
        .route("/scan", post(handlers::scan::<S, C>))
        .route("/scan_status", get(handlers::scan_status::<S, C>))
        .route("/attendance", get(handlers::list_attendance::<S, C>))
        .route("/export_excel", get(handlers::export_excel::<S, C>))
        .route(
            "/classes",
            get(handlers::list_classes::<S, C>).post(handlers::create_class::<S, C>),
        )
        .route("/classes/{id}", delete(handlers::delete_class::<S, C>))
        .route(
            "/timetables",
            get(handlers::list_timetables::<S, C>).post(handlers::create_timetable::<S, C>),
        )
        .route(
            "/timetables/{id}",
            delete(handlers::delete_timetable::<S, C>),
        )
        .with_state(state)
}
