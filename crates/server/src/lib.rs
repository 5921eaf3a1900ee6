pub mod auth;
pub mod config;
pub mod doc;
pub mod dtos;
pub mod error;
pub mod routes;
pub mod state;
pub mod utils;

use crate::{
    auth::{Role, StaffClaims, require_role},
    doc::ApiDoc,
    routes::{
        dashboard, enrollment, grade, health, material, prerequisite, root, section, student,
        timetable,
    },
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the HTTP application.
///
/// Every route except `/`, `/health` and the docs requires the staff role.
/// `resource_server` validates bearer tokens and places [`StaffClaims`] in the
/// request; without it the claims must be supplied by an outer layer.
pub fn app(state: AppState, resource_server: Option<OAuth2ResourceServer<StaffClaims>>) -> Router {
    let mut staff = Router::new()
        .route(
            "/sections",
            get(section::list_sections).post(section::create_section),
        )
        .route(
            "/sections/{id}",
            put(section::update_section).delete(section::delete_section),
        )
        .route(
            "/students",
            get(student::list_students).post(student::create_student),
        )
        .route(
            "/students/{id}",
            get(student::get_student)
                .put(student::update_student)
                .delete(student::delete_student),
        )
        .route("/students/{id}/grades", post(student::apply_grades))
        .route("/students/{id}/downloads", post(student::register_materials))
        .route(
            "/materials",
            get(material::list_materials).post(material::create_material),
        )
        .route(
            "/materials/{id}",
            get(material::get_material)
                .put(material::update_material)
                .delete(material::delete_material),
        )
        .route("/grades", get(grade::list_grades).post(grade::record_grade))
        .route("/downloads", get(enrollment::list_enrollments))
        .route("/downloads/{id}", delete(enrollment::remove_enrollment))
        .route(
            "/prerequisites",
            get(prerequisite::list_prerequisites).post(prerequisite::assign_prerequisites),
        )
        .route("/timetable", get(timetable::get_timetable))
        .route("/timetable/lectures", post(timetable::place_lecture))
        .route(
            "/timetable/lectures/{id}",
            delete(timetable::remove_lecture),
        )
        .route("/dashboard", get(dashboard::dashboard))
        .route_layer(middleware::from_fn_with_state(Role::Staff, require_role));

    if let Some(resource_server) = resource_server {
        staff = staff.route_layer(resource_server.into_layer());
    }

    Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .merge(staff)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(CompressionLayer::new()))
        .with_state(state)
}
