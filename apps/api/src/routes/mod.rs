pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::auth::middleware::authenticate;
use crate::job_description::handlers as job_description;
use crate::profile::handlers as profile;
use crate::resume::handlers as resumes;
use crate::resume::parser::MAX_UPLOAD_BYTES;
use crate::sections::{education, experience, skills};
use crate::state::AppState;
use crate::users;

pub fn build_router(state: AppState) -> Router {
    // Everything behind the session middleware.
    let protected = Router::new()
        .route("/api/auth/verify", get(auth::verify))
        .route("/api/auth/update-password", post(auth::update_password))
        // Account
        .route(
            "/api/users/me",
            get(users::get_me)
                .patch(users::update_me)
                .delete(users::delete_me),
        )
        // Profile document: single JSONB row per user, edited by array index
        .route(
            "/api/profile",
            get(profile::get_profile).post(profile::upsert_profile),
        )
        .route("/api/profile/education", post(profile::add_education))
        .route(
            "/api/profile/education/:index",
            patch(profile::update_education).delete(profile::delete_education),
        )
        .route("/api/profile/experience", post(profile::add_experience))
        .route(
            "/api/profile/experience/:index",
            patch(profile::update_experience).delete(profile::delete_experience),
        )
        .route("/api/profile/skills", post(profile::add_skill))
        .route(
            "/api/profile/skills/:index",
            patch(profile::update_skill).delete(profile::delete_skill),
        )
        // Normalized resume sections (relational tables)
        .route("/api/resume/personal-info", patch(users::update_me))
        .route(
            "/api/resume/experience",
            get(experience::list).post(experience::add),
        )
        .route(
            "/api/resume/experience/:id",
            patch(experience::update).delete(experience::delete),
        )
        .route(
            "/api/resume/education",
            get(education::list).post(education::add),
        )
        .route("/api/resume/education/:id", delete(education::delete))
        .route(
            "/api/resume/skills",
            get(skills::get).post(skills::merge).put(skills::replace),
        )
        .route(
            "/api/resume/skills/:category/:name",
            delete(skills::delete_one),
        )
        // Resumes
        .route("/api/resumes", post(resumes::create).get(resumes::list))
        .route(
            "/api/resumes/generate",
            post(resumes::generate),
        )
        .route(
            "/api/resumes/parse",
            post(resumes::parse).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::get).delete(resumes::delete),
        )
        // Job descriptions
        .route(
            "/api/job-description",
            post(job_description::create).get(job_description::list),
        )
        .route(
            "/api/job-description/:id",
            get(job_description::get).delete(job_description::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/health", get(health::health_handler))
        // Session endpoints stay public
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", get(auth::logout))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/verify-reset-code", post(auth::verify_reset_code))
        .route("/api/auth/reset-password", post(auth::reset_password))
        .merge(protected)
        .with_state(state)
}
