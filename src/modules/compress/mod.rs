use crate::state::AppState;
use axum::Router;
use axum::routing::post;

pub mod animation;
pub mod artifacts;
pub mod handler;
pub mod model;
pub mod profile;
pub mod service;
pub mod still_image;
#[cfg(test)]
mod testing;
pub mod video;

pub fn router() -> Router<AppState> {
    Router::new().route("/compress", post(handler::compress))
}
