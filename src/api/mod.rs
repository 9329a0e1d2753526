/*
 * Responsibility
 * - HTTP 層の公開ポイント (routes() の re-export)
 */
pub mod handlers;
pub mod response;
mod routes;

pub use routes::routes;
