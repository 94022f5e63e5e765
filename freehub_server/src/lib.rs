//! # Freehub server
//! This crate hosts the HTTP server for the Freehub marketplace. It is responsible for:
//! * Authenticating requests with bearer access tokens.
//! * Translating requests into calls on the engine's order, notification, gig and review APIs.
//! * Wrapping results and errors in the JSON response envelope.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/orders/...`: Order placement, the order lifecycle and notifications. Authenticated.
//! * `/api/gigs/...`, `/api/reviews`: Gig management and reviews. Authenticated.
//! * `/api/gigs/public/...`, `/api/reviews/{gig_id}`: Public gig and review listings.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
