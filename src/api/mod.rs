//! HTTP endpoint that receives Telegram bot updates.
//!
//! # API Endpoints
//!
//! ## `/healthcheck` (GET)
//!
//!   Returns HTTP 200 (OK) and the JSON body `{"ok":"healthy"}` when the service is operational.
//!
//! ## `/webhook` (GET)
//!
//!   Returns HTTP 200 (OK) and a short plain text liveness message. Handy for checking the
//!   deployment from a browser before calling Telegram's `setWebhook`.
//!
//! ## `/webhook` (POST)
//!
//!   Expects a Telegram [`Update`][crate::telegram::Update] JSON body; the `Content-Type`
//!   header is not checked. The update is handled to completion and the endpoint always
//!   answers HTTP 200 (OK) with the body `OK`, whatever the outcome, so Telegram never
//!   redelivers it. JSON of an unexpected shape is acknowledged the same way and dropped.
//!   Only bodies that aren't JSON at all are answered with HTTP 400 (Bad Request).
//!
//!   Any other method on `/webhook`, `HEAD` included, gets HTTP 405 (Method Not Allowed),
//!   and unknown paths HTTP 404 (Not Found).

mod api_error;
mod routes;
pub mod server;

pub use server::{app, new};
