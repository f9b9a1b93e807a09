// --- File: crates/slotbook_gcal/src/lib.rs ---
pub mod auth;
pub mod doc;
pub mod handlers;
pub mod routes;
pub mod service;
