// --- File: crates/services/slotbook_backend/src/lib.rs ---
pub mod app;
