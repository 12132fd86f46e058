// --- File: crates/services/meetslot_backend/src/lib.rs ---
pub mod app;
pub mod cli;
pub mod service_factory;
