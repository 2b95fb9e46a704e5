// Middleware modules

pub mod admission;
pub mod cors;

pub use admission::{admission_middleware, gate_for, AdmissionGate, SessionGate, SignatureGate};
pub use cors::cors_layer;
