//! Shared HTTP adapter state.
//!
//! Page handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{PageInvalidations, UserActions};

/// Dependency bundle for page handlers.
#[derive(Clone)]
pub struct HttpState {
    pub actions: Arc<dyn UserActions>,
    pub invalidations: Arc<dyn PageInvalidations>,
}

impl HttpState {
    pub fn new(actions: Arc<dyn UserActions>, invalidations: Arc<dyn PageInvalidations>) -> Self {
        Self {
            actions,
            invalidations,
        }
    }
}
