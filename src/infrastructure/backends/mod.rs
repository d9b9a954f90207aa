pub mod docmind;
#[cfg(test)]
pub mod fake;

use std::sync::Arc;

use crate::domain::models::BackendArc;

pub struct BackendManager {}

impl BackendManager {
    pub fn get() -> BackendArc {
        return Arc::new(docmind::DocMind::default());
    }
}
