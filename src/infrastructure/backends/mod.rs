pub mod huggingface;

use std::sync::Arc;

use crate::domain::models::BackendRef;

pub struct BackendManager {}

impl BackendManager {
    pub fn get() -> BackendRef {
        return Arc::<huggingface::HuggingFace>::default();
    }
}
