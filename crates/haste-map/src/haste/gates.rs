use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::{HasteError, Result};
use crate::types::DescriptorKind;

/// One single-slot gate per descriptor kind.
///
/// Module processing and package processing are each totally ordered, but
/// the two kinds never wait on each other.
#[derive(Debug, Clone)]
pub struct ProcessingGates {
    pub module: Arc<Semaphore>,
    pub package: Arc<Semaphore>,
}

impl Default for ProcessingGates {
    fn default() -> Self {
        Self {
            module: Arc::new(Semaphore::new(1)),
            package: Arc::new(Semaphore::new(1)),
        }
    }
}

impl ProcessingGates {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, kind: DescriptorKind) -> Result<OwnedSemaphorePermit> {
        let gate = match kind {
            DescriptorKind::Module => &self.module,
            DescriptorKind::Package => &self.package,
        };
        gate.clone()
            .acquire_owned()
            .await
            .map_err(|_| HasteError::GateClosed)
    }
}
