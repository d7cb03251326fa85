//! Consistency warnings raised by multi-step device flows

use crate::error::AppError;

/// Response header carrying consistency warnings of a successful mutation
pub const CONSISTENCY_WARNING_HEADER: &str = "x-consistency-warning";

/// Attribute step that failed after the device mutation already committed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeStep {
    Seed,
    Clear,
}

impl std::fmt::Display for AttributeStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeStep::Seed => f.write_str("seeding default attributes"),
            AttributeStep::Clear => f.write_str("clearing attributes"),
        }
    }
}

/// The device row changed but its attribute set may not match.
/// Not rolled back; reported next to the successful result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsistencyWarning {
    pub device_id: i32,
    pub step: AttributeStep,
    pub message: String,
}

impl ConsistencyWarning {
    pub fn new(device_id: i32, step: AttributeStep, err: &AppError) -> Self {
        Self {
            device_id,
            step,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "device {}: {} failed: {}",
            self.device_id, self.step, self.message
        )
    }
}

/// Result of a flow that may finish with consistency warnings
#[derive(Debug)]
pub struct Outcome<T> {
    pub value: T,
    pub warnings: Vec<ConsistencyWarning>,
}

impl<T> Outcome<T> {
    pub fn is_consistent(&self) -> bool {
        self.warnings.is_empty()
    }
}
