use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::BoardError, model::Position};

/// Where the device position comes from.
#[async_trait]
pub trait LocationSource: Send + Sync + Debug {
    /// Fails with [`BoardError::PermissionDenied`] when the user declines.
    async fn current_position(&self) -> Result<Position, BoardError>;
}

/// A position known up front (command-line flags or the configured home).
/// `None` behaves like a declined permission prompt.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Option<Position>);

#[async_trait]
impl LocationSource for FixedLocation {
    async fn current_position(&self) -> Result<Position, BoardError> {
        self.0.ok_or(BoardError::PermissionDenied)
    }
}
