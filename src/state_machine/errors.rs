use thiserror::Error;

use super::states::ContractStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    #[error("Contract has already been signed")]
    AlreadySigned,

    #[error("Contract is not ready for signing (status: {status})")]
    NotReadyForSigning { status: ContractStatus },

    #[error("Contract has expired")]
    Expired,

    #[error("Invalid transition from {from} via {event}")]
    InvalidTransition { from: ContractStatus, event: String },
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;
