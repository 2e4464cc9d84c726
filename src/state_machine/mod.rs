// Contract lifecycle state machine
//
// States, events and the pure transition rules. Persisting a transition is the
// job of the models layer, which guards each write on the state it read.

pub mod contract_state_machine;
pub mod errors;
pub mod events;
pub mod states;

// Re-export main types for convenient access
pub use contract_state_machine::ContractStateMachine;
pub use errors::{StateMachineError, StateMachineResult};
pub use events::ContractEvent;
pub use states::ContractStatus;
