use chrono::{DateTime, Utc};

use super::errors::{StateMachineError, StateMachineResult};
use super::events::ContractEvent;
use super::states::ContractStatus;

/// Transition rules for the contract lifecycle
///
/// Pure: persistence of the resulting state is done by the caller, which must
/// make the write conditional on the state it read.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractStateMachine;

impl ContractStateMachine {
    /// Determine the target state based on current state and event
    pub fn determine_target_state(
        current: ContractStatus,
        event: ContractEvent,
    ) -> StateMachineResult<ContractStatus> {
        let target = match (current, event) {
            (ContractStatus::Draft, ContractEvent::Send) => ContractStatus::Sent,

            (ContractStatus::Sent, ContractEvent::Sign) => ContractStatus::Signed,
            (status, ContractEvent::Sign) if status.is_signed() => {
                return Err(StateMachineError::AlreadySigned)
            }
            (status, ContractEvent::Sign) => {
                return Err(StateMachineError::NotReadyForSigning { status })
            }

            (ContractStatus::Signed, ContractEvent::Complete) => ContractStatus::Completed,

            (ContractStatus::Draft | ContractStatus::Sent, ContractEvent::Expire) => {
                ContractStatus::Expired
            }
            (ContractStatus::Draft | ContractStatus::Sent, ContractEvent::Cancel) => {
                ContractStatus::Cancelled
            }

            (from, event) => {
                return Err(StateMachineError::InvalidTransition {
                    from,
                    event: event.event_type().to_string(),
                })
            }
        };

        Ok(target)
    }

    /// Whether a contract read at `now` must be moved to `expired`
    pub fn is_past_expiry(
        current: ContractStatus,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        current.can_expire() && expires_at.is_some_and(|expiry| now > expiry)
    }

    /// Validate a signing attempt: not expired, then the `Sign` transition
    pub fn check_signable(
        current: ContractStatus,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> StateMachineResult<ContractStatus> {
        if current.is_signed() {
            return Err(StateMachineError::AlreadySigned);
        }
        if Self::is_past_expiry(current, expires_at, now) || current == ContractStatus::Expired {
            return Err(StateMachineError::Expired);
        }
        Self::determine_target_state(current, ContractEvent::Sign)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_valid_transitions() {
        use ContractEvent::*;
        use ContractStatus::*;

        let cases = [
            (Draft, Send, Sent),
            (Sent, Sign, Signed),
            (Signed, Complete, Completed),
            (Draft, Expire, Expired),
            (Sent, Expire, Expired),
            (Draft, Cancel, Cancelled),
            (Sent, Cancel, Cancelled),
        ];
        for (from, event, to) in cases {
            assert_eq!(
                ContractStateMachine::determine_target_state(from, event).unwrap(),
                to
            );
        }
    }

    #[test]
    fn test_sign_rejections() {
        assert_eq!(
            ContractStateMachine::determine_target_state(
                ContractStatus::Signed,
                ContractEvent::Sign
            ),
            Err(StateMachineError::AlreadySigned)
        );
        assert_eq!(
            ContractStateMachine::determine_target_state(
                ContractStatus::Completed,
                ContractEvent::Sign
            ),
            Err(StateMachineError::AlreadySigned)
        );
        assert_eq!(
            ContractStateMachine::determine_target_state(
                ContractStatus::Draft,
                ContractEvent::Sign
            ),
            Err(StateMachineError::NotReadyForSigning {
                status: ContractStatus::Draft
            })
        );
        assert!(matches!(
            ContractStateMachine::determine_target_state(
                ContractStatus::Cancelled,
                ContractEvent::Sign
            ),
            Err(StateMachineError::NotReadyForSigning { .. })
        ));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(matches!(
            ContractStateMachine::determine_target_state(ContractStatus::Sent, ContractEvent::Send),
            Err(StateMachineError::InvalidTransition { .. })
        ));
        assert!(matches!(
            ContractStateMachine::determine_target_state(
                ContractStatus::Signed,
                ContractEvent::Expire
            ),
            Err(StateMachineError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_expiry_checks() {
        let now = Utc::now();
        let past = Some(now - Duration::hours(1));
        let future = Some(now + Duration::hours(1));

        assert!(ContractStateMachine::is_past_expiry(ContractStatus::Sent, past, now));
        assert!(!ContractStateMachine::is_past_expiry(ContractStatus::Sent, future, now));
        assert!(!ContractStateMachine::is_past_expiry(ContractStatus::Sent, None, now));
        assert!(!ContractStateMachine::is_past_expiry(ContractStatus::Signed, past, now));

        assert_eq!(
            ContractStateMachine::check_signable(ContractStatus::Sent, past, now),
            Err(StateMachineError::Expired)
        );
        assert_eq!(
            ContractStateMachine::check_signable(ContractStatus::Sent, future, now),
            Ok(ContractStatus::Signed)
        );
        assert_eq!(
            ContractStateMachine::check_signable(ContractStatus::Signed, past, now),
            Err(StateMachineError::AlreadySigned)
        );
    }
}
