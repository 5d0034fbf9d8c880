/// On-chain lifecycle status of an `Intent`. Terminal states are
/// `Completed`, `Cancelled`, `Expired`; no transition leaves a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentStatus {
    Open = 0,
    Completed = 1,
    Cancelled = 2,
    Expired = 3,
}

impl IntentStatus {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Open),
            1 => Some(Self::Completed),
            2 => Some(Self::Cancelled),
            3 => Some(Self::Expired),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Expired)
    }
}

/// A swap intent: an escrowed commitment to accept any executor that
/// delivers at least `min_output_amount` before `deadline`.
#[derive(Debug, Clone)]
pub struct Intent {
    pub intent_id: String,
    pub owner: String,
    pub input_type: String,
    pub output_type: String,
    pub input_balance: u64,
    pub min_output_amount: u64,
    pub deadline: u64,
    pub status: IntentStatus,
    pub solver: Option<String>,
}

impl Intent {
    pub fn is_expired(&self, now_ms: u64) -> bool {
        now_ms > self.deadline
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Protocol-wide fee configuration. Fee is withheld from the
/// input side only.
#[derive(Debug, Clone)]
pub struct ProtocolConfig {
    pub fee_bps: u64,
    pub fee_recipient: String,
    pub paused: bool,
}

/// Integer fee computation, truncated toward zero.
pub fn fee(amount: u64, fee_bps: u64) -> u64 {
    amount * fee_bps / 10_000
}

#[derive(Debug, Clone)]
pub enum IntentEvent {
    Created {
        intent_id: String,
        owner: String,
        input_type: String,
        output_type: String,
        input_amount: u64,
        min_output_amount: u64,
        deadline: u64,
    },
    Executed {
        intent_id: String,
        solver: String,
        input_amount: u64,
        output_amount: u64,
        fee_amount: u64,
        execution_time: u64,
    },
    Cancelled {
        intent_id: String,
        owner: String,
    },
    Expired {
        intent_id: String,
        owner: String,
        triggered_by: String,
        refund_amount: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_truncates_toward_zero() {
        assert_eq!(fee(1_000_000_000, 100), 10_000_000);
        assert_eq!(fee(3, 1), 0);
    }

    #[test]
    fn terminal_states() {
        assert!(IntentStatus::Completed.is_terminal());
        assert!(IntentStatus::Cancelled.is_terminal());
        assert!(IntentStatus::Expired.is_terminal());
        assert!(!IntentStatus::Open.is_terminal());
    }
}
