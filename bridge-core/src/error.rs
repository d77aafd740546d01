use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use solana_program::pubkey::Pubkey;
use std::fmt;
use thiserror::Error;

/// Failures of the local byte codec. Both variants are fatal and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Buffer truncated, length prefix past the end, or a field value the
    /// layout cannot hold (bool other than 0/1, invalid UTF-8, unknown tag).
    #[error("malformed {record}: {reason}")]
    MalformedRecord { record: &'static str, reason: String },

    /// Bytes decoded cleanly but do not belong to the requested schema.
    #[error("schema mismatch for {record}: {reason}")]
    SchemaMismatch { record: &'static str, reason: String },
}

impl CodecError {
    pub fn malformed(record: &'static str, reason: impl Into<String>) -> Self {
        CodecError::MalformedRecord {
            record,
            reason: reason.into(),
        }
    }

    pub fn mismatch(record: &'static str, reason: impl Into<String>) -> Self {
        CodecError::SchemaMismatch {
            record,
            reason: reason.into(),
        }
    }
}

/// Failures detected while composing a transaction, before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error("{operation}: account {signer} must sign but no key was supplied")]
    MissingSigner {
        operation: &'static str,
        signer: Pubkey,
    },

    #[error("{operation}: transaction has no instructions")]
    Empty { operation: &'static str },

    #[error("{operation}: token approval rejected: {reason}")]
    Approval {
        operation: &'static str,
        reason: String,
    },

    #[error("{operation}: signing failed: {reason}")]
    Signing {
        operation: &'static str,
        reason: String,
    },
}

/// Errors reported by the transaction-submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("account {0} not found")]
    AccountNotFound(Pubkey),

    /// The program returned a custom error code while executing an instruction.
    #[error("instruction {index} failed with custom program error {code:#x}")]
    ProgramError { index: u8, code: u32 },

    /// Rejected by the runtime for a reason other than a custom program error.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Custom error codes returned by the bridge program, in the program's numbering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum ProgramErrorCode {
    InvalidInstruction = 0,
    AlreadyInUse = 1,
    InvalidProgramAddress = 2,
    IncorrectTokenProgramId = 3,
    ExpectedMint = 4,
    ExpectedAccount = 5,
    InvalidToken = 6,
    InvalidInput = 7,
    InvalidOwner = 8,
    InvalidConfig = 9,
    InvalidMint = 10,
    InvalidAuthority = 11,
    InvalidFeeCollector = 12,
    InvalidAmount = 13,
}

impl ProgramErrorCode {
    pub fn from_code(code: u32) -> Option<Self> {
        FromPrimitive::from_u32(code)
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

/// Coarse classification of a remote rejection, for callers that branch on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectionKind {
    /// Amount outside `[min, max]`, or `max < min` on a limit change.
    LimitViolation,
    /// Owner or authority did not sign, or signed with the wrong key.
    UnauthorizedSigner,
    /// Another bridge consumed the index first; refetch state and retry.
    StaleIndex,
    Other,
}

/// A custom program error surfaced verbatim from a failed submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramRejection {
    pub instruction_index: u8,
    pub code: u32,
    /// Program of the failing instruction.
    pub program_id: Pubkey,
    /// Whether `program_id` is the bridge program. Token program errors raised
    /// through the bridge's own token calls also arrive under the bridge.
    pub bridge_program: bool,
}

impl ProgramRejection {
    /// The bridge error for `code`. `None` when another program failed.
    pub fn error(&self) -> Option<ProgramErrorCode> {
        if !self.bridge_program {
            return None;
        }
        ProgramErrorCode::from_code(self.code)
    }

    pub fn kind(&self) -> RejectionKind {
        match self.error() {
            Some(ProgramErrorCode::InvalidAmount) | Some(ProgramErrorCode::InvalidInput) => {
                RejectionKind::LimitViolation
            }
            Some(ProgramErrorCode::InvalidOwner) | Some(ProgramErrorCode::InvalidAuthority) => {
                RejectionKind::UnauthorizedSigner
            }
            _ => RejectionKind::Other,
        }
    }
}

impl fmt::Display for ProgramRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.bridge_program, self.error()) {
            (true, Some(error)) => write!(
                f,
                "bridge program error {} ({:?} or a token program error) at instruction {}",
                self.code, error, self.instruction_index
            ),
            (true, None) => write!(
                f,
                "bridge program error {:#x} at instruction {}",
                self.code, self.instruction_index
            ),
            (false, _) => write!(
                f,
                "program {} error {} at instruction {}",
                self.program_id, self.code, self.instruction_index
            ),
        }
    }
}

/// Out-of-order bridge logs observed for a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("stale index for token {token} to chain {destination}: expected {expected}, found {found}")]
    StaleIndex {
        token: Pubkey,
        destination: u32,
        expected: u64,
        found: u64,
    },
}

impl SequenceError {
    pub fn kind(&self) -> RejectionKind {
        RejectionKind::StaleIndex
    }
}

/// Errors returned by the high-level client flows.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Assemble(#[from] AssembleError),

    #[error("{operation} rejected: {rejection}")]
    Rejected {
        operation: &'static str,
        rejection: ProgramRejection,
    },

    #[error("{operation} failed: {source}")]
    Ledger {
        operation: &'static str,
        #[source]
        source: LedgerError,
    },

    #[error("{operation}: cannot derive address: {reason}")]
    Address {
        operation: &'static str,
        reason: String,
    },
}

impl ClientError {
    pub(crate) fn from_ledger(operation: &'static str, source: LedgerError) -> Self {
        ClientError::Ledger { operation, source }
    }

    /// Maps a failed submission. `failing_program` resolves an instruction
    /// index of the submitted transaction to its program id.
    pub(crate) fn from_submission(
        operation: &'static str,
        error: LedgerError,
        bridge_program: &Pubkey,
        failing_program: impl FnOnce(u8) -> Option<Pubkey>,
    ) -> Self {
        match error {
            LedgerError::ProgramError { index, code } => {
                let program_id = failing_program(index).unwrap_or_default();
                ClientError::Rejected {
                    operation,
                    rejection: ProgramRejection {
                        instruction_index: index,
                        code,
                        program_id,
                        bridge_program: program_id == *bridge_program,
                    },
                }
            }
            source => ClientError::Ledger { operation, source },
        }
    }

    /// Remote rejection details, if the program refused the transaction.
    pub fn rejection(&self) -> Option<&ProgramRejection> {
        match self {
            ClientError::Rejected { rejection, .. } => Some(rejection),
            _ => None,
        }
    }
}
