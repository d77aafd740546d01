//! Instruction payloads: a `u8` variant tag followed by the variant's arguments
//! in the shared binary layout.

use crate::codec::{Reader, Writer};
use crate::error::CodecError;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

const RECORD: &str = "BridgeInstruction";

/// Variant tags. Assigned once and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum InstructionTag {
    Config = 0,
    TransferOwner = 1,
    ChangeAuthority = 2,
    ChangeFee = 3,
    Create = 4,
    ChangeLimit = 5,
    Bridge = 6,
    Settle = 7,
}

impl InstructionTag {
    pub fn from_u8(value: u8) -> Option<Self> {
        FromPrimitive::from_u8(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BridgeInstruction {
    /// Initializes a pre-allocated config account.
    Config { fee: u64 },
    TransferOwner,
    ChangeAuthority,
    ChangeFee { fee: u64 },
    /// Initializes a pre-allocated route account.
    Create { destination: u32, max: u64, min: u64 },
    ChangeLimit { max: u64, min: u64 },
    /// Burns or locks `amount` and emits a bridge log.
    Bridge {
        amount: u64,
        recipient: String,
        payload: Vec<u8>,
    },
    /// Mints or releases `amount` to a local user.
    Settle { amount: u64 },
}

impl BridgeInstruction {
    pub fn tag(&self) -> InstructionTag {
        match self {
            BridgeInstruction::Config { .. } => InstructionTag::Config,
            BridgeInstruction::TransferOwner => InstructionTag::TransferOwner,
            BridgeInstruction::ChangeAuthority => InstructionTag::ChangeAuthority,
            BridgeInstruction::ChangeFee { .. } => InstructionTag::ChangeFee,
            BridgeInstruction::Create { .. } => InstructionTag::Create,
            BridgeInstruction::ChangeLimit { .. } => InstructionTag::ChangeLimit,
            BridgeInstruction::Bridge { .. } => InstructionTag::Bridge,
            BridgeInstruction::Settle { .. } => InstructionTag::Settle,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.tag() {
            InstructionTag::Config => "config",
            InstructionTag::TransferOwner => "transfer_owner",
            InstructionTag::ChangeAuthority => "change_authority",
            InstructionTag::ChangeFee => "change_fee",
            InstructionTag::Create => "create",
            InstructionTag::ChangeLimit => "change_limit",
            InstructionTag::Bridge => "bridge",
            InstructionTag::Settle => "settle",
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut writer = Writer::with_capacity(1 + 8 + 8 + 4);
        writer.put_u8(self.tag() as u8);

        match self {
            BridgeInstruction::Config { fee } | BridgeInstruction::ChangeFee { fee } => {
                writer.put_u64(*fee);
            }
            BridgeInstruction::TransferOwner | BridgeInstruction::ChangeAuthority => {}
            BridgeInstruction::Create {
                destination,
                max,
                min,
            } => {
                writer.put_u32(*destination);
                writer.put_u64(*max);
                writer.put_u64(*min);
            }
            BridgeInstruction::ChangeLimit { max, min } => {
                writer.put_u64(*max);
                writer.put_u64(*min);
            }
            BridgeInstruction::Bridge {
                amount,
                recipient,
                payload,
            } => {
                writer.put_u64(*amount);
                writer.put_str(recipient);
                writer.put_bytes(payload);
            }
            BridgeInstruction::Settle { amount } => {
                writer.put_u64(*amount);
            }
        }

        writer.into_inner()
    }

    pub fn unpack(input: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(RECORD, input);
        let tag = reader.read_u8("tag")?;
        let tag = InstructionTag::from_u8(tag)
            .ok_or_else(|| CodecError::malformed(RECORD, format!("unknown tag {}", tag)))?;

        let instruction = match tag {
            InstructionTag::Config => BridgeInstruction::Config {
                fee: reader.read_u64("fee")?,
            },
            InstructionTag::TransferOwner => BridgeInstruction::TransferOwner,
            InstructionTag::ChangeAuthority => BridgeInstruction::ChangeAuthority,
            InstructionTag::ChangeFee => BridgeInstruction::ChangeFee {
                fee: reader.read_u64("fee")?,
            },
            InstructionTag::Create => BridgeInstruction::Create {
                destination: reader.read_u32("destination")?,
                max: reader.read_u64("max")?,
                min: reader.read_u64("min")?,
            },
            InstructionTag::ChangeLimit => BridgeInstruction::ChangeLimit {
                max: reader.read_u64("max")?,
                min: reader.read_u64("min")?,
            },
            InstructionTag::Bridge => BridgeInstruction::Bridge {
                amount: reader.read_u64("amount")?,
                recipient: reader.read_string("recipient")?,
                payload: reader.read_bytes("payload")?,
            },
            InstructionTag::Settle => BridgeInstruction::Settle {
                amount: reader.read_u64("amount")?,
            },
        };

        if !reader.is_empty() {
            return Err(CodecError::mismatch(
                RECORD,
                format!(
                    "{} trailing bytes after {} payload",
                    reader.remaining(),
                    instruction.name()
                ),
            ));
        }

        Ok(instruction)
    }
}
