//! Bridge-out audit records as emitted in program logs, and the relayer-side
//! parsing of those logs.

use crate::codec::{self, Reader, Record, Writer};
use crate::error::{CodecError, SequenceError};
use solana_program::pubkey::Pubkey;
use std::collections::HashMap;
use std::fmt;

/// Tag the program writes in front of the hex-encoded record.
pub const BRIDGE_LOG_TAG: &str = "Bridge: ";

/// Prefix the runtime adds to every `msg!` line.
pub const PROGRAM_LOG_PREFIX: &str = "Program log: ";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BridgeLog {
    /// Mint of the bridged token.
    pub token: Pubkey,
    /// Route index after the increment made by this bridge-out.
    pub index: u64,
    pub sender: Pubkey,
    /// Destination-chain address, in that chain's own format.
    pub recipient: String,
    pub amount: u64,
    pub fee: u64,
    pub destination: u32,
    /// Opaque data forwarded to the destination chain.
    pub payload: Vec<u8>,
}

impl BridgeLog {
    /// Full log line, as the program emits it.
    pub fn to_log_line(&self) -> String {
        format!("{}{}", BRIDGE_LOG_TAG, self)
    }
}

impl Record for BridgeLog {
    const NAME: &'static str = "BridgeLog";
    // token, index, sender and the recipient length prefix
    const MIN_LEN: usize = 32 + 8 + 32 + 4;

    fn encode_into(&self, writer: &mut Writer) {
        writer.put_pubkey(&self.token);
        writer.put_u64(self.index);
        writer.put_pubkey(&self.sender);
        writer.put_str(&self.recipient);
        writer.put_u64(self.amount);
        writer.put_u64(self.fee);
        writer.put_u32(self.destination);
        writer.put_bytes(&self.payload);
    }

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        let token = reader.read_pubkey("token")?;
        let index = reader.read_u64("index")?;
        let sender = reader.read_pubkey("sender")?;
        let recipient = reader.read_string("recipient")?;
        let amount = reader.read_u64("amount")?;
        let fee = reader.read_u64("fee")?;
        let destination = reader.read_u32("destination")?;
        // Program builds before the payload field ended the record here.
        let payload = if reader.is_empty() {
            Vec::new()
        } else {
            reader.read_bytes("payload")?
        };

        Ok(BridgeLog {
            token,
            index,
            sender,
            recipient,
            amount,
            fee,
            destination,
            payload,
        })
    }
}

impl fmt::Display for BridgeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(codec::encode(self)))
    }
}

/// Decodes one log line. Returns `None` when the line is not a bridge log.
///
/// Accepts both the raw program output (`Bridge: <hex>`) and the form returned
/// by RPC transaction metadata (`Program log: Bridge: <hex>`).
pub fn parse_log_line(line: &str) -> Option<Result<BridgeLog, CodecError>> {
    let line = line.strip_prefix(PROGRAM_LOG_PREFIX).unwrap_or(line);
    let encoded = line.strip_prefix(BRIDGE_LOG_TAG)?;

    Some(
        hex::decode(encoded.trim())
            .map_err(|e| CodecError::malformed(BridgeLog::NAME, format!("invalid hex: {}", e)))
            .and_then(|bytes| codec::decode::<BridgeLog>(&bytes)),
    )
}

/// Collects every bridge log from a transaction's log messages, in order.
pub fn extract_bridge_logs<S: AsRef<str>>(lines: &[S]) -> Result<Vec<BridgeLog>, CodecError> {
    lines
        .iter()
        .filter_map(|line| parse_log_line(line.as_ref()))
        .collect()
}

/// Checks that bridge logs of each route arrive as `1, 2, 3, ...` with no
/// repeats or gaps. Routes are keyed by token mint and destination chain.
#[derive(Debug, Default)]
pub struct IndexSequencer {
    last: HashMap<(Pubkey, u32), u64>,
}

impl IndexSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resumes a route from an index already relayed.
    pub fn resume(&mut self, token: Pubkey, destination: u32, last_index: u64) {
        self.last.insert((token, destination), last_index);
    }

    pub fn last_index(&self, token: &Pubkey, destination: u32) -> u64 {
        self.last.get(&(*token, destination)).copied().unwrap_or(0)
    }

    pub fn observe(&mut self, log: &BridgeLog) -> Result<(), SequenceError> {
        let last = self.last.entry((log.token, log.destination)).or_insert(0);
        let expected = last.saturating_add(1);
        if log.index != expected {
            return Err(SequenceError::StaleIndex {
                token: log.token,
                destination: log.destination,
                expected,
                found: log.index,
            });
        }
        *last = log.index;
        Ok(())
    }
}
