use crate::codec::{Reader, Record, Writer};
use crate::error::CodecError;
use solana_program::pubkey::Pubkey;

/// Global bridge configuration, one per deployment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub initialized: bool,
    /// Signs ownership transfers, authority and fee changes, route creation
    /// and limit changes.
    pub owner: Pubkey,
    /// Signs settlements.
    pub authority: Pubkey,
    /// Lamports charged per bridge-out.
    pub fee: u64,
    pub fee_collector: Pubkey,
}

impl Config {
    pub const LEN: usize = 1 + 32 + 32 + 8 + 32;
}

impl Record for Config {
    const NAME: &'static str = "Config";
    const MIN_LEN: usize = Config::LEN;

    fn encode_into(&self, writer: &mut Writer) {
        writer.put_bool(self.initialized);
        writer.put_pubkey(&self.owner);
        writer.put_pubkey(&self.authority);
        writer.put_u64(self.fee);
        writer.put_pubkey(&self.fee_collector);
    }

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Config {
            initialized: reader.read_bool("initialized")?,
            owner: reader.read_pubkey("owner")?,
            authority: reader.read_pubkey("authority")?,
            fee: reader.read_u64("fee")?,
            fee_collector: reader.read_pubkey("fee_collector")?,
        })
    }
}

/// Where tokens of a route go on bridge-out.
///
/// The wire keeps a single `u32` where `0` doubles as "this chain is the
/// token's home chain". That mixes the routing target with a topology flag;
/// the encoding stays as is and this type keeps the two meanings apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// Tokens are burned on bridge-out and minted on settle.
    HomeChain,
    /// Tokens are locked in the route's token account and released on settle.
    Chain(u32),
}

impl From<u32> for Destination {
    fn from(value: u32) -> Self {
        match value {
            0 => Destination::HomeChain,
            chain => Destination::Chain(chain),
        }
    }
}

impl From<Destination> for u32 {
    fn from(value: Destination) -> Self {
        match value {
            Destination::HomeChain => 0,
            Destination::Chain(chain) => chain,
        }
    }
}

/// Per-route state: token accounts, limits and the bridge index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BridgeAccount {
    pub initialized: bool,
    /// Bump of the token authority address derived from this account's key.
    pub bump_seed: u8,
    pub token_program_id: Pubkey,
    /// Back-reference to the governing [`Config`].
    pub config: Pubkey,
    /// Token account holding locked funds for foreign-chain routes.
    pub token: Pubkey,
    pub token_mint: Pubkey,
    /// Target chain id, `0` for the home chain. See [`Destination`].
    pub destination: u32,
    /// Incremented by the program on every successful bridge-out.
    pub index: u64,
    pub max: u64,
    pub min: u64,
}

impl BridgeAccount {
    pub const LEN: usize = 1 + 1 + 32 * 4 + 4 + 8 * 3;

    pub fn destination(&self) -> Destination {
        Destination::from(self.destination)
    }

    /// Whether the program would accept `amount` for a single bridge-out.
    pub fn accepts_amount(&self, amount: u64) -> bool {
        self.min <= amount && amount <= self.max
    }
}

impl Record for BridgeAccount {
    const NAME: &'static str = "BridgeAccount";
    const MIN_LEN: usize = BridgeAccount::LEN;

    fn encode_into(&self, writer: &mut Writer) {
        writer.put_bool(self.initialized);
        writer.put_u8(self.bump_seed);
        writer.put_pubkey(&self.token_program_id);
        writer.put_pubkey(&self.config);
        writer.put_pubkey(&self.token);
        writer.put_pubkey(&self.token_mint);
        writer.put_u32(self.destination);
        writer.put_u64(self.index);
        writer.put_u64(self.max);
        writer.put_u64(self.min);
    }

    fn decode_from(reader: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(BridgeAccount {
            initialized: reader.read_bool("initialized")?,
            bump_seed: reader.read_u8("bump_seed")?,
            token_program_id: reader.read_pubkey("token_program_id")?,
            config: reader.read_pubkey("config")?,
            token: reader.read_pubkey("token")?,
            token_mint: reader.read_pubkey("token_mint")?,
            destination: reader.read_u32("destination")?,
            index: reader.read_u64("index")?,
            max: reader.read_u64("max")?,
            min: reader.read_u64("min")?,
        })
    }
}
