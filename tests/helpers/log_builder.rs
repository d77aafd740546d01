use bridge_core::BridgeLog;
use solana_sdk::pubkey::Pubkey;

pub struct BridgeLogBuilder {
    log: BridgeLog,
}

impl BridgeLogBuilder {
    pub fn new(token: Pubkey, destination: u32) -> Self {
        Self {
            log: BridgeLog {
                token,
                index: 1,
                sender: Pubkey::new_from_array([0x11; 32]),
                recipient: "0xb71044b6cd843ddc11e4298e9da64da00864e099".to_string(),
                amount: 100_000,
                fee: 0,
                destination,
                payload: vec![],
            },
        }
    }

    pub fn with_index(mut self, index: u64) -> Self {
        self.log.index = index;
        self
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.log.amount = amount;
        self
    }

    pub fn with_payload(mut self, payload: &[u8]) -> Self {
        self.log.payload = payload.to_vec();
        self
    }

    pub fn build(self) -> BridgeLog {
        self.log
    }

    /// Consecutive logs of one route, starting at `first`.
    pub fn sequence(self, first: u64, count: u64) -> Vec<BridgeLog> {
        (first..first + count)
            .map(|index| BridgeLog {
                index,
                ..self.log.clone()
            })
            .collect()
    }
}
