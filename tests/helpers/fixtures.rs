use super::mock_ledger::MockLedger;
use bridge_core::utils::find_token_authority;
use bridge_core::{
    BridgeAccount, BridgeClient, BridgeRequest, Config, RouteParams, SettleRequest,
};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;

pub const IOTEX_CHAIN_ID: u32 = 4689;
pub const TEST_RECIPIENT: &str = "0xb71044b6cd843ddc11e4298e9da64da00864e099";
pub const CONFIG_SEED: &str = "config";
pub const TEST_LAMPORTS: u64 = 10_000_000_000;

/// A bridge log captured from a testnet bridge-out, emitted before the
/// payload field existed.
pub const SAMPLE_LOG_LINE: &str = "Program log: Bridge: 37cb6e050ce3ad2b3939a555aebde7f15a9c9d37d5ef1ce4fce9e21a4b8c44080100000000000000077423955995f4033ad7ebce2ff04a731c98823c220b40429548094df6684e882a000000307862373130343462366364383433646463313165343239386539646136346461303038363465303939a086010000000000000000000000000051120000";
pub const SAMPLE_LOG_TOKEN: &str = "37cb6e050ce3ad2b3939a555aebde7f15a9c9d37d5ef1ce4fce9e21a4b8c4408";
pub const SAMPLE_LOG_SENDER: &str = "077423955995f4033ad7ebce2ff04a731c98823c220b40429548094df6684e88";

pub fn pubkey_from_hex(value: &str) -> Pubkey {
    let bytes: [u8; 32] = hex::decode(value).unwrap().try_into().unwrap();
    Pubkey::new_from_array(bytes)
}

pub fn create_test_config() -> Config {
    Config {
        initialized: true,
        owner: Pubkey::new_from_array([0x01; 32]),
        authority: Pubkey::new_from_array([0x02; 32]),
        fee: 5_000,
        fee_collector: Pubkey::new_from_array([0x03; 32]),
    }
}

pub fn create_test_bridge_account() -> BridgeAccount {
    BridgeAccount {
        initialized: true,
        bump_seed: 254,
        token_program_id: spl_token_2022::id(),
        config: Pubkey::new_from_array([0x04; 32]),
        token: Pubkey::new_from_array([0x05; 32]),
        token_mint: Pubkey::new_from_array([0x06; 32]),
        destination: IOTEX_CHAIN_ID,
        index: 7,
        max: 1_000_000_000_000,
        min: 100_000_000,
    }
}

/// A route created through the client on a [`TestBridge`].
#[derive(Clone, Debug)]
pub struct TestRoute {
    pub bridge_account: Pubkey,
    pub token_authority: Pubkey,
    pub token_mint: Pubkey,
    pub token_account: Pubkey,
    pub destination: u32,
}

/// A user holding tokens of one route's mint.
pub struct TestUser {
    pub keypair: Keypair,
    pub token_account: Pubkey,
}

/// A mock ledger with the program config already initialized.
pub struct TestBridge {
    pub ledger: MockLedger,
    pub client: BridgeClient<MockLedger>,
    pub payer: Keypair,
    pub owner: Keypair,
    pub authority: Keypair,
    pub fee_collector: Pubkey,
    pub config: Pubkey,
}

impl TestBridge {
    pub async fn new(fee: u64) -> Self {
        let program_id = Pubkey::new_unique();
        let ledger = MockLedger::new(program_id);
        let client = BridgeClient::new(ledger.clone(), program_id);

        let payer = Keypair::new();
        let owner = Keypair::new();
        let authority = Keypair::new();
        let fee_collector = Pubkey::new_unique();
        ledger.airdrop(&payer.pubkey(), TEST_LAMPORTS).await;
        ledger.airdrop(&fee_collector, 1).await;

        let (config, _) = client
            .initialize_config(
                &payer,
                CONFIG_SEED,
                &owner.pubkey(),
                &authority.pubkey(),
                &fee_collector,
                fee,
            )
            .await
            .unwrap();

        Self {
            ledger,
            client,
            payer,
            owner,
            authority,
            fee_collector,
            config,
        }
    }

    pub fn program_id(&self) -> Pubkey {
        *self.client.program_id()
    }

    pub fn token_program_id(&self) -> Pubkey {
        self.ledger.token_program_id()
    }

    /// Creates a route. Home-chain routes get a mint whose authority is the
    /// route's token authority; foreign-chain routes get an empty escrow
    /// token account owned by it.
    pub async fn create_route(&self, destination: u32, max: u64, min: u64) -> TestRoute {
        let (bridge_account, route) = self.prepare_route(destination).await;
        self.client
            .create_bridge_account(
                &self.payer,
                &bridge_account,
                &self.owner,
                &self.route_params(&route, max, min),
            )
            .await
            .unwrap();
        route
    }

    /// Prepares mint and escrow for a route without creating it on the ledger.
    pub async fn prepare_route(&self, destination: u32) -> (Keypair, TestRoute) {
        let bridge_account = Keypair::new();
        let (token_authority, _) =
            find_token_authority(&self.program_id(), &bridge_account.pubkey());
        let token_mint = Pubkey::new_unique();
        let token_account = Pubkey::new_unique();

        if destination == 0 {
            self.ledger.create_mint(token_mint, token_authority, 9).await;
        } else {
            self.ledger.create_mint(token_mint, Pubkey::new_unique(), 9).await;
            self.ledger
                .create_token_account(token_account, token_mint, token_authority, 0)
                .await;
        }

        let route = TestRoute {
            bridge_account: bridge_account.pubkey(),
            token_authority,
            token_mint,
            token_account,
            destination,
        };
        (bridge_account, route)
    }

    pub fn route_params(&self, route: &TestRoute, max: u64, min: u64) -> RouteParams {
        RouteParams {
            config: self.config,
            token_mint: route.token_mint,
            token_account: route.token_account,
            token_program: self.token_program_id(),
            destination: route.destination,
            max,
            min,
        }
    }

    pub async fn create_user(&self, route: &TestRoute, balance: u64) -> TestUser {
        let keypair = Keypair::new();
        let token_account = Pubkey::new_unique();
        self.ledger.airdrop(&keypair.pubkey(), TEST_LAMPORTS).await;
        self.ledger
            .create_token_account(token_account, route.token_mint, keypair.pubkey(), balance)
            .await;
        TestUser {
            keypair,
            token_account,
        }
    }

    pub fn bridge_request(&self, route: &TestRoute, user: &TestUser, amount: u64) -> BridgeRequest {
        BridgeRequest {
            bridge_account: route.bridge_account,
            config: self.config,
            token_account: route.token_account,
            user_account: user.token_account,
            token_mint: route.token_mint,
            token_program: self.token_program_id(),
            amount,
            recipient: TEST_RECIPIENT.to_string(),
            payload: vec![],
        }
    }

    pub fn settle_request(&self, route: &TestRoute, user: &TestUser, amount: u64) -> SettleRequest {
        SettleRequest {
            bridge_account: route.bridge_account,
            config: self.config,
            token_account: route.token_account,
            user_account: user.token_account,
            token_mint: route.token_mint,
            token_program: self.token_program_id(),
            amount,
        }
    }
}
