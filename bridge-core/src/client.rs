//! High-level bridge flows over an external ledger connection.
//!
//! The connection and every signer are explicit arguments. Business rules
//! (limits, owner/authority checks) are left to the program; rejections come
//! back as [`ClientError::Rejected`] with the program's error code.

use crate::builder::{self, BridgeAccounts, BridgeFee, ConfigAccounts, CreateAccounts, SettleAccounts};
use crate::codec::{self, Record};
use crate::error::{ClientError, LedgerError};
use crate::log::{extract_bridge_logs, BridgeLog};
use crate::state::{BridgeAccount, Config};
use crate::transaction::{self, Assembled};
use crate::utils::{config_address_with_seed, find_token_authority};
use async_trait::async_trait;
use solana_program::pubkey::Pubkey;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use tracing::{debug, info, warn};

/// Transaction submission and account queries, provided by the caller.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize)
        -> Result<u64, LedgerError>;

    async fn account_data(&self, address: &Pubkey) -> Result<Vec<u8>, LedgerError>;

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError>;

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError>;

    /// Log messages of a confirmed transaction.
    async fn transaction_logs(&self, signature: &Signature) -> Result<Vec<String>, LedgerError>;
}

/// Parameters of a new route.
#[derive(Clone, Debug)]
pub struct RouteParams {
    pub config: Pubkey,
    pub token_mint: Pubkey,
    /// Route token account, owned by the token authority for foreign-chain
    /// routes. Home-chain routes still pass it but the program ignores it.
    pub token_account: Pubkey,
    pub token_program: Pubkey,
    pub destination: u32,
    pub max: u64,
    pub min: u64,
}

#[derive(Clone, Debug)]
pub struct BridgeRequest {
    pub bridge_account: Pubkey,
    pub config: Pubkey,
    pub token_account: Pubkey,
    pub user_account: Pubkey,
    pub token_mint: Pubkey,
    pub token_program: Pubkey,
    pub amount: u64,
    pub recipient: String,
    pub payload: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct SettleRequest {
    pub bridge_account: Pubkey,
    pub config: Pubkey,
    pub token_account: Pubkey,
    pub user_account: Pubkey,
    pub token_mint: Pubkey,
    pub token_program: Pubkey,
    pub amount: u64,
}

/// A confirmed bridge-out and the log it emitted.
///
/// Returned whenever the transaction landed. `log` is `None` when the logs
/// could not be read yet; `log_error` then says why. Do not resubmit on a
/// missing log: refetch it with the signature instead.
#[derive(Clone, Debug)]
pub struct BridgeReceipt {
    pub signature: Signature,
    pub log: Option<BridgeLog>,
    pub log_error: Option<String>,
}

pub struct BridgeClient<C> {
    ledger: C,
    program_id: Pubkey,
}

impl<C: LedgerClient> BridgeClient<C> {
    pub fn new(ledger: C, program_id: Pubkey) -> Self {
        Self { ledger, program_id }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn ledger(&self) -> &C {
        &self.ledger
    }

    async fn fetch<R: Record>(&self, operation: &'static str, address: &Pubkey) -> Result<R, ClientError> {
        let data = self
            .ledger
            .account_data(address)
            .await
            .map_err(|e| ClientError::from_ledger(operation, e))?;
        let record = codec::decode::<R>(&data)?;
        debug!(%address, record = R::NAME, "decoded account");
        Ok(record)
    }

    pub async fn fetch_config(&self, address: &Pubkey) -> Result<Config, ClientError> {
        self.fetch("fetch_config", address).await
    }

    pub async fn fetch_bridge_account(&self, address: &Pubkey) -> Result<BridgeAccount, ClientError> {
        self.fetch("fetch_bridge_account", address).await
    }

    async fn rent_exempt(&self, operation: &'static str, len: usize) -> Result<u64, ClientError> {
        self.ledger
            .minimum_balance_for_rent_exemption(len)
            .await
            .map_err(|e| ClientError::from_ledger(operation, e))
    }

    async fn submit(&self, assembled: Assembled<'_>) -> Result<Signature, ClientError> {
        let operation = assembled.operation();
        let blockhash = self
            .ledger
            .latest_blockhash()
            .await
            .map_err(|e| ClientError::from_ledger(operation, e))?;
        let transaction = assembled.sign(blockhash)?;

        match self.ledger.send_and_confirm(&transaction).await {
            Ok(signature) => {
                info!(operation, %signature, "transaction confirmed");
                Ok(signature)
            }
            Err(e) => {
                warn!(operation, error = %e, "transaction failed");
                Err(ClientError::from_submission(operation, e, &self.program_id, |index| {
                    failing_program(&transaction, index)
                }))
            }
        }
    }

    /// Allocates the config account at `seed` under the payer and initializes it.
    /// Returns the config address.
    #[allow(clippy::too_many_arguments)]
    pub async fn initialize_config(
        &self,
        payer: &dyn Signer,
        seed: &str,
        owner: &Pubkey,
        authority: &Pubkey,
        fee_collector: &Pubkey,
        fee: u64,
    ) -> Result<(Pubkey, Signature), ClientError> {
        const OPERATION: &str = "initialize_config";

        let config = config_address_with_seed(&payer.pubkey(), seed, &self.program_id).map_err(|e| {
            ClientError::Address {
                operation: OPERATION,
                reason: e.to_string(),
            }
        })?;
        let lamports = self.rent_exempt(OPERATION, Config::LEN).await?;

        let instructions = [
            transaction::create_config_account(&payer.pubkey(), &config, seed, lamports, &self.program_id),
            builder::initialize_config(
                &self.program_id,
                &ConfigAccounts {
                    config,
                    owner: *owner,
                    authority: *authority,
                    fee_collector: *fee_collector,
                },
                fee,
            ),
        ];
        let assembled = transaction::assemble(OPERATION, &payer.pubkey(), &instructions, &[payer])?;
        let signature = self.submit(assembled).await?;
        Ok((config, signature))
    }

    pub async fn transfer_owner(
        &self,
        config: &Pubkey,
        owner: &dyn Signer,
        new_owner: &Pubkey,
    ) -> Result<Signature, ClientError> {
        let ix = builder::transfer_owner(&self.program_id, config, &owner.pubkey(), new_owner);
        let assembled = transaction::assemble("transfer_owner", &owner.pubkey(), &[ix], &[owner])?;
        self.submit(assembled).await
    }

    pub async fn change_authority(
        &self,
        config: &Pubkey,
        owner: &dyn Signer,
        new_authority: &Pubkey,
    ) -> Result<Signature, ClientError> {
        let ix = builder::change_authority(&self.program_id, config, &owner.pubkey(), new_authority);
        let assembled = transaction::assemble("change_authority", &owner.pubkey(), &[ix], &[owner])?;
        self.submit(assembled).await
    }

    pub async fn change_fee(
        &self,
        config: &Pubkey,
        owner: &dyn Signer,
        fee: u64,
        fee_collector: &Pubkey,
    ) -> Result<Signature, ClientError> {
        let ix = builder::change_fee(&self.program_id, config, &owner.pubkey(), fee_collector, fee);
        let assembled = transaction::assemble("change_fee", &owner.pubkey(), &[ix], &[owner])?;
        self.submit(assembled).await
    }

    /// Allocates `bridge_account` and initializes it as a route under `config`.
    pub async fn create_bridge_account(
        &self,
        payer: &dyn Signer,
        bridge_account: &dyn Signer,
        owner: &dyn Signer,
        route: &RouteParams,
    ) -> Result<Signature, ClientError> {
        const OPERATION: &str = "create_bridge_account";

        let lamports = self.rent_exempt(OPERATION, BridgeAccount::LEN).await?;
        let (token_authority, _) = find_token_authority(&self.program_id, &bridge_account.pubkey());

        let instructions = [
            transaction::create_bridge_account(
                &payer.pubkey(),
                &bridge_account.pubkey(),
                lamports,
                &self.program_id,
            ),
            builder::create(
                &self.program_id,
                &CreateAccounts {
                    bridge_account: bridge_account.pubkey(),
                    token_authority,
                    token_mint: route.token_mint,
                    token_account: route.token_account,
                    token_program: route.token_program,
                    owner: owner.pubkey(),
                    config: route.config,
                },
                route.destination,
                route.max,
                route.min,
            ),
        ];
        let assembled = transaction::assemble(
            OPERATION,
            &payer.pubkey(),
            &instructions,
            &[payer, bridge_account, owner],
        )?;
        self.submit(assembled).await
    }

    pub async fn change_limit(
        &self,
        config: &Pubkey,
        bridge_account: &Pubkey,
        owner: &dyn Signer,
        max: u64,
        min: u64,
    ) -> Result<Signature, ClientError> {
        let ix = builder::change_limit(&self.program_id, config, bridge_account, &owner.pubkey(), max, min);
        let assembled = transaction::assemble("change_limit", &owner.pubkey(), &[ix], &[owner])?;
        self.submit(assembled).await
    }

    /// Fee accounts for a bridge-out, read from the current config.
    async fn bridge_fee(
        &self,
        operation: &'static str,
        payer: &Pubkey,
        config: &Pubkey,
    ) -> Result<Option<BridgeFee>, ClientError> {
        let config = self.fetch::<Config>(operation, config).await?;
        Ok((config.fee > 0).then(|| BridgeFee {
            payer: *payer,
            fee_collector: config.fee_collector,
        }))
    }

    fn bridge_accounts(
        &self,
        request: &BridgeRequest,
        transfer_authority: &Pubkey,
        fee: Option<BridgeFee>,
    ) -> BridgeAccounts {
        BridgeAccounts {
            bridge_account: request.bridge_account,
            token_account: request.token_account,
            user_account: request.user_account,
            user_transfer_authority: *transfer_authority,
            token_mint: request.token_mint,
            token_program: request.token_program,
            config: request.config,
            fee,
        }
    }

    /// Reads the bridge log of a confirmed bridge-out. The transaction has
    /// landed at this point, so log failures are reported in the receipt.
    async fn bridge_receipt(&self, operation: &'static str, signature: Signature) -> BridgeReceipt {
        let log = match self.ledger.transaction_logs(&signature).await {
            Ok(lines) => extract_bridge_logs(&lines)
                .map(|logs| logs.into_iter().next())
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match log {
            Ok(log) => {
                if let Some(log) = &log {
                    info!(index = log.index, amount = log.amount, destination = log.destination, "bridge log emitted");
                }
                BridgeReceipt {
                    signature,
                    log,
                    log_error: None,
                }
            }
            Err(error) => {
                warn!(operation, %signature, %error, "bridge confirmed but its log is unavailable");
                BridgeReceipt {
                    signature,
                    log: None,
                    log_error: Some(error),
                }
            }
        }
    }

    /// Bridges out with an authority that already may move `amount` from the
    /// user account.
    pub async fn bridge(
        &self,
        payer: &dyn Signer,
        transfer_authority: &dyn Signer,
        request: &BridgeRequest,
    ) -> Result<BridgeReceipt, ClientError> {
        const OPERATION: &str = "bridge";

        let fee = self.bridge_fee(OPERATION, &payer.pubkey(), &request.config).await?;
        let accounts = self.bridge_accounts(request, &transfer_authority.pubkey(), fee);
        let ix = builder::bridge(
            &self.program_id,
            &accounts,
            request.amount,
            &request.recipient,
            &request.payload,
        );
        let assembled =
            transaction::assemble(OPERATION, &payer.pubkey(), &[ix], &[payer, transfer_authority])?;
        let signature = self.submit(assembled).await?;
        Ok(self.bridge_receipt(OPERATION, signature).await)
    }

    /// Approves `transfer_authority` for `amount` on the user account, owned by
    /// `payer`, and bridges out in the same transaction.
    pub async fn approve_and_bridge(
        &self,
        payer: &dyn Signer,
        transfer_authority: &dyn Signer,
        request: &BridgeRequest,
    ) -> Result<BridgeReceipt, ClientError> {
        const OPERATION: &str = "approve_and_bridge";

        let fee = self.bridge_fee(OPERATION, &payer.pubkey(), &request.config).await?;
        let approve = transaction::approve_transfer(
            OPERATION,
            &request.token_program,
            &request.user_account,
            &transfer_authority.pubkey(),
            &payer.pubkey(),
            request.amount,
        )?;
        let accounts = self.bridge_accounts(request, &transfer_authority.pubkey(), fee);
        let bridge = builder::bridge(
            &self.program_id,
            &accounts,
            request.amount,
            &request.recipient,
            &request.payload,
        );
        let assembled = transaction::assemble(
            OPERATION,
            &payer.pubkey(),
            &[approve, bridge],
            &[payer, transfer_authority],
        )?;
        let signature = self.submit(assembled).await?;
        Ok(self.bridge_receipt(OPERATION, signature).await)
    }

    /// Releases or mints `amount` to a local user. The config authority signs
    /// and pays.
    pub async fn settle(&self, authority: &dyn Signer, request: &SettleRequest) -> Result<Signature, ClientError> {
        let (token_authority, _) = find_token_authority(&self.program_id, &request.bridge_account);
        let ix = builder::settle(
            &self.program_id,
            &SettleAccounts {
                bridge_account: request.bridge_account,
                token_authority,
                token_account: request.token_account,
                user_account: request.user_account,
                authority: authority.pubkey(),
                token_mint: request.token_mint,
                token_program: request.token_program,
                config: request.config,
            },
            request.amount,
        );
        let assembled = transaction::assemble("settle", &authority.pubkey(), &[ix], &[authority])?;
        self.submit(assembled).await
    }
}

fn failing_program(transaction: &Transaction, index: u8) -> Option<Pubkey> {
    let message = &transaction.message;
    let instruction = message.instructions.get(usize::from(index))?;
    message
        .account_keys
        .get(usize::from(instruction.program_id_index))
        .copied()
}
