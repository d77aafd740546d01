use anyhow::{bail, Result};
use async_trait::async_trait;
use bridge_core::config::BridgeClientConfig;
use bridge_core::{LedgerClient, LedgerError};
use solana_client::client_error::ClientError as RpcClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::InstructionError;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, TransactionError};
use solana_transaction_status::option_serializer::OptionSerializer;
use solana_transaction_status::UiTransactionEncoding;
use tracing::debug;

/// [`LedgerClient`] over a cluster's JSON-RPC endpoint.
pub struct RpcLedger {
    rpc: RpcClient,
    commitment: CommitmentConfig,
}

pub fn parse_commitment(value: &str) -> Result<CommitmentConfig> {
    match value {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => bail!("unknown commitment level {:?}", other),
    }
}

fn map_client_error(error: RpcClientError) -> LedgerError {
    match error.get_transaction_error() {
        Some(TransactionError::InstructionError(index, InstructionError::Custom(code))) => {
            LedgerError::ProgramError { index, code }
        }
        Some(other) => LedgerError::Rejected(other.to_string()),
        None => LedgerError::Transport(error.to_string()),
    }
}

impl RpcLedger {
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url, commitment),
            commitment,
        }
    }

    pub fn from_config(config: &BridgeClientConfig) -> Result<Self> {
        let commitment = parse_commitment(&config.cluster.commitment)?;
        Ok(Self::new(config.cluster.rpc_url.clone(), commitment))
    }
}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn minimum_balance_for_rent_exemption(
        &self,
        data_len: usize,
    ) -> Result<u64, LedgerError> {
        self.rpc
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(map_client_error)
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Vec<u8>, LedgerError> {
        let account = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await
            .map_err(map_client_error)?
            .value
            .ok_or(LedgerError::AccountNotFound(*address))?;
        debug!(%address, len = account.data.len(), "fetched account");
        Ok(account.data)
    }

    async fn latest_blockhash(&self) -> Result<Hash, LedgerError> {
        self.rpc.get_latest_blockhash().await.map_err(map_client_error)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature, LedgerError> {
        self.rpc
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(map_client_error)
    }

    async fn transaction_logs(&self, signature: &Signature) -> Result<Vec<String>, LedgerError> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::Json),
            commitment: Some(self.commitment),
            max_supported_transaction_version: Some(0),
        };
        let confirmed = self
            .rpc
            .get_transaction_with_config(signature, config)
            .await
            .map_err(map_client_error)?;

        let logs = match confirmed.transaction.meta.map(|meta| meta.log_messages) {
            Some(OptionSerializer::Some(logs)) => logs,
            _ => Vec::new(),
        };
        Ok(logs)
    }
}
