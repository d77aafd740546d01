//! Transaction assembly: account allocation, optional token approval, and the
//! signer-completeness check that runs before anything is submitted.

use crate::error::AssembleError;
use crate::state::{BridgeAccount, Config};
use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use solana_program::system_instruction;
use solana_sdk::hash::Hash;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use std::collections::HashSet;
use tracing::debug;

/// Allocates the config account at its seeded address, owned by the program.
pub fn create_config_account(
    payer: &Pubkey,
    config: &Pubkey,
    seed: &str,
    lamports: u64,
    program_id: &Pubkey,
) -> Instruction {
    system_instruction::create_account_with_seed(
        payer,
        config,
        payer,
        seed,
        lamports,
        Config::LEN as u64,
        program_id,
    )
}

/// Allocates a route account. The new account's key must sign.
pub fn create_bridge_account(
    payer: &Pubkey,
    bridge_account: &Pubkey,
    lamports: u64,
    program_id: &Pubkey,
) -> Instruction {
    system_instruction::create_account(
        payer,
        bridge_account,
        lamports,
        BridgeAccount::LEN as u64,
        program_id,
    )
}

/// Delegates `amount` of `source` to the bridge transfer authority.
pub fn approve_transfer(
    operation: &'static str,
    token_program: &Pubkey,
    source: &Pubkey,
    transfer_authority: &Pubkey,
    owner: &Pubkey,
    amount: u64,
) -> Result<Instruction, AssembleError> {
    spl_token_2022::instruction::approve(
        token_program,
        source,
        transfer_authority,
        owner,
        &[],
        amount,
    )
    .map_err(|e| AssembleError::Approval {
        operation,
        reason: e.to_string(),
    })
}

/// An unsigned transaction together with the keys that will sign it.
pub struct Assembled<'a> {
    operation: &'static str,
    transaction: Transaction,
    signers: Vec<&'a dyn Signer>,
}

impl<'a> Assembled<'a> {
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn signer_keys(&self) -> Vec<Pubkey> {
        self.signers.iter().map(|signer| signer.pubkey()).collect()
    }

    pub fn sign(self, recent_blockhash: Hash) -> Result<Transaction, AssembleError> {
        let mut transaction = self.transaction;
        transaction
            .try_sign(&self.signers, recent_blockhash)
            .map_err(|e| AssembleError::Signing {
                operation: self.operation,
                reason: e.to_string(),
            })?;
        Ok(transaction)
    }
}

/// Orders `instructions` into one transaction paid by `payer`.
///
/// Every account flagged as signer in any instruction, and the payer, must have
/// a key in `signers`; otherwise [`AssembleError::MissingSigner`] is returned.
/// Keys that no instruction needs are dropped so signing does not fail on them.
pub fn assemble<'a>(
    operation: &'static str,
    payer: &Pubkey,
    instructions: &[Instruction],
    signers: &[&'a dyn Signer],
) -> Result<Assembled<'a>, AssembleError> {
    if instructions.is_empty() {
        return Err(AssembleError::Empty { operation });
    }

    let mut required = vec![*payer];
    for meta in instructions.iter().flat_map(|ix| ix.accounts.iter()) {
        if meta.is_signer && !required.contains(&meta.pubkey) {
            required.push(meta.pubkey);
        }
    }

    let provided: HashSet<Pubkey> = signers.iter().map(|signer| signer.pubkey()).collect();
    if let Some(missing) = required.iter().find(|key| !provided.contains(key)) {
        return Err(AssembleError::MissingSigner {
            operation,
            signer: *missing,
        });
    }

    let mut seen = HashSet::new();
    let signers: Vec<&'a dyn Signer> = signers
        .iter()
        .copied()
        .filter(|signer| {
            let key = signer.pubkey();
            required.contains(&key) && seen.insert(key)
        })
        .collect();

    debug!(
        operation,
        instructions = instructions.len(),
        signers = signers.len(),
        "assembled transaction"
    );

    Ok(Assembled {
        operation,
        transaction: Transaction::new_with_payer(instructions, Some(payer)),
        signers,
    })
}
