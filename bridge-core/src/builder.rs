//! Instruction builders. The program reads accounts positionally, so each
//! `metas()` order below is part of the wire contract.
//!
//! Builders do not validate amounts or limits; the program does, and the
//! values given here are encoded exactly as supplied.

use crate::instruction::BridgeInstruction;
use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;

fn instruction(program_id: &Pubkey, accounts: Vec<AccountMeta>, data: BridgeInstruction) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts,
        data: data.pack(),
    }
}

/// Accounts for [`BridgeInstruction::Config`].
///
/// 0. `[writable]` config, pre-allocated at `Config::LEN`
/// 1. `[]` owner
/// 2. `[]` authority
/// 3. `[]` fee collector
#[derive(Clone, Debug)]
pub struct ConfigAccounts {
    pub config: Pubkey,
    pub owner: Pubkey,
    pub authority: Pubkey,
    pub fee_collector: Pubkey,
}

impl ConfigAccounts {
    pub fn metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.config, false),
            AccountMeta::new_readonly(self.owner, false),
            AccountMeta::new_readonly(self.authority, false),
            AccountMeta::new_readonly(self.fee_collector, false),
        ]
    }
}

pub fn initialize_config(program_id: &Pubkey, accounts: &ConfigAccounts, fee: u64) -> Instruction {
    instruction(program_id, accounts.metas(), BridgeInstruction::Config { fee })
}

/// 0. `[writable]` config
/// 1. `[signer]` current owner
/// 2. `[]` new owner
pub fn transfer_owner(
    program_id: &Pubkey,
    config: &Pubkey,
    owner: &Pubkey,
    new_owner: &Pubkey,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new(*config, false),
        AccountMeta::new_readonly(*owner, true),
        AccountMeta::new_readonly(*new_owner, false),
    ];
    instruction(program_id, accounts, BridgeInstruction::TransferOwner)
}

/// 0. `[writable]` config
/// 1. `[signer]` owner
/// 2. `[]` new authority
pub fn change_authority(
    program_id: &Pubkey,
    config: &Pubkey,
    owner: &Pubkey,
    new_authority: &Pubkey,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new(*config, false),
        AccountMeta::new_readonly(*owner, true),
        AccountMeta::new_readonly(*new_authority, false),
    ];
    instruction(program_id, accounts, BridgeInstruction::ChangeAuthority)
}

/// 0. `[writable]` config
/// 1. `[signer]` owner
/// 2. `[]` fee collector, only when `fee > 0`
pub fn change_fee(
    program_id: &Pubkey,
    config: &Pubkey,
    owner: &Pubkey,
    fee_collector: &Pubkey,
    fee: u64,
) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new(*config, false),
        AccountMeta::new_readonly(*owner, true),
    ];
    if fee > 0 {
        accounts.push(AccountMeta::new_readonly(*fee_collector, false));
    }
    instruction(program_id, accounts, BridgeInstruction::ChangeFee { fee })
}

/// Accounts for [`BridgeInstruction::Create`].
///
/// 0. `[writable]` bridge account, pre-allocated at `BridgeAccount::LEN`
/// 1. `[]` token authority (see [`crate::utils::find_token_authority`])
/// 2. `[]` token mint
/// 3. `[]` route token account
/// 4. `[]` token program
/// 5. `[signer]` config owner
/// 6. `[]` config
#[derive(Clone, Debug)]
pub struct CreateAccounts {
    pub bridge_account: Pubkey,
    pub token_authority: Pubkey,
    pub token_mint: Pubkey,
    pub token_account: Pubkey,
    pub token_program: Pubkey,
    pub owner: Pubkey,
    pub config: Pubkey,
}

impl CreateAccounts {
    pub fn metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.bridge_account, false),
            AccountMeta::new_readonly(self.token_authority, false),
            AccountMeta::new_readonly(self.token_mint, false),
            AccountMeta::new_readonly(self.token_account, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.owner, true),
            AccountMeta::new_readonly(self.config, false),
        ]
    }
}

pub fn create(
    program_id: &Pubkey,
    accounts: &CreateAccounts,
    destination: u32,
    max: u64,
    min: u64,
) -> Instruction {
    instruction(
        program_id,
        accounts.metas(),
        BridgeInstruction::Create {
            destination,
            max,
            min,
        },
    )
}

/// 0. `[]` config
/// 1. `[writable]` bridge account
/// 2. `[signer]` config owner
pub fn change_limit(
    program_id: &Pubkey,
    config: &Pubkey,
    bridge_account: &Pubkey,
    owner: &Pubkey,
    max: u64,
    min: u64,
) -> Instruction {
    let accounts = vec![
        AccountMeta::new_readonly(*config, false),
        AccountMeta::new(*bridge_account, false),
        AccountMeta::new_readonly(*owner, true),
    ];
    instruction(program_id, accounts, BridgeInstruction::ChangeLimit { max, min })
}

/// Fee accounts the program reads after `config` when the config charges a fee.
#[derive(Clone, Debug)]
pub struct BridgeFee {
    pub payer: Pubkey,
    pub fee_collector: Pubkey,
}

/// Accounts for [`BridgeInstruction::Bridge`].
///
/// 0. `[writable]` bridge account
/// 1. `[writable]` route token account
/// 2. `[writable]` user token account (source)
/// 3. `[signer]` user transfer authority
/// 4. `[writable]` token mint
/// 5. `[]` token program
/// 6. `[]` config
/// 7. `[writable, signer]` fee payer, only with [`BridgeFee`]
/// 8. `[writable]` fee collector, only with [`BridgeFee`]
#[derive(Clone, Debug)]
pub struct BridgeAccounts {
    pub bridge_account: Pubkey,
    pub token_account: Pubkey,
    pub user_account: Pubkey,
    pub user_transfer_authority: Pubkey,
    pub token_mint: Pubkey,
    pub token_program: Pubkey,
    pub config: Pubkey,
    pub fee: Option<BridgeFee>,
}

impl BridgeAccounts {
    pub fn metas(&self) -> Vec<AccountMeta> {
        let mut metas = vec![
            AccountMeta::new(self.bridge_account, false),
            AccountMeta::new(self.token_account, false),
            AccountMeta::new(self.user_account, false),
            AccountMeta::new_readonly(self.user_transfer_authority, true),
            AccountMeta::new(self.token_mint, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.config, false),
        ];
        if let Some(fee) = &self.fee {
            metas.push(AccountMeta::new(fee.payer, true));
            metas.push(AccountMeta::new(fee.fee_collector, false));
        }
        metas
    }
}

pub fn bridge(
    program_id: &Pubkey,
    accounts: &BridgeAccounts,
    amount: u64,
    recipient: &str,
    payload: &[u8],
) -> Instruction {
    instruction(
        program_id,
        accounts.metas(),
        BridgeInstruction::Bridge {
            amount,
            recipient: recipient.to_string(),
            payload: payload.to_vec(),
        },
    )
}

/// Accounts for [`BridgeInstruction::Settle`].
///
/// 0. `[]` bridge account
/// 1. `[]` token authority
/// 2. `[writable]` route token account
/// 3. `[writable]` user token account (destination)
/// 4. `[signer]` config authority
/// 5. `[writable]` token mint
/// 6. `[]` token program
/// 7. `[]` config
#[derive(Clone, Debug)]
pub struct SettleAccounts {
    pub bridge_account: Pubkey,
    pub token_authority: Pubkey,
    pub token_account: Pubkey,
    pub user_account: Pubkey,
    pub authority: Pubkey,
    pub token_mint: Pubkey,
    pub token_program: Pubkey,
    pub config: Pubkey,
}

impl SettleAccounts {
    pub fn metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(self.bridge_account, false),
            AccountMeta::new_readonly(self.token_authority, false),
            AccountMeta::new(self.token_account, false),
            AccountMeta::new(self.user_account, false),
            AccountMeta::new_readonly(self.authority, true),
            AccountMeta::new(self.token_mint, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.config, false),
        ]
    }
}

pub fn settle(program_id: &Pubkey, accounts: &SettleAccounts, amount: u64) -> Instruction {
    instruction(program_id, accounts.metas(), BridgeInstruction::Settle { amount })
}
