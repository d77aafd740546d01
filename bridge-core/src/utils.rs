use solana_program::pubkey::{Pubkey, PubkeyError};

/// Program address that owns a route's token account and mint authority.
/// Seeded with the route account's key only.
pub fn find_token_authority(program_id: &Pubkey, bridge_account: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[bridge_account.as_ref()], program_id)
}

/// Address of a config account created with `create_account_with_seed`.
pub fn config_address_with_seed(
    base: &Pubkey,
    seed: &str,
    program_id: &Pubkey,
) -> Result<Pubkey, PubkeyError> {
    Pubkey::create_with_seed(base, seed, program_id)
}
