use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::constants::*;
use crate::state::{Lottery, TokenPool};

/// Read-only access to the global parameters. Open to any caller.
#[derive(Accounts)]
pub struct LotteryView<'info> {
    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,
}

/// Read-only access to one mint's pool. Open to any caller.
///
/// The pool and vault may not exist yet; unknown mints read as unsupported.
#[derive(Accounts)]
pub struct PoolView<'info> {
    /// CHECK: only used to derive the pool address.
    pub mint: UncheckedAccount<'info>,

    /// CHECK: address checked by seeds, data decoded in the handler.
    #[account(
        seeds = [TOKEN_POOL_SEED, mint.key().as_ref()],
        bump,
    )]
    pub token_pool: UncheckedAccount<'info>,

    /// CHECK: address checked by seeds, data decoded in the handler.
    #[account(
        seeds = [VAULT_SEED, mint.key().as_ref()],
        bump,
    )]
    pub vault: UncheckedAccount<'info>,
}

/// Token amount held by a vault, zero when the vault was never created.
pub(crate) fn vault_balance(vault: &AccountInfo) -> Result<u64> {
    if vault.data_is_empty() {
        return Ok(0);
    }
    let data = vault.try_borrow_data()?;
    let token_account = TokenAccount::try_deserialize(&mut &data[..])?;
    Ok(token_account.amount)
}

pub fn process_get_owner(ctx: Context<LotteryView>) -> Result<Pubkey> {
    Ok(ctx.accounts.lottery.owner)
}

pub fn process_get_owner_rate(ctx: Context<LotteryView>) -> Result<u8> {
    Ok(ctx.accounts.lottery.owner_rate)
}

pub fn process_get_winners_count(ctx: Context<LotteryView>) -> Result<u8> {
    Ok(ctx.accounts.lottery.winners_count)
}

pub fn process_get_supported_tokens(ctx: Context<LotteryView>) -> Result<Vec<Pubkey>> {
    Ok(ctx.accounts.lottery.supported_tokens.clone())
}

pub fn process_is_token_supported(ctx: Context<PoolView>) -> Result<bool> {
    Ok(TokenPool::load(&ctx.accounts.token_pool)?.map_or(false, |token_pool| token_pool.supported))
}

pub fn process_get_ticket_price(ctx: Context<PoolView>) -> Result<u64> {
    TokenPool::load_supported(&ctx.accounts.token_pool)?.current_ticket_price()
}

pub fn process_get_participants_count(ctx: Context<PoolView>) -> Result<u32> {
    let token_pool = TokenPool::load_supported(&ctx.accounts.token_pool)?;
    Ok(token_pool.entries.len() as u32)
}

/// One page of the ticket ledger. Return data holds at most
/// `MAX_RETURN_PUBKEYS` keys; larger `limit`s are clamped. Clients wanting
/// the whole ledger at once read the `TokenPool` account directly.
pub fn process_get_participants(
    ctx: Context<PoolView>,
    offset: u32,
    limit: u32,
) -> Result<Vec<Pubkey>> {
    let token_pool = TokenPool::load_supported(&ctx.accounts.token_pool)?;
    Ok(token_pool.participants_page(offset, limit))
}

pub fn process_get_winners(ctx: Context<PoolView>) -> Result<Vec<Pubkey>> {
    Ok(TokenPool::load_supported(&ctx.accounts.token_pool)?.winners)
}

/// Balance held by the vault, zero when the mint was never supported.
pub fn process_get_pool_balance(ctx: Context<PoolView>) -> Result<u64> {
    vault_balance(&ctx.accounts.vault)
}
