use anchor_lang::prelude::*;
use instructions::*;

pub mod constants;
pub mod draw;
pub mod error;
pub mod events;
pub mod instructions;
pub mod payout;
pub mod state;

declare_id!("2QrQAkUawhZkPkw7XKFumea4hT7tiVexoXNdJ4RAL3gY");

#[program]
pub mod token_lottery {
    use super::*;

    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        process_initialize(ctx)
    }

    pub fn transfer_ownership(ctx: Context<UpdateConfig>, new_owner: Pubkey) -> Result<()> {
        process_transfer_ownership(ctx, new_owner)
    }

    pub fn add_supported_token(ctx: Context<AddSupportedToken>) -> Result<()> {
        process_add_supported_token(ctx)
    }

    pub fn remove_supported_token(ctx: Context<RemoveSupportedToken>) -> Result<()> {
        process_remove_supported_token(ctx)
    }

    pub fn buy_ticket(ctx: Context<BuyTicket>, amount: u64, ticket_count: u32) -> Result<()> {
        process_buy_ticket(ctx, amount, ticket_count)
    }

    pub fn set_owner_rate(ctx: Context<UpdateConfig>, rate: u8) -> Result<()> {
        process_set_owner_rate(ctx, rate)
    }

    pub fn set_ticket_price(ctx: Context<SetTicketPrice>, price: u64) -> Result<()> {
        process_set_ticket_price(ctx, price)
    }

    pub fn set_winners_count(ctx: Context<UpdateConfig>, winners_count: u8) -> Result<()> {
        process_set_winners_count(ctx, winners_count)
    }

    pub fn commit_randomness(
        ctx: Context<CommitRandomness>,
        seed_commitment: [u8; 32],
    ) -> Result<()> {
        process_commit_randomness(ctx, seed_commitment)
    }

    pub fn cancel_randomness(ctx: Context<CommitRandomness>) -> Result<()> {
        process_cancel_randomness(ctx)
    }

    pub fn sort<'info>(ctx: Context<'_, '_, 'info, 'info, Sort<'info>>, seed: String) -> Result<()> {
        process_sort(ctx, seed)
    }

    pub fn get_owner(ctx: Context<LotteryView>) -> Result<Pubkey> {
        process_get_owner(ctx)
    }

    pub fn get_owner_rate(ctx: Context<LotteryView>) -> Result<u8> {
        process_get_owner_rate(ctx)
    }

    pub fn get_winners_count(ctx: Context<LotteryView>) -> Result<u8> {
        process_get_winners_count(ctx)
    }

    pub fn get_supported_tokens(ctx: Context<LotteryView>) -> Result<Vec<Pubkey>> {
        process_get_supported_tokens(ctx)
    }

    pub fn is_token_supported(ctx: Context<PoolView>) -> Result<bool> {
        process_is_token_supported(ctx)
    }

    pub fn get_ticket_price(ctx: Context<PoolView>) -> Result<u64> {
        process_get_ticket_price(ctx)
    }

    pub fn get_participants(
        ctx: Context<PoolView>,
        offset: u32,
        limit: u32,
    ) -> Result<Vec<Pubkey>> {
        process_get_participants(ctx, offset, limit)
    }

    pub fn get_participants_count(ctx: Context<PoolView>) -> Result<u32> {
        process_get_participants_count(ctx)
    }

    pub fn get_winners(ctx: Context<PoolView>) -> Result<Vec<Pubkey>> {
        process_get_winners(ctx)
    }

    pub fn get_pool_balance(ctx: Context<PoolView>) -> Result<u64> {
        process_get_pool_balance(ctx)
    }
}
