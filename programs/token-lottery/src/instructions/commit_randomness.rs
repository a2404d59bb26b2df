use anchor_lang::prelude::*;
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::*;
use crate::error::LotteryError;
use crate::events::{RandomnessCancelled, RandomnessCommitted};
use crate::state::{Lottery, PoolStatus, TokenPool};

/// Accounts required to commit or cancel a randomness account for a pool.
///
/// Ensures:
/// 1. Only the owner of the lottery can commit the randomness.
/// 2. The randomness account is valid and has not been revealed previously.
#[derive(Accounts)]
pub struct CommitRandomness<'info> {
    pub authority: Signer<'info>,

    /// The main lottery state account.
    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// CHECK: only used to derive the pool address.
    pub mint: UncheckedAccount<'info>,

    /// The pool whose next draw uses the randomness.
    /// CHECK: address checked by seeds, decoded in the handler so unknown
    /// mints report `UnsupportedToken`.
    #[account(
        mut,
        seeds = [TOKEN_POOL_SEED, mint.key().as_ref()],
        bump,
    )]
    pub token_pool: UncheckedAccount<'info>,

    /// Randomness account from Switchboard.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: UncheckedAccount<'info>,
}

/// Randomness requested for the previous slot and not yet revealed.
pub fn check_fresh_randomness(seed_slot: u64, slot: u64) -> Result<()> {
    require!(
        seed_slot == slot.saturating_sub(1),
        LotteryError::RandomnessAlreadyRevealed
    );
    Ok(())
}

/// Binds a fresh Switchboard randomness account and a seed commitment to the
/// pool's next draw. Purchases stay frozen until `sort` or a cancel.
pub fn process_commit_randomness(
    ctx: Context<CommitRandomness>,
    seed_commitment: [u8; 32],
) -> Result<()> {
    let clock = Clock::get()?;
    let lottery = &ctx.accounts.lottery;
    lottery.ensure_owner(&ctx.accounts.authority.key())?;
    let mut token_pool = TokenPool::load_supported(&ctx.accounts.token_pool)?;

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| LotteryError::IncorrectRandomnessAccount)?;
    check_fresh_randomness(randomness_data.seed_slot, clock.slot)?;

    let randomness_account = ctx.accounts.randomness_account_data.key();
    token_pool.begin_draw(
        lottery.winners_count,
        randomness_account,
        seed_commitment,
        clock.slot,
    )?;
    token_pool.store(&ctx.accounts.token_pool)?;

    msg!("Randomness committed: {}", randomness_account);
    emit!(RandomnessCommitted {
        mint: token_pool.mint,
        round: token_pool.round,
        randomness_account,
        winners_count: token_pool.draw_winners_count,
    });
    Ok(())
}

/// Reopens a pool whose committed randomness was never revealed, or whose
/// revealed draw expired without being settled.
pub fn process_cancel_randomness(ctx: Context<CommitRandomness>) -> Result<()> {
    let clock = Clock::get()?;
    ctx.accounts
        .lottery
        .ensure_owner(&ctx.accounts.authority.key())?;
    let mut token_pool =
        TokenPool::load(&ctx.accounts.token_pool)?.ok_or(LotteryError::UnsupportedToken)?;

    require!(
        token_pool.status == PoolStatus::Drawing,
        LotteryError::NoDrawInProgress
    );
    require_keys_eq!(
        ctx.accounts.randomness_account_data.key(),
        token_pool.randomness_account,
        LotteryError::IncorrectRandomnessAccount
    );

    let randomness_data =
        RandomnessAccountData::parse(ctx.accounts.randomness_account_data.data.borrow())
            .map_err(|_| LotteryError::IncorrectRandomnessAccount)?;
    let revealed = randomness_data.get_value(&clock).is_ok();
    token_pool.ensure_cancellable(revealed, clock.slot)?;

    token_pool.cancel_draw()?;
    token_pool.store(&ctx.accounts.token_pool)?;

    msg!("Randomness cancelled for round {}", token_pool.round);
    emit!(RandomnessCancelled {
        mint: token_pool.mint,
        round: token_pool.round,
    });
    Ok(())
}
