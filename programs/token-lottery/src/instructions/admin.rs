use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::LotteryError;
use crate::events::*;
use crate::state::{Lottery, TokenPool};

/// Accounts required to initialize the lottery configuration.
/// The payer becomes the owner.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// The account paying for account creation and fees.
    #[account(mut)]
    pub payer: Signer<'info>,

    /// The Lottery state account that stores the global parameters.
    #[account(
        init,
        payer = payer,
        space = 8 + Lottery::INIT_SPACE,
        seeds = [LOTTERY_SEED],
        bump
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// System program to create accounts.
    pub system_program: Program<'info, System>,
}

/// Accounts for owner-only updates of the global parameters.
#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,
}

/// Accounts required to register a settlement token.
/// Creates the token pool and its vault on first use.
#[derive(Accounts)]
pub struct AddSupportedToken<'info> {
    /// The owner, also paying for the pool and vault rent.
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The settlement token being registered.
    #[account(mint::token_program = token_program)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + TokenPool::INIT_SPACE,
        seeds = [TOKEN_POOL_SEED, mint.key().as_ref()],
        bump,
    )]
    pub token_pool: Box<Account<'info, TokenPool>>,

    /// Holds the pooled balance; the lottery PDA is its authority.
    #[account(
        init_if_needed,
        payer = authority,
        seeds = [VAULT_SEED, mint.key().as_ref()],
        bump,
        token::mint = mint,
        token::authority = lottery,
        token::token_program = token_program,
    )]
    pub vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program interface.
    pub token_program: Interface<'info, TokenInterface>,

    /// System program interface.
    pub system_program: Program<'info, System>,
}

/// Accounts required to remove a settlement token from the registry.
#[derive(Accounts)]
pub struct RemoveSupportedToken<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// CHECK: only used to derive the pool address.
    pub mint: UncheckedAccount<'info>,

    /// CHECK: address checked by seeds, decoded in the handler so unknown
    /// mints report `UnsupportedToken`.
    #[account(
        mut,
        seeds = [TOKEN_POOL_SEED, mint.key().as_ref()],
        bump,
    )]
    pub token_pool: UncheckedAccount<'info>,
}

/// Accounts required to set the ticket price of a mint.
/// The pool is created unsupported when the mint was never registered.
#[derive(Accounts)]
pub struct SetTicketPrice<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// CHECK: only used to derive the pool address.
    pub mint: UncheckedAccount<'info>,

    #[account(
        init_if_needed,
        payer = authority,
        space = 8 + TokenPool::INIT_SPACE,
        seeds = [TOKEN_POOL_SEED, mint.key().as_ref()],
        bump,
    )]
    pub token_pool: Box<Account<'info, TokenPool>>,

    pub system_program: Program<'info, System>,
}

/// Initializes the lottery with default parameters and the payer as owner.
pub fn process_initialize(ctx: Context<Initialize>) -> Result<()> {
    let owner = ctx.accounts.payer.key();
    let lottery = &mut ctx.accounts.lottery;
    lottery.initialize(owner, ctx.bumps.lottery);

    msg!("Lottery initialized, owner: {}", owner);
    emit!(LotteryInitialized {
        owner,
        owner_rate: lottery.owner_rate,
        winners_count: lottery.winners_count,
    });
    Ok(())
}

pub fn process_transfer_ownership(ctx: Context<UpdateConfig>, new_owner: Pubkey) -> Result<()> {
    let caller = ctx.accounts.authority.key();
    ctx.accounts.lottery.transfer_ownership(&caller, new_owner)?;

    msg!("Ownership transferred from {} to {}", caller, new_owner);
    emit!(OwnershipTransferred {
        previous_owner: caller,
        new_owner,
    });
    Ok(())
}

pub fn process_set_owner_rate(ctx: Context<UpdateConfig>, rate: u8) -> Result<()> {
    let caller = ctx.accounts.authority.key();
    ctx.accounts.lottery.set_owner_rate(&caller, rate)?;

    msg!("Owner rate: {}", rate);
    emit!(OwnerRateUpdated { owner_rate: rate });
    Ok(())
}

pub fn process_set_winners_count(ctx: Context<UpdateConfig>, winners_count: u8) -> Result<()> {
    let caller = ctx.accounts.authority.key();
    ctx.accounts.lottery.set_winners_count(&caller, winners_count)?;

    msg!("Winners count: {}", winners_count);
    emit!(WinnersCountUpdated { winners_count });
    Ok(())
}

/// Registers `mint` with the default ticket price.
///
/// Re-adding a supported or previously removed mint resets its price to the
/// default and keeps any tickets already in the pool.
pub fn process_add_supported_token(ctx: Context<AddSupportedToken>) -> Result<()> {
    ctx.accounts
        .lottery
        .ensure_owner(&ctx.accounts.authority.key())?;

    let mint = ctx.accounts.mint.key();
    ctx.accounts.lottery.track_token(mint)?;

    let token_pool = &mut ctx.accounts.token_pool;
    token_pool.register(mint, ctx.bumps.token_pool);
    token_pool.list(ctx.bumps.vault);

    msg!("Supported token added: {}", mint);
    emit!(SupportedTokenAdded {
        mint,
        ticket_price: token_pool.ticket_price,
    });
    Ok(())
}

pub fn process_remove_supported_token(ctx: Context<RemoveSupportedToken>) -> Result<()> {
    ctx.accounts
        .lottery
        .ensure_owner(&ctx.accounts.authority.key())?;

    let mint = ctx.accounts.mint.key();
    let mut token_pool =
        TokenPool::load(&ctx.accounts.token_pool)?.ok_or(LotteryError::UnsupportedToken)?;
    token_pool.delist()?;
    token_pool.store(&ctx.accounts.token_pool)?;
    ctx.accounts.lottery.untrack_token(&mint);

    msg!("Supported token removed: {}", mint);
    emit!(SupportedTokenRemoved { mint });
    Ok(())
}

pub fn process_set_ticket_price(ctx: Context<SetTicketPrice>, price: u64) -> Result<()> {
    ctx.accounts
        .lottery
        .ensure_owner(&ctx.accounts.authority.key())?;

    let mint = ctx.accounts.mint.key();
    let token_pool = &mut ctx.accounts.token_pool;
    token_pool.register(mint, ctx.bumps.token_pool);
    token_pool.set_ticket_price(price)?;

    msg!("Ticket price for {}: {}", mint, price);
    emit!(TicketPriceUpdated {
        mint,
        ticket_price: price,
    });
    Ok(())
}
