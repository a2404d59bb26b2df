use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};

use crate::constants::*;
use crate::error::LotteryError;
use crate::events::TicketPurchased;
use crate::state::TokenPool;

/// Accounts required to buy lottery tickets.
/// Handles:
/// - Ticket ledger update
/// - Payment transfer into the pool's vault
#[derive(Accounts)]
pub struct BuyTicket<'info> {
    /// The account paying for the tickets and holding them afterwards.
    #[account(mut)]
    pub buyer: Signer<'info>,

    /// The settlement token the tickets are paid in.
    #[account(mint::token_program = token_program)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// TokenPool state account tracking the tickets of this mint.
    /// CHECK: address checked by seeds, decoded in the handler so unknown
    /// mints report `UnsupportedToken`.
    #[account(
        mut,
        seeds = [TOKEN_POOL_SEED, mint.key().as_ref()],
        bump,
    )]
    pub token_pool: UncheckedAccount<'info>,

    /// Vault receiving the payment. Created with the pool by
    /// `add_supported_token`; the token program checks its mint.
    /// CHECK: address checked by seeds.
    #[account(
        mut,
        seeds = [VAULT_SEED, mint.key().as_ref()],
        bump,
    )]
    pub vault: UncheckedAccount<'info>,

    /// Source of the payment, owned by the buyer.
    #[account(
        mut,
        token::mint = mint,
        token::authority = buyer,
        token::token_program = token_program,
    )]
    pub buyer_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Token program interface
    pub token_program: Interface<'info, TokenInterface>,
}

/// Buys `ticket_count` tickets for `amount` base units.
///
/// Steps performed:
/// 1. Check the mint is supported, the quantity and the exact amount.
/// 2. Append one ledger entry per ticket for the buyer.
/// 3. Transfer `amount` from the buyer to the pool's vault.
///
/// The ledger is updated before the transfer CPI; a failed transfer aborts
/// the whole instruction.
pub fn process_buy_ticket(ctx: Context<BuyTicket>, amount: u64, ticket_count: u32) -> Result<()> {
    let buyer = ctx.accounts.buyer.key();
    let mint = ctx.accounts.mint.key();

    let mut token_pool =
        TokenPool::load(&ctx.accounts.token_pool)?.ok_or(LotteryError::UnsupportedToken)?;
    token_pool.record_purchase(buyer, amount, ticket_count)?;
    token_pool.store(&ctx.accounts.token_pool)?;
    let total_tickets = token_pool.entries.len() as u32;

    token_interface::transfer_checked(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            TransferChecked {
                from: ctx.accounts.buyer_token_account.to_account_info(),
                mint: ctx.accounts.mint.to_account_info(),
                to: ctx.accounts.vault.to_account_info(),
                authority: ctx.accounts.buyer.to_account_info(),
            },
        ),
        amount,
        ctx.accounts.mint.decimals,
    )?;

    msg!("Tickets bought: {} for {}", ticket_count, buyer);
    msg!("Ticket num: {}", total_tickets);

    emit!(TicketPurchased {
        mint,
        buyer,
        ticket_count,
        amount,
        total_tickets,
    });
    Ok(())
}
