use std::collections::BTreeSet;

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::LotteryError;

/// Global lottery configuration.
///
/// Holds the parameters shared by every token pool and the owner that
/// governs them. The PDA also acts as the authority of every vault.
#[account]
#[derive(InitSpace)]
pub struct Lottery {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// The admin allowed to call every owner-only instruction and
    /// receiving the commission on each draw.
    pub owner: Pubkey,

    /// Percentage (0..=100) of a pool kept by the owner on each draw.
    pub owner_rate: u8,

    /// Number of distinct winners drawn from a pool.
    pub winners_count: u8,

    /// Mints currently accepted for ticket purchases, in registration order.
    #[max_len(MAX_SUPPORTED_TOKENS)]
    pub supported_tokens: Vec<Pubkey>,
}

impl Lottery {
    pub fn initialize(&mut self, owner: Pubkey, bump: u8) {
        self.bump = bump;
        self.owner = owner;
        self.owner_rate = DEFAULT_OWNER_RATE;
        self.winners_count = DEFAULT_WINNERS_COUNT;
        self.supported_tokens = Vec::new();
    }

    pub fn ensure_owner(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.owner, LotteryError::Unauthorized);
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: &Pubkey, new_owner: Pubkey) -> Result<()> {
        self.ensure_owner(caller)?;
        require_keys_neq!(new_owner, Pubkey::default(), LotteryError::InvalidOwner);
        self.owner = new_owner;
        Ok(())
    }

    pub fn set_owner_rate(&mut self, caller: &Pubkey, rate: u8) -> Result<()> {
        self.ensure_owner(caller)?;
        require!(rate <= MAX_OWNER_RATE, LotteryError::InvalidRate);
        self.owner_rate = rate;
        Ok(())
    }

    pub fn set_winners_count(&mut self, caller: &Pubkey, winners_count: u8) -> Result<()> {
        self.ensure_owner(caller)?;
        require!(
            winners_count > MIN_WINNERS_COUNT && usize::from(winners_count) <= MAX_WINNERS,
            LotteryError::InvalidWinnersCount
        );
        self.winners_count = winners_count;
        Ok(())
    }

    /// Adds `mint` to the supported list. Already listed mints are left in place.
    pub fn track_token(&mut self, mint: Pubkey) -> Result<()> {
        if self.supported_tokens.contains(&mint) {
            return Ok(());
        }
        require!(
            self.supported_tokens.len() < MAX_SUPPORTED_TOKENS,
            LotteryError::SupportedTokensFull
        );
        self.supported_tokens.push(mint);
        Ok(())
    }

    pub fn untrack_token(&mut self, mint: &Pubkey) {
        self.supported_tokens.retain(|listed| listed != mint);
    }
}

/// Lifecycle of a pool between two draws.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum PoolStatus {
    /// Accepting ticket purchases.
    Open,
    /// Randomness committed; purchases are frozen until `sort` or a cancel.
    Drawing,
}

/// Per-mint ticket ledger and registry entry.
#[account]
#[derive(Debug, InitSpace)]
pub struct TokenPool {
    /// The bump seed used for deriving the PDA address of this account.
    pub bump: u8,

    /// Bump of the vault token account. Set once the token is first supported.
    pub vault_bump: u8,

    /// The settlement token this pool is denominated in.
    pub mint: Pubkey,

    /// Whether the mint is currently in the registry.
    pub supported: bool,

    /// Price of one ticket in the mint's base units.
    pub ticket_price: u64,

    /// Number of draws completed for this mint. Identifies the open draw.
    pub round: u64,

    pub status: PoolStatus,

    /// Switchboard randomness account committed for the pending draw,
    /// `Pubkey::default()` when none is committed.
    pub randomness_account: Pubkey,

    /// Hash of the seed the owner will reveal in `sort`.
    pub seed_commitment: [u8; 32],

    /// Winners count frozen with the commitment; later config changes
    /// apply from the next round on.
    pub draw_winners_count: u8,

    /// Slot of the commitment, start of the expiry window.
    pub committed_slot: u64,

    /// One entry per ticket, owner repeated for every ticket it holds.
    #[max_len(MAX_TICKETS)]
    pub entries: Vec<Pubkey>,

    /// Winners of the most recent draw, in selection order.
    #[max_len(MAX_WINNERS)]
    pub winners: Vec<Pubkey>,
}

impl TokenPool {
    /// Decodes the pool stored at `account_info`. `None` when the program
    /// never created it.
    pub fn load(account_info: &AccountInfo) -> Result<Option<TokenPool>> {
        if account_info.owner != &crate::ID || account_info.data_is_empty() {
            return Ok(None);
        }
        let data = account_info.try_borrow_data()?;
        Ok(Some(TokenPool::try_deserialize(&mut &data[..])?))
    }

    /// Like [`TokenPool::load`], with unknown and removed mints both
    /// reported as unsupported.
    pub fn load_supported(account_info: &AccountInfo) -> Result<TokenPool> {
        let token_pool = Self::load(account_info)?.ok_or(LotteryError::UnsupportedToken)?;
        token_pool.ensure_supported()?;
        Ok(token_pool)
    }

    pub fn store(&self, account_info: &AccountInfo) -> Result<()> {
        require_keys_eq!(*account_info.owner, crate::ID, LotteryError::UnsupportedToken);
        let mut data = account_info.try_borrow_mut_data()?;
        let mut writer: &mut [u8] = &mut data[..];
        self.try_serialize(&mut writer)
    }

    /// Binds a freshly created pool to its mint. No-op for existing pools.
    pub fn register(&mut self, mint: Pubkey, bump: u8) {
        if self.mint == Pubkey::default() {
            self.mint = mint;
            self.bump = bump;
            self.status = PoolStatus::Open;
        }
    }

    pub fn ensure_supported(&self) -> Result<()> {
        require!(self.supported, LotteryError::UnsupportedToken);
        Ok(())
    }

    /// Puts the mint in the registry with the default ticket price.
    pub fn list(&mut self, vault_bump: u8) {
        self.vault_bump = vault_bump;
        self.supported = true;
        self.ticket_price = DEFAULT_TICKET_PRICE;
    }

    pub fn delist(&mut self) -> Result<()> {
        self.ensure_supported()?;
        require!(self.status == PoolStatus::Open, LotteryError::DrawInProgress);
        self.supported = false;
        Ok(())
    }

    pub fn current_ticket_price(&self) -> Result<u64> {
        self.ensure_supported()?;
        Ok(self.ticket_price)
    }

    pub fn set_ticket_price(&mut self, price: u64) -> Result<()> {
        require!(price > 0, LotteryError::InvalidPrice);
        self.ticket_price = price;
        Ok(())
    }

    /// Validates a purchase and appends one entry per ticket for `buyer`.
    ///
    /// Nothing is written unless every check passes.
    pub fn record_purchase(&mut self, buyer: Pubkey, amount: u64, ticket_count: u32) -> Result<()> {
        self.ensure_supported()?;
        require!(ticket_count >= 1, LotteryError::InvalidQuantity);
        let expected = self
            .ticket_price
            .checked_mul(u64::from(ticket_count))
            .ok_or(LotteryError::InvalidAmount)?;
        require!(amount == expected, LotteryError::InvalidAmount);
        require!(self.status == PoolStatus::Open, LotteryError::DrawInProgress);

        let ticket_count = ticket_count as usize;
        require!(
            ticket_count <= MAX_TICKETS - self.entries.len(),
            LotteryError::TicketLedgerFull
        );
        self.entries.extend(std::iter::repeat(buyer).take(ticket_count));
        Ok(())
    }

    /// At most [`MAX_RETURN_PUBKEYS`] ledger entries starting at `offset`.
    pub fn participants_page(&self, offset: u32, limit: u32) -> Vec<Pubkey> {
        let limit = (limit as usize).min(MAX_RETURN_PUBKEYS);
        self.entries
            .iter()
            .skip(offset as usize)
            .take(limit)
            .copied()
            .collect()
    }

    pub fn distinct_participants(&self) -> usize {
        self.entries.iter().collect::<BTreeSet<_>>().len()
    }

    /// A replacement-free draw needs `winners_count` tickets held by at
    /// least `winners_count` different owners.
    pub fn ensure_drawable(&self, winners_count: u8) -> Result<()> {
        self.ensure_supported()?;
        let winners_count = usize::from(winners_count);
        require!(
            self.entries.len() >= winners_count && self.distinct_participants() >= winners_count,
            LotteryError::InsufficientParticipants
        );
        Ok(())
    }

    pub fn has_committed_randomness(&self) -> bool {
        self.randomness_account != Pubkey::default()
    }

    /// Winners the next `sort` selects: the committed count while drawing,
    /// the configured one otherwise.
    pub fn draw_winners_count(&self, configured: u8) -> u8 {
        match self.status {
            PoolStatus::Drawing => self.draw_winners_count,
            PoolStatus::Open => configured,
        }
    }

    /// Freezes the pool for a committed draw. The pool must already be
    /// drawable with `winners_count` so the reveal can always be settled.
    pub fn begin_draw(
        &mut self,
        winners_count: u8,
        randomness_account: Pubkey,
        seed_commitment: [u8; 32],
        slot: u64,
    ) -> Result<()> {
        self.ensure_supported()?;
        require!(self.status == PoolStatus::Open, LotteryError::DrawInProgress);
        self.ensure_drawable(winners_count)?;
        self.randomness_account = randomness_account;
        self.seed_commitment = seed_commitment;
        self.draw_winners_count = winners_count;
        self.committed_slot = slot;
        self.status = PoolStatus::Drawing;
        Ok(())
    }

    /// A committed draw may be cancelled before its value is revealed, or
    /// once [`DRAW_EXPIRY_SLOTS`] have passed without a settlement.
    pub fn ensure_cancellable(&self, revealed: bool, slot: u64) -> Result<()> {
        require!(self.status == PoolStatus::Drawing, LotteryError::NoDrawInProgress);
        if revealed {
            require!(
                slot >= self.committed_slot.saturating_add(DRAW_EXPIRY_SLOTS),
                LotteryError::RandomnessAlreadyRevealed
            );
        }
        Ok(())
    }

    pub fn cancel_draw(&mut self) -> Result<()> {
        require!(self.status == PoolStatus::Drawing, LotteryError::NoDrawInProgress);
        self.clear_commitment();
        Ok(())
    }

    /// Closes the current round: the ledger is emptied and `winners`
    /// becomes the new winner record.
    pub fn settle_draw(&mut self, winners: Vec<Pubkey>) -> Result<()> {
        self.entries.clear();
        self.winners = winners;
        self.round = self.round.checked_add(1).ok_or(LotteryError::Overflow)?;
        self.clear_commitment();
        Ok(())
    }

    fn clear_commitment(&mut self) {
        self.randomness_account = Pubkey::default();
        self.seed_commitment = [0u8; 32];
        self.draw_winners_count = 0;
        self.committed_slot = 0;
        self.status = PoolStatus::Open;
    }
}

#[cfg(test)]
impl Lottery {
    pub(crate) fn new_for_test(owner: Pubkey) -> Self {
        let mut lottery = Lottery {
            bump: 0,
            owner: Pubkey::default(),
            owner_rate: 0,
            winners_count: 0,
            supported_tokens: Vec::new(),
        };
        lottery.initialize(owner, 255);
        lottery
    }
}

#[cfg(test)]
impl TokenPool {
    /// A supported pool at the default price.
    pub(crate) fn new_for_test(mint: Pubkey) -> Self {
        let mut pool = TokenPool {
            bump: 0,
            vault_bump: 0,
            mint: Pubkey::default(),
            supported: false,
            ticket_price: 0,
            round: 0,
            status: PoolStatus::Open,
            randomness_account: Pubkey::default(),
            seed_commitment: [0u8; 32],
            draw_winners_count: 0,
            committed_slot: 0,
            entries: Vec::new(),
            winners: Vec::new(),
        };
        pool.register(mint, 254);
        pool.list(253);
        pool
    }
}
