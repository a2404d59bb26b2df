use anchor_lang::prelude::*;

#[event]
pub struct LotteryInitialized {
    pub owner: Pubkey,
    pub owner_rate: u8,
    pub winners_count: u8,
}

#[event]
pub struct OwnershipTransferred {
    pub previous_owner: Pubkey,
    pub new_owner: Pubkey,
}

#[event]
pub struct SupportedTokenAdded {
    pub mint: Pubkey,
    pub ticket_price: u64,
}

#[event]
pub struct SupportedTokenRemoved {
    pub mint: Pubkey,
}

#[event]
pub struct TicketPurchased {
    pub mint: Pubkey,
    pub buyer: Pubkey,
    pub ticket_count: u32,
    pub amount: u64,
    /// Ticket entries held by the pool after this purchase.
    pub total_tickets: u32,
}

#[event]
pub struct OwnerRateUpdated {
    pub owner_rate: u8,
}

#[event]
pub struct TicketPriceUpdated {
    pub mint: Pubkey,
    pub ticket_price: u64,
}

#[event]
pub struct WinnersCountUpdated {
    pub winners_count: u8,
}

#[event]
pub struct RandomnessCommitted {
    pub mint: Pubkey,
    pub round: u64,
    pub randomness_account: Pubkey,
    /// Winners the committed draw will select.
    pub winners_count: u8,
}

#[event]
pub struct RandomnessCancelled {
    pub mint: Pubkey,
    pub round: u64,
}

/// Emitted once per successful draw. `round` identifies the draw that just
/// closed; off-chain indexers record `winners` under it.
#[event]
pub struct Payout {
    pub mint: Pubkey,
    pub round: u64,
    pub pooled_balance: u64,
    pub owner: Pubkey,
    pub owner_share: u64,
    pub winners: Vec<Pubkey>,
    pub prizes: Vec<u64>,
}

#[event]
pub struct PrizeTransferred {
    pub mint: Pubkey,
    pub round: u64,
    pub winner: Pubkey,
    pub amount: u64,
}
