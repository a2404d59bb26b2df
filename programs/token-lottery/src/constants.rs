use solana_program::program::MAX_RETURN_DATA;

/// Seed of the global `Lottery` config PDA. It also signs for every vault.
pub const LOTTERY_SEED: &[u8] = b"token_lottery";

/// Seed prefix of the per-mint `TokenPool` PDA.
pub const TOKEN_POOL_SEED: &[u8] = b"token_pool";

/// Seed prefix of the per-mint vault token account.
pub const VAULT_SEED: &[u8] = b"vault";

/// Ticket price written by `add_supported_token`: 5 units of a 6-decimal token.
pub const DEFAULT_TICKET_PRICE: u64 = 5_000_000;

/// Percentage of the pot kept by the owner right after `initialize`.
pub const DEFAULT_OWNER_RATE: u8 = 10;

pub const MAX_OWNER_RATE: u8 = 100;

/// Winners per draw right after `initialize`.
pub const DEFAULT_WINNERS_COUNT: u8 = 3;

/// `set_winners_count` only accepts values strictly above this.
pub const MIN_WINNERS_COUNT: u8 = 3;

/// Upper bound of winners per draw (storage of `TokenPool::winners`).
pub const MAX_WINNERS: usize = 10;

/// Ticket entries a single pool can hold between two draws.
pub const MAX_TICKETS: usize = 256;

/// Keys that fit in one `Vec<Pubkey>` of return data (4-byte length prefix).
pub const MAX_RETURN_PUBKEYS: usize = (MAX_RETURN_DATA - 4) / 32;

/// Slots after a commit once a revealed draw may still be cancelled,
/// roughly one day of 400ms slots.
pub const DRAW_EXPIRY_SLOTS: u64 = 216_000;

pub const MAX_SUPPORTED_TOKENS: usize = 16;

/// Domain separator mixed into every draw's entropy.
pub const DRAW_DOMAIN: &[u8] = b"token_lottery/draw";
