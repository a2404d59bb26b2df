use anchor_lang::prelude::*;

#[error_code]
pub enum LotteryError {
    #[msg("Caller is not the lottery owner")]
    Unauthorized,
    #[msg("New owner cannot be the default address")]
    InvalidOwner,
    #[msg("Token is not supported")]
    UnsupportedToken,
    #[msg("Must buy at least 1 ticket")]
    InvalidQuantity,
    #[msg("The amount must be a multiple of the ticket price")]
    InvalidAmount,
    #[msg("Price must be greater than 0")]
    InvalidPrice,
    #[msg("Rate must be between 0 and 100")]
    InvalidRate,
    #[msg("Winners count must be greater than 3")]
    InvalidWinnersCount,
    #[msg("Not enough participants to sort the lottery")]
    InsufficientParticipants,
    #[msg("The ticket ledger for this token is full")]
    TicketLedgerFull,
    #[msg("Too many supported tokens")]
    SupportedTokensFull,
    #[msg("A draw is in progress for this token")]
    DrawInProgress,
    #[msg("No draw is in progress for this token")]
    NoDrawInProgress,
    #[msg("Incorrect randomness account")]
    IncorrectRandomnessAccount,
    #[msg("Randomness already revealed")]
    RandomnessAlreadyRevealed,
    #[msg("Randomness not resolved")]
    RandomnessNotResolved,
    #[msg("Seed does not match the committed seed")]
    SeedMismatch,
    #[msg("A token account is required for every winner")]
    WinnerAccountsMissing,
    #[msg("Winner token account does not belong to the winner")]
    WinnerAccountMismatch,
    #[msg("Arithmetic overflow")]
    Overflow,
}

#[cfg(test)]
pub(crate) fn assert_lottery_error<T: std::fmt::Debug>(result: Result<T>, expected: LotteryError) {
    assert_eq!(result.unwrap_err(), anchor_lang::error::Error::from(expected));
}
