use anchor_lang::prelude::*;

use crate::constants::MAX_OWNER_RATE;
use crate::error::LotteryError;

/// How a pool is divided at draw time.
///
/// `owner_share + prize * winners + remainder == pooled`. The remainder goes
/// to the first selected winner, so no base unit stays behind in the vault.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayoutSplit {
    pub owner_share: u64,
    pub prize: u64,
    pub remainder: u64,
    pub winners: usize,
}

impl PayoutSplit {
    /// Prize of each winner, in selection order.
    pub fn prizes(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.winners).map(move |position| {
            if position == 0 {
                self.prize + self.remainder
            } else {
                self.prize
            }
        })
    }

    pub fn total(&self) -> u64 {
        self.prizes().sum::<u64>() + self.owner_share
    }
}

pub fn split_pot(pooled: u64, owner_rate: u8, winners: usize) -> Result<PayoutSplit> {
    require!(owner_rate <= MAX_OWNER_RATE, LotteryError::InvalidRate);
    require!(winners > 0, LotteryError::InvalidWinnersCount);

    let owner_share = u128::from(pooled) * u128::from(owner_rate) / u128::from(MAX_OWNER_RATE);
    let owner_share = u64::try_from(owner_share).map_err(|_| LotteryError::Overflow)?;
    let distributable = pooled
        .checked_sub(owner_share)
        .ok_or(LotteryError::Overflow)?;
    let winners_u64 = u64::try_from(winners).map_err(|_| LotteryError::Overflow)?;

    Ok(PayoutSplit {
        owner_share,
        prize: distributable / winners_u64,
        remainder: distributable % winners_u64,
        winners,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::assert_lottery_error;

    #[test]
    fn eleven_tickets_three_winners() {
        let split = split_pot(55_000_000, 10, 3).unwrap();

        assert_eq!(split.owner_share, 5_500_000);
        assert_eq!(split.prizes().collect::<Vec<_>>(), vec![16_500_000; 3]);
        assert_eq!(split.total(), 55_000_000);
    }

    #[test]
    fn remainder_goes_to_first_winner() {
        let split = split_pot(100, 7, 4).unwrap();

        assert_eq!(split.owner_share, 7);
        assert_eq!(split.remainder, 1);
        assert_eq!(split.prizes().collect::<Vec<_>>(), vec![24, 23, 23, 23]);
        assert_eq!(split.total(), 100);
    }

    #[test]
    fn owner_share_rounds_down() {
        let split = split_pot(999, 15, 4).unwrap();
        assert_eq!(split.owner_share, 149);
        assert_eq!(split.total(), 999);
    }

    #[test]
    fn rate_extremes() {
        let nothing_for_owner = split_pot(1_000, 0, 4).unwrap();
        assert_eq!(nothing_for_owner.owner_share, 0);
        assert_eq!(nothing_for_owner.prizes().collect::<Vec<_>>(), vec![250; 4]);

        let everything_for_owner = split_pot(1_000, 100, 4).unwrap();
        assert_eq!(everything_for_owner.owner_share, 1_000);
        assert!(everything_for_owner.prizes().all(|prize| prize == 0));
    }

    #[test]
    fn conservation() {
        for pooled in [0, 1, 2, 3, 17, 1_000_003, 55_000_000, u64::MAX] {
            for rate in [0, 1, 33, 50, 99, 100] {
                for winners in 1..=10 {
                    let split = split_pot(pooled, rate, winners).unwrap();
                    assert_eq!(
                        u128::from(split.owner_share)
                            + u128::from(split.prize) * winners as u128
                            + u128::from(split.remainder),
                        u128::from(pooled)
                    );
                    assert!(split.remainder < winners as u64);
                    assert_eq!(
                        split.owner_share,
                        (u128::from(pooled) * u128::from(rate) / 100) as u64
                    );
                }
            }
        }
    }

    #[test]
    fn invalid_inputs() {
        assert_lottery_error(split_pot(100, 101, 3), LotteryError::InvalidRate);
        assert_lottery_error(split_pot(100, 10, 0), LotteryError::InvalidWinnersCount);
    }
}
