use anchor_lang::prelude::*;
use anchor_spl::token_interface::{self, Mint, TokenAccount, TokenInterface, TransferChecked};
use switchboard_on_demand::accounts::RandomnessAccountData;

use crate::constants::*;
use crate::draw::{draw_entropy, seed_commitment, select_winners};
use crate::error::LotteryError;
use crate::events::{Payout, PrizeTransferred};
use crate::instructions::views::vault_balance;
use crate::payout::{split_pot, PayoutSplit};
use crate::state::{Lottery, TokenPool};

/// Accounts required to draw the winners of a pool and pay them out.
///
/// The winners' token accounts follow as remaining accounts, one per winner
/// and in selection order. Any token account of the mint owned by the winner
/// is accepted. Clients obtain that order from [`plan_draw`] with the same
/// inputs the program uses.
#[derive(Accounts)]
pub struct Sort<'info> {
    /// The owner running the draw.
    pub authority: Signer<'info>,

    /// The main lottery state account, signing for the vault.
    #[account(
        seeds = [LOTTERY_SEED],
        bump = lottery.bump,
    )]
    pub lottery: Box<Account<'info, Lottery>>,

    /// The settlement token of the pool being drawn.
    #[account(mint::token_program = token_program)]
    pub mint: Box<InterfaceAccount<'info, Mint>>,

    /// CHECK: address checked by seeds, decoded in the handler so unknown
    /// mints report `UnsupportedToken`.
    #[account(
        mut,
        seeds = [TOKEN_POOL_SEED, mint.key().as_ref()],
        bump,
    )]
    pub token_pool: UncheckedAccount<'info>,

    /// Vault holding the pooled balance, owned by the lottery PDA.
    /// CHECK: address checked by seeds; only `add_supported_token` creates it.
    #[account(
        mut,
        seeds = [VAULT_SEED, mint.key().as_ref()],
        bump,
    )]
    pub vault: UncheckedAccount<'info>,

    /// Receives the owner's commission.
    #[account(
        mut,
        token::mint = mint,
        token::token_program = token_program,
        constraint = owner_token_account.owner == lottery.owner @ LotteryError::Unauthorized,
    )]
    pub owner_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Randomness oracle account, required when one was committed for the pool.
    /// CHECK: The account's data is validated manually within the handler.
    pub randomness_account_data: Option<UncheckedAccount<'info>>,

    /// Token program interface.
    pub token_program: Interface<'info, TokenInterface>,
}

/// Draws the winners of `mint`'s pool and distributes its balance.
///
/// Steps:
/// 1. Verify the caller is the owner and the pool holds enough participants.
/// 2. Derive the entropy from the seed, mint, round and revealed randomness.
/// 3. Select the winners and split the vault balance.
/// 4. Verify the winners' token accounts.
/// 5. Close the round (ledger reset, winner record).
/// 6. Transfer the owner share and every prize from the vault.
///
/// Any failing step, transfers included, aborts the instruction as a whole.
pub fn process_sort<'info>(
    ctx: Context<'_, '_, 'info, 'info, Sort<'info>>,
    seed: String,
) -> Result<()> {
    let clock = Clock::get()?;
    ctx.accounts
        .lottery
        .ensure_owner(&ctx.accounts.authority.key())?;
    let mut token_pool = TokenPool::load_supported(&ctx.accounts.token_pool)?;

    let randomness_account = ctx.accounts.randomness_account_data.as_ref();
    check_commitment(
        &token_pool,
        seed.as_bytes(),
        randomness_account.map(|account| account.key()),
    )?;
    let revealed = match randomness_account {
        Some(account) if token_pool.has_committed_randomness() => {
            revealed_randomness(account, &clock)?
        }
        _ => [0u8; 32],
    };

    let mint = ctx.accounts.mint.key();
    let pooled_balance = vault_balance(&ctx.accounts.vault)?;
    let DrawPlan {
        round,
        winners,
        split,
    } = plan_draw(
        &token_pool,
        &ctx.accounts.lottery,
        &mint,
        seed.as_bytes(),
        &revealed,
        pooled_balance,
    )?;

    msg!("Round: {}", round);
    msg!("Ticket num: {}", token_pool.entries.len());
    msg!("Pooled balance: {}", pooled_balance);

    let token_program = ctx.accounts.token_program.key();
    let winner_accounts = ctx
        .remaining_accounts
        .iter()
        .map(|account_info| decode_winner_account(account_info, &token_program))
        .collect::<Result<Vec<_>>>()?;
    check_winner_accounts(&winners, &mint, &winner_accounts)?;

    token_pool.settle_draw(winners.clone())?;
    token_pool.store(&ctx.accounts.token_pool)?;

    let lottery_bump = [ctx.accounts.lottery.bump];
    let signer_seeds: &[&[&[u8]]] = &[&[LOTTERY_SEED, &lottery_bump]];
    let decimals = ctx.accounts.mint.decimals;

    if split.owner_share > 0 {
        transfer_from_vault(
            ctx.accounts,
            ctx.accounts.owner_token_account.to_account_info(),
            split.owner_share,
            decimals,
            signer_seeds,
        )?;
    }

    let prizes: Vec<u64> = split.prizes().collect();
    for ((winner, account_info), prize) in winners
        .iter()
        .zip(ctx.remaining_accounts.iter())
        .zip(prizes.iter().copied())
    {
        if prize == 0 {
            continue;
        }
        transfer_from_vault(
            ctx.accounts,
            account_info.clone(),
            prize,
            decimals,
            signer_seeds,
        )?;

        msg!("Winner: {} prize: {}", winner, prize);
        emit!(PrizeTransferred {
            mint,
            round,
            winner: *winner,
            amount: prize,
        });
    }

    emit!(Payout {
        mint,
        round,
        pooled_balance,
        owner: ctx.accounts.lottery.owner,
        owner_share: split.owner_share,
        winners,
        prizes,
    });
    Ok(())
}

/// Outcome of a draw, computed before any account is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrawPlan {
    /// Round being closed.
    pub round: u64,
    pub winners: Vec<Pubkey>,
    pub split: PayoutSplit,
}

/// Selects the winners of `token_pool` and splits `pooled_balance` between
/// them and the owner. Off-chain callers use it to order the winners' token
/// accounts.
///
/// A committed draw keeps the winners count it was committed with.
pub fn plan_draw(
    token_pool: &TokenPool,
    lottery: &Lottery,
    mint: &Pubkey,
    seed: &[u8],
    revealed: &[u8; 32],
    pooled_balance: u64,
) -> Result<DrawPlan> {
    let winners_count = token_pool.draw_winners_count(lottery.winners_count);
    token_pool.ensure_drawable(winners_count)?;

    let entropy = draw_entropy(seed, mint, token_pool.round, revealed);
    let winners = select_winners(&token_pool.entries, usize::from(winners_count), &entropy)?;
    let split = split_pot(pooled_balance, lottery.owner_rate, winners.len())?;
    require!(split.total() == pooled_balance, LotteryError::Overflow);

    Ok(DrawPlan {
        round: token_pool.round,
        winners,
        split,
    })
}

/// A committed pool must be drawn with its randomness account and with the
/// seed matching the stored commitment. Uncommitted pools accept any seed.
pub fn check_commitment(
    token_pool: &TokenPool,
    seed: &[u8],
    randomness_account: Option<Pubkey>,
) -> Result<()> {
    if !token_pool.has_committed_randomness() {
        return Ok(());
    }
    let randomness_account = randomness_account.ok_or(LotteryError::IncorrectRandomnessAccount)?;
    require_keys_eq!(
        randomness_account,
        token_pool.randomness_account,
        LotteryError::IncorrectRandomnessAccount
    );
    require!(
        seed_commitment(seed) == token_pool.seed_commitment,
        LotteryError::SeedMismatch
    );
    Ok(())
}

/// Fields of a remaining account that decide whether it can receive a prize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WinnerAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub writable: bool,
    pub frozen: bool,
}

pub fn check_winner_accounts(
    winners: &[Pubkey],
    mint: &Pubkey,
    accounts: &[WinnerAccount],
) -> Result<()> {
    require!(
        accounts.len() == winners.len(),
        LotteryError::WinnerAccountsMissing
    );
    for (winner, account) in winners.iter().zip(accounts) {
        require_keys_eq!(account.mint, *mint, LotteryError::WinnerAccountMismatch);
        require_keys_eq!(account.owner, *winner, LotteryError::WinnerAccountMismatch);
        require!(
            account.writable && !account.frozen,
            LotteryError::WinnerAccountMismatch
        );
    }
    Ok(())
}

fn decode_winner_account(account_info: &AccountInfo, token_program: &Pubkey) -> Result<WinnerAccount> {
    require_keys_eq!(
        *account_info.owner,
        *token_program,
        LotteryError::WinnerAccountMismatch
    );
    let data = account_info.try_borrow_data()?;
    let token_account = TokenAccount::try_deserialize(&mut &data[..])
        .map_err(|_| LotteryError::WinnerAccountMismatch)?;
    Ok(WinnerAccount {
        mint: token_account.mint,
        owner: token_account.owner,
        writable: account_info.is_writable,
        frozen: token_account.is_frozen(),
    })
}

fn revealed_randomness(randomness_account: &AccountInfo, clock: &Clock) -> Result<[u8; 32]> {
    let randomness_data = RandomnessAccountData::parse(randomness_account.data.borrow())
        .map_err(|_| LotteryError::IncorrectRandomnessAccount)?;
    let revealed_random_value = randomness_data
        .get_value(clock)
        .map_err(|_| LotteryError::RandomnessNotResolved)?;

    msg!("Randomness result: {}", revealed_random_value[0]);
    Ok(revealed_random_value)
}

fn transfer_from_vault<'info>(
    accounts: &Sort<'info>,
    to: AccountInfo<'info>,
    amount: u64,
    decimals: u8,
    signer_seeds: &[&[&[u8]]],
) -> Result<()> {
    token_interface::transfer_checked(
        CpiContext::new_with_signer(
            accounts.token_program.to_account_info(),
            TransferChecked {
                from: accounts.vault.to_account_info(),
                mint: accounts.mint.to_account_info(),
                to,
                authority: accounts.lottery.to_account_info(),
            },
            signer_seeds,
        ),
        amount,
        decimals,
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::error::assert_lottery_error;

    fn pool_with_players(players: &[Pubkey]) -> TokenPool {
        let mut pool = TokenPool::new_for_test(Pubkey::new_unique());
        for player in players {
            pool.record_purchase(*player, DEFAULT_TICKET_PRICE, 1).unwrap();
        }
        pool
    }

    #[test]
    fn eleven_players_default_price_three_winners() {
        let lottery = Lottery::new_for_test(Pubkey::new_unique());
        let players: Vec<Pubkey> = (0..11).map(|_| Pubkey::new_unique()).collect();
        let mut pool = pool_with_players(&players);
        let pooled_balance = DEFAULT_TICKET_PRICE * 11;

        let plan = plan_draw(&pool, &lottery, &pool.mint, b"random", &[0u8; 32], pooled_balance)
            .unwrap();

        assert_eq!(plan.round, 0);
        assert_eq!(plan.winners.len(), 3);
        assert_eq!(plan.winners.iter().collect::<BTreeSet<_>>().len(), 3);
        assert!(plan.winners.iter().all(|winner| players.contains(winner)));
        assert_eq!(
            plan.split.owner_share,
            pooled_balance * u64::from(lottery.owner_rate) / 100
        );
        assert_eq!(plan.split.total(), pooled_balance);
        assert!(plan.split.prizes().all(|prize| prize > 0));

        pool.settle_draw(plan.winners.clone()).unwrap();
        assert!(pool.entries.is_empty());
        assert_eq!(pool.winners, plan.winners);
        assert_eq!(pool.round, 1);
    }

    #[test]
    fn too_few_participants_is_rejected() {
        let lottery = Lottery::new_for_test(Pubkey::new_unique());
        let players: Vec<Pubkey> = (0..2).map(|_| Pubkey::new_unique()).collect();
        let pool = pool_with_players(&players);

        assert_lottery_error(
            plan_draw(&pool, &lottery, &pool.mint, b"random", &[0u8; 32], 10_000_000),
            LotteryError::InsufficientParticipants,
        );
        assert_eq!(pool.entries, players);
    }

    #[test]
    fn unsupported_pool_is_rejected() {
        let lottery = Lottery::new_for_test(Pubkey::new_unique());
        let players: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();
        let mut pool = pool_with_players(&players);
        pool.delist().unwrap();

        assert_lottery_error(
            plan_draw(&pool, &lottery, &pool.mint, b"random", &[0u8; 32], 25_000_000),
            LotteryError::UnsupportedToken,
        );
    }

    #[test]
    fn plan_follows_winners_count_and_rate() {
        let owner = Pubkey::new_unique();
        let mut lottery = Lottery::new_for_test(owner);
        lottery.set_winners_count(&owner, 5).unwrap();
        lottery.set_owner_rate(&owner, 7).unwrap();

        let players: Vec<Pubkey> = (0..8).map(|_| Pubkey::new_unique()).collect();
        let pool = pool_with_players(&players);
        let pooled_balance = 40_000_003;

        let plan =
            plan_draw(&pool, &lottery, &pool.mint, b"seed", &[3u8; 32], pooled_balance).unwrap();

        assert_eq!(plan.winners.len(), 5);
        assert_eq!(plan.split.owner_share, 2_800_000);
        assert_eq!(plan.split.total(), pooled_balance);
        assert!(plan.split.remainder < 5);
    }

    #[test]
    fn next_round_draws_differently() {
        let lottery = Lottery::new_for_test(Pubkey::new_unique());
        let players: Vec<Pubkey> = (0..30).map(|_| Pubkey::new_unique()).collect();
        let mut pool = pool_with_players(&players);

        let outcomes: BTreeSet<Vec<Pubkey>> = (0..5)
            .map(|_| {
                let plan =
                    plan_draw(&pool, &lottery, &pool.mint, b"same seed", &[0u8; 32], 1_000)
                        .unwrap();
                pool.settle_draw(plan.winners.clone()).unwrap();
                for player in &players {
                    pool.record_purchase(*player, DEFAULT_TICKET_PRICE, 1).unwrap();
                }
                plan.winners
            })
            .collect();

        assert!(outcomes.len() > 1);
        assert_eq!(pool.round, 5);
    }

    #[test]
    fn owner_share_is_the_floor_of_the_rate() {
        let owner = Pubkey::new_unique();
        let mut lottery = Lottery::new_for_test(owner);
        lottery.set_owner_rate(&owner, 33).unwrap();
        let players: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let pool = pool_with_players(&players);

        for pooled_balance in [0u64, 1, 99, 100, 15_000_001, u64::MAX] {
            let plan =
                plan_draw(&pool, &lottery, &pool.mint, b"seed", &[0u8; 32], pooled_balance)
                    .unwrap();
            let expected = (u128::from(pooled_balance) * 33 / 100) as u64;
            assert_eq!(plan.split.owner_share, expected);
            assert_eq!(plan.split.total(), pooled_balance);
        }
    }

    #[test]
    fn committed_draw_keeps_its_winners_count() {
        let owner = Pubkey::new_unique();
        let mut lottery = Lottery::new_for_test(owner);
        let players: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let mut pool = pool_with_players(&players);

        pool.begin_draw(lottery.winners_count, Pubkey::new_unique(), seed_commitment(b"s"), 10)
            .unwrap();
        lottery.set_winners_count(&owner, 6).unwrap();

        let plan =
            plan_draw(&pool, &lottery, &pool.mint, b"s", &[5u8; 32], 15_000_000).unwrap();
        assert_eq!(plan.winners.len(), 3);
    }

    #[test]
    fn uncommitted_pool_accepts_any_seed() {
        let pool = pool_with_players(&[Pubkey::new_unique()]);
        check_commitment(&pool, b"anything", None).unwrap();
        check_commitment(&pool, b"", Some(Pubkey::new_unique())).unwrap();
    }

    #[test]
    fn committed_pool_requires_its_account_and_seed() {
        let players: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let mut pool = pool_with_players(&players);
        let randomness = Pubkey::new_unique();
        pool.begin_draw(3, randomness, seed_commitment(b"committed seed"), 10)
            .unwrap();

        assert_lottery_error(
            check_commitment(&pool, b"committed seed", None),
            LotteryError::IncorrectRandomnessAccount,
        );
        assert_lottery_error(
            check_commitment(&pool, b"committed seed", Some(Pubkey::new_unique())),
            LotteryError::IncorrectRandomnessAccount,
        );
        assert_lottery_error(
            check_commitment(&pool, b"another seed", Some(randomness)),
            LotteryError::SeedMismatch,
        );
        check_commitment(&pool, b"committed seed", Some(randomness)).unwrap();
    }

    fn winner_account(mint: Pubkey, owner: Pubkey) -> WinnerAccount {
        WinnerAccount {
            mint,
            owner,
            writable: true,
            frozen: false,
        }
    }

    #[test]
    fn winner_accounts_must_match_selection() {
        let mint = Pubkey::new_unique();
        let winners: Vec<Pubkey> = (0..3).map(|_| Pubkey::new_unique()).collect();
        let accounts: Vec<WinnerAccount> =
            winners.iter().map(|winner| winner_account(mint, *winner)).collect();

        check_winner_accounts(&winners, &mint, &accounts).unwrap();
        assert_lottery_error(
            check_winner_accounts(&winners, &mint, &accounts[..2]),
            LotteryError::WinnerAccountsMissing,
        );

        let mut swapped = accounts.clone();
        swapped.swap(0, 1);
        assert_lottery_error(
            check_winner_accounts(&winners, &mint, &swapped),
            LotteryError::WinnerAccountMismatch,
        );

        let mut other_mint = accounts.clone();
        other_mint[2].mint = Pubkey::new_unique();
        assert_lottery_error(
            check_winner_accounts(&winners, &mint, &other_mint),
            LotteryError::WinnerAccountMismatch,
        );

        let mut read_only = accounts.clone();
        read_only[1].writable = false;
        assert_lottery_error(
            check_winner_accounts(&winners, &mint, &read_only),
            LotteryError::WinnerAccountMismatch,
        );

        let mut frozen = accounts;
        frozen[0].frozen = true;
        assert_lottery_error(
            check_winner_accounts(&winners, &mint, &frozen),
            LotteryError::WinnerAccountMismatch,
        );
    }

    #[test]
    fn winner_account_is_decoded_from_token_data() {
        use anchor_spl::token::spl_token;
        use solana_program::program_pack::Pack;

        let key = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let winner = Pubkey::new_unique();
        let token_program = spl_token::ID;
        let mut lamports = 1u64;
        let mut data = vec![0u8; spl_token::state::Account::LEN];
        spl_token::state::Account {
            mint,
            owner: winner,
            amount: 0,
            state: spl_token::state::AccountState::Frozen,
            ..Default::default()
        }
        .pack_into_slice(&mut data);
        let account_info =
            AccountInfo::new(&key, false, true, &mut lamports, &mut data, &token_program, false, 0);

        let decoded = decode_winner_account(&account_info, &token_program).unwrap();
        assert_eq!(
            decoded,
            WinnerAccount {
                mint,
                owner: winner,
                writable: true,
                frozen: true,
            }
        );
        assert_lottery_error(
            decode_winner_account(&account_info, &Pubkey::new_unique()),
            LotteryError::WinnerAccountMismatch,
        );
    }
}
