//! Winner selection.
//!
//! Selection is a pure function of the ticket ledger and 32 bytes of
//! entropy, so clients can reproduce it before submitting `sort` and pass
//! the winners' token accounts in the right order.

use anchor_lang::prelude::*;
use solana_program::hash::{hash, hashv};

use crate::constants::DRAW_DOMAIN;
use crate::error::LotteryError;

/// Entropy of one draw: the owner's seed, the mint, the round being closed
/// and the revealed oracle value (zeroed when no oracle is committed).
pub fn draw_entropy(seed: &[u8], mint: &Pubkey, round: u64, revealed: &[u8; 32]) -> [u8; 32] {
    hashv(&[DRAW_DOMAIN, seed, mint.as_ref(), &round.to_le_bytes(), revealed.as_ref()]).to_bytes()
}

/// Value stored by `commit_randomness` and checked against the seed given to `sort`.
pub fn seed_commitment(seed: &[u8]) -> [u8; 32] {
    hash(seed).to_bytes()
}

/// Picks `winners_count` distinct owners from `entries`.
///
/// Each pick draws uniformly among the remaining tickets, so an owner's odds
/// grow with the tickets it holds. Once an owner wins, all of its tickets
/// leave the candidate set.
pub fn select_winners(
    entries: &[Pubkey],
    winners_count: usize,
    entropy: &[u8; 32],
) -> Result<Vec<Pubkey>> {
    require!(
        winners_count > 0 && entries.len() >= winners_count,
        LotteryError::InsufficientParticipants
    );

    let mut candidates: Vec<usize> = (0..entries.len()).collect();
    let mut winners = Vec::with_capacity(winners_count);
    let mut pick: u64 = 0;

    while winners.len() < winners_count {
        require!(!candidates.is_empty(), LotteryError::InsufficientParticipants);

        let slot = (random_word(entropy, pick) % candidates.len() as u64) as usize;
        let winner = entries[candidates[slot]];
        candidates.retain(|&index| entries[index] != winner);
        winners.push(winner);
        pick += 1;
    }

    Ok(winners)
}

fn random_word(entropy: &[u8; 32], pick: u64) -> u64 {
    let digest = hashv(&[entropy.as_ref(), &pick.to_le_bytes()]).to_bytes();
    let mut word = [0u8; 8];
    word.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(word)
}
