use anchor_lang::prelude::*;

use crate::{error::AllocationError, state::Treasury};

/// Moves `amount` lamports from the payer into a sale treasury through the
/// system program and verifies the treasury balance moved by exactly that much.
pub fn deposit_to_treasury<'info>(
    payer: &Signer<'info>,
    treasury: &Account<'info, Treasury>,
    system_program: &Program<'info, System>,
    amount: u64,
) -> Result<()> {
    let pre_transfer_balance = treasury.to_account_info().lamports();

    anchor_lang::solana_program::program::invoke(
        &anchor_lang::solana_program::system_instruction::transfer(
            &payer.key(),
            &treasury.key(),
            amount,
        ),
        &[
            payer.to_account_info(),
            system_program.to_account_info(),
            treasury.to_account_info(),
        ],
    )?;

    let post_transfer_balance = treasury.to_account_info().lamports();
    require!(
        post_transfer_balance
            == pre_transfer_balance
                .checked_add(amount)
                .ok_or(AllocationError::ArithmeticOverflow)?,
        AllocationError::TransferFailed
    );

    Ok(())
}

/// Pays `amount` lamports out of a sale treasury.
/// Works by direct lamport arithmetic because the treasury is a PDA owned by this program.
pub fn pay_from_treasury<'info>(
    treasury: &Account<'info, Treasury>,
    recipient: &AccountInfo<'info>,
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }
    treasury.to_account_info().sub_lamports(amount)?;
    recipient.add_lamports(amount)?;
    Ok(())
}
