/*++

Licensed under the Apache-2.0 license.

File Name:

    restrict.rs

Abstract:

    File contains the restriction policy applied to configuration requests
    before anything is changed.

--*/

use crate::action::ErrorAction;
use crate::node::{ErrorId, SetBits};
use crate::platform::{Platform, Rule};
use pmc_drivers::{BankGroup, MAX_BANKS};
use pmc_error::{PmcError, PmcResult};

/// Check a request for `mask` bits of bank `bank` against the platform
/// rules. `secondary_ready` holds the bring-up state of every bank.
pub fn allow(
    platform: &Platform,
    secondary_ready: &[bool; MAX_BANKS],
    bank: usize,
    mask: u32,
    action: ErrorAction,
) -> PmcResult<()> {
    let desc = platform.banks.get(bank).ok_or(PmcError::EAM_INVALID_NODE_ID)?;
    if desc.group == BankGroup::Secondary && !secondary_ready[bank] {
        return Err(PmcError::EAM_SUBSYSTEM_UNINITIALIZED);
    }

    for bit in SetBits(mask) {
        let id = ErrorId::new(bank, bit);
        for rule in platform.rules {
            let permitted = match *rule {
                Rule::HardwareOnly(r) if r == id => {
                    action.is_hardware() || action == ErrorAction::None
                }
                Rule::Fixed(r, fixed) if r == id => action == fixed,
                Rule::Locked(r) if r == id => false,
                _ => true,
            };
            if !permitted {
                return Err(PmcError::EAM_CANNOT_CHANGE_ACTION);
            }
        }
    }
    Ok(())
}
