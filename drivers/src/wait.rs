/*++

Licensed under the Apache-2.0 license.

File Name:

    wait.rs

Abstract:

    File contains common functions to implement wait routines.

--*/

use pmc_error::{PmcError, PmcResult};

/// Poll `predicate` at most `max_polls` times, calling `live` after every
/// miss so the platform liveness monitor keeps seeing progress.
pub fn until_bounded<F, L>(predicate: F, max_polls: u32, mut live: L) -> PmcResult<()>
where
    F: Fn() -> bool,
    L: FnMut(),
{
    for _ in 0..max_polls {
        if predicate() {
            return Ok(());
        }
        live();
    }
    if predicate() {
        Ok(())
    } else {
        Err(PmcError::DRIVER_WAIT_TIMEOUT)
    }
}
