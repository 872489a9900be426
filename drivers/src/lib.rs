/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the PMC error management drivers.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

pub mod bank;
mod bus;
pub mod error_reporter;
mod irq;
pub mod memory_layout;
pub mod persistent;
pub mod printer;
mod reset;
pub mod wait;

#[cfg(feature = "std")]
pub mod testing;

pub use bank::{ActionReg, BankDescriptor, BankGroup, MaskReg, BITS_PER_BANK, MAX_BANKS};
pub use bus::{Mmio, RegAddr, RegData, RegisterBus};
pub use irq::ErrorIrq;
pub use persistent::EamScratch;
pub use pmc_error::{PmcError, PmcResult};
pub use reset::{ResetCtrl, ResetKind};
