/*++

Licensed under the Apache-2.0 license.

File Name:

    persistent.rs

Abstract:

    File contains the scratch record the error management core keeps in
    the persistent (RTCA) region across resets.

--*/

use crate::bank::MAX_BANKS;
use crate::bus::{RegAddr, RegisterBus};
use core::mem::{offset_of, size_of};
use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

pub const EAM_SCRATCH_MARKER: u32 = 0x4541_4D31; // "EAM1"

pub const EAM_SCRATCH_SIZE: usize = size_of::<EamScratch>();

/// Post-mortem record. The region is opaque to the rest of the firmware;
/// only these fields are written by the error management core.
#[derive(Clone, Debug, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct EamScratch {
    pub marker: u32,

    /// Firmware error word found at boot, before it was cleared
    pub saved_fw_error: u32,

    /// Raw bank status seen at boot, indexed like the bank table
    pub bank_status: [u32; MAX_BANKS],
}

impl EamScratch {
    /// Read the whole record from `base`.
    pub fn load<B: RegisterBus + ?Sized>(bus: &B, base: RegAddr) -> Self {
        let mut record = Self::new_zeroed();
        for (i, word) in record.as_mut_bytes().chunks_exact_mut(4).enumerate() {
            word.copy_from_slice(&bus.read(base + (i * 4) as u32).to_le_bytes());
        }
        record
    }

    pub fn store_marker<B: RegisterBus + ?Sized>(bus: &mut B, base: RegAddr) {
        bus.write(base + offset_of!(EamScratch, marker) as u32, EAM_SCRATCH_MARKER);
    }

    pub fn store_fw_error<B: RegisterBus + ?Sized>(bus: &mut B, base: RegAddr, val: u32) {
        bus.write(base + offset_of!(EamScratch, saved_fw_error) as u32, val);
    }

    pub fn store_bank_status<B: RegisterBus + ?Sized>(
        bus: &mut B,
        base: RegAddr,
        bank: usize,
        val: u32,
    ) {
        if bank < MAX_BANKS {
            let offset = offset_of!(EamScratch, bank_status) + bank * size_of::<u32>();
            bus.write(base + offset as u32, val);
        }
    }
}
