/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains API and macros used by the PMC firmware for error handling

--*/
#![cfg_attr(not(feature = "std"), no_std)]
use core::convert::From;
use core::num::{NonZeroU32, TryFromIntError};

/// PMC firmware error type
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct PmcError(pub NonZeroU32);

/// Macro to define error constants ensuring uniqueness
///
/// This macro takes a list of (name, value, doc) tuples and generates
/// constant definitions for each error code.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: PmcError = PmcError::new_const($value);
        )*

        #[cfg(test)]
        /// Returns a vector of all defined error constants for testing uniqueness
        pub fn all_constants() -> Vec<(&'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl PmcError {
    /// Codes with this bit set are warnings: they are logged but never
    /// escalated by the error manager.
    pub const WARNING_MASK: u32 = 0x8000_0000;

    /// Create an error from a const context. Runtime conversions go through
    /// `PmcError::try_from()` so a zero value can never panic.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("PmcError cannot be 0"),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.0.get() & Self::WARNING_MASK != 0
    }

    define_error_constants![
        (EAM_INVALID_NODE_ID, 0x0001_0001, "EAM: node id does not name a bank"),
        (
            EAM_INVALID_ERROR_ID,
            0x0001_0002,
            "EAM: error id is out of range or reserved"
        ),
        (EAM_INVALID_ACTION, 0x0001_0003, "EAM: unsupported action code"),
        (
            EAM_INVALID_HANDLER,
            0x0001_0004,
            "EAM: action requires a handler the bank cannot dispatch"
        ),
        (
            EAM_CANNOT_CHANGE_ACTION,
            0x0001_0005,
            "EAM: action of this error is fixed"
        ),
        (
            EAM_ACTION_NOT_ENABLED,
            0x0001_0006,
            "EAM: enable mask did not read back as armed"
        ),
        (
            EAM_ACTION_NOT_DISABLED,
            0x0001_0007,
            "EAM: disable mask did not read back as masked"
        ),
        (
            EAM_SUBSYSTEM_UNINITIALIZED,
            0x0001_0008,
            "EAM: secondary bank addressed before bring-up"
        ),
        (
            EAM_INVALID_ERROR_TYPE,
            0x0001_0009,
            "EAM: bank has no route for the requested action"
        ),
        (
            EAM_INVALID_PLATFORM_TABLE,
            0x0001_000A,
            "EAM: platform table is inconsistent"
        ),
        (
            EAM_HANDLER_FAILED,
            0x8001_000B,
            "EAM: error handler collaborator reported failure"
        ),
        (
            EAM_UNHANDLED_ERROR,
            0x8001_000C,
            "EAM: error status set with no armed action"
        ),
        (
            TAMPER_INVALID_RESPONSE,
            0x0002_0001,
            "Tamper: response carries no reset or lockdown bit"
        ),
        (
            TAMPER_HANDSHAKE_TIMEOUT,
            0x8002_0002,
            "Tamper: peer die handshake timed out"
        ),
        (
            TAMPER_RECOVERY_FAILED,
            0x8002_0003,
            "Tamper: recovery procedure reported failure"
        ),
        (
            CMD_INVALID_PAYLOAD_LEN,
            0x0003_0001,
            "Command: payload length does not match command"
        ),
        (CMD_UNSUPPORTED, 0x0003_0002, "Command: unknown command id"),
        (
            DRIVER_OVER_TEMP_TIMEOUT,
            0x0004_0001,
            "Driver: over-temperature condition did not clear"
        ),
        (DRIVER_WAIT_TIMEOUT, 0x0004_0002, "Driver: bounded wait expired"),
    ];
}

impl From<core::num::NonZeroU32> for crate::PmcError {
    fn from(val: core::num::NonZeroU32) -> Self {
        crate::PmcError(val)
    }
}

impl From<PmcError> for core::num::NonZeroU32 {
    fn from(val: PmcError) -> Self {
        val.0
    }
}

impl From<PmcError> for u32 {
    fn from(val: PmcError) -> Self {
        core::num::NonZeroU32::from(val).get()
    }
}

impl TryFrom<u32> for PmcError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        NonZeroU32::try_from(val).map(PmcError)
    }
}

pub type PmcResult<T> = Result<T, PmcError>;
