/*++

Licensed under the Apache-2.0 license.

File Name:

    action.rs

Abstract:

    File contains the containment actions an error can be bound to.

--*/

use pmc_drivers::ActionReg;
use pmc_error::PmcError;

/// Containment response of an error, ordered by escalation severity.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum ErrorAction {
    Invalid = 0,
    PowerOnReset = 1,
    SoftReset = 2,
    Custom = 3,
    ErrorOut = 4,
    SubsystemShutdown = 5,
    SubsystemRestart = 6,
    PrintToLog = 7,
    SecureLockdown = 8,
    SecureLockdownWithTriState = 9,
    None = 10,
}

impl ErrorAction {
    /// First value outside the action encoding
    pub const MAX: u32 = 11;

    /// Carried out by the bank hardware when a route exists for it.
    pub fn is_hardware(self) -> bool {
        matches!(self, Self::PowerOnReset | Self::SoftReset | Self::ErrorOut)
    }

    /// Carried out by a firmware handler after the error interrupt.
    pub fn is_software(self) -> bool {
        matches!(
            self,
            Self::Custom
                | Self::SubsystemShutdown
                | Self::SubsystemRestart
                | Self::PrintToLog
                | Self::SecureLockdown
                | Self::SecureLockdownWithTriState
        )
    }

    /// Reverts to `None` after its handler has run once.
    pub fn is_one_shot(self) -> bool {
        matches!(
            self,
            Self::SubsystemShutdown
                | Self::SubsystemRestart
                | Self::PrintToLog
                | Self::SecureLockdown
                | Self::SecureLockdownWithTriState
        )
    }

    /// Bank route the hardware uses for this action.
    pub fn hw_route(self) -> Option<ActionReg> {
        match self {
            Self::PowerOnReset => Some(ActionReg::Por),
            Self::SoftReset => Some(ActionReg::Srst),
            Self::ErrorOut => Some(ActionReg::ErrOut),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::PowerOnReset => "por",
            Self::SoftReset => "srst",
            Self::Custom => "custom",
            Self::ErrorOut => "error-out",
            Self::SubsystemShutdown => "subsystem-shutdown",
            Self::SubsystemRestart => "subsystem-restart",
            Self::PrintToLog => "print",
            Self::SecureLockdown => "lockdown",
            Self::SecureLockdownWithTriState => "lockdown-tristate",
            Self::None => "none",
        }
    }
}

impl TryFrom<u32> for ErrorAction {
    type Error = PmcError;

    fn try_from(val: u32) -> Result<Self, PmcError> {
        let action = match val {
            0 => Self::Invalid,
            1 => Self::PowerOnReset,
            2 => Self::SoftReset,
            3 => Self::Custom,
            4 => Self::ErrorOut,
            5 => Self::SubsystemShutdown,
            6 => Self::SubsystemRestart,
            7 => Self::PrintToLog,
            8 => Self::SecureLockdown,
            9 => Self::SecureLockdownWithTriState,
            10 => Self::None,
            _ => return Err(PmcError::EAM_INVALID_ACTION),
        };
        Ok(action)
    }
}
