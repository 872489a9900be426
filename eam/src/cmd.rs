/*++

Licensed under the Apache-2.0 license.

File Name:

    cmd.rs

Abstract:

    File contains the command channel served by the error manager.

--*/

use crate::action::ErrorAction;
use crate::manager::Eam;
use crate::node::ErrorNodeId;
use crate::tamper::TamperMode;
use pmc_drivers::cprintln;
use pmc_error::{PmcError, PmcResult};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CommandId(pub u32);

impl CommandId {
    pub const FEATURES: Self = Self(0);
    pub const SET_ACTION: Self = Self(1);
    pub const TAMPER_TRIGGER: Self = Self(2);

    const SUPPORTED: [Self; 3] = [Self::FEATURES, Self::SET_ACTION, Self::TAMPER_TRIGGER];
}

impl From<u32> for CommandId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<CommandId> for u32 {
    fn from(value: CommandId) -> Self {
        value.0
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct SetActionReq {
    pub node_id: u32,
    pub action: u32,
    pub error_mask: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct TamperTriggerReq {
    pub response: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, FromBytes, IntoBytes, Immutable, KnownLayout)]
pub struct FeaturesReq {
    pub command_id: u32,
}

/// One request as delivered by the transport.
pub struct Command<'b> {
    pub id: CommandId,
    pub payload: &'b [u8],

    /// Subsystem that sent the request
    pub subsystem_id: u32,
}

fn parse<T: FromBytes>(payload: &[u8]) -> PmcResult<T> {
    T::read_from_bytes(payload).map_err(|_| PmcError::CMD_INVALID_PAYLOAD_LEN)
}

impl Eam<'_> {
    /// Serve one command. Returns the status word: 0 on success, the
    /// error code otherwise.
    pub fn handle_command(&mut self, cmd: &Command) -> u32 {
        match self.execute(cmd) {
            Ok(()) => 0,
            Err(e) => {
                cprintln!(
                    "EAM: command 0x{:08X} failed 0x{:08X}",
                    u32::from(cmd.id),
                    u32::from(e)
                );
                e.into()
            }
        }
    }

    fn execute(&mut self, cmd: &Command) -> PmcResult<()> {
        match cmd.id {
            CommandId::SET_ACTION => {
                let req: SetActionReq = parse(cmd.payload)?;
                let action = ErrorAction::try_from(req.action)?;
                self.set_action(
                    ErrorNodeId(req.node_id),
                    req.error_mask,
                    action,
                    None,
                    cmd.subsystem_id,
                )
            }
            CommandId::TAMPER_TRIGGER => {
                let req: TamperTriggerReq = parse(cmd.payload)?;
                self.trigger_tamper(req.response, TamperMode::Task)
            }
            CommandId::FEATURES => {
                let req: FeaturesReq = parse(cmd.payload)?;
                if CommandId::SUPPORTED.contains(&CommandId(req.command_id)) {
                    Ok(())
                } else {
                    Err(PmcError::CMD_UNSUPPORTED)
                }
            }
            _ => Err(PmcError::CMD_UNSUPPORTED),
        }
    }
}
