/*++

Licensed under the Apache-2.0 license.

File Name:

    registry.rs

Abstract:

    File contains the error registry: one descriptor per error id, built
    from the platform table.

--*/

use crate::action::ErrorAction;
use crate::handler::HandlerRef;
use crate::node::ErrorId;
use crate::platform::Platform;
use pmc_drivers::{BITS_PER_BANK, MAX_BANKS};
use pmc_error::{PmcError, PmcResult};

pub const MAX_ERRORS: usize = MAX_BANKS * BITS_PER_BANK as usize;

/// Installed response of one error.
#[derive(Clone, Copy)]
pub struct ErrorDescriptor<'a> {
    pub handler: Option<HandlerRef<'a>>,
    pub action: ErrorAction,
    pub subsystem_id: u32,
}

impl<'a> ErrorDescriptor<'a> {
    pub const RESERVED: Self = Self {
        handler: None,
        action: ErrorAction::Invalid,
        subsystem_id: 0,
    };

    pub fn is_reserved(&self) -> bool {
        self.action == ErrorAction::Invalid
    }
}

/// Descriptor table. Reserved ids hold `Invalid` and never change; every
/// other id starts as `None` until its default or a request installs an
/// action.
pub struct Registry<'a> {
    entries: [ErrorDescriptor<'a>; MAX_ERRORS],
    len: usize,
}

impl<'a> Registry<'a> {
    pub fn new(platform: &Platform) -> Self {
        let mut entries = [ErrorDescriptor::RESERVED; MAX_ERRORS];
        for (slot, entry) in entries.iter_mut().zip(platform.errors.iter()) {
            if entry.action != ErrorAction::Invalid {
                *slot = ErrorDescriptor {
                    handler: None,
                    action: ErrorAction::None,
                    subsystem_id: entry.subsystem_id,
                };
            }
        }
        Self {
            entries,
            len: platform.errors.len().min(MAX_ERRORS),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get_descriptor(&self, id: ErrorId) -> PmcResult<&ErrorDescriptor<'a>> {
        match self.entry(id) {
            Some(desc) if !desc.is_reserved() => Ok(desc),
            _ => Err(PmcError::EAM_INVALID_ERROR_ID),
        }
    }

    pub fn set_descriptor(
        &mut self,
        id: ErrorId,
        action: ErrorAction,
        handler: Option<HandlerRef<'a>>,
        subsystem_id: u32,
    ) -> PmcResult<()> {
        self.get_descriptor(id)?;
        self.entries[id.index()] = ErrorDescriptor {
            handler,
            action,
            subsystem_id,
        };
        Ok(())
    }

    /// Change the owning subsystem, leaving the installed action alone.
    pub fn set_subsystem_id(&mut self, id: ErrorId, subsystem_id: u32) -> PmcResult<()> {
        self.get_descriptor(id)?;
        self.entries[id.index()].subsystem_id = subsystem_id;
        Ok(())
    }

    /// Raw entry, reserved ones included.
    pub(crate) fn entry(&self, id: ErrorId) -> Option<&ErrorDescriptor<'a>> {
        self.entries[..self.len].get(id.index())
    }

    /// One-shot revert after dispatch.
    pub(crate) fn reset_action(&mut self, id: ErrorId) {
        if let Some(desc) = self.entries[..self.len].get_mut(id.index()) {
            if !desc.is_reserved() {
                desc.action = ErrorAction::None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::gen1;

    #[test]
    fn test_reserved_and_range() {
        let registry = Registry::new(&gen1::GEN1);
        assert_eq!(registry.len(), gen1::GEN1.errors.len());

        assert_eq!(
            registry.get_descriptor(gen1::PMC_ERR1_RESERVED).err(),
            Some(PmcError::EAM_INVALID_ERROR_ID)
        );
        assert_eq!(
            registry.get_descriptor(ErrorId(registry.len() as u32)).err(),
            Some(PmcError::EAM_INVALID_ERROR_ID)
        );
        // Defaults are not installed until init.
        let desc = registry.get_descriptor(gen1::PMC_WDT).unwrap();
        assert_eq!(desc.action, ErrorAction::None);
    }

    #[test]
    fn test_set_and_reset() {
        let mut registry = Registry::new(&gen1::GEN1);
        let id = ErrorId::new(1, 4);
        registry
            .set_descriptor(id, ErrorAction::PrintToLog, None, 7)
            .unwrap();
        let desc = registry.get_descriptor(id).unwrap();
        assert_eq!((desc.action, desc.subsystem_id), (ErrorAction::PrintToLog, 7));

        registry.reset_action(id);
        assert_eq!(registry.get_descriptor(id).unwrap().action, ErrorAction::None);

        assert_eq!(
            registry.set_descriptor(gen1::PMC_ERR1_RESERVED, ErrorAction::None, None, 0),
            Err(PmcError::EAM_INVALID_ERROR_ID)
        );
        registry.reset_action(gen1::PMC_ERR1_RESERVED);
        assert!(registry.entry(gen1::PMC_ERR1_RESERVED).unwrap().is_reserved());
    }

    #[test]
    fn test_subsystem_change_keeps_action() {
        let mut registry = Registry::new(&gen1::GEN1);
        registry
            .set_descriptor(gen1::CFU, ErrorAction::SubsystemRestart, None, 3)
            .unwrap();
        registry.set_subsystem_id(gen1::CFU, 9).unwrap();
        let desc = registry.get_descriptor(gen1::CFU).unwrap();
        assert_eq!((desc.action, desc.subsystem_id), (ErrorAction::SubsystemRestart, 9));
        assert_eq!(
            registry.set_subsystem_id(gen1::PMC_ERR1_RESERVED, 9),
            Err(PmcError::EAM_INVALID_ERROR_ID)
        );
    }
}
