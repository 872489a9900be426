/*++

Licensed under the Apache-2.0 license.

File Name:

    node.rs

Abstract:

    File contains the error identifiers used at the API boundary (node ids)
    and internally (flat error ids).

--*/

use bitfield::{bitfield, BitRange, BitRangeMut};
use pmc_drivers::{BankDescriptor, BankGroup, BITS_PER_BANK};
use pmc_error::{PmcError, PmcResult};

/// Node class shared by every error event node
pub const NODE_CLASS_EVENT: u32 = 0x28;

bitfield! {
    /// Error node id layout
    #[derive(Clone, Copy, Eq, PartialEq)]
    struct NodeBits(u32);

    /// Node class, always `NODE_CLASS_EVENT`
    u32, class, set_class: 31, 24;

    /// Bank group code
    u32, group, set_group: 23, 16;

    /// Flat bank index
    u32, index, set_index: 15, 0;
}

/// Flat error index: `bank * 32 + bit`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct ErrorId(pub u32);

impl ErrorId {
    pub const fn new(bank: usize, bit: u32) -> Self {
        Self(bank as u32 * BITS_PER_BANK + bit)
    }

    pub const fn bank(self) -> usize {
        (self.0 / BITS_PER_BANK) as usize
    }

    pub const fn bit(self) -> u32 {
        self.0 % BITS_PER_BANK
    }

    pub const fn mask(self) -> u32 {
        1 << self.bit()
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Lowest error named by `mask` within the bank `node` addresses.
    pub fn from_node(node: ErrorNodeId, mask: u32) -> Option<Self> {
        if mask == 0 {
            return None;
        }
        node.bank_index()
            .map(|bank| Self::new(bank, mask.trailing_zeros()))
    }
}

/// Bank address used by commands and handler callbacks.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ErrorNodeId(pub u32);

impl ErrorNodeId {
    pub const fn new(group: BankGroup, bank: usize) -> Self {
        Self((NODE_CLASS_EVENT << 24) | (group.code() << 16) | (bank as u32 & 0xFFFF))
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub fn group(self) -> Option<BankGroup> {
        BankGroup::from_code(NodeBits(self.0).group())
    }

    /// Bank index, when the class is right.
    pub fn bank_index(self) -> Option<usize> {
        let bits = NodeBits(self.0);
        (bits.class() == NODE_CLASS_EVENT).then_some(bits.index() as usize)
    }

    /// Resolve to a bank of `banks`, checking that the encoded group
    /// matches the bank found there.
    pub fn decode(self, banks: &[BankDescriptor]) -> PmcResult<usize> {
        let group = self.group().ok_or(PmcError::EAM_INVALID_NODE_ID)?;
        let index = self.bank_index().ok_or(PmcError::EAM_INVALID_NODE_ID)?;
        match banks.get(index) {
            Some(bank) if bank.group == group => Ok(index),
            _ => Err(PmcError::EAM_INVALID_NODE_ID),
        }
    }
}

impl From<ErrorNodeId> for u32 {
    fn from(node: ErrorNodeId) -> u32 {
        node.0
    }
}

/// Set bit positions of a word, lowest first.
pub(crate) struct SetBits(pub u32);

impl Iterator for SetBits {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(bit)
    }
}
