/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the PMC error and event management core.

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod action;
pub mod cmd;
mod config;
mod dispatch;
mod error_out;
pub mod handler;
mod manager;
mod nested;
mod node;
pub mod platform;
mod registry;
pub mod restrict;
pub mod services;
mod sw_error;
pub mod tamper;

pub use action::ErrorAction;
pub use cmd::{Command, CommandId};
pub use error_out::ErrorOutCounter;
pub use handler::{ErrorHandler, HandlerRef};
pub use manager::Eam;
pub use nested::Nested;
pub use node::{ErrorId, ErrorNodeId, NODE_CLASS_EVENT};
pub use platform::{ErrorEntry, Layout, Platform, Rule, TamperLayout};
pub use registry::{ErrorDescriptor, Registry, MAX_ERRORS};
pub use services::PlatformServices;
pub use tamper::{Tamper, TamperMode, TamperResponse, TamperState};
