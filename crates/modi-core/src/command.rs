//! Outbound commands and the shared command queue
//!
//! Commands are write-only: once enqueued they are the transport's problem.
//! Any confirmation comes back later as ordinary telemetry.

use tokio::sync::mpsc;

use crate::{ModiError, ModiResult, ModuleId};

/// Property code used by output modules for whole-record property writes
pub const SET_PROPERTY_CODE: u16 = 16;

/// What a command asks the module to do
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandCode {
    /// Write a property record; the inner value is the device property code
    SetProperty(u16),
    /// Change the run state and plug-and-play state of a module
    ModuleState,
    /// Ask a module to report its neighbours
    RequestTopology,
    /// Second half of a topology request; firmware expects both
    RequestTopologyFollowUp,
    /// Ask the network module for its uuid
    RequestNetworkUuid,
}

impl CommandCode {
    /// Message id on the wire
    pub fn message_id(self) -> u8 {
        match self {
            CommandCode::SetProperty(_) => 0x04,
            CommandCode::ModuleState => 0x09,
            CommandCode::RequestTopology => 0x07,
            CommandCode::RequestTopologyFollowUp => 0x2A,
            CommandCode::RequestNetworkUuid => 0x28,
        }
    }
}

/// Module run state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModuleState {
    Run = 0,
    Idle = 1,
    Pause = 2,
    Error = 3,
    NoFirmware = 4,
    Reboot = 6,
}

/// Plug-and-play state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PnpState {
    On = 1,
    Off = 2,
}

/// Immutable outbound command
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub target: ModuleId,
    pub code: CommandCode,
    /// Values in device-defined order
    pub payload: Vec<i32>,
}

impl Command {
    pub fn new(target: ModuleId, code: CommandCode, payload: Vec<i32>) -> Self {
        Command {
            target,
            code,
            payload,
        }
    }

    /// Whole-record property write
    pub fn set_property(target: ModuleId, property: u16, payload: Vec<i32>) -> Self {
        Command::new(target, CommandCode::SetProperty(property), payload)
    }

    pub fn module_state(target: ModuleId, state: ModuleState, pnp: PnpState) -> Self {
        Command::new(
            target,
            CommandCode::ModuleState,
            vec![state as i32, pnp as i32],
        )
    }

    /// Both topology requests, in the order the firmware expects them
    pub fn request_topology(target: ModuleId) -> [Command; 2] {
        [
            Command::new(target, CommandCode::RequestTopology, vec![0; 8]),
            Command::new(target, CommandCode::RequestTopologyFollowUp, vec![0; 8]),
        ]
    }

    pub fn request_network_uuid() -> Self {
        Command::new(
            ModuleId::BROADCAST,
            CommandCode::RequestNetworkUuid,
            vec![0xFF, 0x0F],
        )
    }
}

/// Receiving end of the outbound queue, owned by the transport
pub type CommandReceiver = mpsc::UnboundedReceiver<Command>;

/// Producer handle onto the shared outbound queue.
///
/// Cloned into every module proxy. Enqueue never blocks and preserves
/// per-producer order.
#[derive(Clone, Debug)]
pub struct CommandSink {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSink {
    /// Create the shared queue
    pub fn channel() -> (CommandSink, CommandReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (CommandSink { tx }, rx)
    }

    /// Push a command toward the transport.
    ///
    /// Success means "enqueued", never "applied".
    pub fn enqueue(&self, command: Command) -> ModiResult<()> {
        tracing::debug!(
            module = %command.target,
            code = ?command.code,
            payload = ?command.payload,
            "enqueue command"
        );
        self.tx.send(command).map_err(|_| ModiError::QueueClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
