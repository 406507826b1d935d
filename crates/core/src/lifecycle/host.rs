//! Host event channel
//!
//! Lifecycle commands and cooked input arrive on the platform UI thread and
//! are handed to the engine thread over a bounded channel. Commands are
//! never dropped: the sender blocks when the channel is full. Input is
//! best-effort and dropped with a warning instead. Input whose answer the
//! host needs (Back) can wait for the scene's verdict.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError, TrySendError};

use tunnel_sdk::{LifecycleCommand, NativeWindow};

use crate::input::CookedEvent;

/// Typed lifecycle command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineCommand {
    WindowCreated(NativeWindow),
    WindowDestroyed,
    WindowResized,
    GainedFocus,
    LostFocus,
    /// The activity became visible
    Start,
    /// The activity is no longer visible
    Stop,
    Pause,
    Resume,
    LowMemory,
    SaveState,
    Destroy,
}

impl EngineCommand {
    /// Translate a host lifecycle command
    ///
    /// # Arguments
    /// * `command` - Decoded host command
    /// * `window` - Window handle, required for `INIT_WINDOW`
    ///
    /// # Returns
    /// `None` for commands the engine does not act on, or `INIT_WINDOW`
    /// without a window
    pub fn from_lifecycle(command: LifecycleCommand, window: Option<NativeWindow>) -> Option<Self> {
        let translated = match command {
            LifecycleCommand::InitWindow => Self::WindowCreated(window?),
            LifecycleCommand::TermWindow => Self::WindowDestroyed,
            LifecycleCommand::WindowResized => Self::WindowResized,
            LifecycleCommand::GainedFocus => Self::GainedFocus,
            LifecycleCommand::LostFocus => Self::LostFocus,
            LifecycleCommand::Start => Self::Start,
            LifecycleCommand::Stop => Self::Stop,
            LifecycleCommand::Pause => Self::Pause,
            LifecycleCommand::Resume => Self::Resume,
            LifecycleCommand::LowMemory => Self::LowMemory,
            LifecycleCommand::SaveState => Self::SaveState,
            LifecycleCommand::Destroy => Self::Destroy,
            LifecycleCommand::InputChanged
            | LifecycleCommand::WindowRedrawNeeded
            | LifecycleCommand::ContentRectChanged
            | LifecycleCommand::ConfigChanged => return None,
        };
        Some(translated)
    }

    /// Translate a raw `APP_CMD_*` code
    pub fn from_raw(raw: i32, window: Option<NativeWindow>) -> Option<Self> {
        LifecycleCommand::from_raw(raw).and_then(|command| Self::from_lifecycle(command, window))
    }

    /// Whether this command should retry graphics acquisition
    pub fn retries_acquisition(&self) -> bool {
        matches!(
            self,
            Self::WindowCreated(_)
                | Self::WindowResized
                | Self::GainedFocus
                | Self::Start
                | Self::Resume
        )
    }

    /// Short name for log output
    pub fn name(&self) -> &'static str {
        match self {
            Self::WindowCreated(_) => "WindowCreated",
            Self::WindowDestroyed => "WindowDestroyed",
            Self::WindowResized => "WindowResized",
            Self::GainedFocus => "GainedFocus",
            Self::LostFocus => "LostFocus",
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Pause => "Pause",
            Self::Resume => "Resume",
            Self::LowMemory => "LowMemory",
            Self::SaveState => "SaveState",
            Self::Destroy => "Destroy",
        }
    }
}

/// Message for the engine thread
#[derive(Debug)]
pub enum HostEvent {
    Command(EngineCommand),
    Input(CookedEvent),
    /// Input whose consumed flag goes back on `reply`
    Query {
        event: CookedEvent,
        reply: Sender<bool>,
    },
    /// Acknowledge once everything queued before it has been handled
    Barrier(Sender<()>),
}

/// The engine side hung up
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Host event channel disconnected")]
pub struct Disconnected;

/// Create a bounded host event channel
pub fn host_channel(capacity: usize) -> (HostSender, HostReceiver) {
    let (sender, receiver) = bounded(capacity.max(1));
    (HostSender { sender }, HostReceiver { receiver })
}

/// Sending half, held by the platform side
#[derive(Debug, Clone)]
pub struct HostSender {
    sender: Sender<HostEvent>,
}

impl HostSender {
    /// Queue a lifecycle command, blocking while the channel is full
    ///
    /// # Returns
    /// `false` if the engine is gone
    pub fn send_command(&self, command: EngineCommand) -> bool {
        match self.sender.send(HostEvent::Command(command)) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!("Engine gone, dropping {}", command.name());
                false
            }
        }
    }

    /// Queue a cooked input event without blocking
    ///
    /// # Returns
    /// `false` if the event was dropped
    pub fn post_input(&self, event: CookedEvent) -> bool {
        match self.sender.try_send(HostEvent::Input(event)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Host event queue full, dropping input");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Queue a cooked input event and wait for the scene's verdict
    ///
    /// # Arguments
    /// * `event` - Cooked event
    /// * `timeout` - Upper bound on the wait for the answer
    ///
    /// # Returns
    /// Whether the current scene consumed the event, or `None` if it was
    /// dropped or the engine did not answer in time
    pub fn query_input(&self, event: CookedEvent, timeout: Duration) -> Option<bool> {
        let (reply, answer) = bounded(1);
        match self.sender.try_send(HostEvent::Query { event, reply }) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Host event queue full, dropping input");
                return None;
            }
            Err(TrySendError::Disconnected(_)) => return None,
        }

        match answer.recv_timeout(timeout) {
            Ok(consumed) => Some(consumed),
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("Engine did not answer input within {:?}", timeout);
                None
            }
            Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Wait until the engine has handled everything queued so far
    ///
    /// # Arguments
    /// * `timeout` - Upper bound on the wait for the acknowledgment
    ///
    /// # Returns
    /// `true` if the engine acknowledged in time
    pub fn barrier(&self, timeout: Duration) -> bool {
        let (ack_tx, ack_rx) = bounded(1);
        if self.sender.send(HostEvent::Barrier(ack_tx)).is_err() {
            return false;
        }

        match ack_rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!("Engine did not acknowledge barrier within {:?}", timeout);
                false
            }
            Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Number of events waiting
    pub fn pending(&self) -> usize {
        self.sender.len()
    }
}

/// Receiving half, owned by the engine
#[derive(Debug)]
pub struct HostReceiver {
    receiver: Receiver<HostEvent>,
}

impl HostReceiver {
    /// Block until the next event arrives
    pub fn recv(&self) -> Result<HostEvent, Disconnected> {
        self.receiver.recv().map_err(|_| Disconnected)
    }

    /// Take the next event if one is waiting
    pub fn try_recv(&self) -> Result<Option<HostEvent>, Disconnected> {
        match self.receiver.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Disconnected),
        }
    }
}
