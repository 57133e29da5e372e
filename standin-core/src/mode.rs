//! # Debug Modes
//!
//! A [`DebugMode`] tells the policy engine how eagerly it may replace real results with
//! sample data. The process-level setting lives in a [`DebugSwitch`], a cheap cloneable handle
//! that is passed explicitly to every [`crate::Standin`] instead of being a global variable.
//!
//! Each instance may override the switch's mode, except when the switch is *locked*. Setting
//! the switch to [`DebugMode::Shutdown`] engages the lock: from then on every instance resolves
//! to `Shutdown`, whatever its own override says, until [`DebugSwitch::unlock`] is called.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

/// How the policy engine treats missing or unusable responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugMode {
    /// Never touch the network, always run with the success sample.
    Always,
    /// Run with the success sample whenever the real response cannot be used.
    Auto,
    /// Ask the user what to do whenever the real response cannot be used.
    Option,
    /// Never use sample data.
    Never,
    /// Same data flow as `Never`, and no instance can override it.
    Shutdown,
}

impl DebugMode {
    pub const ALL: [DebugMode; 5] = [
        DebugMode::Always,
        DebugMode::Auto,
        DebugMode::Option,
        DebugMode::Never,
        DebugMode::Shutdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DebugMode::Always => "always",
            DebugMode::Auto => "auto",
            DebugMode::Option => "option",
            DebugMode::Never => "never",
            DebugMode::Shutdown => "shutdown",
        }
    }

    fn to_u8(self) -> u8 {
        match self {
            DebugMode::Always => 0,
            DebugMode::Auto => 1,
            DebugMode::Option => 2,
            DebugMode::Never => 3,
            DebugMode::Shutdown => 4,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => DebugMode::Always,
            1 => DebugMode::Auto,
            2 => DebugMode::Option,
            3 => DebugMode::Never,
            _ => DebugMode::Shutdown,
        }
    }
}

impl fmt::Display for DebugMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid debug mode '{0}'. Expected one of: always, auto, option, never, shutdown")]
pub struct ParseModeError(pub String);

impl FromStr for DebugMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        DebugMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

#[derive(Debug)]
struct SwitchState {
    mode: AtomicU8,
    locked: AtomicBool,
}

/// Shared, thread-safe holder of the process-level debug mode.
///
/// Clones share the same state, so a change made through one handle is seen by every
/// [`crate::Standin`] built with another. The default switch is locked in `Shutdown`.
#[derive(Debug, Clone)]
pub struct DebugSwitch {
    state: Arc<SwitchState>,
}

impl DebugSwitch {
    /// Creates a switch holding `mode`. A `Shutdown` switch starts locked.
    pub fn new(mode: DebugMode) -> Self {
        Self {
            state: Arc::new(SwitchState {
                mode: AtomicU8::new(mode.to_u8()),
                locked: AtomicBool::new(mode == DebugMode::Shutdown),
            }),
        }
    }

    /// The mode every instance without an override follows.
    pub fn mode(&self) -> DebugMode {
        if self.is_locked() {
            DebugMode::Shutdown
        } else {
            DebugMode::from_u8(self.state.mode.load(Ordering::Acquire))
        }
    }

    /// Stores a new mode. `Shutdown` engages the lock; any other mode leaves the lock as it is.
    pub fn set(&self, mode: DebugMode) {
        self.state.mode.store(mode.to_u8(), Ordering::Release);
        if mode == DebugMode::Shutdown {
            self.state.locked.store(true, Ordering::Release);
        }
    }

    /// Releases the lock and stores `mode`.
    pub fn unlock(&self, mode: DebugMode) {
        self.state.mode.store(mode.to_u8(), Ordering::Release);
        self.state
            .locked
            .store(mode == DebugMode::Shutdown, Ordering::Release);
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked.load(Ordering::Acquire)
    }

    /// Resolves the mode an instance actually runs with.
    ///
    /// A locked switch always wins. Otherwise the instance override applies, falling back to
    /// the switch's own mode.
    pub fn resolve(&self, instance: Option<DebugMode>) -> DebugMode {
        if self.is_locked() {
            return DebugMode::Shutdown;
        }
        instance.unwrap_or_else(|| self.mode())
    }
}

impl Default for DebugSwitch {
    fn default() -> Self {
        Self::new(DebugMode::Shutdown)
    }
}
