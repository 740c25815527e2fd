//! Harness configuration builders.
//!
//! Every capacity is fixed when the harness is initialized. The builder only
//! chooses the ceilings; nothing grows once a [`Harness`](crate::Harness)
//! exists, so capacity exhaustion stays a first-class test target.

use crate::error::{HarnessError, HarnessResult};

/// Capture buffer capacity in bytes (1 MiB).
pub const DEFAULT_CAPTURE_CAPACITY: usize = 1024 * 1024;
/// Maximum simultaneously active connections.
pub const DEFAULT_MAX_CONNECTIONS: usize = 16;
/// Maximum simultaneously active listeners.
pub const DEFAULT_MAX_LISTENERS: usize = 16;
/// Input ring slots. One slot stays empty to tell full from empty.
pub const DEFAULT_INPUT_QUEUE_DEPTH: usize = 256;
/// Upper bound on task/pump rounds per [`Session::execute_command`](crate::Session::execute_command).
pub const DEFAULT_MAX_PUMP_ROUNDS: usize = 100;

/// What the pump does with a line whose connection has input suspended.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SuspendedInput {
    /// Drop the line without telling the host.
    #[default]
    Discard,
    /// Keep the line queued, in order, until a pump finds input resumed.
    Retain,
}

/// Configuration describing the capacities of a harness instance.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UncheckedConfig"))]
pub struct HarnessConfig {
    capture_capacity: usize,
    max_connections: usize,
    max_listeners: usize,
    input_queue_depth: usize,
    suspended_input: SuspendedInput,
    max_pump_rounds: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            capture_capacity: DEFAULT_CAPTURE_CAPACITY,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_listeners: DEFAULT_MAX_LISTENERS,
            input_queue_depth: DEFAULT_INPUT_QUEUE_DEPTH,
            suspended_input: SuspendedInput::Discard,
            max_pump_rounds: DEFAULT_MAX_PUMP_ROUNDS,
        }
    }
}

impl HarnessConfig {
    /// Creates a new [`HarnessConfigBuilder`] seeded with the defaults.
    #[must_use]
    pub fn builder() -> HarnessConfigBuilder {
        HarnessConfigBuilder::default()
    }

    /// Returns the capture buffer capacity in bytes, terminator included.
    #[must_use]
    pub const fn capture_capacity(&self) -> usize {
        self.capture_capacity
    }

    /// Returns the number of connection slots.
    #[must_use]
    pub const fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Returns the number of listener slots.
    #[must_use]
    pub const fn max_listeners(&self) -> usize {
        self.max_listeners
    }

    /// Returns the number of ring slots in the input queue.
    #[must_use]
    pub const fn input_queue_depth(&self) -> usize {
        self.input_queue_depth
    }

    /// Returns how many lines the input queue holds at once.
    #[must_use]
    pub const fn usable_queue_depth(&self) -> usize {
        self.input_queue_depth.saturating_sub(1)
    }

    /// Returns the policy for lines aimed at suspended connections.
    #[must_use]
    pub const fn suspended_input(&self) -> SuspendedInput {
        self.suspended_input
    }

    /// Returns the round limit used by the driver session.
    #[must_use]
    pub const fn max_pump_rounds(&self) -> usize {
        self.max_pump_rounds
    }

    /// Checks every setting against its allowed range.
    ///
    /// Both [`HarnessConfigBuilder::build`] and deserialisation run this.
    pub fn validate(&self) -> HarnessResult<()> {
        if self.capture_capacity < 2 {
            return Err(HarnessError::InvalidConfig(format!(
                "capture capacity {} leaves no room for a byte and its terminator",
                self.capture_capacity
            )));
        }
        if self.max_connections == 0 {
            return Err(HarnessError::InvalidConfig(
                "max_connections must be at least 1".to_owned(),
            ));
        }
        if self.max_listeners == 0 {
            return Err(HarnessError::InvalidConfig(
                "max_listeners must be at least 1".to_owned(),
            ));
        }
        if self.input_queue_depth < 2 {
            return Err(HarnessError::InvalidConfig(format!(
                "input queue depth {} cannot hold a line",
                self.input_queue_depth
            )));
        }
        if self.max_pump_rounds == 0 {
            return Err(HarnessError::InvalidConfig(
                "max_pump_rounds must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Deserialised form of [`HarnessConfig`], validated on conversion.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(default)]
struct UncheckedConfig {
    capture_capacity: usize,
    max_connections: usize,
    max_listeners: usize,
    input_queue_depth: usize,
    suspended_input: SuspendedInput,
    max_pump_rounds: usize,
}

#[cfg(feature = "serde")]
impl Default for UncheckedConfig {
    fn default() -> Self {
        let HarnessConfig {
            capture_capacity,
            max_connections,
            max_listeners,
            input_queue_depth,
            suspended_input,
            max_pump_rounds,
        } = HarnessConfig::default();
        Self {
            capture_capacity,
            max_connections,
            max_listeners,
            input_queue_depth,
            suspended_input,
            max_pump_rounds,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<UncheckedConfig> for HarnessConfig {
    type Error = HarnessError;

    fn try_from(raw: UncheckedConfig) -> Result<Self, Self::Error> {
        let config = Self {
            capture_capacity: raw.capture_capacity,
            max_connections: raw.max_connections,
            max_listeners: raw.max_listeners,
            input_queue_depth: raw.input_queue_depth,
            suspended_input: raw.suspended_input,
            max_pump_rounds: raw.max_pump_rounds,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Builder used to assemble a [`HarnessConfig`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    /// Sets the capture buffer capacity in bytes.
    #[must_use]
    pub fn capture_capacity(mut self, bytes: usize) -> Self {
        self.config.capture_capacity = bytes;
        self
    }

    /// Sets the number of connection slots.
    #[must_use]
    pub fn max_connections(mut self, slots: usize) -> Self {
        self.config.max_connections = slots;
        self
    }

    /// Sets the number of listener slots.
    #[must_use]
    pub fn max_listeners(mut self, slots: usize) -> Self {
        self.config.max_listeners = slots;
        self
    }

    /// Sets the number of ring slots in the input queue.
    #[must_use]
    pub fn input_queue_depth(mut self, slots: usize) -> Self {
        self.config.input_queue_depth = slots;
        self
    }

    /// Selects the policy for lines aimed at suspended connections.
    #[must_use]
    pub fn suspended_input(mut self, policy: SuspendedInput) -> Self {
        self.config.suspended_input = policy;
        self
    }

    /// Sets the round limit used by the driver session.
    #[must_use]
    pub fn max_pump_rounds(mut self, rounds: usize) -> Self {
        self.config.max_pump_rounds = rounds;
        self
    }

    /// Finalises the builder.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidConfig`] when any setting is out of range.
    pub fn build(self) -> HarnessResult<HarnessConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
