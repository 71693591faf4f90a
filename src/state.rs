//! Controller lifecycle as tracked by the driver

/// State of the controller IC as far as the driver knows it
///
/// ```text
/// Uninitialized -> Resetting -> Initializing -> Idle      initialize()
/// Idle -> Busy -> Idle                                     refresh
/// Idle -> Sleeping -> Resetting -> Initializing -> Idle    sleep(), wake()
/// Idle -> PoweredOff -> Idle                               power_off(), power_on()
/// ```
///
/// `Busy` is only the driver's view while it waits on the busy line, the
/// controller signals the real state on that pin.
///
/// When an operation fails the driver stays in the state it failed in
/// (e.g. `Initializing` or `Busy`). From there only a reset or a new
/// initialisation is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    /// Not initialised yet, or reset without initialisation
    #[default]
    Uninitialized,
    /// Hardware reset pulse in progress
    Resetting,
    /// Init sequence in progress
    Initializing,
    /// Ready for refreshes
    Idle,
    /// A refresh was triggered and the driver waits for the panel
    Busy,
    /// Deep sleep, needs a reset to wake up
    Sleeping,
    /// Charge pumps turned off, registers are kept
    PoweredOff,
}

impl State {
    /// Whether the controller accepts refresh and power commands
    pub fn is_ready(&self) -> bool {
        *self == State::Idle
    }
}
