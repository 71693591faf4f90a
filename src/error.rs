use core::fmt::{Debug, Display, Formatter};

use embedded_hal::{digital, spi};

use crate::state::State;

/// Epd error type
///
/// None of these errors can be resumed from. A half sent frame or a broken
/// off init sequence leaves the controller in an unknown state, so the way
/// back is [`reset`](crate::epd4in2::Epd4in2::reset) followed by
/// [`initialize`](crate::epd4in2::Epd4in2::initialize).
pub enum ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    CS: digital::ErrorType,
    BUSY: digital::ErrorType,
    DC: digital::ErrorType,
    RST: digital::ErrorType,
{
    /// The given buffer doesn't have the size `width / 8 * height`
    SizeMismatch {
        /// Length the panel needs
        expected: usize,
        /// Length that was given
        actual: usize,
    },

    /// The operation isn't allowed in the current controller state
    InvalidState(State),

    /// Encountered an SPI error, the transaction was abandoned
    BusTransferFailure(SPI::Error),

    /// Encountered an error on CS GPIO
    CsError(CS::Error),

    /// Encountered an error on Busy GPIO
    BusyError(BUSY::Error),

    /// Encountered an error on DC GPIO
    DcError(DC::Error),

    /// Encountered an error on RST GPIO
    RstError(RST::Error),

    /// The busy line didn't report idle within the configured timeout
    BusyTimeout,
}

impl<SPI, CS, BUSY, DC, RST> Clone for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    SPI::Error: Clone,
    CS: digital::ErrorType,
    CS::Error: Clone,
    BUSY: digital::ErrorType,
    BUSY::Error: Clone,
    DC: digital::ErrorType,
    DC::Error: Clone,
    RST: digital::ErrorType,
    RST::Error: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Self::SizeMismatch { expected, actual } => Self::SizeMismatch {
                expected: *expected,
                actual: *actual,
            },
            Self::InvalidState(state) => Self::InvalidState(*state),
            Self::BusTransferFailure(err) => Self::BusTransferFailure(err.clone()),
            Self::CsError(err) => Self::CsError(err.clone()),
            Self::BusyError(err) => Self::BusyError(err.clone()),
            Self::DcError(err) => Self::DcError(err.clone()),
            Self::RstError(err) => Self::RstError(err.clone()),
            Self::BusyTimeout => Self::BusyTimeout,
        }
    }
}

impl<SPI, CS, BUSY, DC, RST> Copy for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    SPI::Error: Copy,
    CS: digital::ErrorType,
    CS::Error: Copy,
    BUSY: digital::ErrorType,
    BUSY::Error: Copy,
    DC: digital::ErrorType,
    DC::Error: Copy,
    RST: digital::ErrorType,
    RST::Error: Copy,
{
}

impl<SPI, CS, BUSY, DC, RST> PartialEq for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    SPI::Error: PartialEq,
    CS: digital::ErrorType,
    CS::Error: PartialEq,
    BUSY: digital::ErrorType,
    BUSY::Error: PartialEq,
    DC: digital::ErrorType,
    DC::Error: PartialEq,
    RST: digital::ErrorType,
    RST::Error: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::SizeMismatch { expected, actual },
                Self::SizeMismatch {
                    expected: other_expected,
                    actual: other_actual,
                },
            ) => expected == other_expected && actual == other_actual,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::BusTransferFailure(a), Self::BusTransferFailure(b)) => a == b,
            (Self::CsError(a), Self::CsError(b)) => a == b,
            (Self::BusyError(a), Self::BusyError(b)) => a == b,
            (Self::DcError(a), Self::DcError(b)) => a == b,
            (Self::RstError(a), Self::RstError(b)) => a == b,
            (Self::BusyTimeout, Self::BusyTimeout) => true,
            _ => false,
        }
    }
}

impl<SPI, CS, BUSY, DC, RST> Display for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    CS: digital::ErrorType,
    BUSY: digital::ErrorType,
    DC: digital::ErrorType,
    RST: digital::ErrorType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => write!(
                f,
                "buffer has {actual} bytes but the panel needs {expected}"
            ),
            Self::InvalidState(state) => write!(f, "not allowed while the controller is {state:?}"),
            Self::BusTransferFailure(err) => write!(f, "spi transfer failed: {err:?}"),
            Self::CsError(err) => write!(f, "cs pin: {err:?}"),
            Self::BusyError(err) => write!(f, "busy pin: {err:?}"),
            Self::DcError(err) => write!(f, "dc pin: {err:?}"),
            Self::RstError(err) => write!(f, "rst pin: {err:?}"),
            Self::BusyTimeout => write!(f, "timed out waiting for the busy line"),
        }
    }
}

impl<SPI, CS, BUSY, DC, RST> Debug for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    CS: digital::ErrorType,
    BUSY: digital::ErrorType,
    DC: digital::ErrorType,
    RST: digital::ErrorType,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => f
                .debug_struct("SizeMismatch")
                .field("expected", expected)
                .field("actual", actual)
                .finish(),
            Self::InvalidState(state) => f.debug_tuple("InvalidState").field(state).finish(),
            Self::BusTransferFailure(err) => {
                f.debug_tuple("BusTransferFailure").field(err).finish()
            }
            Self::CsError(err) => f.debug_tuple("CsError").field(err).finish(),
            Self::BusyError(err) => f.debug_tuple("BusyError").field(err).finish(),
            Self::DcError(err) => f.debug_tuple("DcError").field(err).finish(),
            Self::RstError(err) => f.debug_tuple("RstError").field(err).finish(),
            Self::BusyTimeout => write!(f, "BusyTimeout"),
        }
    }
}

impl<SPI, CS, BUSY, DC, RST> core::error::Error for ErrorKind<SPI, CS, BUSY, DC, RST>
where
    SPI: spi::ErrorType,
    CS: digital::ErrorType,
    BUSY: digital::ErrorType,
    DC: digital::ErrorType,
    RST: digital::ErrorType,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FakeBusy, FakePin, FakeSpi};

    extern crate std;
    use std::format;

    type Error = ErrorKind<FakeSpi, FakePin, FakeBusy, FakePin, FakePin>;

    #[test]
    fn display_names_the_problem() {
        let err: Error = ErrorKind::SizeMismatch {
            expected: 15_000,
            actual: 12,
        };
        assert_eq!(
            format!("{err}"),
            "buffer has 12 bytes but the panel needs 15000"
        );

        let err: Error = ErrorKind::InvalidState(State::Sleeping);
        assert_eq!(format!("{err}"), "not allowed while the controller is Sleeping");
    }

    #[test]
    fn wraps_hal_errors() {
        let err: Error = ErrorKind::BusTransferFailure(spi::ErrorKind::Overrun);
        assert_eq!(format!("{err:?}"), "BusTransferFailure(Overrun)");

        let copy = err;
        assert_eq!(copy, err);
        assert_ne!(copy, ErrorKind::BusyTimeout);
    }
}
