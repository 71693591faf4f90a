use crate::error::ErrorKind;
use crate::traits::Command;
use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};
use log::{trace, warn};

/// Time the reset line is held high before the reset pulse
pub(crate) const RESET_HIGH_HOLD_US: u32 = 1_000;
/// Minimum length of the low reset pulse
pub(crate) const RESET_LOW_HOLD_US: u32 = 10_000;

/// Linux spidev refuses transfers larger than this
const SPIDEV_MAX_TRANSFER: usize = 4096;

/// The Connection Interface of the IL0398 controller
///
/// Frames every command byte and every payload in its own chip-select span.
pub(crate) struct DisplayInterface<SPI, CS, BUSY, DC, RST, DELAY> {
    /// SPI
    spi: SPI,
    /// CS for SPI, low while a transfer is running
    cs: CS,
    /// Low for busy, Wait until display is ready!
    busy: BUSY,
    /// Data/Command Control Pin (High for data, Low for command)
    dc: DC,
    /// Pin for Resetting
    rst: RST,
    /// The concrete Delay implementation
    delay: DELAY,
    /// number of us the idle loop should sleep on
    delay_us: u32,
    /// number of us of polling after which the idle loop gives up
    timeout_us: Option<u32>,
}

impl<SPI, CS, BUSY, DC, RST, DELAY> DisplayInterface<SPI, CS, BUSY, DC, RST, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Creates a new `DisplayInterface` struct
    ///
    /// Doesn't touch any of the lines.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        spi: SPI,
        cs: CS,
        busy: BUSY,
        dc: DC,
        rst: RST,
        delay: DELAY,
        delay_us: u32,
        timeout_us: Option<u32>,
    ) -> Self {
        DisplayInterface {
            spi,
            cs,
            busy,
            dc,
            rst,
            delay,
            delay_us,
            timeout_us,
        }
    }

    /// Basic function for sending [Commands](Command).
    ///
    /// Enables direct interaction with the device with the help of [data()](DisplayInterface::data())
    pub(crate) fn cmd<T: Command>(
        &mut self,
        command: T,
    ) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        trace!("cmd {:#04x}", command.address());
        // cs idles high, dc may only change outside of a transfer
        self.cs.set_high().map_err(ErrorKind::CsError)?;
        // low for commands
        self.dc.set_low().map_err(ErrorKind::DcError)?;

        // Transfer the command over spi
        self.with_cs(|spi| write(spi, &[command.address()]))
    }

    /// Basic function for sending an array of u8-values of data over spi
    ///
    /// All bytes go out in one chip-select span. Nothing is sent for an empty slice.
    pub(crate) fn data(&mut self, data: &[u8]) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        if data.is_empty() {
            return Ok(());
        }
        // high for data
        self.dc.set_high().map_err(ErrorKind::DcError)?;

        self.with_cs(|spi| write(spi, data))
    }

    /// Basic function for sending [Commands](Command) and the data belonging to it.
    ///
    /// Chip-select is released between the command byte and its parameters.
    pub(crate) fn cmd_with_data<T: Command>(
        &mut self,
        command: T,
        data: &[u8],
    ) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        debug_assert!(
            command.arity().accepts(data.len()),
            "wrong parameter count for command {:#04x}",
            command.address()
        );
        self.cmd(command)?;
        self.data(data)
    }

    /// Basic function for sending the same byte of data (one u8) multiple times over spi
    ///
    /// Like [data()](DisplayInterface::data()) this is a single chip-select span.
    pub(crate) fn data_x_times(
        &mut self,
        val: u8,
        repetitions: usize,
    ) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        if repetitions == 0 {
            return Ok(());
        }
        // high for data
        self.dc.set_high().map_err(ErrorKind::DcError)?;

        let block = [val; 64];
        self.with_cs(|spi| {
            let mut left = repetitions;
            while left > 0 {
                let n = left.min(block.len());
                spi.write(&block[..n])?;
                left -= n;
            }
            spi.flush()
        })
    }

    // activates cs around a transfer and releases it even if the transfer failed
    fn with_cs<F>(&mut self, f: F) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>>
    where
        F: FnOnce(&mut SPI) -> Result<(), SPI::Error>,
    {
        // activate spi with cs low
        self.cs.set_low().map_err(ErrorKind::CsError)?;
        // transfer spi data
        let result = f(&mut self.spi).map_err(ErrorKind::BusTransferFailure);
        // deativate spi with cs high
        let released = self.cs.set_high().map_err(ErrorKind::CsError);
        result.and(released)
    }

    /// Waits until device isn't busy anymore (busy == HIGH)
    ///
    /// The level of the pin is read again on every iteration. Between reads the
    /// loop sleeps for `delay_us`, and once the slept time reaches `timeout_us`
    /// it fails with [`ErrorKind::BusyTimeout`]. With a `delay_us` of 0 the
    /// loop spins without a bound.
    pub(crate) fn wait_until_idle(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        let mut waited_us: u32 = 0;
        //low: busy, high: idle
        while !self.busy.is_high().map_err(ErrorKind::BusyError)? {
            if self.delay_us == 0 {
                core::hint::spin_loop();
                continue;
            }
            if let Some(timeout_us) = self.timeout_us {
                if waited_us >= timeout_us {
                    warn!("busy line still low after {waited_us}us");
                    return Err(ErrorKind::BusyTimeout);
                }
            }
            self.delay.delay_us(self.delay_us);
            waited_us = waited_us.saturating_add(self.delay_us);
        }
        Ok(())
    }

    /// Resets the device.
    ///
    /// Often used to awake the module from deep sleep.
    ///
    /// The controller needs the line high for at least 1ms and then a low
    /// pulse of at least 10ms. Shorter holds don't reset it reliably.
    pub(crate) fn reset(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.rst.set_high().map_err(ErrorKind::RstError)?;
        self.delay.delay_us(RESET_HIGH_HOLD_US);

        self.rst.set_low().map_err(ErrorKind::RstError)?;
        self.delay.delay_us(RESET_LOW_HOLD_US);

        self.rst.set_high().map_err(ErrorKind::RstError)
    }

    /// Gives back the hardware
    pub(crate) fn release(self) -> (SPI, CS, BUSY, DC, RST, DELAY) {
        (self.spi, self.cs, self.busy, self.dc, self.rst, self.delay)
    }
}

#[cfg(feature = "async")]
impl<SPI, CS, BUSY, DC, RST, DELAY> DisplayInterface<SPI, CS, BUSY, DC, RST, DELAY>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin + embedded_hal_async::digital::Wait,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
{
    /// Same as `wait_until_idle`, but suspends on the busy line instead of polling.
    ///
    /// There is no timeout, drop the future to give up.
    pub(crate) async fn wait_until_idle_async(
        &mut self,
    ) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.busy
            .wait_for_high()
            .await
            .map_err(ErrorKind::BusyError)
    }
}

// spi write helper/abstraction function
fn write<SPI: SpiBus>(spi: &mut SPI, data: &[u8]) -> Result<(), SPI::Error> {
    // transfer spi data
    // Be careful!! Linux has a default limit of 4096 bytes per spi transfer
    // see https://raspberrypi.stackexchange.com/questions/65595/spi-transfer-fails-with-buffer-size-greater-than-4096
    if cfg!(target_os = "linux") {
        for data_chunk in data.chunks(SPIDEV_MAX_TRANSFER) {
            spi.write(data_chunk)?;
        }
    } else {
        spi.write(data)?;
    }
    // cs must not go up before the last bit left
    spi.flush()
}
