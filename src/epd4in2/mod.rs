//! A simple Driver for the 4.2" IL0398 B/W E-Ink Display via SPI
//!
//! Build with the help of the controller datasheet and the vendor init
//! sequence for the 400x300 panel.
//!
//! # Requirements
//!
//! ### SPI
//!
//! - MISO is not connected/available
//! - SPI_MODE_0 is used (CPHL = 0, CPOL = 0)
//! - 8 bits per word, MSB first
//! - Max. Speed 20Mhz
//!
//! # Lifecycle
//!
//! [`Epd4in2::new`] only stores the hardware. [`Epd4in2::initialize`] resets
//! and configures the controller, after that frames can be shown with
//! [`Epd4in2::display_buffer`] or [`Epd4in2::display_frame`]. Every refresh
//! blocks until the busy line reports idle again, which takes 1-2 seconds.
//!
//! [`Epd4in2::sleep`] puts the controller into deep sleep, [`Epd4in2::wake`]
//! resets and initialises it again. Nothing but a reset gets through to a
//! sleeping controller, so the driver refuses everything else with
//! [`ErrorKind::InvalidState`].
//!
//! # Examples
//!
//! ```rust, no_run
//!# use embedded_hal_mock::eh1::{delay::NoopDelay, digital::Mock as PinMock, spi::Mock as SpiMock};
//!# fn main() -> Result<(), core::fmt::Error> {
//!# let spi = SpiMock::<u8>::new(&[]);
//!# let cs = PinMock::new(&[]);
//!# let busy = PinMock::new(&[]);
//!# let dc = PinMock::new(&[]);
//!# let rst = PinMock::new(&[]);
//!# let delay = NoopDelay::new();
//!use epd_il0398::{epd4in2::*, prelude::*};
//!
//!let mut epd = Epd4in2::new(spi, cs, busy, dc, rst, delay, Display4in2::default(), Config::default());
//!epd.initialize().map_err(|_| core::fmt::Error)?;
//!
//!// draw into the owned buffer and show it
//!epd.buffer_mut().set_pixel(10, 20, Color::Black);
//!epd.display_frame().map_err(|_| core::fmt::Error)?;
//!
//!// or show a buffer from somewhere else
//!let frame = [Color::White.get_byte_value(); buffer_len(WIDTH as usize, HEIGHT as usize)];
//!epd.display_buffer(&frame).map_err(|_| core::fmt::Error)?;
//!
//!epd.sleep().map_err(|_| core::fmt::Error)?;
//!# Ok(())
//!# }
//! ```

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};
use log::{debug, warn};

use crate::buffer::Buffer;
use crate::buffer_len;
use crate::color::Color;
use crate::error::ErrorKind;
use crate::interface::DisplayInterface;
use crate::state::State;
use crate::traits::PixelBuffer;

pub(crate) mod command;
use self::command::Command;

mod config;
pub use self::config::{Config, PllFrequency};

/// Width of the display
pub const WIDTH: u32 = 400;
/// Height of the display
pub const HEIGHT: u32 = 300;
/// Default Background Color
pub const DEFAULT_BACKGROUND_COLOR: Color = Color::White;

/// Full size buffer for use with the 4in2 EPD
pub type Display4in2 = Buffer<WIDTH, HEIGHT, { buffer_len(WIDTH as usize, HEIGHT as usize) }>;

// soft start phases A, B and C
const BOOSTER_SOFT_START: [u8; 3] = [0x17, 0x17, 0x17];
// VDS_EN VDG_EN, VCOM_HV VGHL_LV, VDH, VDL, VDHR
const POWER_SETTING: [u8; 5] = [0x03, 0x00, 0x2B, 0x2B, 0x09];
// B/W mode, LUT from OTP
const PANEL_SETTING: u8 = 0x1F;
// border and data polarity with the VCOM/data interval
const VCOM_AND_DATA_INTERVAL: u8 = 0x87;
const DEEP_SLEEP_CHECK_CODE: u8 = 0xA5;

/// Epd4in2 driver
///
/// Owns the hardware, the controller state and a frame buffer `BUF`.
/// The panel resolution is the one of the buffer.
pub struct Epd4in2<SPI, CS, BUSY, DC, RST, DELAY, BUF> {
    /// Connection Interface
    interface: DisplayInterface<SPI, CS, BUSY, DC, RST, DELAY>,
    /// Frame shown by `display_frame`
    buffer: BUF,
    config: Config,
    state: State,
}

impl<SPI, CS, BUSY, DC, RST, DELAY, BUF> Epd4in2<SPI, CS, BUSY, DC, RST, DELAY, BUF>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    BUF: PixelBuffer,
{
    /// Creates a new driver from a SPI bus, CS Pin, Busy InputPin, DC, RST and a delay
    ///
    /// Nothing is sent yet, call [initialize()](Epd4in2::initialize()) before showing anything.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spi: SPI,
        cs: CS,
        busy: BUSY,
        dc: DC,
        rst: RST,
        delay: DELAY,
        buffer: BUF,
        config: Config,
    ) -> Self {
        let interface = DisplayInterface::new(
            spi,
            cs,
            busy,
            dc,
            rst,
            delay,
            config.busy_poll_interval_us,
            config.busy_timeout_us,
        );
        Epd4in2 {
            interface,
            buffer,
            config,
            state: State::Uninitialized,
        }
    }

    /// What the driver knows about the controller
    pub fn state(&self) -> State {
        self.state
    }

    /// Get the width of the display
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the display
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// The configuration the driver was created with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The owned frame buffer
    pub fn buffer(&self) -> &BUF {
        &self.buffer
    }

    /// The owned frame buffer, for drawing
    pub fn buffer_mut(&mut self) -> &mut BUF {
        &mut self.buffer
    }

    /// Resets the device.
    ///
    /// Accepted in every state. The controller forgets its configuration,
    /// so the driver ends up `Uninitialized`.
    pub fn reset(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.transition(State::Resetting);
        self.interface.reset()?;
        self.transition(State::Uninitialized);
        Ok(())
    }

    /// This initialises the EPD and powers it up
    ///
    /// Resets the controller first, so this is also the way back from any
    /// failed operation and from deep sleep. Accepted in every state.
    pub fn initialize(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.power_up()?;
        // the controller sequences its power internally before it takes settings
        self.interface.wait_until_idle()?;
        self.configure_panel()?;

        if self.config.clear_on_init {
            self.clear_buffer();
            self.display_frame()?;
        }
        Ok(())
    }

    /// Wakes the device up from sleep
    ///
    /// There is no wake command, this runs the whole [initialize()](Epd4in2::initialize()).
    pub fn wake(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.initialize()
    }

    /// Shows `buffer` and waits until the refresh is done
    ///
    /// `buffer` needs to be `width / 8 * height` bytes. A wrong size or a
    /// controller that isn't `Idle` is refused before anything is sent.
    pub fn display_buffer(&mut self, buffer: &[u8]) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.check_size(buffer.len())?;
        self.require(State::Idle)?;

        self.transition(State::Busy);
        self.interface.cmd(Command::DataStartTransmission2)?;
        self.interface.data(buffer)?;
        self.trigger_refresh()?;
        self.interface.wait_until_idle()?;
        self.transition(State::Idle);
        Ok(())
    }

    /// Shows the owned buffer and waits until the refresh is done
    pub fn display_frame(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.start_frame_refresh()?;
        self.interface.wait_until_idle()?;
        self.transition(State::Idle);
        Ok(())
    }

    /// Sets every pixel of the owned buffer to white
    ///
    /// Only touches memory, call [display_frame()](Epd4in2::display_frame()) to show it.
    pub fn clear_buffer(&mut self) {
        self.buffer.fill(DEFAULT_BACKGROUND_COLOR);
    }

    /// Clears the owned buffer and both image banks of the controller and refreshes the panel
    pub fn clear_frame(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.start_clear()?;
        self.interface.wait_until_idle()?;
        self.transition(State::Idle);
        Ok(())
    }

    /// Let the device enter deep-sleep mode to save power.
    ///
    /// The deep sleep mode returns to standby with a hardware reset, see
    /// [wake()](Epd4in2::wake()).
    pub fn sleep(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.start_sleep()?;
        self.interface.wait_until_idle()
    }

    /// Turns off the charge pumps, the register content is kept
    pub fn power_off(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.require(State::Idle)?;
        self.interface.cmd(Command::PowerOff)?;
        self.interface.wait_until_idle()?;
        self.transition(State::PoweredOff);
        Ok(())
    }

    /// Turns the charge pumps back on after [power_off()](Epd4in2::power_off())
    pub fn power_on(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.require(State::PoweredOff)?;
        self.interface.cmd(Command::PowerOn)?;
        self.interface.wait_until_idle()?;
        self.transition(State::Idle);
        Ok(())
    }

    /// Wait until the display has stopped processing data
    ///
    /// The refreshing operations already do this before they return.
    pub fn wait_until_idle(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.interface.wait_until_idle()
    }

    /// Gives back the hardware and the buffer
    pub fn release(self) -> (SPI, CS, BUSY, DC, RST, DELAY, BUF) {
        let (spi, cs, busy, dc, rst, delay) = self.interface.release();
        (spi, cs, busy, dc, rst, delay, self.buffer)
    }

    // reset and everything up to power on
    fn power_up(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.transition(State::Resetting);
        self.interface.reset()?;

        self.transition(State::Initializing);
        self.interface
            .cmd_with_data(Command::BoosterSoftStart, &BOOSTER_SOFT_START)?;
        self.interface
            .cmd_with_data(Command::PowerSetting, &POWER_SETTING)?;
        self.interface.cmd(Command::PowerOn)
    }

    // everything after power on, the controller has to be idle
    fn configure_panel(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.interface
            .cmd_with_data(Command::PanelSetting, &[PANEL_SETTING])?;
        self.interface
            .cmd_with_data(Command::PllControl, &[self.config.pll.value()])?;
        self.send_resolution()?;
        self.interface
            .cmd_with_data(Command::VcmDcSetting, &[self.config.vcom_dc])?;
        self.interface
            .cmd_with_data(Command::VcomAndDataIntervalSetting, &[VCOM_AND_DATA_INTERVAL])?;
        self.transition(State::Idle);
        Ok(())
    }

    fn send_resolution(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        let w = self.width();
        let h = self.height();

        self.interface.cmd_with_data(
            Command::ResolutionSetting,
            &[(w >> 8) as u8, w as u8, (h >> 8) as u8, h as u8],
        )
    }

    // sends the owned buffer and triggers the refresh, without waiting
    fn start_frame_refresh(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.require(State::Idle)?;

        self.transition(State::Busy);
        self.interface.cmd(Command::DataStartTransmission2)?;
        self.interface.data(self.buffer.buffer())?;
        self.trigger_refresh()
    }

    fn start_clear(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.require(State::Idle)?;
        self.clear_buffer();

        let size = buffer_len(self.width() as usize, self.height() as usize);
        let color_value = DEFAULT_BACKGROUND_COLOR.get_byte_value();

        self.transition(State::Busy);
        self.interface.cmd(Command::DataStartTransmission1)?;
        self.interface.data_x_times(color_value, size)?;
        self.interface.cmd(Command::DataStartTransmission2)?;
        self.interface.data_x_times(color_value, size)?;
        self.trigger_refresh()
    }

    fn start_sleep(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.require(State::Idle)?;
        self.interface
            .cmd_with_data(Command::DeepSleep, &[DEEP_SLEEP_CHECK_CODE])?;
        // the command went out, the chip is asleep even if the wait fails
        self.transition(State::Sleeping);
        Ok(())
    }

    fn trigger_refresh(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.interface.cmd(Command::DataStop)?;
        self.interface.cmd(Command::DisplayRefresh)
    }

    fn check_size(&self, actual: usize) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        let expected = buffer_len(self.width() as usize, self.height() as usize);
        if actual != expected {
            warn!("refusing a {actual} byte frame, the panel needs {expected}");
            return Err(ErrorKind::SizeMismatch { expected, actual });
        }
        Ok(())
    }

    fn require(&self, expected: State) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        if self.state != expected {
            warn!("refused while {:?}, needs {:?}", self.state, expected);
            return Err(ErrorKind::InvalidState(self.state));
        }
        Ok(())
    }

    fn transition(&mut self, next: State) {
        debug!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

/// Variants that suspend on the busy line instead of polling it
///
/// Only the waits are asynchronous, the transfers themselves still block.
/// There is no timeout, drop the future to stop waiting.
#[cfg(feature = "async")]
impl<SPI, CS, BUSY, DC, RST, DELAY, BUF> Epd4in2<SPI, CS, BUSY, DC, RST, DELAY, BUF>
where
    SPI: SpiBus,
    CS: OutputPin,
    BUSY: InputPin + embedded_hal_async::digital::Wait,
    DC: OutputPin,
    RST: OutputPin,
    DELAY: DelayNs,
    BUF: PixelBuffer,
{
    /// Same as [initialize()](Epd4in2::initialize())
    pub async fn initialize_async(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.power_up()?;
        self.interface.wait_until_idle_async().await?;
        self.configure_panel()?;

        if self.config.clear_on_init {
            self.clear_buffer();
            self.display_frame_async().await?;
        }
        Ok(())
    }

    /// Same as [display_buffer()](Epd4in2::display_buffer())
    pub async fn display_buffer_async(
        &mut self,
        buffer: &[u8],
    ) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.check_size(buffer.len())?;
        self.require(State::Idle)?;

        self.transition(State::Busy);
        self.interface.cmd(Command::DataStartTransmission2)?;
        self.interface.data(buffer)?;
        self.trigger_refresh()?;
        self.interface.wait_until_idle_async().await?;
        self.transition(State::Idle);
        Ok(())
    }

    /// Same as [display_frame()](Epd4in2::display_frame())
    pub async fn display_frame_async(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.start_frame_refresh()?;
        self.interface.wait_until_idle_async().await?;
        self.transition(State::Idle);
        Ok(())
    }

    /// Same as [clear_frame()](Epd4in2::clear_frame())
    pub async fn clear_frame_async(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.start_clear()?;
        self.interface.wait_until_idle_async().await?;
        self.transition(State::Idle);
        Ok(())
    }

    /// Same as [sleep()](Epd4in2::sleep())
    pub async fn sleep_async(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.start_sleep()?;
        self.interface.wait_until_idle_async().await
    }

    /// Same as [power_off()](Epd4in2::power_off())
    pub async fn power_off_async(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.require(State::Idle)?;
        self.interface.cmd(Command::PowerOff)?;
        self.interface.wait_until_idle_async().await?;
        self.transition(State::PoweredOff);
        Ok(())
    }

    /// Same as [power_on()](Epd4in2::power_on())
    pub async fn power_on_async(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.require(State::PoweredOff)?;
        self.interface.cmd(Command::PowerOn)?;
        self.interface.wait_until_idle_async().await?;
        self.transition(State::Idle);
        Ok(())
    }

    /// Same as [wait_until_idle()](Epd4in2::wait_until_idle())
    pub async fn wait_until_idle_async(&mut self) -> Result<(), ErrorKind<SPI, CS, BUSY, DC, RST>> {
        self.interface.wait_until_idle_async().await
    }
}
