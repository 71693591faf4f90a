//! SPI Commands for the IL0398 controller of the 4.2" E-Ink Display
use crate::traits::{self, Arity};

/// IL0398 commands
///
/// Should rarely (never?) be needed directly.
///
/// The parameter counts are the ones of the controller datasheet. Commands
/// marked as streaming take image data of any length.
#[allow(dead_code)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Resolution, LUT source, B/W vs. B/W/R mode, scan directions, booster, soft reset.
    ///
    /// - 0x0F Red Mode, LUT from OTP
    /// - 0x1F B/W Mode, LUT from OTP
    /// - 0x2F Red Mode, LUT set by registers
    /// - 0x3F B/W Mode, LUT set by registers
    PanelSetting = 0x00,
    /// Internal/external power selection and the VDH/VDL/VDHR levels
    PowerSetting = 0x01,
    /// Turns off charge pump, T-con, source/gate driver, VCOM and temperature sensor.
    ///
    /// Register content is kept as long as VDD stays on.
    PowerOff = 0x02,
    /// Power off sequence timing
    PowerOffSequenceSetting = 0x03,
    /// Turns the power on following the power on sequence
    PowerOn = 0x04,
    /// Enables the internal bandgap until the next power off
    PowerOnMeasure = 0x05,
    /// Soft start phases of the three boosters
    BoosterSoftStart = 0x06,
    /// Enters deep sleep. Only a hardware reset brings the chip back.
    ///
    /// Executed only with the check code 0xA5 as parameter.
    DeepSleep = 0x07,
    /// Writes the "OLD" frame into SRAM (bank 1) in B/W mode
    DataStartTransmission1 = 0x10,
    /// Ends a data transmission
    DataStop = 0x11,
    /// Refreshes the panel from SRAM. BUSY goes low until the refresh is done.
    DisplayRefresh = 0x12,
    /// Writes the "NEW" frame into SRAM (bank 2) in B/W mode
    DataStartTransmission2 = 0x13,
    /// Frame rate of the refresh.
    ///
    /// 0x3C 50Hz (default), 0x3A 100Hz, 0x29 150Hz, 0x31 171Hz, 0x39 200Hz
    PllControl = 0x30,
    /// Starts a measurement of the temperature sensor
    TemperatureSensorCalibration = 0x40,
    /// Internal or external temperature sensor and offset
    TemperatureSensorSelection = 0x41,
    /// Write External Temperature Sensor
    TemperatureSensorWrite = 0x42,
    /// Border output and the interval between VCOM and data
    VcomAndDataIntervalSetting = 0x50,
    /// Low supply voltage detection
    LowPowerDetection = 0x51,
    /// Non-overlap period of gate and source
    TconSetting = 0x60,
    /// Resolution as two big endian u16, width then height.
    ///
    /// Takes priority over the resolution bits of PanelSetting.
    ResolutionSetting = 0x61,
    /// First active gate and first active source
    GsstSetting = 0x65,
    /// Automatic VCOM measurement
    AutoMeasurementVcom = 0x80,
    /// VCOM DC level
    VcmDcSetting = 0x82,
    /// Power saving during refresh
    PowerSaving = 0xE3,
}

impl traits::Command for Command {
    /// Returns the address of the command
    fn address(self) -> u8 {
        self as u8
    }

    fn arity(self) -> Arity {
        use Command::*;
        match self {
            PowerOff | PowerOn | PowerOnMeasure | DataStop | DisplayRefresh
            | TemperatureSensorCalibration | LowPowerDetection => Arity::Fixed(0),
            PanelSetting
            | PowerOffSequenceSetting
            | DeepSleep
            | PllControl
            | TemperatureSensorSelection
            | TemperatureSensorWrite
            | VcomAndDataIntervalSetting
            | TconSetting
            | AutoMeasurementVcom
            | VcmDcSetting
            | PowerSaving => Arity::Fixed(1),
            BoosterSoftStart => Arity::Fixed(3),
            ResolutionSetting | GsstSetting => Arity::Fixed(4),
            PowerSetting => Arity::Fixed(5),
            DataStartTransmission1 | DataStartTransmission2 => Arity::Stream,
        }
    }
}
