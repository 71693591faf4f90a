/// Refresh frame rate set through PLL control
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PllFrequency {
    /// Power-on default of the controller
    Hz50,
    /// Tested default of this driver
    #[default]
    Hz100,
    /// 150 Hz
    Hz150,
    /// 171 Hz
    Hz171,
    /// 200 Hz, didn't work on every board
    Hz200,
}

impl PllFrequency {
    /// Parameter byte of the PLL control command
    pub fn value(self) -> u8 {
        match self {
            PllFrequency::Hz50 => 0x3C,
            PllFrequency::Hz100 => 0x3A,
            PllFrequency::Hz150 => 0x29,
            PllFrequency::Hz171 => 0x31,
            PllFrequency::Hz200 => 0x39,
        }
    }
}

#[derive(Copy, Clone, Debug)]
/// EPD Configuration
pub struct Config {
    /// Microseconds to sleep between two reads of the busy line.
    ///
    /// 0 polls in a tight loop. There is no way to measure time then, so
    /// `busy_timeout_us` has no effect.
    pub busy_poll_interval_us: u32,
    /// Give up waiting on the busy line after this many microseconds of
    /// polling and fail with [`BusyTimeout`](crate::error::ErrorKind::BusyTimeout).
    ///
    /// `None` waits forever.
    pub busy_timeout_us: Option<u32>,
    /// Show an all white frame at the end of every initialisation to get rid
    /// of a stale image
    pub clear_on_init: bool,
    /// Refresh frame rate
    pub pll: PllFrequency,
    /// VCOM DC level. 0x12 is -1V, the controller default 0x00 is -0.1V
    pub vcom_dc: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // default delay of 10ms
            busy_poll_interval_us: 10_000,
            // a full refresh takes 1-2s
            busy_timeout_us: Some(5_000_000),
            clear_on_init: false,
            pll: PllFrequency::default(),
            vcom_dc: 0x12,
        }
    }
}
