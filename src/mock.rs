//! Recording stand-ins for the SPI bus, the GPIOs and the delay.
//!
//! All parts of one [`Bench`] write into the same event log, so tests can
//! check the ordering between chip-select, data/command, spi writes, reset,
//! delays and busy polls.

extern crate std;

use core::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::spi::{self, SpiBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Line {
    Cs,
    Dc,
    Rst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Pin(Line, bool),
    Write(Vec<u8>),
    Flush,
    DelayNs(u64),
    BusyRead(bool),
    BusyWait,
}

/// One chip-select span
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Transfer {
    /// level of the data/command line, `false` is a command
    pub dc: bool,
    pub bytes: Vec<u8>,
}

type Log = Rc<RefCell<Vec<Event>>>;

#[derive(Default)]
struct Shared {
    log: Log,
    busy_script: RefCell<VecDeque<bool>>,
    busy_stuck: Cell<bool>,
    writes: Cell<usize>,
    fail_write: Cell<Option<usize>>,
}

#[derive(Clone, Default)]
pub(crate) struct Bench {
    shared: Rc<Shared>,
}

impl Bench {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn spi(&self) -> FakeSpi {
        FakeSpi {
            shared: self.shared.clone(),
        }
    }

    pub(crate) fn cs(&self) -> FakePin {
        self.pin(Line::Cs)
    }

    pub(crate) fn dc(&self) -> FakePin {
        self.pin(Line::Dc)
    }

    pub(crate) fn rst(&self) -> FakePin {
        self.pin(Line::Rst)
    }

    fn pin(&self, line: Line) -> FakePin {
        FakePin {
            line,
            log: self.shared.log.clone(),
        }
    }

    pub(crate) fn busy(&self) -> FakeBusy {
        FakeBusy {
            shared: self.shared.clone(),
        }
    }

    pub(crate) fn delay(&self) -> FakeDelay {
        FakeDelay {
            log: self.shared.log.clone(),
        }
    }

    /// Levels the busy line reports on the next reads, it reads high (idle)
    /// once they are used up
    pub(crate) fn script_busy(&self, levels: &[bool]) {
        self.shared.busy_script.borrow_mut().extend(levels.iter().copied());
    }

    /// Keep the busy line low forever
    pub(crate) fn stick_busy(&self, stuck: bool) {
        self.shared.busy_stuck.set(stuck);
    }

    /// The `n`th spi write from now on fails, only once
    pub(crate) fn fail_write(&self, n: usize) {
        self.shared.fail_write.set(Some(self.shared.writes.get() + n));
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.shared.log.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.shared.log.borrow_mut().clear();
    }

    pub(crate) fn busy_reads(&self) -> Vec<bool> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::BusyRead(level) => Some(level),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn delays_ns(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::DelayNs(ns) => Some(ns),
                _ => None,
            })
            .collect()
    }

    /// Groups the log into chip-select spans
    pub(crate) fn transfers(&self) -> Vec<Transfer> {
        let mut dc = false;
        let mut current: Option<Transfer> = None;
        let mut transfers = Vec::new();
        for event in self.events() {
            match event {
                Event::Pin(Line::Dc, level) => dc = level,
                Event::Pin(Line::Cs, false) => {
                    if current.is_none() {
                        current = Some(Transfer {
                            dc,
                            bytes: Vec::new(),
                        });
                    }
                }
                Event::Pin(Line::Cs, true) => transfers.extend(current.take()),
                Event::Write(bytes) => {
                    if let Some(transfer) = current.as_mut() {
                        transfer.bytes.extend(bytes);
                    }
                }
                _ => {}
            }
        }
        transfers
    }

    /// Commands with their payloads, in the order they went out
    pub(crate) fn commands(&self) -> Vec<(u8, Vec<u8>)> {
        let mut commands: Vec<(u8, Vec<u8>)> = Vec::new();
        for transfer in self.transfers() {
            if transfer.dc {
                if let Some((_, payload)) = commands.last_mut() {
                    payload.extend(transfer.bytes);
                }
            } else {
                commands.extend(transfer.bytes.into_iter().map(|op| (op, Vec::new())));
            }
        }
        commands
    }

    /// Just the opcodes
    pub(crate) fn opcodes(&self) -> Vec<u8> {
        self.commands().into_iter().map(|(op, _)| op).collect()
    }

    /// Whether any spi write or data/command change happened while chip-select
    /// was active in a way that breaks the framing
    pub(crate) fn framing_violations(&self) -> usize {
        let mut cs_active = false;
        let mut violations = 0;
        for event in self.events() {
            match event {
                Event::Pin(Line::Cs, level) => cs_active = !level,
                Event::Pin(Line::Dc, _) if cs_active => violations += 1,
                Event::Write(_) if !cs_active => violations += 1,
                _ => {}
            }
        }
        violations
    }

    /// Position of the first write of exactly `bytes`
    pub(crate) fn position_of_write(&self, bytes: &[u8]) -> Option<usize> {
        self.events()
            .iter()
            .position(|event| matches!(event, Event::Write(written) if written == bytes))
    }
}

pub(crate) struct FakeSpi {
    shared: Rc<Shared>,
}

impl spi::ErrorType for FakeSpi {
    type Error = spi::ErrorKind;
}

impl SpiBus for FakeSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let n = self.shared.writes.get();
        self.shared.writes.set(n + 1);
        if self.shared.fail_write.get() == Some(n) {
            self.shared.fail_write.set(None);
            return Err(spi::ErrorKind::Other);
        }
        self.shared
            .log
            .borrow_mut()
            .push(Event::Write(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(&words.to_vec())?;
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.shared.log.borrow_mut().push(Event::Flush);
        Ok(())
    }
}

pub(crate) struct FakePin {
    line: Line,
    log: Log,
}

impl digital::ErrorType for FakePin {
    type Error = digital::ErrorKind;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.line, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Pin(self.line, true));
        Ok(())
    }
}

pub(crate) struct FakeBusy {
    shared: Rc<Shared>,
}

impl FakeBusy {
    fn sample(&mut self) -> bool {
        let level = if self.shared.busy_stuck.get() {
            false
        } else {
            self.shared.busy_script.borrow_mut().pop_front().unwrap_or(true)
        };
        self.shared.log.borrow_mut().push(Event::BusyRead(level));
        level
    }
}

impl digital::ErrorType for FakeBusy {
    type Error = digital::ErrorKind;
}

impl InputPin for FakeBusy {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.sample())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.sample())
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::digital::Wait for FakeBusy {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        self.shared.log.borrow_mut().push(Event::BusyWait);
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub(crate) struct FakeDelay {
    log: Log,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Event::DelayNs(us as u64 * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ms as u64 * 1_000_000));
    }
}
