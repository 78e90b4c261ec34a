//! Helpers shared by the demo programs
//!
//! Kept free of board types so they can be tested on the host.

use core::fmt::Write;
use core::hint::spin_loop;

use embedded_hal::digital::{InputPin, OutputPin, PinState};
use heapless::String;

/// Format a counter line the way the hello demo prints it: a leading
/// newline and the value in upper-case hex, space-padded to two digits.
pub fn counter_line(count: u8) -> String<4> {
    let mut line = String::new();
    // Three bytes always fit
    let _ = write!(line, "\n{:2X}", count);
    line
}

/// Spin until the button reads high
pub fn wait_for_press<P: InputPin>(button: &mut P) -> Result<(), P::Error> {
    while button.is_low()? {
        spin_loop();
    }
    Ok(())
}

/// Detects changes of a button level between polls
pub struct ButtonEdge {
    last: bool,
}

impl ButtonEdge {
    /// Capture the current level as the reference
    pub fn new<P: InputPin>(button: &mut P) -> Result<Self, P::Error> {
        Ok(Self {
            last: button.is_high()?,
        })
    }

    /// Returns true if the level differs from the previous poll
    pub fn poll<P: InputPin>(&mut self, button: &mut P) -> Result<bool, P::Error> {
        let current = button.is_high()?;
        if current != self.last {
            self.last = current;
            return Ok(true);
        }
        Ok(false)
    }
}

/// A row of up to eight LEDs driven from a bit pattern, bit 0 first
pub struct LedBank<P: OutputPin, const N: usize> {
    leds: [P; N],
    pattern: u8,
}

impl<P: OutputPin, const N: usize> LedBank<P, N> {
    /// Take the pins and show `pattern` immediately
    pub fn new(leds: [P; N], pattern: u8) -> Result<Self, P::Error> {
        let mut bank = Self { leds, pattern };
        bank.apply()?;
        Ok(bank)
    }

    /// Invert every LED
    pub fn toggle_all(&mut self) -> Result<(), P::Error> {
        self.pattern = !self.pattern;
        self.apply()
    }

    pub fn pattern(&self) -> u8 {
        self.pattern
    }

    fn apply(&mut self) -> Result<(), P::Error> {
        for (i, led) in self.leds.iter_mut().enumerate() {
            led.set_state(PinState::from(self.pattern & (1 << i) != 0))?;
        }
        Ok(())
    }
}
