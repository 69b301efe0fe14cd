use beep::beep;
use std::error::Error;

/// Sink for the tone trigger the timer subsystem fires as the sound
/// timer drains. Implementations decide what a "tone" actually is.
pub trait Sound {
    /// start the tone
    fn beep(&mut self) -> Result<(), Box<dyn Error>>;

    /// silence the tone
    fn stop(&mut self) -> Result<(), Box<dyn Error>>;
}

const TONE_PITCH_HZ: u16 = 440;

/// fixed-pitch tone on the PC speaker
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        if !self.is_beeping {
            beep(TONE_PITCH_HZ)?;
            self.is_beeping = true;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_beeping {
            beep(0)?;
            self.is_beeping = false;
        }
        Ok(())
    }
}

pub struct Mute {}

impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}

impl Sound for Mute {
    fn beep(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}
