use std::env;
use std::error::Error;
use std::fs::File;
use std::time::Duration;

use cosmac8::display::MonoTermDisplay;
use cosmac8::input::{Input, StdinInput};
use cosmac8::interpreter::Chip8Interpreter;
use cosmac8::sound::{SimpleBeep, Sound};

/// one display/timer frame at 60 Hz
const FRAME: Duration = Duration::from_micros(16_667);

/// instruction batch per frame; +/- nudge it at runtime
const DEFAULT_STEPS_PER_FRAME: i32 = 12;
const MAX_STEPS_PER_FRAME: i32 = 64;

fn keypad_state(keys: &[u8]) -> [bool; 16] {
    let mut state = [false; 16];
    for &k in keys {
        if let Some(slot) = state.get_mut(k as usize) {
            *slot = true;
        }
    }
    state
}

fn main() -> Result<(), Box<dyn Error>> {
    let rom_path = env::args().nth(1).ok_or("usage: cosmac8 <rom.ch8>")?;

    // initialise
    let mut display = MonoTermDisplay::new()?;
    let mut input = StdinInput::new();
    let mut sound = SimpleBeep::new();
    let mut vm = Chip8Interpreter::new();

    let mut f = File::open(&rom_path)?;
    vm.load_rom(&mut f)?;

    let mut steps_per_frame = DEFAULT_STEPS_PER_FRAME;
    let mut held = [false; 16];
    let mut halted = None;

    'frame: loop {
        if input.quit_requested() {
            break;
        }
        steps_per_frame =
            (steps_per_frame + input.take_speed_nudge()).clamp(1, MAX_STEPS_PER_FRAME);

        // terminals only report presses, so releases are synthesised by
        // diffing against the previous frame
        let pressed = keypad_state(input.peek_keys()?);
        for key in 0..16u8 {
            let down = pressed[key as usize];
            if down != held[key as usize] {
                vm.key_event(key, down);
                held[key as usize] = down;
            }
        }
        input.flush_keys()?;

        for _ in 0..steps_per_frame {
            if let Err(e) = vm.step() {
                halted = Some(e);
                break 'frame;
            }
        }

        vm.tick_timers(&mut sound)?;
        if !vm.sound_active() {
            sound.stop()?;
        }
        vm.refresh(&mut display)?;

        spin_sleep::sleep(FRAME);
    }

    sound.stop()?;

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..12 {
        println!();
    }
    match halted {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
