use std::fs::File;
use std::io::BufReader;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use tracing::{error, info};

use display::{Display, Palette};
use emu8::Chip8;

use crate::keymap::keymap;
use crate::Args;

pub fn run(args: Args) -> Result<()> {
    let mut chip8 = match args.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };

    // Load ROM
    let file = File::open(&args.rom)
        .with_context(|| format!("unable to open {}", args.rom.display()))?;
    chip8
        .load_rom(&mut BufReader::new(file))
        .with_context(|| format!("unable to load {}", args.rom.display()))?;
    info!(rom = %args.rom.display(), scale = args.scale, delay_ms = args.delay, "loaded ROM");

    // Get SDL2 context
    let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
    let mut display = Display::new(&sdl, args.scale, Palette::default())?;
    let mut events = sdl.event_pump().map_err(anyhow::Error::msg)?;

    // Set initial timing
    let cycle_time = Duration::from_millis(args.delay);
    let mut last_cycle = Instant::now();

    let mut keypad = [false; 16];

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        keypad[kc as usize] = true;
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        keypad[kc as usize] = false;
                    }
                }
                _ => continue,
            };
        }

        // Handle timing
        let elapsed_cycle_time = last_cycle.elapsed();
        if elapsed_cycle_time < cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
            continue;
        }
        last_cycle = Instant::now();

        // Update state
        chip8.set_keypad(keypad);
        if let Err(e) = chip8.cycle() {
            error!(pc = chip8.state().pc, "{}", e);
            return Err(e.into());
        }

        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.take_frame() {
            display.render(frame)?;
        }
    }

    Ok(())
}
