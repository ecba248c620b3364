use chip8_interp::{random, EdgePolicy, Input, Interpreter, Quirks, KEY_COUNT};
use clap::{crate_authors, crate_version, App, Arg, ArgMatches};
use log::{info, warn};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};

const DEFAULT_HZ: &str = "540";
/// Input sampling rate while a program waits for a key.
const KEY_WAIT_HZ: u64 = 60;
const MICROS_BETWEEN_DISPLAY_REFRESH: u128 = 1000_000 / 60;

struct MiniFBInput {
    key_states: [bool; KEY_COUNT],
}

impl MiniFBInput {
    fn new() -> Self {
        Self {
            key_states: [false; KEY_COUNT],
        }
    }

    fn update_key_state(&mut self, window: &Window) {
        for key in 0..KEY_COUNT as u8 {
            if let Some(key_enum) = MiniFBInput::map_key(key) {
                self.key_states[key as usize] = window.is_key_down(key_enum);
            }
        }
    }

    fn map_key(key: u8) -> Option<Key> {
        match key {
            0x1 => Some(Key::Key1),
            0x2 => Some(Key::Key2),
            0x3 => Some(Key::Key3),
            0xc => Some(Key::Key4),

            0x4 => Some(Key::Q),
            0x5 => Some(Key::W),
            0x6 => Some(Key::E),
            0xd => Some(Key::R),

            0x7 => Some(Key::A),
            0x8 => Some(Key::S),
            0x9 => Some(Key::D),
            0xe => Some(Key::F),

            0xa => Some(Key::Z),
            0x0 => Some(Key::X),
            0xb => Some(Key::C),
            0xf => Some(Key::V),
            _ => None,
        }
    }
}

impl Input for MiniFBInput {
    fn is_key_down(&self, key: u8) -> bool {
        self.key_states.is_key_down(key)
    }
}

struct Settings {
    rom: String,
    hz: u64,
    seed: Option<u64>,
    quirks: Quirks,
}

impl Settings {
    fn from_matches(matches: &ArgMatches) -> Result<Self, Box<dyn std::error::Error>> {
        let rom = matches.value_of("ROM").ok_or("missing ROM argument")?.to_owned();
        let hz = matches.value_of("hz").unwrap_or(DEFAULT_HZ).parse::<u64>()?;
        if hz == 0 {
            return Err("--hz must be at least 1".into());
        }
        let seed = matches
            .value_of("seed")
            .map(|seed| seed.parse::<u64>())
            .transpose()?;
        let edge = matches
            .value_of("edge")
            .unwrap_or("wrap")
            .parse::<EdgePolicy>()?;

        Ok(Self {
            rom,
            hz,
            seed,
            quirks: Quirks {
                edge,
                load_store_increments_i: matches.is_present("increment-i"),
            },
        })
    }
}

fn load_rom(path: &Path) -> std::io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    Ok(buffer)
}

fn create_window() -> Result<Window, Box<dyn std::error::Error>> {
    let mut opts = WindowOptions::default();

    opts.scale = Scale::X16;
    let window = Window::new("CHIP-8", 64, 32, opts)?;

    Ok(window)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let matches = App::new("CHIP-8")
        .version(crate_version!())
        .author(crate_authors!())
        .about("A CHIP-8 interpreter")
        .arg(
            Arg::with_name("ROM")
                .help("The CHIP-8 ROM to run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("hz")
                .long("hz")
                .takes_value(true)
                .default_value(DEFAULT_HZ)
                .help("Cycles per second"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .takes_value(true)
                .help("Seed for the random number generator"),
        )
        .arg(
            Arg::with_name("edge")
                .long("edge")
                .takes_value(true)
                .possible_values(&["wrap", "clip"])
                .default_value("wrap")
                .help("How sprites drawn past the screen edge are handled"),
        )
        .arg(
            Arg::with_name("increment-i")
                .long("increment-i")
                .help("FX55 and FX65 advance I past the transferred block"),
        )
        .get_matches();
    let settings = Settings::from_matches(&matches)?;

    let rom = load_rom(Path::new(&settings.rom))?;
    let random_number_provider = match settings.seed {
        Some(seed) => random::seeded(seed),
        None => random::from_entropy(),
    };
    let mut interpreter = Interpreter::new(settings.quirks, random_number_provider);
    interpreter.load(&rom)?;
    info!(
        "running {} ({} bytes) at {} Hz, edge policy {}",
        settings.rom,
        rom.len(),
        settings.hz,
        settings.quirks.edge
    );

    let mut window = create_window()?;
    let mut input = MiniFBInput::new();
    let cycle_time = Duration::from_micros(1000_000 / settings.hz);
    let key_wait_time = Duration::from_micros(1000_000 / KEY_WAIT_HZ);
    let mut last_redraw = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let cycle_start = Instant::now();

        if window.is_key_pressed(Key::F1, KeyRepeat::No) {
            interpreter.reset()?;
        }

        input.update_key_state(&window);
        let cycle = interpreter.cycle(&input)?;
        if cycle.beep {
            info!("beep");
        }

        if interpreter.cpu().framebuffer().is_dirty()
            && last_redraw.elapsed().as_micros() >= MICROS_BETWEEN_DISPLAY_REFRESH
        {
            let buffer = interpreter
                .cpu()
                .framebuffer()
                .rgba_framebuffer()
                .into_iter()
                .map(|value| {
                    if value == 0x0 {
                        0x002C_50_66
                    } else {
                        0x00_68_BB_ED
                    }
                })
                .collect::<Vec<u32>>();

            window.update_with_buffer(&buffer)?;
            interpreter.clear_dirty();
            last_redraw = Instant::now();
        } else {
            window.update();
        }

        let budget = if cycle.awaiting_key {
            key_wait_time
        } else {
            cycle_time
        };
        let elapsed = cycle_start.elapsed();
        if elapsed < budget {
            std::thread::sleep(budget - elapsed);
        } else if !cycle.awaiting_key && elapsed > budget * 4 {
            warn!("cycle took {:?}, target is {:?}", elapsed, budget);
        }
    }

    Ok(())
}
