//! gaitctl CLI — file selection, prompts, and the interactive playback session.
//!
//! This is the only module that talks to the user directly. Everything it
//! feeds into the core comes through explicit values: the parsed timeline,
//! the configuration, and the shared cancel flag set by ctrl-c.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::style::Stylize;
use log::info;

use gaitctl::config::GaitConfig;
use gaitctl::device::{build_device, DeviceKind};
use gaitctl::gait::{load_gait, ParseOutcome};
use gaitctl::playback::{CycleEnd, CyclePlayer};
use gaitctl::render;

#[derive(Parser)]
#[command(
    name = "gaitctl",
    version,
    about = "Replay gait patterns to a pneumatic actuator array"
)]
struct Args {
    /// Gait file to play; picked from the working directory when omitted
    file: Option<PathBuf>,
    /// Seconds per cycle
    cycle_time: Option<f64>,
    /// Amplitude multiplier
    multiplier: Option<f64>,
    /// Print the parse trace while reading files
    #[arg(short, long)]
    verbose: bool,
    /// Override the configured output device (null, console, pwm)
    #[arg(long)]
    device: Option<DeviceKind>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut config = GaitConfig::load().unwrap_or_default();
    if let Some(kind) = args.device {
        config.device = kind;
    }

    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        if let Err(err) = ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed)) {
            eprintln!("failed to install ctrl-c handler: {err}");
            std::process::exit(1);
        }
    }

    let mut session = Session {
        config,
        cancel,
        verbose: args.verbose,
        player: CyclePlayer::new(),
    };
    session.run(args.file, args.cycle_time, args.multiplier);
}

struct Session {
    config: GaitConfig,
    cancel: Arc<AtomicBool>,
    verbose: bool,
    player: CyclePlayer,
}

impl Session {
    fn run(&mut self, file: Option<PathBuf>, cycle_time: Option<f64>, multiplier: Option<f64>) {
        let (mut path, mut outcome) = match self.choose_timeline(file) {
            Some(loaded) => loaded,
            None => return,
        };
        let mut cycle_time = cycle_time.unwrap_or_else(|| prompt_number("Seconds per cycle: "));
        let mut multiplier =
            multiplier.unwrap_or_else(|| prompt_number("Amplitude multiplier: "));

        self.execute(&path, &outcome, cycle_time, multiplier);

        loop {
            println!("\n\nWhat next?\n");
            println!(" 1\tRun again with the same settings");
            println!(" 2\tChange the amplitude multiplier");
            println!(" 3\tChange the cycle speed");
            println!(" 4\tOpen a new file");
            println!(" 5\tQuit\n");

            match prompt_line("(1-5) ").as_str() {
                "1" => self.execute(&path, &outcome, cycle_time, multiplier),
                "2" => {
                    println!("Previous: {multiplier}");
                    multiplier = prompt_number("Amplitude multiplier: ");
                    self.execute(&path, &outcome, cycle_time, multiplier);
                }
                "3" => {
                    println!("Previous: {cycle_time}");
                    cycle_time = prompt_number("Seconds per cycle: ");
                    self.execute(&path, &outcome, cycle_time, multiplier);
                }
                "4" => {
                    let Some(loaded) = self.choose_timeline(None) else {
                        continue;
                    };
                    (path, outcome) = loaded;
                    cycle_time = prompt_number("Seconds per cycle: ");
                    multiplier = prompt_number("Amplitude multiplier: ");
                    self.execute(&path, &outcome, cycle_time, multiplier);
                }
                "5" => return,
                _ => println!("Invalid option. Try again."),
            }
        }
    }

    /// Load and show a timeline, prompting for a file when none is given.
    /// Returns None when nothing playable could be loaded.
    fn choose_timeline(&self, path: Option<PathBuf>) -> Option<(PathBuf, ParseOutcome)> {
        let path = match path {
            Some(path) => path,
            None => match choose_file() {
                Some(path) => path,
                None => {
                    println!("No gait files in the current directory.");
                    println!("Make sure they have the .txt or .gait extension.");
                    return None;
                }
            },
        };

        let outcome = match load_gait(&path, &self.config) {
            Ok(outcome) => outcome,
            Err(err) => {
                eprintln!("{err}");
                return None;
            }
        };

        if self.verbose {
            for event in outcome.trace.events() {
                println!("{event}");
            }
        }
        if outcome.had_errors {
            println!(
                "{}",
                format!(
                    "{} segment(s) rejected; playing what parsed.",
                    outcome.trace.rejections().count()
                )
                .yellow()
            );
        }
        if outcome.timeline.is_empty() {
            println!("Timeline is empty. There is nothing to do.");
            return None;
        }

        println!(
            "Found {} interval(s) across {} channel(s), {} steps per cycle.",
            outcome.timeline.interval_count(),
            outcome.timeline.channel_count(),
            outcome.step_count
        );
        render::print_timeline(&outcome.timeline, outcome.step_count);
        Some((path, outcome))
    }

    /// Connect the device and repeat cycles until ctrl-c.
    fn execute(&mut self, path: &Path, outcome: &ParseOutcome, cycle_time: f64, multiplier: f64) {
        let mut device = build_device(&self.config);
        println!("Attempting to connect ({})...", self.config.device);
        if let Err(err) = device.connect() {
            eprintln!("Error connecting: {err}");
            return;
        }
        println!("Connected!");

        println!("\nReading from \"{}\"", path.display());
        print!(
            "Cycle time is {cycle_time}s, multiplier is {}%. Press enter to start...",
            (multiplier * 100.0) as i64
        );
        let _ = io::stdout().flush();
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);

        self.cancel.store(false, Ordering::Relaxed);
        let cycle_duration = Duration::from_secs_f64(cycle_time.max(0.0));
        let started = Instant::now();
        let mut cycle = 0u64;

        loop {
            println!(
                "\nCycle #{} at time {:.1}s",
                cycle + 1,
                started.elapsed().as_secs_f64()
            );
            match self.player.play_cycle(
                &outcome.timeline,
                outcome.step_count,
                cycle_duration,
                multiplier,
                device.as_mut(),
                &self.cancel,
            ) {
                Ok(CycleEnd::Completed) => cycle += 1,
                Ok(CycleEnd::Cancelled) => {
                    println!("\nStopping playback... done.");
                    break;
                }
                Err(err) => {
                    eprintln!("{err}");
                    break;
                }
            }
        }

        info!("session ran {cycle} full cycle(s)");
        if let Err(err) = device.disconnect() {
            eprintln!("Error disconnecting: {err}");
        }
        self.cancel.store(false, Ordering::Relaxed);
    }
}

/// Pick a gait file from the working directory: automatic when there is
/// exactly one, a numbered menu otherwise, None when there are none.
fn choose_file() -> Option<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(".")
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("txt") | Some("gait")
            )
        })
        .collect();
    files.sort();

    match files.len() {
        0 => None,
        1 => Some(files.remove(0)),
        _ => {
            println!("\nMultiple files are available:");
            for (num, file) in files.iter().enumerate() {
                println!(" {}\t{}", num + 1, file.display());
            }
            println!();
            loop {
                let choice = prompt_line(&format!("which file? (1-{}): ", files.len()));
                if let Ok(n) = choice.parse::<usize>() {
                    if (1..=files.len()).contains(&n) {
                        return Some(files.remove(n - 1));
                    }
                }
            }
        }
    }
}

/// Read one trimmed line from stdin. End of input ends the session.
fn prompt_line(message: &str) -> String {
    print!("{message}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => std::process::exit(0),
        Ok(_) => line.trim().to_string(),
    }
}

/// Re-prompt until the user supplies a non-negative number.
fn prompt_number(message: &str) -> f64 {
    loop {
        if let Ok(value) = prompt_line(message).parse::<f64>() {
            if value >= 0.0 {
                return value;
            }
        }
    }
}
