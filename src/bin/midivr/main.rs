// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! `midivr` explores the instrument's music theory from the command line and
//! plays scales and chords to a MIDI port.

use clap::{Parser, Subcommand};
use midivr::prelude::*;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// JSON settings file. Defaults are used if it's missing.
    #[clap(short = 's', long, value_parser, global = true)]
    settings: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the chord lattice around an origin chord
    Lattice {
        /// Root of the origin chord, like C5 or F#4
        #[clap(short, long, default_value = "C5")]
        root: Pitch,

        /// Color of the origin chord
        #[clap(short, long, default_value = "major")]
        color: ChordColor,

        /// How many steps to show in each direction
        #[clap(long, default_value_t = 2)]
        radius: i32,
    },

    /// Print a scale's notes, extending past the octave in both directions
    Scale {
        #[clap(short, long, default_value = "C5")]
        root: Pitch,

        #[clap(short, long, default_value = "major")]
        color: ScaleColor,

        /// First degree to print (may be negative)
        #[clap(long, default_value_t = 0, allow_hyphen_values = true)]
        from: i32,

        /// Last degree to print
        #[clap(long, default_value_t = 7, allow_hyphen_values = true)]
        to: i32,
    },

    /// Print a chord's pitches and the note-on bytes they produce
    Chord {
        #[clap(short, long, default_value = "C5")]
        root: Pitch,

        #[clap(short, long, default_value = "major")]
        color: ChordColor,
    },

    /// Play a scale one note at a time, or a chord all at once
    Play {
        #[clap(short, long, default_value = "C5")]
        root: Pitch,

        /// A scale color, or a chord color with --chord
        #[clap(short, long, default_value = "major")]
        color: String,

        /// Milliseconds per note. Defaults to the settings value.
        #[clap(long)]
        ms: Option<u64>,

        /// Play a chord instead of a scale
        #[clap(long, value_parser)]
        chord: bool,
    },

    /// List every scale and chord color
    Colors,

    /// Print the effective settings, optionally writing them to --settings
    Settings {
        #[clap(short, long, value_parser)]
        write: bool,
    },
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<SenderSettings> {
    match path {
        Some(path) if path.exists() => SenderSettings::load(path),
        Some(path) => {
            log::info!("{path:?} not found; using default settings");
            Ok(SenderSettings::default())
        }
        None => Ok(SenderSettings::default()),
    }
}

fn print_lattice(root: Pitch, color: ChordColor, radius: i32) {
    let lattice = ChordLattice::new(Chord::new(root, color));
    let radius = radius.abs();
    for row in lattice.grid(-radius..=radius, -radius..=radius) {
        let cells: Vec<String> = row
            .iter()
            .map(|chord| format!("{:>7}", chord.to_string()))
            .collect();
        println!("{}", cells.join(""));
    }
}

fn print_scale(root: Pitch, color: ScaleColor, from: i32, to: i32) {
    let scale = Scale::new(root, color);
    println!("{color} on {root}");
    for degree in from..=to {
        let pitch = scale.note_at_extended_index(degree);
        println!(
            "{degree:>4}  {:<5} {}",
            pitch.to_string(),
            pitch.absolute_index()
        );
    }
}

fn print_chord(root: Pitch, color: ChordColor, channel: MidiChannel, velocity: u8) {
    let chord = Chord::new(root, color);
    println!("{chord} ({color}, mask {:#x})", color.mask());
    for pitch in chord.collection() {
        let name = pitch.to_string();
        match MidiUtils::new_note_on(pitch, velocity)
            .and_then(|message| MidiUtils::encode(channel, &message))
        {
            Ok(bytes) => println!("  {name:<5} {bytes:02x?}"),
            Err(e) => println!("  {name:<5} ({e})"),
        }
    }
}

fn print_colors() {
    println!("Scale colors");
    for (name, color) in ScaleColor::all() {
        println!(
            "  {name:<24} {:#06x}  {} notes",
            color.mask(),
            color.note_count()
        );
    }
    println!("Chord colors");
    for (name, color) in ChordColor::all() {
        let intervals: Vec<String> = color.intervals().map(|i| i.to_string()).collect();
        println!(
            "  {name:<24} {:<6} {:#010x}  [{}]",
            color.short_name(),
            color.mask(),
            intervals.join(" ")
        );
    }
}

/// Connects to an existing output whose name matches the settings, or
/// publishes a virtual one.
#[cfg(feature = "midir")]
fn open_sink(settings: &SenderSettings) -> anyhow::Result<Option<Arc<RecordingSink>>> {
    use midivr::sink::MidirSink;

    let name = settings.port_name();
    let connected = MidirSink::connect(name, Some(name));
    #[cfg(unix)]
    let connected = connected.or_else(|e| {
        log::info!("No existing {name} output ({e}); creating a virtual port");
        MidirSink::create_virtual(name)
    });
    let sink =
        connected.map_err(|e| anyhow::format_err!("Couldn't open MIDI output {name}: {e}"))?;
    MidiPort::global().install(Arc::new(sink));
    Ok(None)
}

/// Without an OS MIDI backend, record the traffic and print it afterward.
#[cfg(not(feature = "midir"))]
fn open_sink(_settings: &SenderSettings) -> anyhow::Result<Option<Arc<RecordingSink>>> {
    let sink = Arc::new(RecordingSink::default());
    MidiPort::global().install(sink.clone());
    Ok(Some(sink))
}

fn play(
    settings: &SenderSettings,
    root: Pitch,
    color: &str,
    ms: Option<u64>,
    chord: bool,
) -> anyhow::Result<()> {
    let recording = open_sink(settings)?;
    let sender = NoteSender::new_with_settings(Arc::clone(MidiPort::global()), settings);
    let duration = ms.map_or_else(|| settings.note_duration(), Duration::from_millis);
    let velocity = settings.note_on_velocity();

    if chord {
        let color: ChordColor = color.parse()?;
        let chord = Chord::new(root, color);
        println!("Playing {chord}");
        sender.note_on_off(&chord, velocity, duration);
    } else {
        let color: ScaleColor = color.parse()?;
        let scale = Scale::new(root, color);
        println!("Playing {color} on {root}");
        // Up through the octave, landing on the root above.
        for degree in 0..=scale.collection().len() as i32 {
            sender.note_on_off(&scale.note_at_extended_index(degree), velocity, duration);
        }
    }

    if let Some(recording) = recording {
        for bytes in recording.messages() {
            println!("{bytes:02x?}");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let settings = load_settings(args.settings.as_deref())?;

    match args.command {
        Command::Lattice {
            root,
            color,
            radius,
        } => print_lattice(root, color, radius),
        Command::Scale {
            root,
            color,
            from,
            to,
        } => print_scale(root, color, from, to),
        Command::Chord { root, color } => print_chord(
            root,
            color,
            settings.channel(),
            settings.note_on_velocity(),
        ),
        Command::Play {
            root,
            color,
            ms,
            chord,
        } => play(&settings, root, &color, ms, chord)?,
        Command::Colors => print_colors(),
        Command::Settings { write } => {
            let mut settings = settings;
            println!("{}", settings.to_json()?);
            if write {
                let path = args
                    .settings
                    .ok_or_else(|| anyhow::format_err!("--write needs --settings <file>"))?;
                settings.save(&path)?;
                eprintln!("Wrote {path:?}");
            }
        }
    }
    Ok(())
}
