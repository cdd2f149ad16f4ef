use std::{ffi::OsString, io, path::Path, path::PathBuf};

use clap::Parser;
use terminal_visualiser_core::{
    open_file, FileType, PlaybackReport, Scheduler, TerminalRenderer, VisualizerConfig,
};
use tracing_subscriber::EnvFilter;

fn main() -> terminal_visualiser_core::Result<()> {
    init_tracing();

    let cli = Cli::parse_from(expand_legacy_flags(std::env::args_os()));
    let config = cli.resolve_config()?;
    run(&cli.filename, cli.file_type, config)?;
    Ok(())
}

/// Decodes `filename` and plays it onto stdout.
fn run(
    filename: &Path,
    file_type: FileType,
    config: VisualizerConfig,
) -> terminal_visualiser_core::Result<PlaybackReport> {
    config.validate()?;
    tracing::info!(?filename, %file_type, fps = config.fps, width = config.width, "visualising");

    let audio = open_file(filename, file_type, &config.raw)?;
    let samples = audio.stride_samples();

    let stdout = io::stdout();
    let mut renderer = TerminalRenderer::new(stdout.lock());
    let mut scheduler = Scheduler::new(config);
    scheduler.play(
        &samples,
        audio.frame_rate(),
        audio.max_possible_amplitude(),
        &mut renderer,
    )
}

fn init_tracing() {
    // Logs go to stderr so they never land between animation rows.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

/// Rewrites the two-letter short flags `-he` and `-ns` to their long forms,
/// since clap short flags are a single character.
fn expand_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    passthrough = true;
                    arg
                }
                Some("-he") => OsString::from("--height"),
                Some("-ns") => OsString::from("--nosync"),
                Some(flag) if flag.starts_with("-he=") => {
                    OsString::from(format!("--height={}", &flag["-he=".len()..]))
                }
                _ => arg,
            }
        })
        .collect()
}

fn first_char(value: &str) -> Result<char, String> {
    value
        .chars()
        .next()
        .ok_or_else(|| "bar character must not be empty".to_string())
}

#[derive(Parser, Debug)]
#[command(name = "visualizer", author, version, about = "visualize audio", long_about = None)]
struct Cli {
    /// Path to audio file.
    filename: PathBuf,
    /// File type of the audio file (mp3, wav, flv, ogg, raw).
    #[arg(short = 't', long = "type", default_value_t = FileType::Mp3)]
    file_type: FileType,
    /// Frames per second for the graphical representation of audio [default: 30].
    #[arg(short, long)]
    fps: Option<u32>,
    /// Width of graphical representation of audio [default: 30].
    #[arg(short, long)]
    width: Option<usize>,
    /// Height of the graphical representation of audio, also `-he` [default: 15].
    #[arg(short = 'H', long)]
    height: Option<u32>,
    /// Char used to represent graph point; only the first character is used [default: #].
    #[arg(short = 'c', long = "char", value_parser = first_char)]
    bar_char: Option<char>,
    /// Prints the number of skipped frames.
    #[arg(short, long)]
    debug: bool,
    /// Do not sync graph with audio, also `-ns`.
    #[arg(short = 'n', long)]
    nosync: bool,
    /// JSON file with default settings; flags given here take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> terminal_visualiser_core::Result<VisualizerConfig> {
        let mut config = match &self.config {
            Some(path) => VisualizerConfig::from_json_file(path)?,
            None => VisualizerConfig::default(),
        };

        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(bar_char) = self.bar_char {
            config.bar_char = bar_char;
        }
        config.debug |= self.debug;
        if self.nosync {
            config.sync = false;
        }
        Ok(config)
    }
}
