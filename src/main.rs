use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;
use dualsub::config::Config;
use dualsub::pipeline::{extract_single, print_summary, BatchPipeline};
use dualsub::select::{track_lines, LineSelector, TerminalSelector, TrackSelector};
use dualsub::subtitle::{merge_subtitles, shift_subtitles, SubtitleSource};
use dualsub::tool::{check_tool, SystemRunner, ToolRunner};
use dualsub::mkv::TrackInspector;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "dualsub")]
#[command(version, about = "Extract, merge and shift subtitle tracks of Matroska files")]
#[command(long_about = "Extract subtitle tracks with MKVToolNix, merge two of them into one colored SRT, \
and shift SRT timings. The batch command repeats the merge for every file in a folder.")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the subtitle tracks of a container file
    Tracks {
        /// Matroska file
        file: PathBuf,
    },

    /// Extract selected subtitle tracks from one file
    Extract {
        /// Matroska file
        mkv_file: PathBuf,

        /// Output directory for the extracted tracks
        out_path: PathBuf,

        /// Number of tracks to select
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Merge two SRT files into one, coloring each source
    Merge {
        /// First subtitle (shown in color1)
        sub1: PathBuf,

        /// Second subtitle (shown in color2)
        sub2: PathBuf,

        /// Merged output file
        out_path: PathBuf,

        /// Color of the first subtitle
        #[arg(long)]
        color1: Option<String>,

        /// Color of the second subtitle
        #[arg(long)]
        color2: Option<String>,
    },

    /// Shift every cue of an SRT file by a number of milliseconds
    Shift {
        /// Offset in milliseconds, may be negative
        #[arg(allow_negative_numbers = true)]
        time_ms: i64,

        /// Subtitle file to shift
        sub_path: PathBuf,

        /// Output file (defaults to rewriting the input)
        out_path: Option<PathBuf>,
    },

    /// Extract and merge two tracks for every container in a directory
    Batch {
        /// Directory containing the container files
        dir: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn make_selector() -> Box<dyn TrackSelector> {
    if std::io::stdin().is_terminal() {
        Box::new(TerminalSelector)
    } else {
        Box::new(LineSelector::new(std::io::stdin().lock(), std::io::stderr()))
    }
}

async fn check_mkvtoolnix(runner: &dyn ToolRunner, config: &Config) -> Result<()> {
    check_tool(runner, &config.mkvmerge).await?;
    check_tool(runner, &config.mkvextract).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    let runner = SystemRunner;

    match cli.command {
        Command::Tracks { file } => {
            let tracks = TrackInspector::new(&runner, config.mkvmerge.as_str())
                .list_tracks(&file)
                .await?;

            if tracks.is_empty() {
                println!("No subtitle tracks in {}", file.display());
            }
            for line in track_lines(&tracks) {
                println!("{}", line);
            }
        }

        Command::Extract {
            mkv_file,
            out_path,
            count,
        } => {
            check_mkvtoolnix(&runner, &config).await?;

            let mut selector = make_selector();
            let paths =
                extract_single(&runner, selector.as_mut(), &config, &mkv_file, &out_path, count)
                    .await
                    .with_context(|| format!("Failed to extract from {}", mkv_file.display()))?;

            for path in paths {
                println!("{} {}", style("✓").green(), path.display());
            }
        }

        Command::Merge {
            sub1,
            sub2,
            out_path,
            color1,
            color2,
        } => {
            let first = SubtitleSource::new(sub1).with_color(color1.unwrap_or(config.color1));
            let second = SubtitleSource::new(sub2).with_color(color2.unwrap_or(config.color2));

            let cues = merge_subtitles(&first, &second, &out_path)?;
            info!("Wrote {} cues to {}", cues, out_path.display());
        }

        Command::Shift {
            time_ms,
            sub_path,
            out_path,
        } => {
            let output = out_path.unwrap_or_else(|| sub_path.clone());
            shift_subtitles(time_ms, &sub_path, &output)?;
        }

        Command::Batch { dir } => {
            check_mkvtoolnix(&runner, &config).await?;

            let mut selector = make_selector();
            let mut pipeline = BatchPipeline::new(&runner, selector.as_mut(), &config);
            let result = pipeline
                .run(&dir)
                .await
                .with_context(|| format!("Batch failed in {}", dir.display()))?;

            print_summary(&result);
        }
    }

    Ok(())
}
