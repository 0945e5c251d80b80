use clap::{Parser, Subcommand};
use indicatif::ProgressDrawTarget;
use std::path::PathBuf;
use tracing::info;

use gif_palette::interactive::{self, print_farewell};
use gif_palette::{FfmpegEngine, GifError, JobRequest, OutputLayout, Pipeline, RawParams};
use shared_utils::logging::{init_logging, LogConfig};
use shared_utils::{print_warning, report_error, symbols};

#[derive(Parser)]
#[command(name = "gif-palette")]
#[command(version, about = "Create GIFs from videos and compress existing GIFs with FFmpeg palettes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// FFmpeg binary (default: looked up on PATH)
    #[arg(long, global = true, env = "GIF_PALETTE_FFMPEG", value_name = "PATH")]
    ffmpeg: Option<PathBuf>,

    /// Root for the generated/ and compressed/ directories
    #[arg(long, global = true, value_name = "DIR", default_value = OutputLayout::DEFAULT_ROOT)]
    output_root: PathBuf,

    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,
}

// Numbers are taken as text so bad values fall back to defaults with a
// warning, exactly like empty answers in the menu.
#[derive(Subcommand)]
enum Commands {
    /// Generate a GIF from a video
    Create {
        #[arg(value_name = "INPUT")]
        input: String,
        #[arg(long, allow_hyphen_values = true)]
        fps: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        width: Option<String>,
        /// Duration factor: below 1.0 plays faster, above 1.0 slower
        #[arg(long, allow_hyphen_values = true)]
        speed: Option<String>,
        /// Defaults to <output-root>/generated
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Compress an existing GIF
    Compress {
        #[arg(value_name = "INPUT")]
        input: String,
        #[arg(long, allow_hyphen_values = true)]
        fps: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        width: Option<String>,
        /// Palette size, clamped to 1..=256
        #[arg(long, allow_hyphen_values = true)]
        max_colors: Option<String>,
    },

    /// Menu-driven mode (default)
    Interactive,
}

fn fail(error: &GifError) -> ! {
    report_error(error.category(), error);
    if let Some(suggestion) = error.suggestion() {
        eprintln!("   {} {}", symbols::HINT, suggestion);
    }
    std::process::exit(1);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::default().verbose(cli.verbose);
    if let Some(dir) = &cli.log_dir {
        log_config = log_config.with_log_dir(dir);
    }
    if let Err(e) = init_logging("gif_palette", log_config) {
        print_warning(&format!("Logging disabled: {:#}", e));
    }

    // Nothing else happens without an engine: no menu, no directories.
    let engine = match FfmpegEngine::locate(cli.ffmpeg.as_deref()) {
        Ok(engine) => engine,
        Err(e) => fail(&e),
    };

    let layout = OutputLayout::new(&cli.output_root);

    let request = match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Create {
            input,
            fps,
            width,
            speed,
            output_dir,
        } => JobRequest::Create {
            params: RawParams {
                source: input,
                frame_rate: fps.unwrap_or_default(),
                width: width.unwrap_or_default(),
            },
            speed_factor: speed.unwrap_or_default(),
            output_dir,
        },
        Commands::Compress {
            input,
            fps,
            width,
            max_colors,
        } => JobRequest::Compress {
            params: RawParams {
                source: input,
                frame_rate: fps.unwrap_or_default(),
                width: width.unwrap_or_default(),
            },
            max_colors: max_colors.unwrap_or_default(),
        },
        Commands::Interactive => match interactive::prompt_job() {
            Ok(Some(request)) => request,
            Ok(None) => {
                info!("User exited from menu");
                println!();
                print_farewell();
                return Ok(());
            }
            Err(e) => fail(&e),
        },
    };

    let job = request.into_job(&layout).emit();
    println!();

    // Verbose logging owns stderr.
    let mut pipeline = Pipeline::new(engine);
    if cli.verbose {
        pipeline = pipeline.with_draw_target(ProgressDrawTarget::hidden);
    }

    match pipeline.run(&job) {
        Ok(report) => {
            report.print();
            print_farewell();
            Ok(())
        }
        Err(e) => {
            println!();
            fail(&e)
        }
    }
}
