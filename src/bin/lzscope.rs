use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand, ValueEnum};
use crossbeam::channel::bounded;
use lzscope::playback::{materialize, DriveOutcome, RecordingRenderer, RenderEvent, TextRenderer};
use lzscope::tokens::{read_tokens, write_tokens};
use lzscope::{
    decode, extract_tokens, load, BitRate, Container, Decoding, FrameDriver, InputFormat,
    PlaybackConfig, Renderer, Scheduler, Token,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "lzscope")]
#[command(about = "Decode LZ77 token streams and replay them at a compressed bit rate")]
#[command(version)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a gzip or raw DEFLATE file and write its tokens as JSON
    Extract {
        /// Input file (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Input is a raw DEFLATE stream rather than gzip
        #[arg(long)]
        raw: bool,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print decode statistics for a token stream
    Inspect(InputArgs),
    /// Replay a token stream to stdout at a fixed bit rate
    Play {
        #[command(flatten)]
        input: InputArgs,

        /// Compressed bits revealed per second
        #[arg(long, default_value_t = BitRate::DEFAULT.bits_per_second())]
        bps: f64,

        /// Frames per second driving the scheduler
        #[arg(long, default_value = "60")]
        fps: u32,

        /// Print renderer events instead of the decoded text
        #[arg(long)]
        trace: bool,

        /// Print non-printable bytes as escapes
        #[arg(long)]
        escaped: bool,

        /// Stop animating after this many seconds and reveal the rest at once
        #[arg(long)]
        skip_after: Option<f64>,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Token file, gzip file or raw DEFLATE file (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Input format
    #[arg(short, long, value_enum, default_value = "auto")]
    format: FormatArg,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Auto,
    Tokens,
    Gzip,
    Deflate,
}

impl From<FormatArg> for InputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Auto => InputFormat::Auto,
            FormatArg::Tokens => InputFormat::Tokens,
            FormatArg::Gzip => InputFormat::Gzip,
            FormatArg::Deflate => InputFormat::Deflate,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).try_init().ok();
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Extract { input, output, raw, pretty } => {
            let container = if raw { Container::Deflate } else { Container::Gzip };
            let extraction = if is_stdio(&input) {
                extract_tokens(io::stdin().lock(), container)?
            } else {
                extract_tokens(File::open(&input)?, container)?
            };

            if is_stdio(&output) {
                let mut stdout = BufWriter::new(io::stdout().lock());
                write_tokens(&extraction.tokens, &mut stdout, pretty)?;
                writeln!(stdout)?;
                stdout.flush()?;
            } else {
                let mut file = BufWriter::new(File::create(&output)?);
                write_tokens(&extraction.tokens, &mut file, pretty)?;
                file.flush()?;
            }
            info!(tokens = extraction.tokens.len(), blocks = extraction.blocks, "wrote tokens");
            Ok(())
        }
        Command::Inspect(args) => {
            let tokens = read_input(&args)?;
            let decoding = decode(&tokens)?;
            print_inspection(&decoding)?;
            Ok(())
        }
        Command::Play { input, bps, fps, trace, escaped, skip_after } => {
            let config = PlaybackConfig {
                bits_per_second: BitRate::new(bps)?,
                frame_interval: FrameDriver::with_fps(fps).frame_interval(),
            };
            let tokens = read_input(&input)?;
            let decoding = decode(&tokens)?;
            let skip_after = skip_after.map(Duration::try_from_secs_f64).transpose()?;

            if trace {
                let renderer = play(&decoding, RecordingRenderer::new(), &config, skip_after);
                let mut stdout = BufWriter::new(io::stdout().lock());
                for event in renderer.events() {
                    writeln!(stdout, "{}", format_event(event))?;
                }
                stdout.flush()?;
            } else {
                let renderer = TextRenderer::new(io::stdout().lock(), escaped);
                play(&decoding, renderer, &config, skip_after).finish()?;
            }
            Ok(())
        }
    }
}

fn is_stdio(path: &Path) -> bool {
    path.to_str() == Some("-")
}

fn read_input(args: &InputArgs) -> lzscope::Result<Vec<Token>> {
    let format = InputFormat::from(args.format);
    if !is_stdio(&args.input) {
        return load(&args.input, format);
    }
    let stdin = io::stdin().lock();
    match format {
        InputFormat::Gzip => Ok(extract_tokens(stdin, Container::Gzip)?.tokens),
        InputFormat::Deflate => Ok(extract_tokens(stdin, Container::Deflate)?.tokens),
        InputFormat::Tokens | InputFormat::Auto => read_tokens(stdin),
    }
}

fn print_inspection(decoding: &Decoding) -> io::Result<()> {
    let stats = decoding.stats();
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Output bytes:     {}", stats.output_bytes)?;
    writeln!(stdout, "Literals:         {}", stats.literals)?;
    writeln!(stdout, "Matches:          {}", stats.matches)?;
    writeln!(stdout, "Matched bytes:    {}", stats.matched_bytes)?;
    writeln!(stdout, "Compressed bits:  {}", stats.total_bits)?;
    writeln!(stdout, "Bits per byte:    {:.3}", stats.bits_per_byte())?;
    Ok(())
}

/// Materialize, then drive playback in real time and report statistics
fn play<R: Renderer>(
    decoding: &Decoding,
    mut renderer: R,
    config: &PlaybackConfig,
    skip_after: Option<Duration>,
) -> R {
    materialize(decoding, &mut renderer);
    let mut scheduler = Scheduler::new(decoding, renderer, config.bits_per_second);

    let (stop_tx, stop_rx) = bounded::<()>(1);
    if let Some(delay) = skip_after {
        thread::spawn(move || {
            thread::sleep(delay);
            stop_tx.send(()).ok();
        });
    }

    let outcome = FrameDriver::new(config.frame_interval).drive(&mut scheduler, &stop_rx);
    if outcome == DriveOutcome::Cancelled {
        let skipped = scheduler.reveal_all(Instant::now());
        info!(skipped, "revealed remaining characters");
    }

    let stats = scheduler.stats();
    eprintln!(
        "Revealed {} characters, {:.0} bits in {:.2}s ({:.1} bps average, target {})",
        stats.chars_revealed,
        stats.total_bits_revealed,
        stats.elapsed_seconds,
        stats.average_bits_per_second,
        scheduler.rate()
    );
    scheduler.into_renderer()
}

fn format_event(event: &RenderEvent) -> String {
    match event {
        RenderEvent::Materialize(index) => format!("materialize {index}"),
        RenderEvent::Reveal(index) => format!("reveal {index}"),
        RenderEvent::Apply(kind, indices) => format!("apply {} {:?}", kind.class_name(), indices),
        RenderEvent::Clear(kind, indices) => format!("clear {} {:?}", kind.class_name(), indices),
    }
}
