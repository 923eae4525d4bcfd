use std::io::BufRead as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use malath::{
    FontResource, GridRenderer, GridSession, InMemoryCatalog, MalathError, MalathResult,
    RenderOpts, SessionOpts, SpeechCapture,
};

#[derive(Parser, Debug)]
#[command(name = "malath", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List templates and their color names.
    Templates(CatalogArgs),
    /// Render the unpainted grid of a template as a PNG.
    Render(RenderArgs),
    /// Apply transcripts in order and write the final grid as a PNG.
    Paint(PaintArgs),
    /// Read one transcript per stdin line, re-rendering after each command.
    Interactive(InteractiveArgs),
}

#[derive(Parser, Debug)]
struct CatalogArgs {
    /// Template catalog JSON.
    #[arg(long)]
    catalog: PathBuf,
}

#[derive(Parser, Debug)]
struct GridArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// Template name.
    #[arg(long)]
    template: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Cell edge length in pixels.
    #[arg(long, default_value_t = malath::DEFAULT_CELL_SIZE)]
    cell_size: u32,

    /// Zone label size in pixels.
    #[arg(long, default_value_t = malath::DEFAULT_LABEL_SIZE_PX)]
    label_size: f32,

    /// Font for zone labels (falls back to $MALATH_FONT; labels are skipped without one).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    grid: GridArgs,
}

#[derive(Parser, Debug)]
struct PaintArgs {
    #[command(flatten)]
    grid: GridArgs,

    /// Transcript to apply; repeat for several commands.
    #[arg(long = "say", required = true)]
    transcripts: Vec<String>,
}

#[derive(Parser, Debug)]
struct InteractiveArgs {
    #[command(flatten)]
    grid: GridArgs,

    /// Capture window in seconds handed to the speech capture.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Templates(args) => cmd_templates(args),
        Command::Render(args) => cmd_render(args),
        Command::Paint(args) => cmd_paint(args),
        Command::Interactive(args) => cmd_interactive(args),
    }
}

fn cmd_templates(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = InMemoryCatalog::from_path(&args.catalog)?;
    for t in catalog.templates() {
        let colors: Vec<&str> = t.colors.names().collect();
        println!(
            "{}\t{}x{}\t{}",
            t.name,
            t.zones.rows(),
            t.zones.cols(),
            colors.join(", ")
        );
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (session, mut renderer) = open(&args.grid, SessionOpts::default())?;
    write_png(&session, &mut renderer, &args.grid.out)
}

fn cmd_paint(args: PaintArgs) -> anyhow::Result<()> {
    let (mut session, mut renderer) = open(&args.grid, SessionOpts::default())?;
    for transcript in &args.transcripts {
        report(session.apply_transcript(transcript))?;
    }
    write_png(&session, &mut renderer, &args.grid.out)
}

fn cmd_interactive(args: InteractiveArgs) -> anyhow::Result<()> {
    let opts = SessionOpts {
        listen_timeout: Duration::from_secs(args.timeout_secs),
        ..SessionOpts::default()
    };
    let (mut session, mut renderer) = open(&args.grid, opts)?;
    write_png(&session, &mut renderer, &args.grid.out)?;

    let mut capture = StdinCapture::new(std::io::stdin().lock().lines());
    eprintln!("say a zone number and a color (one line per command, EOF to quit)");
    loop {
        match session.listen_and_paint(&mut capture) {
            Err(MalathError::AudioTimeout { .. }) if capture.is_closed() => break,
            result => {
                if report(result)? {
                    write_png(&session, &mut renderer, &args.grid.out)?;
                }
            }
        }
    }
    Ok(())
}

fn open(args: &GridArgs, opts: SessionOpts) -> anyhow::Result<(GridSession, GridRenderer)> {
    let catalog = InMemoryCatalog::from_path(&args.catalog.catalog)?;
    let session = GridSession::load(&catalog, &args.template, opts)
        .with_context(|| format!("load template '{}'", args.template))?;
    if !session.palette_image().is_empty() {
        eprintln!("palette: {}", session.palette_image());
    }

    let font = match &args.font {
        Some(p) => Some(FontResource::from_path(p)?),
        None => FontResource::discover(),
    };
    let opts = RenderOpts::default()
        .with_cell_size(args.cell_size)
        .with_label_size_px(args.label_size);
    let renderer = GridRenderer::new(opts, font.as_ref())?;
    Ok((session, renderer))
}

/// Print the outcome of one command; `Ok(true)` when the grid changed.
fn report(result: MalathResult<malath::PaintOutcome>) -> anyhow::Result<bool> {
    match result {
        Ok(out) => {
            eprintln!(
                "painted zone {} with {} ({} cells)",
                out.zone, out.color, out.cells_painted
            );
            Ok(true)
        }
        Err(e) if e.is_recoverable() => {
            eprintln!("{e}");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn write_png(
    session: &GridSession,
    renderer: &mut GridRenderer,
    out: &Path,
) -> anyhow::Result<()> {
    let img = session.render(renderer)?;
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

/// Treats each stdin line as an already transcribed utterance.
///
/// Blank lines count as silence. Reads block, so `timeout` only labels the failure.
struct StdinCapture<L> {
    lines: L,
    eof: bool,
}

impl<L> StdinCapture<L> {
    fn new(lines: L) -> Self {
        Self { lines, eof: false }
    }

    fn is_closed(&self) -> bool {
        self.eof
    }
}

impl<L> SpeechCapture for StdinCapture<L>
where
    L: Iterator<Item = std::io::Result<String>>,
{
    fn capture(&mut self, timeout: Duration, _locale: &str) -> MalathResult<String> {
        match self.lines.next() {
            Some(Ok(line)) if !line.trim().is_empty() => Ok(line),
            Some(Ok(_)) => Err(MalathError::AudioTimeout {
                secs: timeout.as_secs(),
            }),
            None => {
                self.eof = true;
                Err(MalathError::AudioTimeout {
                    secs: timeout.as_secs(),
                })
            }
            Some(Err(e)) => Err(MalathError::transcription(e.to_string())),
        }
    }
}
