use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sha2::Digest as _;

#[derive(Parser, Debug)]
#[command(name = "ezid", version, about = "Compose ID photos and tile them onto 4x6 print sheets")]
struct Cli {
    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in print specs.
    Specs(ListArgs),
    /// List the built-in clothing overlays.
    Overlays(ListArgs),
    /// Compose one photo of a job as a PNG.
    Cell(CellArgs),
    /// Compose every photo of a job and export the print sheet as a JPEG.
    Sheet(SheetArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct CellArgs {
    /// Job JSON file.
    #[arg(long)]
    job: PathBuf,

    /// Photo index in the job (0-based).
    #[arg(long, default_value_t = 0)]
    index: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Draw the face alignment guide, as the editor preview shows it.
    #[arg(long)]
    preview: bool,

    /// Background removal command line, e.g. "rembg i".
    #[arg(long)]
    remover: Option<String>,
}

#[derive(Parser, Debug)]
struct SheetArgs {
    /// Job JSON file.
    #[arg(long)]
    job: PathBuf,

    /// Output JPEG path.
    #[arg(long, default_value = ezid::SHEET_FILE_NAME)]
    out: PathBuf,

    /// Worker threads for drawing cells (defaults to $EZID_THREADS, then all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Draw cells on the calling thread only.
    #[arg(long)]
    sequential: bool,

    /// Background removal command line, e.g. "rembg i".
    #[arg(long)]
    remover: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Specs(args) => cmd_specs(args),
        Command::Overlays(args) => cmd_overlays(args),
        Command::Cell(args) => cmd_cell(args),
        Command::Sheet(args) => cmd_sheet(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn cmd_specs(args: ListArgs) -> anyhow::Result<()> {
    let specs = ezid::catalog();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }
    for spec in &specs {
        let working = spec.working_canvas();
        println!(
            "{:<10} {:<16} {:>2} per sheet, working cell {}x{}",
            spec.id,
            spec.label,
            spec.max(),
            working.width,
            working.height
        );
    }
    Ok(())
}

fn cmd_overlays(args: ListArgs) -> anyhow::Result<()> {
    let catalog = ezid::OverlayCatalog::builtin();
    if args.json {
        println!("{}", serde_json::to_string_pretty(catalog.assets())?);
        return Ok(());
    }
    for asset in catalog.assets() {
        println!(
            "{:<4} {:?}\t{}",
            asset.id,
            asset.gender,
            asset.path.display()
        );
    }
    Ok(())
}

fn make_remover(line: Option<&str>) -> anyhow::Result<Option<ezid::CommandRemover>> {
    line.map(ezid::CommandRemover::from_command_line)
        .transpose()
        .context("parse --remover")
}

fn read_job(path: &Path) -> anyhow::Result<ezid::Job> {
    let job = ezid::Job::from_path(path)
        .with_context(|| format!("load job '{}'", path.display()))?;
    job.validate()
        .with_context(|| format!("validate job '{}'", path.display()))?;
    Ok(job)
}

fn report_notices(notices: &[String]) {
    for notice in notices {
        eprintln!("warning: {notice}");
    }
}

fn cmd_cell(args: CellArgs) -> anyhow::Result<()> {
    let job = read_job(&args.job)?;
    let spec = job.photo_spec()?;
    let remover = make_remover(args.remover.as_deref())?;
    let mut env = ezid::JobEnv::for_job_file(&args.job);
    if let Some(r) = remover.as_ref() {
        env = env.with_remover(r);
    }

    let entry = job.prepare_entry(args.index, &env)?;
    report_notices(&entry.notices);

    let canvas = spec.working_canvas();
    let png = if args.preview {
        let surface = ezid::render_preview(canvas, &entry.request, &ezid::FaceGuide::DEFAULT)?;
        ezid::encode_png(&surface)?
    } else {
        ezid::compose_cell(canvas, &entry.request)?.encode_png()?
    };
    ezid::write_output(&args.out, &png)?;

    eprintln!("wrote {} ({}x{})", args.out.display(), canvas.width, canvas.height);
    Ok(())
}

fn cmd_sheet(args: SheetArgs) -> anyhow::Result<()> {
    let job = read_job(&args.job)?;
    let remover = make_remover(args.remover.as_deref())?;
    let mut env = ezid::JobEnv::for_job_file(&args.job);
    if let Some(r) = remover.as_ref() {
        env = env.with_remover(r);
    }

    let loaded = job.load_session(&env)?;
    report_notices(&loaded.notices);

    let opts = ezid::TileOptions {
        parallel: !args.sequential,
        threads: args.threads.or_else(ezid::threads_from_env),
        ..ezid::TileOptions::default()
    };
    let sheet = loaded.session.export(&opts)?;
    let jpeg = ezid::encode_sheet_jpeg(&sheet, opts.dpi)?;
    ezid::write_output(&args.out, &jpeg)?;

    eprintln!(
        "wrote {} ({}x{}, {} cells from {} photos, sha256 {})",
        args.out.display(),
        sheet.width(),
        sheet.height(),
        sheet.plan.placements.len(),
        loaded.session.queue().len(),
        sha256_hex(&jpeg)
    );
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
