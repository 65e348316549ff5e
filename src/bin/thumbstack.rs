use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "thumbstack", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite source images into a fanned thumbnail PNG.
    Compose(ComposeArgs),
    /// Convert a review file into a thumbnail (requires `oiiotool` or `ffmpeg`).
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Output width in pixels.
    #[arg(long)]
    width: i64,

    /// Output height in pixels.
    #[arg(long)]
    height: i64,

    /// Source image; repeat for a stack. The last ones given end up on top.
    #[arg(long = "image")]
    images: Vec<PathBuf>,

    /// Render the drop-disabled state.
    #[arg(long)]
    disabled: bool,

    /// Compositor config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// File to convert.
    #[arg(long)]
    src: PathBuf,

    /// Directory receiving the thumbnail.
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Export(args) => cmd_export(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => thumbstack::CompositorConfig::from_json_file(path)?,
        None => thumbstack::CompositorConfig::default(),
    };

    let mut compositor = thumbstack::ThumbnailCompositor::new(config)?;
    compositor.set_display_rect(thumbstack::DisplayRect::new(args.width, args.height));
    compositor.set_source_paths(&args.images);
    compositor.set_drop_enabled(!args.disabled);

    let frame = compositor.render();
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    if thumbstack::drop_candidate(std::slice::from_ref(&args.src)).is_none() {
        anyhow::bail!(
            "'{}' is not an existing image or video file",
            args.src.display()
        );
    }

    let tools = thumbstack::ExportTools::from_env();
    let out = thumbstack::export_thumbnail(&args.src, &args.out_dir, &tools)?;
    println!("{}", out.display());
    Ok(())
}
