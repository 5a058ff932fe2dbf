use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use view_shadow::{
    DrawOutcome, DrawTarget, ImageView, Paint, PixelSurface, Renderable, ShadowColor,
    ShadowConfig, ShadowRenderer, Size, surface_to_rgba_image,
};

#[derive(Parser, Debug)]
#[command(name = "view-shadow", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the drop shadow of an image as a PNG.
    Shadow(ShadowArgs),
    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
struct ShadowArgs {
    /// Input image (the source view).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Output width in pixels (defaults to the padded input width).
    #[arg(long)]
    width: Option<u32>,

    /// Output height in pixels (defaults to the padded input height).
    #[arg(long)]
    height: Option<u32>,

    /// Transparent margin added around the input so the blur is not cut off.
    #[arg(long, default_value_t = 0)]
    padding: u32,

    /// Blur radius (overrides the config).
    #[arg(long)]
    radius: Option<u32>,

    /// Shadow color as #RRGGBB or #RRGGBBAA (overrides the config).
    #[arg(long)]
    color: Option<ShadowColor>,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Draw the source image on top of its shadow.
    #[arg(long, default_value_t = false)]
    with_source: bool,
}

#[derive(Parser, Debug)]
struct ConfigArgs {
    /// JSON configuration file to merge over the defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Shadow(args) => cmd_shadow(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ShadowConfig> {
    match path {
        Some(p) => ShadowConfig::from_path(p).with_context(|| "load shadow config"),
        None => Ok(ShadowConfig::default()),
    }
}

fn padded_view(path: &Path, padding: u32) -> anyhow::Result<ImageView> {
    let src = image::open(path)
        .with_context(|| format!("open image '{}'", path.display()))?
        .to_rgba8();
    if padding == 0 {
        return Ok(ImageView::from_rgba_image(src));
    }
    let (w, h) = src.dimensions();
    let grow = padding.saturating_mul(2);
    let mut canvas = image::RgbaImage::new(w.saturating_add(grow), h.saturating_add(grow));
    image::imageops::overlay(&mut canvas, &src, i64::from(padding), i64::from(padding));
    Ok(ImageView::from_rgba_image(canvas))
}

fn cmd_shadow(args: ShadowArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(radius) = args.radius {
        config.style.radius = radius;
    }
    if let Some(color) = args.color {
        config.style.color = color;
    }

    let view = padded_view(&args.in_path, args.padding)?;
    let view_size = view.measure();
    let out_size = Size::new(
        args.width.unwrap_or(view_size.width),
        args.height.unwrap_or(view_size.height),
    );
    let mut out = PixelSurface::new(out_size).with_context(|| "allocate output surface")?;
    let bounds = out.rect();

    let mut renderer = ShadowRenderer::with_cpu_blur(&view, &config);
    match renderer.draw(bounds, &mut out) {
        DrawOutcome::Drawn => {}
        DrawOutcome::Skipped(reason) => anyhow::bail!("shadow not rendered: {reason:?}"),
    }

    if args.with_source {
        let mut source = PixelSurface::new(view_size)?;
        view.paint_into(&mut source);
        out.draw_image(&source, source.rect(), bounds, &Paint::default())?;
    }

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    surface_to_rgba_image(&out)
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
