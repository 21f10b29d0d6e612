use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use sketchmask::{
    AspectRatio, EncodedImage, GenerationMode, GenerationRequest, LosslessFormat,
    MAX_ENCODED_BYTES, PixelBuffer, SketchOptions,
};

#[derive(Parser, Debug)]
#[command(name = "sketchmask", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a sketch layer into mask, structure and color guidance.
    Analyze(AnalyzeArgs),
    /// Build a feathered edit mask from a selection image.
    Mask(MaskArgs),
    /// Encode an image as a lossless data URL.
    Encode(EncodeArgs),
    /// Check a data URL against the transport size limit.
    Check(CheckArgs),
    /// Assemble and validate a generation request JSON body.
    Request(RequestArgs),
}

#[derive(Parser, Debug)]
struct OptionArgs {
    /// Sketch options JSON; individual flags override its values.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Feather amount as a fraction of the canvas.
    #[arg(long)]
    feather: Option<f64>,

    #[arg(long)]
    structure_weight: Option<f64>,

    #[arg(long)]
    color_weight: Option<f64>,
}

impl OptionArgs {
    fn resolve(&self) -> anyhow::Result<SketchOptions> {
        let mut opts = match &self.options {
            Some(path) => SketchOptions::from_path(path)?,
            None => SketchOptions::default(),
        };
        if let Some(v) = self.feather {
            opts = opts.with_feather_amount(v);
        }
        if let Some(v) = self.structure_weight {
            opts = opts.with_structure_weight(v);
        }
        if let Some(v) = self.color_weight {
            opts = opts.with_color_weight(v);
        }
        opts.validate()?;
        Ok(opts)
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Webp,
    Png,
}

impl From<FormatArg> for LosslessFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Webp => LosslessFormat::WebP,
            FormatArg::Png => LosslessFormat::Png,
        }
    }
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Input sketch image (PNG or WebP with alpha).
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    options: OptionArgs,

    /// Write the decoded feathered mask here.
    #[arg(long)]
    mask_out: Option<PathBuf>,

    /// Output analysis JSON path (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct MaskArgs {
    /// Selection image; every pixel with non-zero alpha is selected.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Feather amount as a fraction of the larger canvas side.
    #[arg(long, default_value_t = 0.03)]
    feather: f64,

    #[arg(long, value_enum, default_value_t = FormatArg::Webp)]
    format: FormatArg,

    /// Output mask image path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, value_enum, default_value_t = FormatArg::Webp)]
    format: FormatArg,

    /// Write the data URL here.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// File holding a data URL (or bare base64 payload).
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct RequestArgs {
    #[arg(long)]
    prompt: String,

    #[arg(long, default_value_t = GenerationMode::Generate)]
    mode: GenerationMode,

    /// Base image for edit mode.
    #[arg(long)]
    base: Option<PathBuf>,

    /// Selection image for edit mode (non-zero alpha = selected).
    #[arg(long)]
    selection: Option<PathBuf>,

    /// Sketch layer to analyze and attach.
    #[arg(long)]
    sketch: Option<PathBuf>,

    #[arg(long, default_value_t = AspectRatio::Square)]
    aspect: AspectRatio,

    /// Ask for an execution plan instead of pixels.
    #[arg(long, default_value_t = false)]
    got: bool,

    #[command(flatten)]
    options: OptionArgs,

    /// Output request JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Analyze(args) => cmd_analyze(args),
        Command::Mask(args) => cmd_mask(args),
        Command::Encode(args) => cmd_encode(args),
        Command::Check(args) => cmd_check(args),
        Command::Request(args) => cmd_request(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn load_pixels(path: &Path) -> anyhow::Result<PixelBuffer> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    PixelBuffer::decode(&bytes).with_context(|| format!("decode image '{}'", path.display()))
}

fn selection_indices(selection: &PixelBuffer) -> Vec<usize> {
    selection
        .as_bytes()
        .chunks_exact(4)
        .enumerate()
        .filter(|(_, px)| px[3] > 0)
        .map(|(i, _)| i)
        .collect()
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let opts = args.options.resolve()?;
    let sketch = load_pixels(&args.in_path)?;
    let analysis = sketchmask::analyze_sketch(&sketch, &opts)?;

    let summary = analysis.summary();
    eprintln!(
        "segments={} regions={} confidence={:.3}",
        summary.structural_segments, summary.color_regions, summary.confidence
    );

    if let Some(mask_out) = &args.mask_out {
        write_output(mask_out, &analysis.binary_mask.decode_bytes()?)?;
    }

    let json = serde_json::to_string_pretty(&analysis).context("serialize sketch analysis")?;
    match &args.out {
        Some(out) => write_output(out, json.as_bytes()),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn cmd_mask(args: MaskArgs) -> anyhow::Result<()> {
    let selection = load_pixels(&args.in_path)?;
    let selected = selection_indices(&selection);
    if selected.is_empty() {
        tracing::warn!("selection image has no pixels with alpha > 0");
    }
    let mask = sketchmask::build_binary_mask(
        selection.width(),
        selection.height(),
        selected,
        args.feather,
    )?;
    let encoded = sketchmask::encode_lossless_as(&mask, args.format.into())?;
    write_output(&args.out, &encoded.decode_bytes()?)
}

fn cmd_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let pixels = load_pixels(&args.in_path)?;
    let encoded = sketchmask::encode_lossless_as(&pixels, args.format.into())?;
    report_size(&encoded);
    match &args.out {
        Some(out) => write_output(out, encoded.as_str().as_bytes()),
        None => {
            println!("{encoded}");
            Ok(())
        }
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read data URL '{}'", args.in_path.display()))?;
    let text = text.trim();
    let bytes = sketchmask::estimated_decoded_size(text);
    if sketchmask::exceeds_limit_str(text) {
        anyhow::bail!(
            "'{}' is ~{bytes} bytes decoded, over the {MAX_ENCODED_BYTES} byte limit",
            args.in_path.display()
        );
    }
    eprintln!("ok: ~{bytes} bytes decoded (limit {MAX_ENCODED_BYTES})");
    Ok(())
}

fn report_size(encoded: &EncodedImage) {
    let report = sketchmask::validate_mask_size(encoded);
    eprintln!(
        "{}: {} KB{}",
        encoded.mime(),
        report.size_kb,
        if report.valid { "" } else { " (over limit)" }
    );
}

fn cmd_request(args: RequestArgs) -> anyhow::Result<()> {
    let opts = args.options.resolve()?;
    let sends_images = args.mode == GenerationMode::Edit && !args.got;
    if !sends_images && (args.base.is_some() || args.selection.is_some()) {
        anyhow::bail!(
            "--base/--selection are only used by edit requests without --got (mode {}, got {})",
            args.mode,
            args.got
        );
    }

    let mut request = match (args.mode, args.got) {
        (mode, true) => GenerationRequest::got_preview(mode, args.prompt.as_str()),
        (GenerationMode::Generate, false) => GenerationRequest::generate(args.prompt.as_str()),
        (GenerationMode::Edit, false) => {
            let base_path = args
                .base
                .as_deref()
                .context("edit mode requires --base")?;
            let selection_path = args
                .selection
                .as_deref()
                .context("edit mode requires --selection")?;
            let base = load_pixels(base_path)?;
            let selection = load_pixels(selection_path)?;
            anyhow::ensure!(
                (selection.width(), selection.height()) == (base.width(), base.height()),
                "selection is {}x{} but base image is {}x{}",
                selection.width(),
                selection.height(),
                base.width(),
                base.height()
            );
            sketchmask::prepare_edit(&args.prompt, &base, selection_indices(&selection), &opts)?
        }
    };
    request = request.with_aspect_ratio(args.aspect).with_weights(
        opts.structure_weight,
        opts.color_weight,
        opts.feather_amount,
    );

    if let Some(sketch_path) = &args.sketch {
        let sketch = load_pixels(sketch_path)?;
        request = request.with_sketch(sketchmask::analyze_sketch(&sketch, &opts)?);
    }

    request.validate()?;
    let json = serde_json::to_string_pretty(&request).context("serialize generation request")?;
    write_output(&args.out, json.as_bytes())
}
