use std::{
    io::Read as _,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgGroup, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "codereel", version)]
struct Cli {
    /// Log at debug level (overrides RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file; missing fields take their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one still frame as a PNG.
    Frame(FrameArgs),
    /// Pad a voice clip to whole seconds in place and print its duration.
    Resolve(ResolveArgs),
    /// Synthesize (or reuse) and resolve every voice clip of a script.
    Voice(VoiceArgs),
    /// Assemble a voiced script into an MP4 (requires `ffmpeg` and `ffprobe` on PATH).
    Assemble(AssembleArgs),
    /// Parse a generated highlight table, or number the lines of a code listing.
    Highlights(HighlightsArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Rendered image of the code listing.
    #[arg(long)]
    code_image: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Zero-based first highlighted line (-1 for none).
    #[arg(long, default_value_t = codereel::NO_HIGHLIGHT_LINE, allow_hyphen_values = true)]
    line: i64,

    /// Number of highlighted lines.
    #[arg(long, default_value_t = 0)]
    count: i64,

    /// Script JSON whose code bounds the highlight.
    #[arg(long)]
    script: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Voice clip to pad.
    #[arg(long)]
    audio: PathBuf,
}

#[derive(Parser, Debug)]
struct VoiceArgs {
    /// Input script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Directory holding `voice_intro.<ext>`, `voice_<i>.<ext>`.
    #[arg(long)]
    audio_dir: PathBuf,

    /// Output script JSON with voice clips filled in.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AssembleArgs {
    /// Input script JSON.
    #[arg(long)]
    script: PathBuf,

    /// Rendered image of the code listing.
    #[arg(long)]
    code_image: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Staging directory [default: `<out>.staging` next to the output].
    #[arg(long)]
    staging: Option<PathBuf>,

    /// Voice missing clips from this directory before assembling.
    #[arg(long)]
    audio_dir: Option<PathBuf>,

    /// Audio delay relative to the video, in seconds.
    #[arg(long)]
    start_offset: Option<f64>,

    /// Worker threads for segment rendering.
    #[arg(long)]
    threads: Option<usize>,

    /// Render frames but record tool calls instead of running ffmpeg. `--out` is left untouched.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["table", "annotate"])))]
struct HighlightsArgs {
    /// Highlight table text (`-` for stdin).
    #[arg(long)]
    table: Option<PathBuf>,

    /// Code listing to print with line numbers.
    #[arg(long)]
    annotate: Option<PathBuf>,

    /// Output JSON path [default: stdout].
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Frame(args) => cmd_frame(&cfg, args),
        Command::Resolve(args) => cmd_resolve(&cfg, args),
        Command::Voice(args) => cmd_voice(&cfg, args),
        Command::Assemble(args) => cmd_assemble(cfg, args),
        Command::Highlights(args) => cmd_highlights(args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("codereel=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("codereel=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<codereel::ReelConfig> {
    let cfg = match path {
        Some(p) => codereel::ReelConfig::from_json_file(p)?,
        None => codereel::ReelConfig::default(),
    };
    Ok(cfg)
}

fn ffmpeg_tools(cfg: &codereel::ReelConfig) -> anyhow::Result<codereel::FfmpegTools> {
    let tools = codereel::FfmpegTools::new(cfg);
    if !tools.available() {
        anyhow::bail!(
            "'{}' and '{}' must be installed and on PATH",
            cfg.tools.ffmpeg.display(),
            cfg.tools.ffprobe.display()
        );
    }
    Ok(tools)
}

fn synthesizer(
    cfg: &codereel::ReelConfig,
) -> anyhow::Result<Option<codereel::CommandSynthesizer>> {
    Ok(match &cfg.voice.command {
        Some(argv) => Some(codereel::CommandSynthesizer::new(argv.clone())?),
        None => None,
    })
}

fn cmd_frame(cfg: &codereel::ReelConfig, args: FrameArgs) -> anyhow::Result<()> {
    let total_lines = match &args.script {
        Some(p) => codereel::Script::from_json_file(p)?.total_lines(),
        None => usize::MAX,
    };
    let code = codereel::CodeImage::open(&args.code_image)?;
    let rect = cfg
        .highlight
        .geometry()
        .rect(args.line, args.count, code.width(), total_lines)?;

    let frame = codereel::FrameRenderer::new(cfg).render(&code, rect.as_ref())?;
    frame.write_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_resolve(cfg: &codereel::ReelConfig, args: ResolveArgs) -> anyhow::Result<()> {
    let tools = ffmpeg_tools(cfg)?;
    let resolved = codereel::resolve(&tools, &args.audio)?;
    println!("{}", resolved.duration_seconds);
    Ok(())
}

fn cmd_voice(cfg: &codereel::ReelConfig, args: VoiceArgs) -> anyhow::Result<()> {
    let mut script = codereel::Script::from_json_file(&args.script)?;
    let tools = ffmpeg_tools(cfg)?;
    let synth = synthesizer(cfg)?;

    codereel::voice_script(
        &mut script,
        synth.as_ref().map(|s| s as &dyn codereel::SpeechSynthesizer),
        &tools,
        &args.audio_dir,
        &cfg.voice.extension,
    )?;
    script.write_json_file(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_assemble(mut cfg: codereel::ReelConfig, args: AssembleArgs) -> anyhow::Result<()> {
    if let Some(offset) = args.start_offset {
        cfg.encode.start_offset_sec = offset;
    }
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }
    cfg.validate()?;

    let mut script = codereel::Script::from_json_file(&args.script)?;
    let staging = args
        .staging
        .clone()
        .unwrap_or_else(|| default_staging(&args.out));

    let recording = codereel::RecordingTools::new();
    let ffmpeg = if args.dry_run {
        None
    } else {
        Some(ffmpeg_tools(&cfg)?)
    };
    let tools: &dyn codereel::MediaTools = match &ffmpeg {
        Some(t) => t,
        None => &recording,
    };

    if let Some(audio_dir) = &args.audio_dir {
        let synth = synthesizer(&cfg)?;
        codereel::voice_script(
            &mut script,
            synth.as_ref().map(|s| s as &dyn codereel::SpeechSynthesizer),
            tools,
            audio_dir,
            &cfg.voice.extension,
        )?;
    }

    // The recording mux only writes a placeholder; keep it away from `--out`.
    let out_path = if args.dry_run {
        staging.join("dry-run.mp4")
    } else {
        args.out.clone()
    };
    let mut assembler = codereel::Assembler::new(tools, &cfg);
    let report = assembler
        .run(&script, &args.code_image, &staging, &out_path)
        .with_context(|| format!("assembly stopped in state '{}'", failed_state(&assembler)))?;

    if args.dry_run {
        for call in recording.calls() {
            println!("{call:?}");
        }
        eprintln!(
            "dry run: {} not written ({} segments, {}s)",
            args.out.display(),
            report.segments,
            report.total_seconds
        );
        return Ok(());
    }
    eprintln!(
        "wrote {} ({} segments, {}s)",
        report.output.display(),
        report.segments,
        report.total_seconds
    );
    Ok(())
}

fn failed_state(assembler: &codereel::Assembler<'_>) -> codereel::AssemblyState {
    assembler.failed_at().unwrap_or(assembler.state())
}

fn default_staging(out: &Path) -> PathBuf {
    let mut name = out
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "codereel".into());
    name.push(".staging");
    out.with_file_name(name)
}

fn cmd_highlights(args: HighlightsArgs) -> anyhow::Result<()> {
    if let Some(code_path) = &args.annotate {
        let code = std::fs::read_to_string(code_path)
            .with_context(|| format!("read code listing '{}'", code_path.display()))?;
        let numbered = codereel::annotate_line_numbers(&code);
        return write_output(args.out.as_deref(), numbered.as_bytes());
    }

    let Some(table_path) = &args.table else {
        anyhow::bail!("either --table or --annotate is required");
    };
    let text = if table_path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read highlight table from stdin")?;
        buf
    } else {
        std::fs::read_to_string(table_path)
            .with_context(|| format!("read highlight table '{}'", table_path.display()))?
    };

    let highlights = codereel::parse_highlight_table(&text);
    let mut json = serde_json::to_vec_pretty(&highlights).context("serialize highlights")?;
    json.push(b'\n');
    write_output(args.out.as_deref(), &json)
}

fn write_output(out: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            codereel::ensure_parent_dir(path)?;
            std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            use std::io::Write as _;
            std::io::stdout()
                .write_all(bytes)
                .context("write to stdout")?;
        }
    }
    Ok(())
}
