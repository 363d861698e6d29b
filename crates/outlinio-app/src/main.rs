// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Outlinio — turn photos into pencil, ink, line-art and coloring-book sketches.
//
// Entry point. Initialises logging, loads the config, drives one debounced
// processing session over the input photo and writes the requested exports.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use argh::FromArgs;
use outlinio_core::human_errors::{HumanError, humanize_error};
use outlinio_core::{ExportFormat, OutlinioError, Settings, SketchConfig, SketchMode};
use outlinio_session::ProcessingOrchestrator;
use outlinio_sketch::{SourceImage, encode_export};
use tracing::{error, info};

#[derive(FromArgs, Debug)]
/// Render a photo as a sketch and write the chosen exports
struct Args {
    /// path to the source photo
    #[argh(positional)]
    input: PathBuf,

    /// sketch mode: pencil, ink, lineart or coloring
    #[argh(option, short = 'm')]
    mode: Option<SketchMode>,

    /// stroke thickening, 1-5
    #[argh(option)]
    line_thickness: Option<u8>,

    /// edge sensitivity, 10-100
    #[argh(option)]
    edge_intensity: Option<u8>,

    /// contrast, 0-100 (50 is neutral)
    #[argh(option)]
    contrast: Option<u8>,

    /// denoising blur for pencil and line-art, 0-100
    #[argh(option)]
    noise_reduction: Option<u8>,

    /// smoothing blur for ink and coloring, 0-100
    #[argh(option)]
    smoothing: Option<u8>,

    /// brightness, 0-100 (50 is neutral)
    #[argh(option)]
    brightness: Option<u8>,

    /// export to write; repeat for several (default: png)
    #[argh(option, short = 'f')]
    format: Vec<ExportFormat>,

    /// directory the exports are written to (default: current directory)
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    out_dir: PathBuf,

    /// JSON config file
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,
}

impl Args {
    /// Settings from the config with any command-line overrides applied.
    fn settings(&self, base: Settings) -> Settings {
        Settings {
            mode: self.mode.unwrap_or(base.mode),
            line_thickness: self.line_thickness.unwrap_or(base.line_thickness),
            edge_intensity: self.edge_intensity.unwrap_or(base.edge_intensity),
            contrast: self.contrast.unwrap_or(base.contrast),
            noise_reduction: self.noise_reduction.unwrap_or(base.noise_reduction),
            smoothing: self.smoothing.unwrap_or(base.smoothing),
            brightness: self.brightness.unwrap_or(base.brightness),
        }
        .clamped()
    }

    fn formats(&self) -> Vec<ExportFormat> {
        if self.format.is_empty() {
            vec![ExportFormat::Png]
        } else {
            let mut formats = self.format.clone();
            formats.sort();
            formats.dedup();
            formats
        }
    }
}

/// Why an invocation failed.
#[derive(Debug)]
enum Failure {
    /// Loading, exporting or writing went wrong.
    Core(OutlinioError),
    /// The sketch run failed; the session already described it.
    Render(HumanError),
}

impl From<OutlinioError> for Failure {
    fn from(err: OutlinioError) -> Self {
        Self::Core(err)
    }
}

impl From<std::io::Error> for Failure {
    fn from(err: std::io::Error) -> Self {
        Self::Core(OutlinioError::Io(err))
    }
}

impl Failure {
    fn into_human(self) -> HumanError {
        match self {
            Self::Core(err) => humanize_error(&err),
            Self::Render(human) => human,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Args = argh::from_env();
    info!("Outlinio starting");

    match run(&args).await {
        Ok(written) => {
            for path in written {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(failure) => {
            let human = failure.into_human();
            error!(message = %human.message, severity = ?human.severity, "sketch failed");
            eprintln!("{}\n{}", human.message, human.suggestion);
            ExitCode::FAILURE
        }
    }
}

/// Render `args.input` once and write every requested export. Returns the
/// written paths in format order.
async fn run(args: &Args) -> Result<Vec<PathBuf>, Failure> {
    let config = match &args.config {
        Some(path) => SketchConfig::load(path)?,
        None => SketchConfig::default(),
    };
    let settings = args.settings(config.default_settings);

    let source = SourceImage::open(&args.input)?;
    let mut session = ProcessingOrchestrator::spawn(&config);
    session.load_source(source).await?;
    session.update_settings(settings)?;

    let snapshot = session.wait_for_generation(1).await?;
    if let Some(failure) = snapshot.last_error {
        session.shutdown().await?;
        return Err(Failure::Render(failure));
    }

    tokio::fs::create_dir_all(&args.out_dir).await?;
    let mut written = Vec::new();
    for format in args.formats() {
        let buffer = session.export(format).await?;
        let bytes = encode_export(&buffer, format, config.jpeg_quality)?;
        let path = output_path(&args.out_dir, format);
        tokio::fs::write(&path, bytes).await?;
        info!(%format, path = %path.display(), "export written");
        written.push(path);
    }

    session.shutdown().await?;
    Ok(written)
}

fn output_path(dir: &Path, format: ExportFormat) -> PathBuf {
    dir.join(format.file_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: PathBuf, out_dir: PathBuf) -> Args {
        Args {
            input,
            mode: None,
            line_thickness: None,
            edge_intensity: None,
            contrast: None,
            noise_reduction: None,
            smoothing: None,
            brightness: None,
            format: Vec::new(),
            out_dir,
            config: None,
        }
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let mut a = args(PathBuf::from("in.png"), PathBuf::from("."));
        a.mode = Some(SketchMode::Ink);
        a.line_thickness = Some(9);
        let s = a.settings(Settings::default());
        assert_eq!(s.mode, SketchMode::Ink);
        assert_eq!(s.line_thickness, 5);
        assert_eq!(s.contrast, Settings::default().contrast);
    }

    #[test]
    fn formats_default_to_png_and_dedup() {
        let mut a = args(PathBuf::from("in.png"), PathBuf::from("."));
        assert_eq!(a.formats(), vec![ExportFormat::Png]);
        a.format = vec![ExportFormat::BwPrint, ExportFormat::Png, ExportFormat::BwPrint];
        assert_eq!(a.formats(), vec![ExportFormat::Png, ExportFormat::BwPrint]);
    }

    #[test]
    fn command_line_parses_modes_and_formats() {
        let parsed = Args::from_args(
            &["outlinio"],
            &["photo.jpg", "--mode", "lineart", "-f", "print-a4", "-f", "jpg"],
        )
        .unwrap();
        assert_eq!(parsed.mode, Some(SketchMode::LineArt));
        assert_eq!(parsed.format, vec![ExportFormat::PrintA4, ExportFormat::Jpg]);
        assert_eq!(parsed.out_dir, PathBuf::from("."));
    }

    #[tokio::test]
    async fn run_writes_each_requested_export() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        let mut photo = image::RgbaImage::from_pixel(24, 16, image::Rgba([250, 250, 250, 255]));
        for y in 0..16 {
            for x in 0..12 {
                photo.put_pixel(x, y, image::Rgba([20, 20, 20, 255]));
            }
        }
        photo.save(&input).unwrap();

        let mut a = args(input, dir.path().join("out"));
        a.mode = Some(SketchMode::LineArt);
        a.format = vec![ExportFormat::Jpg, ExportFormat::Transparent];
        let written = run(&a).await.unwrap();

        assert_eq!(
            written,
            vec![
                dir.path().join("out/outlinio-sketch.jpg"),
                dir.path().join("out/outlinio-sketch-transparent.png"),
            ]
        );
        for path in &written {
            let decoded = image::open(path).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (24, 16));
        }
    }

    #[test]
    fn render_failure_keeps_the_session_description() {
        let human = humanize_error(&OutlinioError::InvalidBuffer("zero width".into()));
        let reported = Failure::Render(human.clone()).into_human();
        assert_eq!(reported, human);
        assert!(!reported.retriable);
    }

    #[test]
    fn other_failures_are_humanized_once() {
        let reported = Failure::from(OutlinioError::NothingToExport).into_human();
        assert_eq!(reported, humanize_error(&OutlinioError::NothingToExport));
    }
}
