//! resume2json - extract resume layout and sections to JSON
//!
//! Runs the extraction pipeline on a PDF (or a set of page images) and
//! prints the per-page tokens, normalized boxes and heuristic section
//! groupings as JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use vitae_core::convert::{DEFAULT_CONVERTER, docx_to_pdf};
use vitae_core::extract::{
    MupdfTextSource, OcrWordSource, PopplerTextSource, QuadJsonOcr, TesseractOcr, TextLayerSource,
};
use vitae_core::pipeline::{ProcessOptions, process_document};

/// Text-layer extraction engine.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum TextEngine {
    /// poppler pdftotext (default)
    #[default]
    Pdftotext,
    /// MuPDF mutool
    Mutool,
}

/// OCR engine for the image fallback path.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OcrEngine {
    /// tesseract TSV output (default)
    #[default]
    Tesseract,
    /// external quad-JSON bridge command (requires --ocr-program)
    QuadJson,
}

/// Extract resume layout (tokens, 0-1000 boxes, section groups) to JSON.
#[derive(Parser, Debug)]
#[command(name = "resume2json")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a PDF or DOCX file, or (with --images) one or more page
    /// image files
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Treat the input files as page images (one per page)
    #[arg(short = 'i', long, action = ArgAction::SetTrue)]
    images: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Skip the text layer and go straight to OCR
    #[arg(long = "no-text-layer", action = ArgAction::SetTrue)]
    no_text_layer: bool,

    /// Text-layer engine
    #[arg(long = "text-engine", value_enum, default_value = "pdftotext")]
    text_engine: TextEngine,

    /// OCR engine
    #[arg(long = "ocr-engine", value_enum, default_value = "tesseract")]
    ocr_engine: OcrEngine,

    /// Override the OCR engine program path (bridge command for
    /// quad-json)
    #[arg(long = "ocr-program")]
    ocr_program: Option<PathBuf>,

    /// Per-page OCR budget in seconds (pages that overrun are skipped)
    #[arg(long = "page-timeout")]
    page_timeout: Option<u64>,

    /// DOCX converter program
    #[arg(long, default_value = DEFAULT_CONVERTER)]
    converter: String,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Pretty-print the JSON output
    #[arg(short = 'p', long, action = ArgAction::SetTrue)]
    pretty: bool,
}

fn build_text_source(args: &Args) -> Box<dyn TextLayerSource> {
    match args.text_engine {
        TextEngine::Pdftotext => Box::new(PopplerTextSource::default()),
        TextEngine::Mutool => Box::new(MupdfTextSource::default()),
    }
}

fn build_ocr_engine(args: &Args) -> anyhow::Result<Arc<dyn OcrWordSource>> {
    match args.ocr_engine {
        OcrEngine::Tesseract => {
            let mut engine = TesseractOcr::default();
            if let Some(ref program) = args.ocr_program {
                engine.program = program.clone();
            }
            Ok(Arc::new(engine))
        }
        OcrEngine::QuadJson => {
            let program = args
                .ocr_program
                .as_ref()
                .context("--ocr-engine quad-json requires --ocr-program")?;
            Ok(Arc::new(QuadJsonOcr::new(program.clone())))
        }
    }
}

fn is_docx(path: &PathBuf) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("docx"))
        .unwrap_or(false)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let text_source = build_text_source(args);
    let ocr = build_ocr_engine(args)?;
    let options = ProcessOptions {
        prefer_text_layer: !args.no_text_layer,
        page_timeout: args.page_timeout.map(Duration::from_secs),
        ..ProcessOptions::default()
    };

    let result = if args.images {
        let mut images = Vec::with_capacity(args.files.len());
        for path in &args.files {
            images.push(
                std::fs::read(path).with_context(|| format!("reading {}", path.display()))?,
            );
        }
        process_document(None, Some(&images), &options, text_source.as_ref(), &ocr)
    } else {
        let path = &args.files[0];
        if args.files.len() > 1 {
            anyhow::bail!("multiple document files given; use --images for page images");
        }
        let mut bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        if is_docx(path) {
            bytes = docx_to_pdf(&bytes, &args.converter)
                .with_context(|| format!("converting {}", path.display()))?;
        }
        process_document(Some(&bytes), None, &options, text_source.as_ref(), &ocr)
    };

    if result.pages.is_empty() {
        tracing::warn!("no pages could be extracted");
    }

    let mut writer: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout().lock()))
    } else {
        Box::new(BufWriter::new(
            File::create(&args.outfile)
                .with_context(|| format!("creating {}", args.outfile))?,
        ))
    };

    if args.pretty {
        serde_json::to_writer_pretty(&mut writer, &result)?;
    } else {
        serde_json::to_writer(&mut writer, &result)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vitae_core={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    run(&args)
}
