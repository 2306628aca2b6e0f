//! Command-line interface for acoustic keystroke recovery.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

use keysift_algorithms::{recover_strokes, Clusterer, PeakDetector, SimilarityEngine};
use keysift_core::{Parameters, WaveformView};
use keysift_io::{save_strokes, write_strokes_csv, RecordingReader};

/// Result type for CLI operations.
type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("I/O error: {0}")]
    KeysiftIo(#[from] keysift_io::Error),

    #[error("Core error: {0}")]
    Core(#[from] keysift_core::Error),

    #[error("Parameter error: {0}")]
    Parameter(#[from] keysift_core::ParameterError),

    #[error("Similarity error: {0}")]
    Similarity(#[from] keysift_core::SimilarityError),

    #[error("Clustering error: {0}")]
    Clustering(#[from] keysift_core::ClusteringError),
}

/// Acoustic keystroke recovery and clustering.
#[derive(Parser)]
#[command(name = "keysift")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recover and cluster keystrokes from a recording
    Process {
        /// Input recording (raw little-endian f32 samples)
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Sample rate of the recording (Hz)
        #[arg(long, default_value = "24000")]
        sample_rate: u32,

        /// Half-width of the correlation window (samples)
        #[arg(long, default_value = "256")]
        key_press_width: usize,

        /// Offset from the detected peak to the window start (samples)
        #[arg(long, default_value = "128")]
        offset_from_peak: i64,

        /// Alignment search range (samples)
        #[arg(long, default_value = "256")]
        align_window: usize,

        /// Minimum cc for a merge pair
        #[arg(long, default_value = "0.5")]
        threshold_clustering: f64,

        /// Peak-over-background acceptance ratio
        #[arg(long, default_value = "10.0")]
        threshold_background: f64,

        /// Background estimator width (samples)
        #[arg(long, default_value = "4096")]
        history_size: usize,

        /// Alignment refinement passes between similarity computations
        #[arg(long, default_value = "1")]
        refine: usize,

        /// Also write a stroke checkpoint to this path
        #[arg(long)]
        checkpoint: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show information about a recording
    Info {
        /// Input recording
        input: PathBuf,

        /// Sample rate of the recording (Hz)
        #[arg(long, default_value = "24000")]
        sample_rate: u32,
    },

    /// Time the pipeline stages on a recording
    Benchmark {
        /// Input recording
        input: PathBuf,

        /// Number of iterations
        #[arg(short, long, default_value = "3")]
        iterations: usize,
    },
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_target(false).try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            sample_rate,
            key_press_width,
            offset_from_peak,
            align_window,
            threshold_clustering,
            threshold_background,
            history_size,
            refine,
            checkpoint,
            verbose,
        } => {
            let params = Parameters::default()
                .with_sample_rate(sample_rate)
                .with_key_press_width(key_press_width)
                .with_offset_from_peak(offset_from_peak)
                .with_align_window(align_window)
                .with_threshold_clustering(threshold_clustering)
                .with_threshold_background(threshold_background)
                .with_history_size(history_size);
            run_process(&input, &output, &params, refine, checkpoint.as_deref(), verbose)
        }

        Commands::Info { input, sample_rate } => run_info(&input, sample_rate),

        Commands::Benchmark { input, iterations } => run_benchmark(&input, iterations),
    }
}

fn run_process(
    input: &PathBuf,
    output: &PathBuf,
    params: &Parameters,
    refine: usize,
    checkpoint: Option<&std::path::Path>,
    verbose: bool,
) -> Result<()> {
    if verbose {
        eprintln!("Reading: {}", input.display());
        eprintln!("Sample rate: {} Hz", params.sample_rate);
        eprintln!("Key press width: {} samples", params.key_press_width);
        eprintln!("Align window: {} samples", params.align_window);
        eprintln!("Clustering threshold: {}", params.threshold_clustering);
        eprintln!("Background threshold: {}", params.threshold_background);
        eprintln!("History size: {} samples", params.history_size);
        eprintln!("Refinement passes: {refine}");
    }

    let start = Instant::now();
    let reader = RecordingReader::open(input)?;
    let waveform = reader.read_waveform()?;
    if verbose {
        eprintln!(
            "  {} samples ({:.2}s)",
            waveform.len(),
            usize_to_f64(waveform.len()) / f64::from(params.sample_rate)
        );
    }

    let recovery = recover_strokes(WaveformView::new(&waveform), params, refine)?;

    write_strokes_csv(output, &recovery.strokes)?;
    if let Some(path) = checkpoint {
        save_strokes(path, &recovery.strokes)?;
        if verbose {
            eprintln!("Checkpoint written to: {}", path.display());
        }
    }

    let elapsed = start.elapsed();
    println!(
        "Recovered {} strokes in {} clusters ({:.2}s)",
        recovery.strokes.len(),
        recovery.strokes.n_clusters,
        elapsed.as_secs_f64()
    );
    println!(
        "Merges: {} accepted, {} rejected",
        recovery.stats.merges_accepted, recovery.stats.merges_rejected
    );
    println!("Output written to: {}", output.display());
    Ok(())
}

fn run_info(input: &PathBuf, sample_rate: u32) -> Result<()> {
    let reader = RecordingReader::open(input)?;

    println!("File: {}", input.display());
    println!(
        "Size: {} bytes ({:.2} MB)",
        reader.file_size(),
        usize_to_f64(reader.file_size()) / 1_000_000.0
    );
    println!("Samples: {}", reader.sample_count());
    println!(
        "Duration: {:.2}s at {} Hz",
        usize_to_f64(reader.sample_count()) / f64::from(sample_rate),
        sample_rate
    );

    let waveform = reader.read_waveform()?;
    if !waveform.is_empty() {
        let min = waveform.iter().copied().min().unwrap();
        let max = waveform.iter().copied().max().unwrap();
        println!("Amplitude range: {min} - {max}");
    }

    Ok(())
}

fn run_benchmark(input: &PathBuf, iterations: usize) -> Result<()> {
    let reader = RecordingReader::open(input)?;
    let waveform = reader.read_waveform()?;
    let params = Parameters::default();

    println!(
        "Benchmarking with {} samples, {} iterations",
        waveform.len(),
        iterations
    );
    println!(
        "{:<12} | {:<15} | {:<15} | {:<15}",
        "Stage", "Mean Time (ms)", "Min Time (ms)", "Max Time (ms)"
    );
    println!("{:-<65}", "");

    let mut detect_times = Vec::with_capacity(iterations);
    let mut similarity_times = Vec::with_capacity(iterations);
    let mut cluster_times = Vec::with_capacity(iterations);

    for _ in 0..iterations {
        let view = WaveformView::new(&waveform);

        let start = Instant::now();
        let detection = PeakDetector::from_params(&params).detect(view)?;
        detect_times.push(elapsed_ms(start));
        let mut strokes = detection.strokes;

        let start = Instant::now();
        let matrix = SimilarityEngine::new(params.clone()).compute(view, &mut strokes)?;
        similarity_times.push(elapsed_ms(start));

        let start = Instant::now();
        Clusterer::from_params(&params).cluster(&matrix, &mut strokes)?;
        cluster_times.push(elapsed_ms(start));
    }

    for (name, times) in [
        ("detect", &detect_times),
        ("similarity", &similarity_times),
        ("cluster", &cluster_times),
    ] {
        let min = times.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = times.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let mean = times.iter().sum::<f64>() / usize_to_f64(times.len());
        println!("{name:<12} | {mean:<15.2} | {min:<15.2} | {max:<15.2}");
    }

    Ok(())
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn usize_to_f64(value: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        value as f64
    }
}
