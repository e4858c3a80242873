// src/main.rs
use anyhow::{bail, Context, Result};
use clap::Parser;
use colorful::Colorful;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use spectroglyph::cli::{self, Args, ConversionSummary};
use spectroglyph::core::{dsp, wav};
use spectroglyph::{
    load_pixel_field, render_spectrogram, AudioSynthesizer, ColorGradient, PreviewRenderer,
    SpectrogramConfig, SynthConfig,
};

const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if args.list_presets {
        cli::print_presets();
        return Ok(());
    }

    if let Some(path) = &args.inspect {
        return inspect(path);
    }

    let Some(input) = args.input.clone() else {
        bail!("No input given. Use --input <image|dir>, or --help for usage");
    };

    let base = SynthConfig::load_layered(args.config.as_deref()).context("Failed to load config")?;
    let config = args.apply(base).context("Invalid settings")?;

    let images = collect_image_files(&input)?;
    if images.is_empty() {
        println!("{}", "No image files found!".red());
        return Ok(());
    }

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let progress = if images.len() > 1 && !args.json {
        let bar = ProgressBar::new(images.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")?
                .progress_chars("##-"),
        );
        Some(bar)
    } else {
        None
    };

    let mut failures = 0;
    for image_path in &images {
        if let Some(bar) = &progress {
            bar.set_message(file_label(image_path));
        }

        match process_file(image_path, &args, &config) {
            Ok(summary) => {
                if args.json {
                    cli::print_json(&summary)?;
                } else if let Some(bar) = &progress {
                    bar.println(cli::format_summary(&summary, args.verbose).trim_end());
                } else {
                    cli::print_summary(&summary, args.verbose);
                }
            }
            Err(e) => {
                failures += 1;
                let line = format!("✗ {}: {:#}", image_path.display(), e);
                match &progress {
                    Some(bar) => bar.println(line.red().to_string()),
                    None => eprintln!("{}", line.red()),
                }
            }
        }

        if let Some(bar) = &progress {
            bar.inc(1);
        }
    }

    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    if failures > 0 {
        bail!("{} of {} file(s) failed", failures, images.len());
    }
    Ok(())
}

fn collect_image_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        files.push(path.to_path_buf());
    } else if path.is_dir() {
        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && has_image_extension(path) {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
    } else {
        bail!("Input not found: {}", path.display());
    }

    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn process_file(image_path: &Path, args: &Args, config: &SynthConfig) -> Result<ConversionSummary> {
    let field = load_pixel_field(image_path, args.resize_policy())
        .with_context(|| format!("Failed to decode {}", image_path.display()))?;

    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());

    let preview = if args.preview {
        let raster = PreviewRenderer::new(config.clone())?.render(&field, args.preview_width);
        let path = args.output.join(format!("{}_preview.png", stem));
        raster
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Some(path)
    } else {
        None
    };

    let mut waveform = AudioSynthesizer::new(config.clone())?.synthesize(&field)?;
    dsp::normalize(&mut waveform, config);

    let bytes = wav::write(&waveform, config)?;
    let wav_path = args.output.join(format!("{}.wav", stem));
    std::fs::write(&wav_path, &bytes)
        .with_context(|| format!("Failed to write {}", wav_path.display()))?;

    let spectrogram = if args.spectrogram {
        let path = args.output.join(format!("{}_spectrogram.png", stem));
        let image = render_spectrogram(&waveform, &SpectrogramConfig::default(), &ColorGradient::inferno())?;
        image
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Some(path)
    } else {
        None
    };

    Ok(ConversionSummary {
        input: image_path.to_path_buf(),
        width: field.width(),
        height: field.height(),
        wav: wav_path,
        preview,
        spectrogram,
        samples: waveform.len(),
        duration_secs: waveform.duration_secs(),
        peak: waveform.peak(),
        bytes: bytes.len(),
        config: config.clone(),
    })
}

fn inspect(path: &Path) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let header = wav::read_header(&bytes)?;
    println!("{}", path.display().to_string().cyan());
    print!("{}", cli::format_header(&header));
    Ok(())
}
