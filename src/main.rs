mod cli;

use ielts2go::{
    config::{self, Config},
    output::{normalize_extension, OutputConfig, OutputMode},
    prompt::{self, PromptDefaults},
    run::{self, RunOptions, RunReport},
    transcode::{seconds_arg, ProgressCallback},
    QualityPreset,
};
use ielts2go_av::{FfmpegEngine, ToolInfo};

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "ielts2go=debug,ielts2go_av=debug".to_string()
        } else {
            "ielts2go=info,ielts2go_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match run_cli(cli) {
        Ok(code) => code,
        Err(err) => {
            // Our own errors already embed their causes in the message
            let hint = match err.downcast_ref::<ielts2go::Error>() {
                Some(e) => {
                    eprintln!("Error: {}", e);
                    e.install_hint()
                }
                None => {
                    let message = format!("{:#}", err);
                    eprintln!("Error: {}", message);
                    ielts2go::error::suggests_missing_engine(&message)
                        .then_some(ielts2go::error::INSTALL_HINT)
                }
            };
            if let Some(hint) = hint {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> Result<ExitCode> {
    let config = config::load_config_or_default(cli.config.as_deref())
        .map_err(|e| ielts2go::Error::Config(format!("{:#}", e)))?;

    if cli.check_tools {
        return Ok(report_tools(&ielts2go_av::check_configured_tools(
            config.tools.ffmpeg_path.as_deref(),
            config.tools.ffprobe_path.as_deref(),
        )));
    }

    let input = cli.input.clone().unwrap_or_default();
    let quality_preset = QualityPreset::resolve(
        cli.quality
            .as_deref()
            .unwrap_or(&config.defaults.quality_preset),
    );

    let mut options = RunOptions {
        output_dir: cli
            .output
            .clone()
            .unwrap_or_else(|| config.defaults.output_dir.clone()),
        chunk_length: cli.duration.unwrap_or(config.defaults.chunk_length),
        prefix: cli
            .prefix
            .clone()
            .unwrap_or_else(|| config.defaults.prefix.clone()),
        quality_preset,
        output: OutputConfig::copy(run::copy_extension(&input)),
        dry_run: cli.dry_run,
        input,
    };

    // Fail on bad input before asking anything or looking for the engine
    options.validate()?;
    options.output = resolve_output(&cli, &config, &options)?;

    let mut engine = FfmpegEngine::discover(
        config.tools.ffmpeg_path.as_deref(),
        config.tools.ffprobe_path.as_deref(),
    )
    .map_err(ielts2go::Error::from)?;
    if let Some(secs) = config.tools.timeout_secs {
        engine = engine.with_timeout(Duration::from_secs(secs));
    }
    tracing::debug!(
        "Using ffmpeg {:?}, ffprobe {:?}",
        engine.ffmpeg(),
        engine.ffprobe()
    );

    let bar = if cli.shows_progress(options.output.mode) {
        Some(progress_bar()?)
    } else {
        None
    };
    let callback = bar.clone().map(|bar| -> ProgressCallback {
        Box::new(move |percent, step| {
            bar.set_position(percent.clamp(0.0, 100.0) as u64);
            bar.set_message(step.to_string());
        })
    });

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(run::run(&engine, &options, callback));

    if let Some(bar) = bar {
        match &result {
            Ok(_) => bar.finish_with_message("done"),
            Err(_) => bar.abandon(),
        }
    }

    let report = result?;
    print_report(&report, &options);
    Ok(ExitCode::SUCCESS)
}

/// Output selection from flags, falling back to the interactive prompt.
fn resolve_output(cli: &Cli, config: &Config, options: &RunOptions) -> Result<OutputConfig> {
    let segment_length = cli.hls_segment.unwrap_or(config.hls.segment_length);
    let playlist_type = cli.hls_type.unwrap_or(config.hls.playlist_type);
    let copy_extension = cli
        .extension
        .as_deref()
        .map(normalize_extension)
        .unwrap_or_else(|| run::copy_extension(&options.input));

    let output = match cli.requested_mode() {
        Some(OutputMode::Hls) => OutputConfig::hls(segment_length, Some(playlist_type)),
        Some(OutputMode::Copy) => OutputConfig::copy(copy_extension),
        Some(OutputMode::Encode) => {
            let extension = cli
                .extension
                .as_deref()
                .map(normalize_extension)
                .unwrap_or_else(|| "mp4".to_string());
            OutputConfig::encode(extension, options.quality_preset)
        }
        None => {
            let defaults = PromptDefaults {
                copy_extension,
                quality_preset: options.quality_preset,
                segment_length,
                playlist_type,
            };
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stdout();
            prompt::prompt_output_config(&mut input, &mut output, &defaults)?
        }
    };

    Ok(output)
}

fn progress_bar() -> Result<ProgressBar> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")?
            .progress_chars("=> "),
    );
    Ok(bar)
}

fn print_report(report: &RunReport, options: &RunOptions) {
    if report.dry_run {
        println!(
            "[DRY RUN] {} ({}s, {})",
            options.input.display(),
            seconds_arg(report.probe.duration),
            report.probe.resolution
        );
        for (i, args) in report.invocations.iter().enumerate() {
            println!("  {}. ffmpeg {}", i + 1, args.join(" "));
        }
        println!(
            "\n[DRY RUN] Would run {} invocation(s)",
            report.invocations.len()
        );
        return;
    }

    match report.mode {
        OutputMode::Hls => {
            if report.hls.is_some_and(|o| o.used_fallback) {
                println!("HLS bundle written with fallback settings");
            }
        }
        _ => println!("Wrote {} chunk(s)", report.jobs.len()),
    }
    for path in report.outputs(options) {
        println!("  {}", path.display());
    }
    println!(
        "Done in {:.1}s. Output directory: {}",
        report.elapsed.as_secs_f64(),
        options.output_dir.display()
    );
}

fn report_tools(tools: &[ToolInfo]) -> ExitCode {
    println!("Checking external tools...\n");

    let mut all_ok = true;
    for tool in tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);
        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }
        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }
        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
        ExitCode::SUCCESS
    } else {
        println!("{}", ielts2go::error::INSTALL_HINT);
        ExitCode::FAILURE
    }
}
