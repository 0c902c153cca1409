//! FramePulse CLI entry point

use anyhow::{Context, Result};
use framepulse::clock::HiresClock;
use framepulse::config::cli::{Cli, ProbeKind};
use framepulse::config::{toml, validator, Config};
use framepulse::output::json::{write_json_report, ReportDocument};
use framepulse::output::text;
use framepulse::probe::{frames, granularity, wait, HostInfo};
use framepulse::util::time::format_hz;

fn main() -> Result<()> {
    println!("FramePulse v{}", env!("CARGO_PKG_VERSION"));
    println!("Presentation-timing measurement and calibration tool");
    println!();

    // Parse CLI arguments
    let cli = Cli::parse_args();
    cli.validate()?;

    // Build configuration (TOML base if given, CLI flags take precedence)
    let config = build_config(&cli)?;
    validator::validate_config(&config).context("Configuration validation failed")?;

    print_configuration(&config, cli.probe);

    println!();
    println!("Starting probes...");
    println!();

    run_probes(&cli, &config)
}

/// Build configuration from CLI arguments and optional TOML file
fn build_config(cli: &Cli) -> Result<Config> {
    let base = match cli.config {
        Some(ref path) => toml::parse_toml_file(path)?,
        None => Config::default(),
    };

    toml::merge_cli_with_config(cli, base)
}

/// Print configuration summary
fn print_configuration(config: &Config, probe: ProbeKind) {
    println!("Configuration:");

    if matches!(probe, ProbeKind::Granularity | ProbeKind::All) {
        println!("  Granularity:");
        println!("    Steps: {}", config.granularity.steps);
    }

    if matches!(probe, ProbeKind::Frames | ProbeKind::All) {
        println!("  Frames:");
        println!("    Frames: {}", config.frames.frames);
        println!("    Window: {}ms", config.frames.window_ms);
        println!("    Display: {} @ {}x{}",
            format_hz(config.display.refresh_hz),
            config.display.width,
            config.display.height
        );
        println!("    Backend: {}", config.display.backend);
    }

    if matches!(probe, ProbeKind::Wait | ProbeKind::All) {
        println!("  Wait:");
        let strategies: Vec<String> = config
            .wait
            .strategies()
            .iter()
            .map(|s| s.to_string())
            .collect();
        println!("    Strategies: {}", strategies.join(", "));
        println!("    Samples: {}", config.wait.probe.samples);
        println!(
            "    Range: {}ms - {}ms",
            config.wait.probe.min_ms, config.wait.probe.max_ms
        );
        println!("    Seed: {}", config.wait.probe.seed);
    }

    if let Some(ref path) = config.output.json_output {
        println!("  Output:");
        println!("    JSON: {}", path.display());
    }
}

/// Run the selected probes and render their reports
fn run_probes(cli: &Cli, config: &Config) -> Result<()> {
    use std::time::Instant;

    let clock = HiresClock::new();
    let host = HostInfo::capture(&clock);
    let mut document = ReportDocument::new(host.clone());

    text::print_header(&host);

    if matches!(cli.probe, ProbeKind::Granularity | ProbeKind::All) {
        let probe_start = Instant::now();
        let report = granularity::run(&clock, &config.granularity);
        if cli.debug {
            eprintln!(
                "DEBUG TIMING: granularity probe: {:.3}s",
                probe_start.elapsed().as_secs_f64()
            );
        }
        text::print_granularity(&report);
        document.granularity = Some(report);
    }

    if matches!(cli.probe, ProbeKind::Frames | ProbeKind::All) {
        // A display that cannot be synchronized is fatal: frame-accurate
        // presentation is the whole point.
        let mut sync = config
            .display
            .backend
            .open(config.display.mode(), clock)
            .context("Failed to open frame synchronizer")?;

        let probe_start = Instant::now();
        let report = frames::run(sync.as_mut(), &config.frames);
        if cli.debug {
            eprintln!(
                "DEBUG TIMING: frame probe: {:.3}s",
                probe_start.elapsed().as_secs_f64()
            );
        }
        text::print_frames(&report);
        document.frames = Some(report);
    }

    if matches!(cli.probe, ProbeKind::Wait | ProbeKind::All) {
        for kind in config.wait.strategies() {
            let mut lock = kind.create();
            let probe_start = Instant::now();
            let report = wait::run(lock.as_mut(), &clock, &config.wait.probe);
            if cli.debug {
                eprintln!(
                    "DEBUG TIMING: wait probe ({}): {:.3}s",
                    kind,
                    probe_start.elapsed().as_secs_f64()
                );
            }
            text::print_wait(&report);
            document.wait.push(report);
        }
    }

    text::print_footer();

    if let Some(ref path) = config.output.json_output {
        write_json_report(path, &document)?;
        println!();
        println!("Report written to {}", path.display());
    }

    Ok(())
}
