use edge_doubler::config::upscale;
use edge_doubler::image::io::{load_grid, save_grid, write_json_file};
use edge_doubler::upscale_with_report;
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = upscale::load_config(Path::new(&config_path))?;
    let max_value = config.upscale.max_value;

    let source = load_grid(&config.input, max_value)?;
    let result = upscale_with_report(&source, config.levels, config.upscale)
        .map_err(|e| format!("Upscaling {} failed: {e}", config.input.display()))?;

    save_grid(&result.grid, &config.output.image, max_value)?;
    println!(
        "Saved {}x{} image to {} ({} doubling(s), {:.3} ms)",
        result.grid.w,
        result.grid.h,
        config.output.image.display(),
        config.levels,
        result.report.total_ms
    );

    if let Some(report_path) = &config.output.report_json {
        let summary = UpscaleSummary {
            input: config.input.display().to_string(),
            source_width: source.w,
            source_height: source.h,
            channels: source.channels,
            max_conservation_error: result.report.max_conservation_error(),
            report: &result.report,
        };
        write_json_file(report_path, &summary)?;
        println!("Saved report to {}", report_path.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: upscale_image <config.json>".to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpscaleSummary<'a> {
    input: String,
    source_width: usize,
    source_height: usize,
    channels: usize,
    max_conservation_error: f64,
    report: &'a edge_doubler::UpscaleReport,
}
