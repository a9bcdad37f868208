use feature_pyramid::config::{load_config, load_filters};
use feature_pyramid::image::io::{load_grayscale_f32, save_response_maps, write_json_file};
use feature_pyramid::pipeline::FeaturePipeline;
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
    let config = load_config(Path::new(&config_path))?;

    let filters = load_filters(&config.filters)?;
    let mut pipeline = FeaturePipeline::new(config.params).map_err(|e| e.to_string())?;
    pipeline
        .set_filters(&filters)
        .map_err(|e| format!("Rejected filter bank {}: {e}", config.filters.display()))?;

    let image = load_grayscale_f32(&config.input)?;
    let run = pipeline
        .process(&image)
        .map_err(|e| format!("Failed to process {}: {e}", config.input.display()))?;

    let written = save_response_maps(&run.responses, &config.output.response_dir)?;
    write_json_file(&config.output.report_json, &run.report)?;

    println!(
        "Scored {}x{} image: {} level(s) x {} filter(s) in {:.2} ms",
        image.w,
        image.h,
        run.responses.nscales(),
        run.responses.nfilters(),
        run.report.timings.total_ms
    );
    println!(
        "Saved {} response map(s) to {} and report to {}",
        written.len(),
        config.output.response_dir.display(),
        config.output.report_json.display()
    );

    Ok(())
}

fn usage() -> String {
    "Usage: pyramid_responses <config.json>".to_string()
}
