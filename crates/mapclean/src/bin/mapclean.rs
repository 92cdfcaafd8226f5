use argh::FromArgs;
use std::path::PathBuf;

use mapclean::{process_map_file, PipelineConfig};

#[derive(FromArgs)]
/// Remove noise from an occupancy map, fill its small gaps and extract its edges.
struct Args {
    /// path to the input map image
    #[argh(positional)]
    input_path: PathBuf,

    /// directory to save the processed images, defaults to the input directory
    #[argh(option)]
    output_dir: Option<PathBuf>,

    /// enable verbose output
    #[argh(switch)]
    debug: bool,

    /// path to a JSON configuration file
    #[argh(option)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    config.debug |= args.debug;

    let level = if config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = process_map_file(&args.input_path, args.output_dir.as_deref(), &config) {
        log::error!("{e}");
        return Err(e.into());
    }

    Ok(())
}
