use clap::Parser;
use geda_layout::geometry::COORD_LIMIT;
use geda_layout::{convert_file, LayoutOptions, LayoutStrategy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "geda-layout", about = "Lay out gEDA symbols and footprints from pin records")]
struct Cli {
    /// Input records file (JSON: one unit, or {"units": [...]})
    input: PathBuf,

    /// Directory to write .sym/.fp files into (stdout if not specified)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print a JSON summary of the converted units instead of their text
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Force a layout for every unit (auto, explicit, dil, grid)
    #[arg(short, long)]
    layout: Option<String>,

    /// Pin pitch in mils for synthesized layouts
    #[arg(long, default_value_t = 200, value_parser = clap::value_parser!(i64).range(1..=COORD_LIMIT))]
    pitch: i64,

    /// DIL body width in mils
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(i64).range(1..=COORD_LIMIT))]
    body_width: i64,
}

fn parse_layout(s: &str) -> Result<LayoutStrategy, String> {
    match s.to_lowercase().as_str() {
        "auto" => Ok(LayoutStrategy::Auto),
        "explicit" => Ok(LayoutStrategy::Explicit),
        "dil" => Ok(LayoutStrategy::Dil),
        "grid" => Ok(LayoutStrategy::Grid),
        _ => Err(format!(
            "Unknown layout: {s}. Use: auto, explicit, dil, grid"
        )),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let layout = match cli.layout.as_deref().map(parse_layout).transpose() {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    let opts = LayoutOptions {
        pin_pitch: cli.pitch,
        dil_body_width: cli.body_width,
        layout,
        ..LayoutOptions::default()
    };

    let converted = match convert_file(&cli.input, &opts) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if cli.json {
        let json = if cli.pretty {
            serde_json::to_string_pretty(&converted)
        } else {
            serde_json::to_string(&converted)
        };
        match json {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    match &cli.output_dir {
        Some(dir) => {
            if let Err(e) = std::fs::create_dir_all(dir) {
                eprintln!("Error creating {}: {e}", dir.display());
                std::process::exit(1);
            }
            for unit in &converted {
                let path = dir.join(&unit.file_name);
                if let Err(e) = std::fs::write(&path, &unit.body) {
                    eprintln!("Error writing {}: {e}", path.display());
                    std::process::exit(1);
                }
                eprintln!("Written to {}", path.display());
            }
        }
        None => {
            for unit in &converted {
                println!("# {}", unit.file_name);
                print!("{}", unit.body);
            }
        }
    }
}
