use std::fs;
use std::process;

use clap::Parser;

use lbrn_tools::svg::SvgOptions;
use lbrn_tools::{parse_project, project_to_svg, write_project};

/// Convert LightBurn LBRN2 project files to SVG previews, or normalize
/// them by re-emitting the LBRN2 format.
#[derive(Parser)]
#[command(name = "lbrn-tools", version)]
struct Cli {
    /// Input .lbrn2 file
    input: String,

    /// Output file (.svg, or .lbrn2 with --to-lbrn)
    output: String,

    /// Re-emit LBRN2 instead of rendering SVG
    #[arg(long)]
    to_lbrn: bool,

    /// View margin in mm
    #[arg(long, default_value_t = 10.0)]
    margin: f64,

    /// Override the output width
    #[arg(long)]
    width: Option<f64>,

    /// Override the output height
    #[arg(long)]
    height: Option<f64>,

    /// Stroke width in mm for outlines and hatch lines
    #[arg(long, default_value_t = 0.1)]
    stroke_width: f64,
}

fn main() {
    let cli = Cli::parse();

    let content = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading input file '{}': {}", cli.input, e);
            process::exit(2);
        }
    };

    let mut warnings = Vec::new();
    let project = match parse_project(&content, &mut warnings) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error parsing LBRN2 file: {}", e);
            process::exit(3);
        }
    };
    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    let output = if cli.to_lbrn {
        write_project(&project)
    } else {
        let options = SvgOptions {
            margin: cli.margin,
            width: cli.width,
            height: cli.height,
            stroke_width: cli.stroke_width,
        };
        project_to_svg(&project, &options)
    };

    match fs::write(&cli.output, &output) {
        Ok(_) => {
            println!("Successfully converted '{}' to '{}'", cli.input, cli.output);
        }
        Err(e) => {
            eprintln!("Error writing output file '{}': {}", cli.output, e);
            process::exit(4);
        }
    }
}
