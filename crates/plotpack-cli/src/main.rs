use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use plotpack_core::{LayoutRequest, Packer, PaddingRequest, UnitType};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "plotpack")]
#[command(about = "Plot Packer - Lay out building blocks inside a site boundary", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out blocks on a plot
    Layout {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for result (JSON)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for the type assignment, overrides the input file
        #[arg(long)]
        seed: Option<u64>,

        /// Padding search step, overrides the input file
        #[arg(long)]
        increment: Option<f64>,
    },

    /// Show the orientation and lattice spacing of a plot
    Padding {
        /// Input file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Write a starter request with the default house types
    Sample {
        /// Output file (YAML or JSON by extension); stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Layout {
            input,
            output,
            seed,
            increment,
        } => {
            layout_command(input, output, seed, increment)?;
        }
        Commands::Padding { input } => {
            padding_command(input)?;
        }
        Commands::Sample { output } => {
            sample_command(output)?;
        }
    }

    Ok(())
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn read_request<T: DeserializeOwned>(input: &Path) -> Result<T> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let request = if is_yaml(input) {
        serde_yaml::from_str(&content)?
    } else {
        serde_json::from_str(&content)?
    };
    Ok(request)
}

fn layout_command(
    input: PathBuf,
    output: Option<PathBuf>,
    seed: Option<u64>,
    increment: Option<f64>,
) -> Result<()> {
    println!("{}", "🔍 Loading input...".bright_blue());

    let mut request: LayoutRequest = read_request(&input)?;
    if seed.is_some() {
        request.seed = seed;
    }
    if let Some(increment) = increment {
        request.search_increment = increment;
    }

    println!(
        "  {} boundary vertices",
        request.boundary.len().to_string().bright_white().bold()
    );
    println!(
        "  {} unit types available",
        request.unit_types.len().to_string().bright_white().bold()
    );
    println!();

    println!("{}", "🚀 Running layout...".bright_blue());

    let packer = Packer::new(request)?;
    let result = packer.pack()?;

    println!();
    println!("{}", "✅ Layout complete!".bright_green().bold());
    println!();

    println!("{}", "📊 Results:".bright_yellow().bold());
    println!(
        "  Paddings: block {:.1}, row {:.1}",
        result.paddings.block, result.paddings.row
    );
    println!("  Blocks placed:");
    let mut per_type: Vec<_> = result.summary.blocks_per_type.iter().collect();
    per_type.sort();
    for (type_id, count) in per_type {
        println!("    • {}: {} blocks", type_id.bright_white(), count);
    }
    println!();
    println!(
        "  Total blocks: {}",
        result.summary.total_blocks.to_string().bright_white().bold()
    );
    println!(
        "  Coverage: {}%",
        format!("{:.1}", result.summary.coverage_percentage).bright_white()
    );
    println!(
        "  Total cost: {}",
        format!("{:.0}", result.summary.total_cost).bright_green()
    );
    println!();

    let json = serde_json::to_string_pretty(&result)?;
    if let Some(output_path) = output {
        std::fs::write(&output_path, json)?;
        println!(
            "💾 Saved result to {}",
            output_path.display().to_string().bright_white()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn padding_command(input: PathBuf) -> Result<()> {
    let request: PaddingRequest = read_request(&input)?;
    let packer = Packer::new(request.into())?;
    let (orientation, paddings) = packer.paddings()?;

    let [start, end] = orientation.longest_edge;
    println!("{}", "📐 Orientation:".bright_yellow().bold());
    println!(
        "  Longest edge: ({:.2}, {:.2}) -> ({:.2}, {:.2})",
        start[0], start[1], end[0], end[1]
    );
    println!("  Angle: {:.2}°", orientation.angle);
    println!(
        "  Dominant direction: {}",
        if orientation.horizontal_has_longest {
            "horizontal"
        } else {
            "vertical"
        }
        .bright_white()
    );
    println!(
        "  Block padding: {}",
        format!("{:.2}", paddings.block).bright_white().bold()
    );
    println!(
        "  Row padding: {}",
        format!("{:.2}", paddings.row).bright_white().bold()
    );

    Ok(())
}

fn sample_request() -> LayoutRequest {
    let unit_types = vec![
        UnitType {
            id: "ht1".to_string(),
            cost: 100000.0,
            width: 25.0,
            length: 30.0,
        },
        UnitType {
            id: "ht2".to_string(),
            cost: 150000.0,
            width: 50.0,
            length: 50.0,
        },
    ];

    LayoutRequest {
        boundary: vec![
            [0.0, 0.0],
            [420.0, 0.0],
            [460.0, 260.0],
            [180.0, 340.0],
            [20.0, 220.0],
        ],
        proportions: HashMap::from([("ht1".to_string(), 2.0), ("ht2".to_string(), 1.0)]),
        unit_types,
        search_increment: 10.0,
        replace_on_conflict: true,
        adjacency: Default::default(),
        assignment: Default::default(),
        seed: None,
        move_to_origin: false,
    }
}

fn sample_command(output: Option<PathBuf>) -> Result<()> {
    let request = sample_request();

    match output {
        Some(path) => {
            let content = if is_yaml(&path) {
                serde_yaml::to_string(&request)?
            } else {
                serde_json::to_string_pretty(&request)?
            };
            std::fs::write(&path, content)?;
            println!(
                "💾 Saved sample request to {}",
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", serde_yaml::to_string(&request)?),
    }

    Ok(())
}
