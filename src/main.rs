//! Pixelgraph CLI - Visual Image-Processing Pipeline Core
//!
//! This is a demonstration CLI for the pixelgraph library. It loads graphs
//! from JSON files in the wire format, validates them, and submits them to a
//! running processing service.

use anyhow::{bail, Context, Result};
use pixelgraph::prelude::*;
use std::fs;

fn main() {
    env_logger::init();

    println!("🧩 Pixelgraph - Pipeline Editor Core v{}", pixelgraph::VERSION);
    println!();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    let result = match args[1].as_str() {
        "kernels" => {
            show_kernels(&args[2..]);
            Ok(())
        }
        "validate" => {
            if args.len() < 3 {
                eprintln!("Error: Please specify a graph file");
                return;
            }
            validate_file(&args[2])
        }
        "process" => {
            if args.len() < 3 {
                eprintln!("Error: Please specify a graph file");
                eprintln!("Usage: {} process <graph.json> [--server <url>]", args[0]);
                return;
            }
            process_file(&args[2], &args[3..])
        }
        "upload" => {
            if args.len() < 3 {
                eprintln!("Error: Please specify a raw file");
                eprintln!(
                    "Usage: {} upload <file.raw> [--width <w>] [--height <h>] [--server <url>]",
                    args[0]
                );
                return;
            }
            upload_file(&args[2], &args[3..])
        }
        "health" => check_health(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}

fn print_usage(program: &str) {
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  kernels [size]          Print the preset kernels (default size 3)");
    println!("  validate <graph.json>   Check a graph's raw inputs without submitting");
    println!("  process <graph.json>    Submit a graph and print the reconciled results");
    println!("  upload <file.raw>       Upload a raw buffer, print the settled dimensions");
    println!("  health                  Probe the processing service");
    println!("  help                    Show this help message");
    println!();
    println!("Common options:");
    println!("  --server <url>          Processing service ({})", DEFAULT_BASE_URL);
    println!("  --width <w>             Width hint for upload (default 512)");
    println!("  --height <h>            Height hint for upload (default 512)");
}

fn parse_server(args: &[String]) -> String {
    parse_flag(args, "--server").unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn show_kernels(args: &[String]) {
    let size: usize = args
        .first()
        .and_then(|s| s.parse().ok())
        .filter(|s| *s >= 3 && s % 2 == 1)
        .unwrap_or(3);

    for preset in Preset::ALL {
        let kernel = preset.kernel(size);
        println!("📐 {} ({kernel})", preset.tag());
        for row in &kernel.matrix {
            let cells: Vec<String> = row.iter().map(|w| format!("{w:>5}")).collect();
            println!("   [{}]", cells.join(" "));
        }
        println!();
    }
}

fn load_graph(path: &str) -> Result<Graph> {
    let json = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let graph = WireGraph::from_json(&json)
        .with_context(|| format!("parsing {path}"))?
        .into_graph()
        .context("rebuilding graph")?;
    Ok(graph)
}

fn validate_file(path: &str) -> Result<()> {
    let graph = load_graph(path)?;
    println!(
        "🔍 Validating {} node(s), {} edge(s)...",
        graph.node_count(),
        graph.edge_count()
    );

    let report = validate_inputs(&graph);
    if report.can_submit() {
        println!("✅ {report}");
    } else {
        eprintln!("❌ {report}");
        for line in report.detailed_errors() {
            eprintln!("   {line}");
        }
        bail!("graph is not submittable");
    }
    Ok(())
}

fn process_file(path: &str, args: &[String]) -> Result<()> {
    let graph = load_graph(path)?;
    let client = ProcessingClient::with_base_url(parse_server(args));

    println!("⚙️  Submitting to {}...", client.base_url());
    let response = client.submit(&graph)?;
    let updated = reconcile(&graph, &response);

    println!("✅ {} result entr(ies)", response.results.len());
    for node in updated.nodes() {
        match node.payload() {
            NodePayload::Display(p) => {
                if let Some(image) = &p.image_data {
                    let (w, h) = display_size(image);
                    println!("   🖼  {}: {image} (shown at {w}x{h})", node.id);
                }
            }
            NodePayload::Histogram(p) => {
                if let Some(histogram) = &p.histogram {
                    println!(
                        "   📊 {}: {} sample(s), peak count {}",
                        node.id,
                        histogram.total(),
                        histogram.max_count()
                    );
                }
            }
            NodePayload::Save(p) => {
                if let Some(image) = &p.image_data {
                    image
                        .write_raw(&p.filename)
                        .with_context(|| format!("writing {}", p.filename))?;
                    println!("   💾 {}: saved {image} to {}", node.id, p.filename);
                }
            }
            NodePayload::Difference(p) => {
                if let Some(image) = &p.result {
                    println!("   🔀 {}: difference {image}", node.id);
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn upload_file(path: &str, args: &[String]) -> Result<()> {
    let width: u32 = parse_flag(args, "--width")
        .and_then(|s| s.parse().ok())
        .unwrap_or(512);
    let height: u32 = parse_flag(args, "--height")
        .and_then(|s| s.parse().ok())
        .unwrap_or(512);

    let bytes = fs::read(path).with_context(|| format!("reading {path}"))?;
    let client = ProcessingClient::with_base_url(parse_server(args));

    println!("⬆️  Uploading {} byte(s) with hint {width}x{height}...", bytes.len());
    let uploaded = client.upload_raw(&bytes, width, height)?;
    println!(
        "✅ Service settled on {}x{} ({} pixel(s))",
        uploaded.width,
        uploaded.height,
        uploaded.data.len()
    );
    Ok(())
}

fn check_health(args: &[String]) -> Result<()> {
    let client = ProcessingClient::with_base_url(parse_server(args));
    let status = client.health()?;
    if status.is_ok() {
        println!("💚 {} is up ({})", client.base_url(), status.status);
    } else {
        println!("🟡 {} answered with status '{}'", client.base_url(), status.status);
    }
    Ok(())
}
