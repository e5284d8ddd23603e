use clap::{Parser, Subcommand};
use hf_core::HfResult;
use hf_network::{
    CapacityViolation, FlowReport, Network, OutFlow, SimulationOptions, Tolerances,
};

mod demos;

use demos::Demo;

#[derive(Parser)]
#[command(name = "hf-cli")]
#[command(about = "HydroFlow CLI - Hydraulic network flow simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the layout of a demo network, then simulate it
    Demo {
        /// Which demo network to build
        #[arg(value_enum)]
        demo: Demo,
        /// Report elements above their capacity limit
        #[arg(long)]
        check_capacity: bool,
        /// Print reports as JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
    /// Remove an element from a demo network and show the layout before and after
    Delete {
        #[arg(value_enum)]
        demo: Demo,
        /// Name of the element to splice out
        name: String,
    },
}

fn main() -> HfResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            demo,
            check_capacity,
            json,
        } => cmd_demo(demo, check_capacity, json),
        Commands::Delete { demo, name } => cmd_delete(demo, &name),
    }
}

fn cmd_demo(demo: Demo, check_capacity: bool, json: bool) -> HfResult<()> {
    let mut net = demo.build()?;
    println!("{}\n", net.layout());

    for defect in net.proportion_defects(Tolerances::default()) {
        println!(
            "note: proportions of '{}' sum to {} (not 1.0)",
            defect.name, defect.sum
        );
    }

    let options = SimulationOptions { check_capacity };
    let summary = net.run(
        options,
        &mut |r: &FlowReport| print_flow(r, json),
        &mut |v: &CapacityViolation| print_violation(v, json),
    );

    if !json {
        println!(
            "\n{} element(s) reported, {} undefined, {} capacity violation(s)",
            summary.reported, summary.undefined, summary.violations
        );
    }
    Ok(())
}

fn cmd_delete(demo: Demo, name: &str) -> HfResult<()> {
    let mut net: Network = demo.build()?;
    println!("Before:\n{}\n", net.layout());
    net.delete_node(name)?;
    println!("After:\n{}", net.layout());
    Ok(())
}

fn print_flow(report: &FlowReport, json: bool) {
    if json {
        match serde_json::to_string(report) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!("failed to encode flow report: {e}"),
        }
        return;
    }
    let out = match &report.out_flow {
        OutFlow::None => String::from("-"),
        OutFlow::Single(f) => f.to_string(),
        OutFlow::Multiple(flows) => {
            let parts: Vec<String> = flows.iter().map(ToString::to_string).collect();
            format!("[{}]", parts.join(", "))
        }
    };
    println!(
        "{:<10} {:<12} in={:<12} out={}",
        report.kind.as_str(),
        report.name,
        report.in_flow.to_string(),
        out
    );
}

fn print_violation(violation: &CapacityViolation, json: bool) {
    if json {
        match serde_json::to_string(violation) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!("failed to encode violation: {e}"),
        }
        return;
    }
    println!(
        "!! {} '{}' inflow {} exceeds max {}",
        violation.kind, violation.name, violation.in_flow, violation.max_flow
    );
}
