use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use cellspace_common::Vector;
use cellspace_forces::VortexForce;
use cellspace_kernel::{Simulation, SimulationConfig};
use cellspace_modifiers::CentroidPulseModifier;
use cellspace_persist::Checkpoint;
use cellspace_population::{Domain, Population, VertexPopulation};

#[derive(Parser)]
#[command(name = "cellspace-cli", about = "CLI tool for cellspace simulations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a vortex simulation on a ring of nodes
    Run {
        /// End time in simulation time units
        #[arg(short, long, default_value = "20.0")]
        end_time: f64,
        /// Number of nodes on the ring
        #[arg(short, long, default_value = "8")]
        nodes: usize,
        /// Vortex strength multiplier
        #[arg(short, long, default_value = "0.15")]
        strength: f64,
        /// Optional YAML file with timestep parameters
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Demonstrate checkpoint save, load and bit-identical resumption
    Checkpoint {
        /// Path the checkpoint is written to
        #[arg(short, long, default_value = "run.checkpoint.cbor")]
        path: PathBuf,
        /// Time at which the checkpoint is taken
        #[arg(short, long, default_value = "10.0")]
        at: f64,
        /// End time both runs continue to
        #[arg(short, long, default_value = "30.0")]
        end_time: f64,
    },
}

/// Nodes evenly spaced on a unit ring around the origin.
fn ring_population(nodes: usize) -> VertexPopulation<2> {
    let positions = (0..nodes).map(|i| {
        let angle = 2.0 * std::f64::consts::PI * i as f64 / nodes as f64;
        Vector::<2>::new(angle.cos(), angle.sin())
    });
    VertexPopulation::from_positions(positions, Domain::Unbounded)
}

fn build_simulation(nodes: usize, strength: f64, config: SimulationConfig) -> Simulation<2> {
    let mut sim = Simulation::new(Box::new(ring_population(nodes)), config);
    sim.add_force(Box::new(VortexForce::with_strength(strength)));
    sim.add_modifier(Box::new(CentroidPulseModifier::default()));
    sim
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Run {
            end_time,
            nodes,
            strength,
            config,
        } => {
            let config = match config {
                Some(path) => SimulationConfig::from_yaml(&std::fs::read_to_string(path)?)?,
                None => SimulationConfig::default(),
            };
            println!("Vortex run: nodes={nodes}, strength={strength}, dt={}", config.dt);

            let mut sim = build_simulation(nodes, strength, config);
            println!(
                "Parameters: {}",
                serde_json::to_string(&sim.report_parameters())?
            );

            sim.run_to(end_time)?;

            let vertex = sim.population().as_vertex().expect("vertex population");
            let centroid = vertex.centroid();
            println!(
                "t={}: centroid=({:.6}, {:.6}), state_hash={:#x}",
                sim.now(),
                centroid[0],
                centroid[1],
                vertex.state_hash()
            );
            for node in vertex.mesh().nodes() {
                println!(
                    "  node {}: ({:.6}, {:.6})",
                    node.index(),
                    node.position()[0],
                    node.position()[1]
                );
            }
        }
        Commands::Checkpoint { path, at, end_time } => {
            println!("Checkpoint demo: capture at t={at}, continue to t={end_time}");

            let config = SimulationConfig {
                dt: 0.1,
                damping: 1.0,
            };
            let mut sim = build_simulation(8, 0.15, config);
            sim.run_to(at)?;

            let checkpoint = Checkpoint::capture(&sim)?;
            checkpoint.save(&path)?;
            println!(
                "Saved {} (hash={:#x}, valid={})",
                path.display(),
                checkpoint.hash,
                checkpoint.verify()
            );

            // Continue the original run, then resume the saved one.
            sim.run_to(end_time)?;
            let mut resumed = Checkpoint::<2>::load(&path)?.restore();
            resumed.run_to(end_time)?;

            let original = sim.population().as_vertex().expect("vertex population");
            let restored = resumed.population().as_vertex().expect("vertex population");
            println!(
                "Original: t={}, state_hash={:#x}",
                sim.now(),
                original.state_hash()
            );
            println!(
                "Resumed:  t={}, state_hash={:#x}",
                resumed.now(),
                restored.state_hash()
            );
            println!(
                "Match: {}",
                if original.state_hash() == restored.state_hash() {
                    "OK"
                } else {
                    "MISMATCH"
                }
            );
        }
    }

    Ok(())
}
