use std::fs;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::info;
use shapeshift_core::path::Segment;
use shapeshift_core::{PathData, PathKeyframeSet, Scene};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the commands of a path, one per line
    Parse { path: String },
    /// Print the absolute segments of a path
    Flatten { path: String },
    /// Print positions along a path
    Sample {
        path: String,
        #[clap(short, long, num_args = 1.., default_values_t = [0.0, 0.25, 0.5, 0.75, 1.0])]
        fraction: Vec<f32>,
    },
    /// Print the morph between two compatible paths
    Morph {
        from: String,
        to: String,
        #[clap(short, long, default_value_t = 0.5)]
        fraction: f32,
    },
    /// Print every property of a JSON scene at the given play times
    Eval {
        scene: String,
        #[clap(short, long, num_args = 1.., required = true)]
        time: Vec<i64>,
    },
}

fn print_segment(segment: &Segment) {
    match segment {
        Segment::MoveTo(p) => println!("M {} {}", p.x, p.y),
        Segment::LineTo(p) => println!("L {} {}", p.x, p.y),
        Segment::CubicTo { ctrl1, ctrl2, to } => println!(
            "C {} {} {} {} {} {}",
            ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y
        ),
        Segment::Close => println!("Z"),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    match args.command {
        Command::Parse { path } => {
            let path = PathData::parse(&path)?;
            for command in path.commands() {
                println!("{}", command);
            }
        }
        Command::Flatten { path } => {
            let path = PathData::parse(&path)?;
            path.flatten().iter().for_each(print_segment);
        }
        Command::Sample { path, fraction } => {
            let mut motion = PathKeyframeSet::new(&PathData::parse(&path)?)?;
            info!("sampled path into {} points", motion.samples().len());
            for f in fraction {
                let p = motion.position(f);
                println!("{}\t{}\t{}", f, p.x, p.y);
            }
        }
        Command::Morph { from, to, fraction } => {
            let from = PathData::parse(&from)?;
            let to = PathData::parse(&to)?;
            let mut out = from.clone();
            out.interpolate(&from, &to, fraction)?;
            println!("{}", out);
        }
        Command::Eval { scene, time } => {
            let f = fs::File::open(&scene).with_context(|| format!("opening {}", scene))?;
            let mut scene = Scene::from_reader(f)?;
            info!(
                "scene has {} properties, total duration {}",
                scene.properties.len(),
                scene.timeline.total_duration()
            );
            for t in time {
                scene.timeline.tick(t);
                for (name, value) in scene.values()? {
                    println!("{}\t{}\t{}", t, name, value);
                }
            }
        }
    }
    Ok(())
}
