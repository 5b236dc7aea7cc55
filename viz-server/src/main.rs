//! K-Means visualization backend
//! Serves the step-wise clustering protocol over TCP or stdio, or runs a single
//! clustering over a JSON point file and prints the result.

use std::{path::{Path, PathBuf}, sync::Arc};

use clap::{Parser, Subcommand};
use kmeans::{InitMethod, driver::{DEFAULT_MAX_ITERATION, DEFAULT_N_INIT}};
use kmeans_viz::{
    Handlers, Response, VizContext, VizResult,
    metrics::cluster_summaries,
    plot::to_svg,
    transport::{serve_stdio, serve_tcp},
};
use loading::load_points;
use tokio::net::TcpListener;
use tracing::{Level, info};

mod loading;

/// Command-line arguments for the visualization backend
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Iteration cap for a full run
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ITERATION)]
    pub max_iter: usize,
    /// Independent starts per full run, the lowest inertia wins
    #[arg(long, global = true, default_value_t = DEFAULT_N_INIT)]
    pub n_init: usize,
    /// Fixed seed for every request that does not carry its own
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    /// trace, debug, info, warn or error
    #[arg(long, global = true, default_value_t = Level::INFO)]
    pub log_level: Level,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer JSON-lines requests on a TCP socket
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        listen: String,
    },
    /// Answer JSON-lines requests on stdin/stdout
    Stdio,
    /// Cluster a JSON file of points once and print the result
    Run {
        /// Path to a JSON array of points
        #[arg(long)]
        data: PathBuf,
        #[arg(long)]
        n_clusters: usize,
        /// random, farthest, kmeans++ or manual
        #[arg(long, default_value = "random")]
        init_method: String,
        /// Starting centroids for the manual method
        #[arg(long)]
        centroids: Option<PathBuf>,
        /// Write an SVG scatter of the result here
        #[arg(long)]
        svg: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> VizResult<()> {
    let args: Args = Args::parse();

    // Logs go to stderr, stdout carries protocol answers
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let context = VizContext {
        max_iteration: args.max_iter,
        n_init: args.n_init,
        seed: args.seed,
        ..VizContext::default()
    };
    info!(max_iteration = context.max_iteration, n_init = context.n_init, "K-Means backend starting");

    match args.command {
        Command::Serve { listen } => {
            let listener = TcpListener::bind(&listen).await?;
            serve_tcp(listener, Arc::new(Handlers::new(context))).await
        }
        Command::Stdio => serve_stdio(&Handlers::new(context)).await,
        Command::Run { data, n_clusters, init_method, centroids, svg } => {
            run_once(&context, &data, n_clusters, &init_method, centroids.as_deref(), svg.as_deref()).await
        }
    }
}

async fn run_once(
    context: &VizContext,
    data: &Path,
    n_clusters: usize,
    init_method: &str,
    centroids: Option<&Path>,
    svg: Option<&Path>,
) -> VizResult<()> {
    let points = load_points(data).await?;
    let manual = match centroids {
        Some(path) => Some(load_points(path).await?),
        None => None,
    };
    let method = InitMethod::from_name(init_method);

    let mut driver = context.driver(None);
    let result = driver.run_to_convergence(&points, n_clusters, method, manual.as_deref())?;
    info!(n_iter = result.n_iter, inertia = result.inertia, converged = result.converged, "clustering done");

    if let Some(path) = svg {
        to_svg(&points, &result.centroids, &result.labels, path)?;
        info!(path = %path.display(), "plot written");
    }

    let clusters = cluster_summaries(&points, &result.centroids, &result.labels);
    let response = Response::Run {
        centers: result.centroids,
        labels: result.labels,
        inertia: result.inertia,
        n_iter: result.n_iter,
        converged: result.converged,
        clusters,
    };
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

// Example command line usage:
// cargo run --release -p viz-server -- run --data points.json --n-clusters 3 --init-method kmeans++ --svg out.svg
// cargo run --release -p viz-server -- serve --listen 127.0.0.1:3000

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_global_flags() {
        let args = Args::try_parse_from([
            "kmeans-viz-server", "run", "--data", "p.json", "--n-clusters", "3",
            "--init-method", "kmeans++", "--seed", "9", "--log-level", "debug",
        ]).unwrap();
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.log_level, Level::DEBUG);
        assert_eq!(args.max_iter, DEFAULT_MAX_ITERATION);
        match args.command {
            Command::Run { n_clusters, init_method, svg, .. } => {
                assert_eq!(n_clusters, 3);
                assert_eq!(init_method, "kmeans++");
                assert!(svg.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn serve_defaults_to_local_port() {
        let args = Args::try_parse_from(["kmeans-viz-server", "serve"]).unwrap();
        assert!(matches!(args.command, Command::Serve { ref listen } if listen == "127.0.0.1:3000"));
        assert_eq!(args.n_init, DEFAULT_N_INIT);
    }
}
