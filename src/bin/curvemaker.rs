use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use curvemaker::{ChartRequest, CurveFamily};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "curvemaker",
    version,
    about = "Render declarative chart requests to PNG files or data URIs"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a JSON chart request.
    Render(RenderArgs),
    /// List the supported curve families.
    Families,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Path to a JSON chart request ({"curve_type": ..., "data": ...}).
    #[arg(short, long)]
    request: PathBuf,
    /// Write the rendered chart to this PNG file.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print the data:image/png;base64 URI to stdout.
    #[arg(long, default_value_t = false)]
    data_uri: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Families => {
            for family in CurveFamily::ALL {
                println!("{family}");
            }
            Ok(())
        }
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let body = fs::read_to_string(&args.request)
        .with_context(|| format!("read request file {}", args.request.display()))?;
    let req: ChartRequest = serde_json::from_str(&body)
        .with_context(|| format!("parse request file {}", args.request.display()))?;

    if args.out.is_none() && !args.data_uri {
        anyhow::bail!("nothing to do: pass --out <file.png> and/or --data-uri");
    }

    if let Some(path) = args.out.as_ref() {
        let png = curvemaker::generate_chart_png(&req)?;
        fs::write(path, &png).with_context(|| format!("write {}", path.display()))?;
        eprintln!("Wrote chart to {}", path.display());
    }
    if args.data_uri {
        println!("{}", curvemaker::generate_chart(&req)?);
    }
    Ok(())
}
