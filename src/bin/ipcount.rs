use anyhow::{Context, Result};
use clap::Parser;
use probably::cardinality::hll::{MAX_PRECISION, MIN_PRECISION};
use probably::ips::{count_unique_approx, count_unique_exact, load_ips};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ipcount")]
#[command(about = "Compare exact and HyperLogLog unique address counts of an access log")]
struct Args {
    /// Access log to scan.
    log: PathBuf,

    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u8)
            .range(i64::from(MIN_PRECISION)..=i64::from(MAX_PRECISION))
    )]
    precision: u8,
}

struct Comparison {
    exact: usize,
    approx: f64,
    exact_secs: f64,
    approx_secs: f64,
}

fn render_table(comparison: &Comparison) -> String {
    [
        String::new(),
        "Comparison:".to_owned(),
        format!("{:<30} {:<20} {:<20}", "Method", "Exact", "HyperLogLog"),
        "-".repeat(70),
        format!(
            "{:<30} {:<20} {:<20.1}",
            "Unique addresses", comparison.exact, comparison.approx
        ),
        format!(
            "{:<30} {:<20.4} {:<20.4}",
            "Elapsed (s)", comparison.exact_secs, comparison.approx_secs
        ),
    ]
    .join("\n")
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let start = Instant::now();
    let file =
        File::open(&args.log).with_context(|| format!("opening {}", args.log.display()))?;
    let ips = load_ips(BufReader::new(file)).context("reading log")?;
    tracing::info!(addresses = ips.len(), elapsed = ?start.elapsed(), "loaded log");

    let start = Instant::now();
    let exact = count_unique_exact(&ips);
    let exact_secs = start.elapsed().as_secs_f64();

    let start = Instant::now();
    let approx = count_unique_approx(&ips, args.precision).context("building estimator")?;
    let approx_secs = start.elapsed().as_secs_f64();

    println!(
        "{}",
        render_table(&Comparison {
            exact,
            approx,
            exact_secs,
            approx_secs,
        })
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_default() {
        let args = Args::try_parse_from(["ipcount", "access.log"]).unwrap();

        assert_eq!(args.precision, 10);
        assert_eq!(args.log, PathBuf::from("access.log"));
    }

    #[test]
    fn test_precision_out_of_range() {
        assert!(Args::try_parse_from(["ipcount", "access.log", "--precision", "3"]).is_err());
        assert!(Args::try_parse_from(["ipcount", "access.log", "--precision", "17"]).is_err());
        assert!(Args::try_parse_from(["ipcount", "access.log", "--precision", "16"]).is_ok());
    }

    #[test]
    fn test_render_table() {
        let table = render_table(&Comparison {
            exact: 1000,
            approx: 1012.345,
            exact_secs: 0.00126,
            approx_secs: 0.5,
        });
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Comparison:");
        assert_eq!(lines[3], "-".repeat(70));
        assert_eq!(
            lines[4],
            format!("{:<30} {:<20} {:<20}", "Unique addresses", "1000", "1012.3")
        );
        assert_eq!(
            lines[5],
            format!("{:<30} {:<20} {:<20}", "Elapsed (s)", "0.0013", "0.5000")
        );
    }
}
