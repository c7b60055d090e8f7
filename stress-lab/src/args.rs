use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Stress Lab API server
#[derive(Debug, Parser)]
#[command(name = "stress-lab", about = "HTTP API that triggers synthetic resource-stress simulations")]
pub struct Args {
    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long, env = "STRESS_LAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "STRESS_LAB_LISTEN")]
    pub listen: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arguments_are_optional() {
        let args = Args::try_parse_from(["stress-lab"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.listen.is_none());
    }

    #[test]
    fn listen_override_parses() {
        let args = Args::try_parse_from(["stress-lab", "--listen", "127.0.0.1:9000", "-c", "lab.toml"]).unwrap();
        assert_eq!(args.listen, Some(SocketAddr::from(([127, 0, 0, 1], 9000))));
        assert_eq!(args.config, Some(PathBuf::from("lab.toml")));
    }
}
