//! Command-line flags.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::LogFormat;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "static-proxy")]
#[command(
    about = "Serve multiple directories and reverse-proxy API prefixes from one listener",
    long_about = "Serve multiple directories and reverse-proxy API prefixes from one listener.\n\n\
use case: static-proxy -T dir -p /static -t /opt/static \\\n    \
-T dir -p /static1 -t /opt/assets \\\n    \
-T api -p /api/v1 -t example.host:8888 --header \"token:abc123\""
)]
pub struct Cli {
    /// Route type, 'dir' or 'api' (repeatable, default 'dir')
    #[arg(short = 'T', long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// URL path per route, paired with --type (repeatable, default '/static')
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    /// Local directory ('dir') or host:port ('api') per route (repeatable, default './')
    #[arg(short = 't', long = "target", value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Header injected into 'api' routes in order, 'name:value1;value2' (repeatable)
    #[arg(long = "header", value_name = "SPEC")]
    pub headers: Vec<String>,

    /// Local port to serve [default: 4200]
    #[arg(short = 'P', long)]
    pub port: Option<u16>,

    /// Local host to serve [default: localhost]
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// TOML config file; flags given on the command line take precedence
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds in-flight requests may take to finish after a shutdown signal [default: 5]
    #[arg(long, value_name = "SECS")]
    pub drain_timeout: Option<u64>,

    /// Expose Prometheus metrics on this address
    #[arg(long, value_name = "ADDR")]
    pub metrics_address: Option<String>,

    /// Log output format [default: pretty]
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// True when any route flag was given, in which case the CLI route
    /// arrays replace the configured ones as a whole.
    pub fn has_routes(&self) -> bool {
        !(self.types.is_empty()
            && self.paths.is_empty()
            && self.targets.is_empty()
            && self.headers.is_empty())
    }
}
