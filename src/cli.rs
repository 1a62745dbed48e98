//! Command-line flags for the number-station binary

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use number_station::{HubConfig, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "number-station")]
#[command(version, about = "Broadcast a random byte to every WebSocket subscriber", long_about = None)]
pub struct Cli {
    /// HTTP listen address (`:port` binds all interfaces)
    #[arg(long, default_value = ":8080", value_parser = parse_listen)]
    pub listen: SocketAddr,

    /// Broadcast interval (e.g. 500ms, 1s, 2m)
    #[arg(long, default_value = "1s", value_parser = parse_duration)]
    pub interval: Duration,

    /// Disconnect clients that send nothing for this long (0 = never)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Maximum concurrent broadcast writes (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub fanout_limit: usize,

    /// Drop a subscriber whose write holds a fanout slot this long
    #[arg(long, default_value = "5s", value_parser = parse_duration)]
    pub write_timeout: Duration,

    /// Seed for the value generator, for reproducible sequences
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn into_config(self) -> ServerConfig {
        let mut hub = HubConfig::default()
            .interval(self.interval)
            .fanout_limit(self.fanout_limit)
            .write_timeout(self.write_timeout);
        if let Some(seed) = self.seed {
            hub = hub.seed(seed);
        }

        let config = ServerConfig::with_addr(self.listen).hub(hub);
        match self.timeout {
            Some(timeout) => config.idle_timeout(timeout),
            None => config,
        }
    }
}

/// Parse `host:port` or `:port`
fn parse_listen(s: &str) -> Result<SocketAddr, String> {
    if let Some(port) = s.strip_prefix(':') {
        let port: u16 = port.parse().map_err(|e| format!("invalid port {port:?}: {e}"))?;
        return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
    }
    s.parse()
        .map_err(|e| format!("invalid listen address {s:?}: {e}"))
}

/// Parse `<n>ms`, `<n>s`, `<n>m` or `<n>h`. A bare number is seconds.
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let split = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);

    let n: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration {s:?}"))?;

    let secs = |scale: u64| {
        n.checked_mul(scale)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration {s:?} is too large"))
    };

    match unit {
        "ms" => Ok(Duration::from_millis(n)),
        "" | "s" => Ok(Duration::from_secs(n)),
        "m" => secs(60),
        "h" => secs(3600),
        other => Err(format!("unknown duration unit {other:?} in {s:?}")),
    }
}
