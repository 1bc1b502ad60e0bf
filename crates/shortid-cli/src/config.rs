use anyhow::bail;
use clap::Parser;

/// Largest buffer the CLI will ask a broker to keep ready.
const MAX_CAPACITY: usize = 1 << 20;

/// Command line configuration for the `shortid` binary.
///
/// Every flag can also be supplied through the environment (or a `.env`
/// file).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "shortid",
    version,
    about = "Print short, unique, Base58 encoded identifiers"
)]
pub struct CliArgs {
    /// Number of identifiers the broker keeps ready ahead of demand.
    ///
    /// Larger buffers absorb bursts; smaller ones keep fewer identifiers in
    /// memory. Zero is treated as one.
    ///
    /// Environment variable: `SHORTID_CAPACITY`
    #[arg(long, env = "SHORTID_CAPACITY", default_value_t = 100)]
    pub capacity: usize,

    /// Instance identifier embedded in every identifier.
    ///
    /// Processes with different instance identifiers never produce the same
    /// identifier. Must not contain the digit `0`. Omit it for the shortest
    /// identifiers.
    ///
    /// Environment variable: `SHORTID_INSTANCE_ID`
    #[arg(long = "instance-id", env = "SHORTID_INSTANCE_ID", value_delimiter = ',')]
    pub instance_ids: Vec<u64>,

    /// How many identifiers to print. `0` prints until interrupted.
    ///
    /// Environment variable: `SHORTID_COUNT`
    #[arg(short = 'n', long, env = "SHORTID_COUNT", default_value_t = 10)]
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub capacity: usize,
    pub instance_ids: Vec<u64>,
    /// `None` runs until interrupted.
    pub count: Option<u64>,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.capacity > MAX_CAPACITY {
            bail!(
                "SHORTID_CAPACITY ({}) exceeds the maximum of {MAX_CAPACITY}",
                args.capacity
            );
        }

        Ok(Self {
            capacity: args.capacity,
            instance_ids: args.instance_ids,
            count: (args.count > 0).then_some(args.count),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliConfig> {
        let args = CliArgs::try_parse_from(core::iter::once("shortid").chain(args.iter().copied()))?;
        CliConfig::try_from(args)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.capacity, 100);
        assert!(config.instance_ids.is_empty());
        assert_eq!(config.count, Some(10));
    }

    #[test]
    fn zero_count_means_unbounded() {
        assert_eq!(parse(&["--count", "0"]).unwrap().count, None);
    }

    #[test]
    fn instance_ids_accept_lists_and_repeats() {
        let config = parse(&["--instance-id", "1,2", "--instance-id", "3"]).unwrap();
        assert_eq!(config.instance_ids, vec![1, 2, 3]);
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        let err = parse(&["--capacity", "2000000"]).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"));
    }
}
