use chrono::{Local, TimeZone};

use feerates::cache::FValueCache;
use feerates::chain::{BitcoinCli, BitcoinCliChain};
use feerates::config::{parse_config, Config};
use feerates::engine::FQueryEngine;
use feerates::error::FeerateError;
use feerates::oracle::{BitcoinCliOracle, CachingOracle};
use feerates::result::{append_record, QueryRecord};

fn main() {
    env_logger::init();
    let config = parse_config();

    if let Err(err) = run(&config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), FeerateError> {
    let cli = BitcoinCli::new(&config.bitcoin_cli, config.cli_args.clone());
    let chain = BitcoinCliChain::new(cli.clone());
    let oracle = CachingOracle::new(BitcoinCliOracle::new(cli));
    let cache = FValueCache::open(&config.cache)?;

    let mut engine = FQueryEngine::new(chain, oracle).with_cache(cache);
    let feerate = engine.query(config.timestamp, config.blocks, config.fraction)?;

    let when = Local
        .timestamp_opt(config.timestamp as i64, 0)
        .single()
        .map(|time| time.to_rfc3339())
        .unwrap_or_else(|| config.timestamp.to_string());
    println!(
        "F(t={} [{when}], n={}, p={}) = {feerate}",
        config.timestamp, config.blocks, config.fraction
    );

    if let Some(path) = &config.results_csv {
        append_record(
            path,
            &QueryRecord {
                timestamp: config.timestamp,
                blocks: config.blocks,
                fraction: config.fraction,
                feerate,
            },
        )?;
    }

    Ok(())
}
