//! chainscan CLI — query an Etherscan-compatible API from the terminal.
//!
//! Usage:
//! ```bash
//! # Ether balance of one or more addresses
//! ETHERSCAN_API_KEY=... chainscan balance 0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae
//!
//! # ERC-20 transfers, newest first
//! chainscan transfers 0xde0b... --sort desc --page 1 --offset 20
//!
//! # Any module/action, raw result
//! chainscan call --module stats --action ethsupply
//! ```

use std::env;
use std::process;

use chainscan_client::{
    CancellationToken, ClientConfig, Erc20Transfer, Erc721Transfer, Etherscan, SortOrder,
    TransferKind, TransferQuery,
};
use chainscan_core::QueryParams;
use tracing_subscriber::EnvFilter;

/// Flags that take a value; their values are not positional arguments.
const VALUE_FLAGS: &[&str] = &[
    "--module",
    "--action",
    "--contract",
    "--start-block",
    "--end-block",
    "--sort",
    "--page",
    "--offset",
];

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupted, cancelling");
                cancel.cancel();
            }
        });
    }

    let rest = &args[2..];
    let result = match args[1].as_str() {
        "balance" => with_client(rest, |c| cmd_balance(c, rest, &cancel)).await,
        "supply" => with_client(rest, |c| cmd_supply(c, &cancel)).await,
        "price" => with_client(rest, |c| cmd_price(c, &cancel)).await,
        "transfers" => with_client(rest, |c| cmd_transfers(c, rest, &cancel)).await,
        "call" => with_client(rest, |c| cmd_call(c, rest, &cancel)).await,
        "version" | "--version" | "-V" => {
            println!("chainscan {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("chainscan {}", env!("CARGO_PKG_VERSION"));
    println!("Query an Etherscan-compatible block explorer API\n");
    println!("USAGE:");
    println!("    chainscan <COMMAND> [FLAGS]\n");
    println!("COMMANDS:");
    println!("    balance <ADDRESS>...   Ether balance in wei (up to 20 addresses)");
    println!("    supply                 Total ether supply in wei");
    println!("    price                  Latest ETH price in BTC and USD");
    println!("    transfers <ADDRESS>    Token transfer events");
    println!("    call                   Raw module/action call, prints the result as JSON");
    println!("    version                Print version");
    println!("    help                   Print this help\n");
    println!("FLAGS:");
    println!("    --no-pacing            Do not serialize and space requests");
    println!("    --nft                  transfers: list ERC-721 instead of ERC-20");
    println!("    --contract <ADDRESS>   transfers: only this token contract");
    println!("    --start-block <N>      transfers: first block");
    println!("    --end-block <N>        transfers: last block");
    println!("    --sort <asc|desc>      transfers: ordering");
    println!("    --page <N>             transfers: page number (with --offset)");
    println!("    --offset <N>           transfers: page size (with --page)");
    println!("    --module <NAME>        call: API module");
    println!("    --action <NAME>        call: API action; extra key=value pairs are passed through\n");
    println!("ENVIRONMENT:");
    println!("    ETHERSCAN_API_KEY, ETHERSCAN_BASE_URL, ETHERSCAN_TIMEOUT_SECS, ETHERSCAN_PACING");
    println!("    RUST_LOG (default: warn)");
}

async fn with_client<F, Fut>(args: &[String], run: F) -> Result<(), String>
where
    F: FnOnce(Etherscan) -> Fut,
    Fut: std::future::Future<Output = Result<(), String>>,
{
    let mut config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    if has_flag(args, "--no-pacing") {
        config = config.with_pacing(false);
    }
    let client = Etherscan::new(config).map_err(|e| e.to_string())?;
    run(client).await
}

async fn cmd_balance(client: Etherscan, args: &[String], cancel: &CancellationToken) -> Result<(), String> {
    let addresses = positionals(args);
    match addresses.as_slice() {
        [] => Err("at least one address is required".into()),
        [address] => {
            let wei = client
                .account()
                .balance(address, cancel)
                .await
                .map_err(|e| e.to_string())?;
            println!("{address}  {wei}");
            Ok(())
        }
        many => {
            let balances = client
                .account()
                .balances(many, cancel)
                .await
                .map_err(|e| e.to_string())?;
            for entry in balances {
                println!("{}  {}", entry.account, entry.balance);
            }
            Ok(())
        }
    }
}

async fn cmd_supply(client: Etherscan, cancel: &CancellationToken) -> Result<(), String> {
    let supply = client
        .stats()
        .total_supply(cancel)
        .await
        .map_err(|e| e.to_string())?;
    println!("{supply}");
    Ok(())
}

async fn cmd_price(client: Etherscan, cancel: &CancellationToken) -> Result<(), String> {
    let price = client.stats().price(cancel).await.map_err(|e| e.to_string())?;
    println!("  BTC: {} ({})", price.btc, price.btc_timestamp);
    println!("  USD: {:.2} ({})", price.usd, price.usd_timestamp);
    Ok(())
}

async fn cmd_transfers(client: Etherscan, args: &[String], cancel: &CancellationToken) -> Result<(), String> {
    let address = positionals(args)
        .first()
        .map(|s| s.to_string())
        .ok_or("an address is required")?;
    let query = transfer_query(args)?;

    if has_flag(args, "--nft") {
        let events = fetch_transfers::<Erc721Transfer>(&client, &address, &query, cancel).await?;
        for e in &events {
            print_transfer(e, &format!("#{}", e.token_id));
        }
        println!("{} transfer(s)", events.len());
    } else {
        let events = fetch_transfers::<Erc20Transfer>(&client, &address, &query, cancel).await?;
        for e in &events {
            print_transfer(e, &e.value.to_string());
        }
        println!("{} transfer(s)", events.len());
    }
    Ok(())
}

async fn fetch_transfers<E: TransferKind>(
    client: &Etherscan,
    address: &str,
    query: &TransferQuery,
    cancel: &CancellationToken,
) -> Result<Vec<E>, String> {
    client
        .account()
        .token_transfers::<E>(address, query, cancel)
        .await
        .map_err(|e| e.to_string())
}

fn print_transfer<E: TransferKind>(event: &E, amount: &str) {
    let t = event.transfer();
    println!(
        "{}  block {}  {} -> {}  {} {}",
        t.time_stamp.format("%Y-%m-%d %H:%M:%S"),
        t.block_number,
        t.from,
        t.to,
        amount,
        t.token_symbol,
    );
}

fn transfer_query(args: &[String]) -> Result<TransferQuery, String> {
    let mut query = TransferQuery {
        contract_address: parse_flag(args, "--contract"),
        start_block: parse_number(args, "--start-block")?,
        end_block: parse_number(args, "--end-block")?,
        page: parse_number(args, "--page")?,
        offset: parse_number(args, "--offset")?,
        ..Default::default()
    };
    if let Some(sort) = parse_flag(args, "--sort") {
        query.sort = Some(sort.parse::<SortOrder>()?);
    }
    Ok(query)
}

async fn cmd_call(client: Etherscan, args: &[String], cancel: &CancellationToken) -> Result<(), String> {
    let module = parse_flag(args, "--module").ok_or("--module is required")?;
    let action = parse_flag(args, "--action").ok_or("--action is required")?;

    let params = positionals(args)
        .into_iter()
        .map(|pair| {
            pair.split_once('=')
                .ok_or_else(|| format!("expected key=value, got {pair}"))
        })
        .collect::<Result<QueryParams, String>>()?;

    let result: serde_json::Value = client
        .dispatcher()
        .send(&module, &action, &params, cancel)
        .await
        .map_err(|e| e.to_string())?;

    println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
    Ok(())
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}

fn parse_number<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>, String> {
    parse_flag(args, flag)
        .map(|raw| raw.parse().map_err(|_| format!("{flag}: not a number: {raw}")))
        .transpose()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

/// Arguments that are neither flags nor flag values.
fn positionals(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut skip_next = false;
    for arg in args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            skip_next = true;
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positionals_skip_flag_values() {
        let a = args(&["0xabc", "--sort", "desc", "--nft", "0xdef", "--page", "2"]);
        assert_eq!(positionals(&a), vec!["0xabc", "0xdef"]);
    }

    #[test]
    fn transfer_query_from_flags() {
        let a = args(&["0xabc", "--sort", "asc", "--page", "2", "--offset", "25", "--start-block", "10"]);
        let q = transfer_query(&a).unwrap();
        assert_eq!(q.sort, Some(SortOrder::Asc));
        assert_eq!(q.page, Some(2));
        assert_eq!(q.offset, Some(25));
        assert_eq!(q.start_block, Some(10));
        assert_eq!(q.end_block, None);
    }

    #[test]
    fn transfer_query_rejects_bad_number() {
        let a = args(&["--page", "two"]);
        assert!(transfer_query(&a).is_err());
    }
}
