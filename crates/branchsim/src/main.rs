use std::process;
use std::time::Duration;

use branchsim::{Branch, BranchConfig, TransactionKind, WorkProfile};

struct Args {
    customers: usize,
    tellers: usize,
    capacity: usize,
    seed: u64,
    fast: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {msg}");
                eprintln!();
            }
            eprintln!("Usage: branchsim [options]");
            eprintln!();
            eprintln!("Options:");
            eprintln!("  --customers <n>   Customer count [default: 50]");
            eprintln!("  --tellers <n>     Teller count [default: 3]");
            eprintln!("  --capacity <n>    Max simultaneous occupants [default: 2]");
            eprintln!("  --seed <n>        Transaction-kind seed [default: 42]");
            eprintln!("  --fast            Run with zero simulated-work delays");
            process::exit(2);
        }
    };

    let profile = if args.fast {
        WorkProfile::zero()
    } else {
        WorkProfile::default()
    };

    let config =
        BranchConfig::new(args.customers, args.tellers, args.capacity).with_profile(profile);
    let kinds = generate_kinds(args.customers, args.seed);

    let branch = Branch::new(config, kinds)?;
    let report = tokio::time::timeout(Duration::from_secs(300), branch.run())
        .await
        .map_err(|_| anyhow::anyhow!("branch run did not terminate within 300s"))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args {
        customers: 50,
        tellers: 3,
        capacity: 2,
        seed: 42,
        fast: false,
    };

    let mut i = 1; // skip argv[0]
    while i < args.len() {
        match args[i].as_str() {
            "--customers" => {
                i += 1;
                parsed.customers = parse_count(args.get(i), "--customers")?;
            }
            "--tellers" => {
                i += 1;
                parsed.tellers = parse_count(args.get(i), "--tellers")?;
            }
            "--capacity" => {
                i += 1;
                parsed.capacity = parse_count(args.get(i), "--capacity")?;
            }
            "--seed" => {
                i += 1;
                parsed.seed = args
                    .get(i)
                    .ok_or("--seed requires a value")?
                    .parse()
                    .map_err(|_| "--seed expects an integer".to_string())?;
            }
            "--fast" => parsed.fast = true,
            "--help" | "-h" => return Err(String::new()),
            arg => return Err(format!("unknown argument: {arg}")),
        }
        i += 1;
    }

    Ok(parsed)
}

fn parse_count(value: Option<&String>, flag: &str) -> Result<usize, String> {
    value
        .ok_or_else(|| format!("{flag} requires a value"))?
        .parse()
        .map_err(|_| format!("{flag} expects an integer"))
}

/// Deterministic per-customer transaction kinds from a seed (splitmix64).
/// Kind generation is a collaborator of the protocol, not part of it; the
/// engine takes the kinds as plain values.
fn generate_kinds(count: usize, seed: u64) -> Vec<TransactionKind> {
    let mut state = seed;
    (0..count)
        .map(|_| {
            state = state.wrapping_add(0x9e3779b97f4a7c15);
            let mut z = state;
            z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
            z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
            z ^= z >> 31;
            if z & 1 == 0 {
                TransactionKind::Deposit
            } else {
                TransactionKind::Withdrawal
            }
        })
        .collect()
}
