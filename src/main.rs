// Builds a ring from random identifiers and prints it.
//
// Usage: chordring [k] [n]
//
// - k: identifier width, the ring has 2^k slots (default 4).
// - n: number of random draws, duplicates are dropped (default 250).
//
// Set RUST_LOG=chordring=trace to follow the searches and finger repairs.

use std::{collections::HashSet, env, process};

use chordring::{Id, Table};
use rand::{seq::SliceRandom, thread_rng, Rng};
use tracing::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_K: u32 = 4;
const DEFAULT_N: usize = 250;

fn parse_arg<T: std::str::FromStr>(arg: Option<String>, default: T) -> T {
    match arg {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("invalid argument: {raw}");
            process::exit(2);
        }),
        None => default,
    }
}

fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut args = env::args().skip(1);
    let k = parse_arg(args.next(), DEFAULT_K);
    let n = parse_arg(args.next(), DEFAULT_N);

    if k > chordring::MAX_WIDTH {
        eprintln!("k must be at most {}", chordring::MAX_WIDTH);
        process::exit(2);
    }

    let mut rng = thread_rng();
    let size = 1u64 << k;
    let mut ids: Vec<Id> = (0..n)
        .map(|_| rng.gen_range(0..size))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    ids.shuffle(&mut rng);

    let mut table = Table::new(k);
    for id in ids {
        if let Err(e) = table.insert(id) {
            error!("couldn't insert {id}: {e}");
        }
    }

    info!(members = table.len(), "ring built");
    println!("{table}");
}
