mod cli;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // Optional first argument: direction sampler seed
    let seed = match std::env::args().nth(1) {
        Some(arg) => Some(arg.parse::<u64>()?),
        None => None,
    };

    cli::run_walkthrough(seed)
}
