use env_logger::Env;

fn main() -> anyhow::Result<()> {
    let options = match i8080_runner::parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err:#}");
            eprintln!("{}", i8080_runner::USAGE);
            std::process::exit(2);
        }
    };

    // -d only shows up if the trace level is enabled.
    let default_filter = if options.trace { "trace" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    i8080_runner::run(&options)
}
