use hello_bridge::config::{CreatorConfig, Invocation};
use hello_bridge::status::EXIT_FAILURE;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cfg = match Invocation::<CreatorConfig>::parse(std::env::args()) {
        Invocation::Run(cfg) => cfg,
        Invocation::Help(text) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Invocation::Invalid(text) => {
            print!("{text}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    hello_bridge::init_tracing(cfg.verbose);

    let platform = hello_bridge::platform::system();
    let mut input = std::io::stdin().lock();
    let mut output = std::io::stdout();
    ExitCode::from(hello_bridge::creator::run(
        &cfg,
        &platform,
        &mut input,
        &mut output,
    ))
}
