use anyhow::Context;
use hello_bridge::config::{AuthenticatorConfig, Invocation};
use hello_bridge::focus::SystemDesktop;
use hello_bridge::status::{EXIT_FAILURE, EXIT_PLATFORM_ERROR};
use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> ExitCode {
    let cfg = match Invocation::<AuthenticatorConfig>::parse(std::env::args()) {
        Invocation::Run(cfg) => cfg,
        Invocation::Help(text) | Invocation::Invalid(text) => {
            print!("{text}");
            return ExitCode::from(EXIT_FAILURE);
        }
    };
    hello_bridge::init_tracing(cfg.verbose);

    match run(cfg) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            println!("{e:#}");
            ExitCode::from(EXIT_PLATFORM_ERROR)
        }
    }
}

fn run(cfg: AuthenticatorConfig) -> anyhow::Result<u8> {
    let mut payload = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut payload)
        .context("Failed to read the data to sign from stdin")?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let platform = Arc::new(hello_bridge::platform::system());
    let desktop = Arc::new(SystemDesktop::default());
    let mut stdout = std::io::stdout().lock();
    Ok(runtime.block_on(hello_bridge::authenticator::run(
        platform,
        desktop,
        &cfg.name,
        payload,
        &mut stdout,
    )))
}
