use clap::Parser;
use joyrate::config::{Args, SessionConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match SessionConfig::try_from(args)
        .map_err(anyhow::Error::from)
        .and_then(|config| measure(&config))
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_os = "linux")]
fn measure(config: &SessionConfig) -> anyhow::Result<()> {
    use joyrate::app::{self, ReportSink, SystemClock};
    use joyrate::DeviceSession;

    let mut sink = app::stdout_sink(config.output);

    let mut discovered = Vec::new();
    let mut session = DeviceSession::open(&config.device, config.read_timeout, |axis| {
        discovered.push(axis.clone())
    })?;
    for axis in &discovered {
        sink.axis_discovered(axis)?;
    }

    let result = app::run(&mut session, config, &SystemClock, sink.as_mut());
    session.close();
    result?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn measure(config: &SessionConfig) -> anyhow::Result<()> {
    anyhow::bail!(
        "Cannot open {}: evdev devices are only available on Linux",
        config.device.display()
    )
}
