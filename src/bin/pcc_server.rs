use std::{
    error::Error,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    process::ExitCode,
};

use clap::Parser;
use log::info;
use pcc::protocol::{CountingServer, ServerConfig};

#[derive(Debug, Parser)]
#[command(version, about = "Counts printable characters sent by pcc clients", long_about = None)]
struct Cli {
    /// Port to listen on
    port: u16,
    /// Interface to bind; all interfaces by default
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    bind: IpAddr,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pcc_server: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let server = CountingServer::bind(ServerConfig::new(SocketAddr::new(cli.bind, cli.port)))?;

    let shutdown = server.shutdown_handle();
    ctrlc::set_handler(move || shutdown.request())?;

    let histogram = server.serve()?;
    info!("served {} printable characters in total", histogram.total());
    print!("{histogram}");
    Ok(())
}
