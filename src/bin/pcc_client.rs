use std::{error::Error, path::PathBuf, process::ExitCode};

use clap::Parser;
use pcc::protocol::{Client, PayloadFile};

#[derive(Debug, Parser)]
#[command(version, about = "Sends a file to a pcc server and prints its printable count", long_about = None)]
struct Cli {
    /// Server host name or IP address
    server_address: String,
    /// Server port
    server_port: u16,
    /// File whose contents are sent
    file_path: PathBuf,
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
        Ok(count) => {
            println!("# of printable characters: {count}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("pcc_client: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<u32, Box<dyn Error>> {
    let payload = PayloadFile::open(&cli.file_path)?;
    let client = Client::connect(&cli.server_address, cli.server_port)?;
    Ok(client.count_file(payload)?)
}
