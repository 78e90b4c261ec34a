//! Integration tests for the F3 Virtual COM Port firmware.
//!
//! Flash either the hello demo or the echo demo, then run with the matching
//! `--firmware` value.

mod device;
mod tests;

use clap::{Parser, ValueEnum};
use colored::Colorize;

use device::{resolve_port, DeviceClient};
use tests::{print_results, run_echo_tests, run_hello_tests};

/// Which demo is flashed on the board
#[derive(Clone, Copy, ValueEnum)]
enum Firmware {
    Hello,
    Echo,
}

#[derive(Parser)]
#[command(name = "integration-tests")]
#[command(about = "Integration tests for the F3 Virtual COM Port firmware")]
struct Args {
    /// Serial port for the device (use "auto" to auto-detect)
    #[arg(short, long, default_value = "auto")]
    port: String,

    /// Baud rate
    #[arg(short, long, default_value = "115200")]
    baud: u32,

    /// Demo program currently flashed
    #[arg(short, long, value_enum, default_value = "echo")]
    firmware: Firmware,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let port = resolve_port(&args.port)?;

    println!("{}", "F3 VCP Integration Tests".bold());
    println!("Port: {}", port);
    println!("Baud: {}", args.baud);
    println!();

    println!("Connecting to device...");
    let mut device = DeviceClient::new(&port, args.baud)?;
    println!("{}", "Connected!".green());

    println!("\nRunning tests...\n");

    let results = match args.firmware {
        Firmware::Hello => {
            println!("{}", "Press the USER button on the board now".yellow());
            device.set_timeout(std::time::Duration::from_secs(30));
            run_hello_tests(&mut device)
        }
        Firmware::Echo => {
            std::thread::sleep(std::time::Duration::from_millis(200));
            device.drain_buffer()?;
            run_echo_tests(&mut device)
        }
    };
    print_results(&results);

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
