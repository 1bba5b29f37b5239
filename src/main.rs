//! AORUS WATERFORCE Control CLI
//!
//! Command-line interface for monitoring and controlling Gigabyte AORUS
//! WATERFORCE X-series coolers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use waterforce_rust_devices::device::Waterforce;
use waterforce_rust_devices::protocol::CoolingMode;
use waterforce_rust_devices::utils::parsing::parse_channel;

// =============================================================================
// CLI Arguments
// =============================================================================

/// AORUS WATERFORCE Control Tool
#[derive(Parser, Debug)]
#[command(name = "waterforce-cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show current device status
    Status,

    /// Continuously monitor device status
    Monitor {
        /// Update interval in seconds
        #[arg(short, long, default_value = "1")]
        interval: u64,
    },

    /// Set fixed fan speed
    SetFan {
        /// Duty cycle percentage (0-100)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        duty: u8,
    },

    /// Set fixed pump speed
    SetPump {
        /// Duty cycle percentage (0-100)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        duty: u8,
    },

    /// Set a fixed speed on a named channel
    SetSpeed {
        /// Channel to set: fan or pump
        channel: String,

        /// Duty cycle percentage (0-100)
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        duty: u8,
    },

    /// List connected WATERFORCE devices
    List,

    /// Show device model and firmware version
    Info,

    /// List the cooling modes the device understands
    Modes,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Status => cmd_status(),
        Command::Monitor { interval } => cmd_monitor(interval),
        Command::SetFan { duty } => cmd_set_speed("fan", duty),
        Command::SetPump { duty } => cmd_set_speed("pump", duty),
        Command::SetSpeed { channel, duty } => cmd_set_speed(&channel, duty),
        Command::List => cmd_list(),
        Command::Info => cmd_info(),
        Command::Modes => cmd_modes(),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn cmd_status() -> Result<()> {
    let mut cooler = Waterforce::open().context("Failed to open WATERFORCE cooler")?;
    cooler.initialize().context("Failed to initialize device")?;
    let status = cooler.get_status().context("Failed to read status")?;
    print!("{}", status);
    Ok(())
}

fn cmd_monitor(interval_secs: u64) -> Result<()> {
    let mut cooler = Waterforce::open().context("Failed to open WATERFORCE cooler")?;
    cooler.initialize().context("Failed to initialize device")?;

    // Setup Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    println!("🌡️  Monitoring {} (Ctrl+C to stop)...\n", cooler.kind());

    while running.load(Ordering::SeqCst) {
        match cooler.get_status() {
            Ok(status) => {
                // Clear screen and move cursor to top
                print!("\x1B[2J\x1B[1;1H");
                println!("{}", cooler.kind());
                println!("{}", "─".repeat(40));
                print!("{}", status);
            }
            Err(e) => {
                eprintln!("⚠️  Read error: {}", e);
            }
        }

        std::thread::sleep(Duration::from_secs(interval_secs));
    }

    println!("\n👋 Monitoring stopped.");
    Ok(())
}

fn cmd_set_speed(channel_str: &str, duty: u8) -> Result<()> {
    let channel = parse_channel(channel_str)?;

    let mut cooler = Waterforce::open().context("Failed to open WATERFORCE cooler")?;
    cooler.initialize().context("Failed to initialize device")?;

    cooler
        .set_fixed_speed(channel, duty)
        .context("Failed to set speed")?;

    println!("✅ {} speed set to {}%", channel, duty);
    println!("   (the device gives no acknowledgment for this command)");
    Ok(())
}

fn cmd_list() -> Result<()> {
    let devices = Waterforce::list_devices().context("Failed to enumerate devices")?;

    if devices.is_empty() {
        println!("❌ No WATERFORCE devices found.");
        return Ok(());
    }

    println!("🔍 Found {} device(s):\n", devices.len());
    for (i, (kind, path, serial)) in devices.iter().enumerate() {
        let serial_str = serial.as_deref().unwrap_or("unknown");
        println!("  {}. {}", i + 1, kind);
        println!("     Serial: {}", serial_str);
        println!("     Path: {}", path);
    }

    Ok(())
}

fn cmd_info() -> Result<()> {
    let mut cooler = Waterforce::open().context("Failed to open WATERFORCE cooler")?;
    let info = cooler.initialize().context("Failed to initialize device")?;

    println!("{}", cooler.kind());
    println!("{}", "─".repeat(40));
    print!("{}", info);
    println!("{:<20}  {} rpm", "Max pump speed", cooler.max_pump_rpm());
    Ok(())
}

fn cmd_modes() -> Result<()> {
    println!("Cooling modes:\n");
    for mode in CoolingMode::ALL {
        println!("  {:#04x}  {}", mode.code(), mode.name());
    }
    Ok(())
}
