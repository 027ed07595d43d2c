use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use gmmk_usb::commands::Rgb;
use gmmk_usb::device::DeviceVariant;
use gmmk_usb::error::{CommandError, ConnectError};
use gmmk_usb::gmmk::Gmmk;
use gmmk_usb::sequencer::AckMode;
use log::{warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

#[derive(Parser)]
#[command(version, about = "Control the GMMK / A4Tech RGB keyboard backlight")]
struct Cli {
    /// Endpoint layout of the connected device.
    #[arg(long, value_enum, default_value_t = DeviceVariant::Gmmk)]
    variant: DeviceVariant,

    /// Per-transfer timeout in milliseconds.
    #[arg(long, default_value_t = 1000)]
    timeout: u64,

    /// Validate device acknowledgments instead of discarding them.
    #[arg(long)]
    validate_acks: bool,

    /// Log verbosity.
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Set the backlight brightness.
    Brightness { level: u8 },
    /// Set a static backlight colour (RRGGBB hex).
    Color { color: Rgb },
    /// Set the LED animation mode.
    Mode { mode: u8 },
    /// Activate and program a lighting/macro profile slot.
    Profile { index: u8 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    TermLogger::init(
        cli.log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let mut keyboard = Gmmk::open(cli.variant, Duration::from_millis(cli.timeout))?;
    if cli.validate_acks {
        keyboard.set_ack_mode(AckMode::Validate);
    }

    let result = match cli.command {
        CliCommand::Brightness { level } => keyboard.set_brightness(level),
        CliCommand::Color { color } => keyboard.set_color(color),
        CliCommand::Mode { mode } => keyboard.set_led_mode(mode),
        CliCommand::Profile { index } => keyboard.set_profile(index),
    };

    // Restore the interface even when the command failed mid-transaction.
    let released = keyboard.release();
    conclude(result, released)
}

/// A release failure must not mask an earlier command failure.
fn conclude(
    command: Result<(), CommandError>,
    release: Result<(), ConnectError>,
) -> Result<()> {
    match (command, release) {
        (Ok(()), release) => Ok(release?),
        (Err(error), Ok(())) => Err(error.into()),
        (Err(error), Err(release_error)) => {
            warn!("Failed to release interface: {release_error}");
            Err(error.into())
        },
    }
}
