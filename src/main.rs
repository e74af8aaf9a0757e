use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use k7tape::k7;
use std::path::{Path, PathBuf};

/// VG5000µ cassette images to tape signal
#[derive(Parser, Debug)]
#[command(name = "console", about, long_about = None)]
struct Cli {
    /// Enable the debug log
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Write the tape signal as little-endian 16 bit half-periods
    Encode {
        /// .k7 image, or a .zip holding one
        input: PathBuf,
        /// Raw signal file to write
        output: PathBuf,
    },
    /// Encode, decode back and compare with the image
    Verify {
        /// .k7 image, or a .zip holding one
        input: PathBuf,
    },
}

struct ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }
    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{:5} {}", record.level(), record.args());
        }
    }
    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let is_zip = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"));
    if is_zip {
        k7::image_from_zip(&data)
    } else {
        Ok(data)
    }
}

fn do_encode(input: &Path, output: &Path) -> anyhow::Result<()> {
    let image = read_image(input)?;
    let tape = k7::encode(&image)?;
    std::fs::write(output, tape.to_le_bytes())
        .with_context(|| format!("writing {}", output.display()))?;
    log::info!(
        "{}: {} bytes of signal ({} allocated)",
        output.display(),
        tape.byte_len(),
        tape.capacity_bytes()
    );
    tape.release();
    Ok(())
}

fn do_verify(input: &Path) -> anyhow::Result<()> {
    let image = read_image(input)?;
    let tape = k7::encode(&image)?;
    let decoded = k7::decode(tape.pulses())?;
    tape.release();
    if decoded.image() != image {
        return Err(anyhow!("{}: decoded signal does not match", input.display()));
    }
    let header: Vec<String> = decoded.header.iter().map(|b| format!("{:02x}", b)).collect();
    log::info!("header: {}", header.join(" "));
    log::info!(
        "{}: ok, sync {}/{}, {} data bytes",
        input.display(),
        decoded.header_sync,
        decoded.data_sync,
        decoded.data.len()
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    log::set_logger(&LOGGER).map_err(|e| anyhow!("{}", e))?;
    log::set_max_level(if cli.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    });

    match &cli.command {
        Command::Encode { input, output } => do_encode(input, output),
        Command::Verify { input } => do_verify(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_args() {
        let cli = Cli::try_parse_from(["console", "encode", "game.k7", "game.raw"]).unwrap();
        assert!(!cli.debug);
        assert_eq!(
            cli.command,
            Command::Encode {
                input: PathBuf::from("game.k7"),
                output: PathBuf::from("game.raw"),
            }
        );
    }

    #[test]
    fn verify_with_debug() {
        let cli = Cli::try_parse_from(["console", "verify", "--debug", "game.zip"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.command, Command::Verify { input: PathBuf::from("game.zip") });
    }

    #[test]
    fn bad_args() {
        assert!(Cli::try_parse_from(["console"]).is_err());
        assert!(Cli::try_parse_from(["console", "play", "game.k7"]).is_err());
        assert!(Cli::try_parse_from(["console", "encode", "game.k7"]).is_err());
    }
}
