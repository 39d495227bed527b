use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use gowire::{convert, report, Options};

#[derive(Parser, Debug)]
#[command(name = "gowire", version, about = "Convert Go source to a JSON wire tree and back")]
struct Cli {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Clone, Copy)]
struct OptionFlags {
    /// Include comment groups and their attachments.
    #[arg(long)]
    comments: bool,
    /// Include portable positions.
    #[arg(long)]
    positions: bool,
    /// Include reference identity tags.
    #[arg(long)]
    references: bool,
    /// Duplicate import specs into the root import table.
    #[arg(long)]
    imports: bool,
}

impl From<OptionFlags> for Options {
    fn from(flags: OptionFlags) -> Options {
        Options {
            positions: flags.positions,
            comments: flags.comments,
            references: flags.references,
            imports: flags.imports,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a Go source file and write its wire-tree JSON.
    SourceToWire {
        input: PathBuf,
        output: PathBuf,
        /// Spaces of JSON indentation; 0 writes compact output.
        #[arg(long, default_value_t = 2)]
        indent: usize,
        #[command(flatten)]
        flags: OptionFlags,
    },
    /// Decode a wire-tree JSON file and regenerate Go source.
    WireToSource {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        flags: OptionFlags,
    },
    /// Parse and print without the wire step (fidelity baseline).
    Reformat { input: PathBuf, output: PathBuf },
    /// Convert every .go file in a directory, one session per file.
    ConvertDir {
        dir: PathBuf,
        out_dir: PathBuf,
        #[arg(long, default_value_t = 2)]
        indent: usize,
        #[command(flatten)]
        flags: OptionFlags,
    },
    /// Log the declarations found in a wire-tree JSON file.
    Report { input: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .filter_level(cli.verbose.log_level_filter())
        .init();

    match cli.command {
        Command::SourceToWire {
            input,
            output,
            indent,
            flags,
        } => convert::source_to_wire(&input, &output, indent, flags.into())
            .with_context(|| format!("converting {}", input.display()))?,
        Command::WireToSource {
            input,
            output,
            flags,
        } => convert::wire_to_source(&input, &output, flags.into())
            .with_context(|| format!("decoding {}", input.display()))?,
        Command::Reformat { input, output } => convert::reformat(&input, &output)
            .with_context(|| format!("reformatting {}", input.display()))?,
        Command::ConvertDir {
            dir,
            out_dir,
            indent,
            flags,
        } => {
            let summary = convert::convert_dir(&dir, &out_dir, indent, flags.into())
                .with_context(|| format!("converting directory {}", dir.display()))?;
            log::info!(
                "converted {} file(s), {} failed",
                summary.converted,
                summary.failed
            );
            if summary.failed > 0 {
                std::process::exit(1);
            }
        }
        Command::Report { input } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let value: serde_json::Value =
                serde_json::from_slice(&bytes).context("parsing wire JSON")?;
            let summary = report::report_file(&value);
            println!(
                "{} function(s), {} import(s), {} type(s), {} value spec(s)",
                summary.functions, summary.imports, summary.types, summary.values
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(args.iter().copied())
    }

    #[test]
    fn parses_source_to_wire_with_flags() {
        let cli = parse(&[
            "gowire",
            "source-to-wire",
            "in.go",
            "out.json",
            "--indent",
            "4",
            "--comments",
            "--positions",
        ])
        .expect("expected source-to-wire command");
        match cli.command {
            Command::SourceToWire { indent, flags, .. } => {
                assert_eq!(indent, 4);
                assert!(flags.comments && flags.positions);
                assert!(!flags.references && !flags.imports);
            }
            other => panic!("expected source-to-wire, got {other:?}"),
        }
    }

    #[test]
    fn parses_wire_to_source() {
        let cli = parse(&["gowire", "wire-to-source", "in.json", "out.go"])
            .expect("expected wire-to-source command");
        assert!(matches!(cli.command, Command::WireToSource { .. }));
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(parse(&["gowire"]).is_err());
    }
}
