use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{ArgAction, ArgGroup};
use testdef::{
    Config, Node,
    outline::{self, EmitOptions},
    storage::xml::{self, XmlOptions},
};
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
#[command(group(ArgGroup::new("mode").required(true).args(["to_xml", "to_org"])))]
pub struct Cli {
    /// Convert an outline to an XML test definition
    #[arg(long)]
    to_xml: bool,

    /// Convert an XML test definition to an outline
    #[arg(long)]
    to_org: bool,

    /// Read from this file instead of standard input
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Write to this file instead of standard output
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// The direction of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Outline text to XML.
    ToXml,
    /// XML to outline text.
    ToOrg,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let input = read_input(self.input.as_deref())?;
        let output = convert(self.mode(), &input, &config)?;
        write_output(self.output.as_deref(), &output)
    }

    const fn mode(&self) -> Mode {
        if self.to_xml { Mode::ToXml } else { Mode::ToOrg }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // Converted documents go to stdout, so diagnostics must not.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        if let Err(error) = tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
        {
            tracing::debug!("Keeping the existing subscriber: {error}");
        }
    }
}

/// Converts a complete input document. Nothing is produced unless the whole
/// input converts.
#[instrument(skip(input, config))]
fn convert(mode: Mode, input: &str, config: &Config) -> anyhow::Result<String> {
    match mode {
        Mode::ToXml => {
            let tree = outline::parse(input).context("failed to parse outline")?;
            tracing::info!("Parsed {} top-level nodes", tree.children.len());
            Ok(xml::to_string(&Node::from(tree), &XmlOptions::from(config))?)
        }
        Mode::ToOrg => {
            let root = xml::load(input).context("Error loading xml")?;
            Ok(outline::to_string(&root, &EmitOptions::from(config)))
        }
    }
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read standard input")?;
            Ok(input)
        }
    }
}

fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write standard output")
        }
    }
}
