/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use clap::{Parser, ValueEnum};
use log::{debug, info};
use machine_describe::{ContainerConfigBuilder, OutputFormat, ReportConfig, Section, ServiceContainer};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
    Toml,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Toml => OutputFormat::Toml,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SectionArg {
    Memory,
    Cpu,
    Os,
    Storage,
    Network,
    Hdfs,
}

impl From<SectionArg> for Section {
    fn from(section: SectionArg) -> Self {
        match section {
            SectionArg::Memory => Section::Memory,
            SectionArg::Cpu => Section::Cpu,
            SectionArg::Os => Section::Os,
            SectionArg::Storage => Section::Storage,
            SectionArg::Network => Section::Network,
            SectionArg::Hdfs => Section::Hdfs,
        }
    }
}

/// Describe the hardware and OS configuration of this machine
#[derive(Parser)]
#[command(name = "describe", version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: FormatArg,

    /// Report only these sections (repeatable; all by default)
    #[arg(long = "section", value_enum)]
    sections: Vec<SectionArg>,

    /// Never escalate with sudo; privileged details are skipped
    #[arg(long, env = "DESCRIBE_NO_SUDO")]
    no_sudo: bool,

    /// Give up on any single command after this many seconds
    #[arg(long, value_name = "SECS")]
    command_timeout: Option<u64>,

    /// Read /proc, /sys and /etc beneath this directory
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Log command execution and skipped sections
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let config = ContainerConfigBuilder::new()
        .command_timeout(cli.command_timeout.map(Duration::from_secs))
        .use_sudo(!cli.no_sudo)
        .root(cli.root)
        .output(cli.output)
        .build();
    let container = ServiceContainer::new(config);
    debug!("Describing a {} host", container.get_platform_name());

    let report_config = if cli.sections.is_empty() {
        ReportConfig::default()
    } else {
        ReportConfig::with_sections(cli.sections.into_iter().map(Section::from))
    };

    let service = container.create_description_service()?;
    let description = service.describe(report_config).await?;
    info!("Effective cores: {}", description.effective_cores);

    service.publish(&description, cli.format.into()).await?;
    Ok(())
}
