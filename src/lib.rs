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

//! Machine Description Library
//!
//! Describes the hardware and OS configuration of a machine used for
//! performance testing: DIMM layout, CPU topology, kernel tunables, RAID
//! controllers and their drives, network adapters and HDFS settings. Built
//! on a Ports and Adapters (Hexagonal) architecture.
//!
//! # Architecture
//!
//! - **Domain**: Entities, text parsers, report rendering, collection service
//! - **Ports**: Interfaces for commands, host files and output
//! - **Adapters**: Linux implementations of the ports
//!
//! # Usage
//!
//! ```rust,no_run
//! use machine_describe::{OutputFormat, ReportConfig};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = machine_describe::create_service()?;
//!
//!     let description = service.describe(ReportConfig::default()).await?;
//!     println!("{} effective cores", description.effective_cores);
//!
//!     service.publish(&description, OutputFormat::Text).await?;
//!     Ok(())
//! }
//! ```
//!
//! Parsers are plain functions over captured command output and can be used
//! on their own:
//!
//! ```rust
//! use machine_describe::domain::parsers::parse_cpuinfo;
//!
//! let cpu = parse_cpuinfo("processor\t: 0\nmodel name\t: QEMU Virtual CPU version 2.5+\n");
//! assert_eq!(cpu.to_string(), "1 x QEMU Virtual CPU version 2.5+ (virtual)");
//! ```

pub mod adapters;
pub mod container;
pub mod domain;
pub mod ports;

pub use adapters::{
    LinuxSystemInfoProvider, LocalHostFiles, OutputTarget, StreamPublisher, UnixCommandExecutor,
};
pub use container::{ContainerConfig, ContainerConfigBuilder, ServiceContainer};
pub use domain::{
    render_text, MachineDescription, OutputFormat, PublishError, ReportConfig, ReportError,
    Section,
};
pub use ports::{
    CommandExecutor, DescriptionService, HostFiles, ReportPublisher, SystemInfoProvider,
};

use std::sync::Arc;

/// Create a description service for the current platform with default settings
///
/// # Returns
/// * A service that reads the local host and prints to stdout
pub fn create_service() -> Result<Arc<dyn DescriptionService>, ReportError> {
    ServiceContainer::default().create_description_service()
}

/// Create a description service with custom container configuration
///
/// # Arguments
/// * `container_config` - Timeouts, sudo use, host root and output file
pub fn create_service_with_config(
    container_config: ContainerConfig,
) -> Result<Arc<dyn DescriptionService>, ReportError> {
    ServiceContainer::new(container_config).create_description_service()
}
