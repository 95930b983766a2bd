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

//! Dependency injection container for the description service

use crate::adapters::{
    LinuxSystemInfoProvider, LocalHostFiles, OutputTarget, StreamPublisher, UnixCommandExecutor,
};
use crate::domain::{DescriptionCollectionService, ReportError};
use crate::ports::{
    CommandExecutor, DescriptionService, HostFiles, ReportPublisher, SystemInfoProvider,
};
use log::debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the dependency injection container
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Per-command timeout; commands may run indefinitely when unset
    pub command_timeout: Option<Duration>,
    /// Run privileged commands through `sudo -n`
    pub use_sudo: bool,
    /// Read host files beneath this directory instead of `/`
    pub root: Option<PathBuf>,
    /// Write the report to this file instead of stdout
    pub output: Option<PathBuf>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            command_timeout: None,
            use_sudo: true,
            root: None,
            output: None,
        }
    }
}

/// Dependency injection container
#[derive(Default)]
pub struct ServiceContainer {
    config: ContainerConfig,
}

impl ServiceContainer {
    /// Create a new service container with configuration
    pub fn new(config: ContainerConfig) -> Self {
        Self { config }
    }

    /// Create the command executor
    pub fn create_command_executor(&self) -> Arc<dyn CommandExecutor> {
        Arc::new(UnixCommandExecutor::new(
            self.config.command_timeout,
            self.config.use_sudo,
        ))
    }

    /// Create the host file reader
    pub fn create_host_files(&self) -> Arc<dyn HostFiles> {
        match &self.config.root {
            Some(root) => {
                debug!("Reading host files beneath {}", root.display());
                Arc::new(LocalHostFiles::with_root(root))
            }
            None => Arc::new(LocalHostFiles::new()),
        }
    }

    /// Create the platform-specific system info provider
    pub fn create_system_info_provider(&self) -> Result<Arc<dyn SystemInfoProvider>, ReportError> {
        if !cfg!(target_os = "linux") {
            return Err(ReportError::UnsupportedPlatform(
                std::env::consts::OS.to_string(),
            ));
        }

        Ok(Arc::new(LinuxSystemInfoProvider::new(
            self.create_command_executor(),
            self.create_host_files(),
        )))
    }

    /// Create the report publisher
    pub fn create_publisher(&self) -> Arc<dyn ReportPublisher> {
        let target = match &self.config.output {
            Some(path) => OutputTarget::File(path.clone()),
            None => OutputTarget::Stdout,
        };
        Arc::new(StreamPublisher::new(target))
    }

    /// Create the complete description service
    pub fn create_description_service(&self) -> Result<Arc<dyn DescriptionService>, ReportError> {
        let system_provider = self.create_system_info_provider()?;
        let publisher = self.create_publisher();

        Ok(Arc::new(DescriptionCollectionService::new(
            system_provider,
            publisher,
        )))
    }

    /// Get platform name for logging
    pub fn get_platform_name(&self) -> &'static str {
        if cfg!(target_os = "linux") {
            "Linux"
        } else {
            "Unknown"
        }
    }
}

/// Builder pattern for container configuration
pub struct ContainerConfigBuilder {
    config: ContainerConfig,
}

impl ContainerConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
        }
    }

    /// Set command timeout
    pub fn command_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.command_timeout = timeout;
        self
    }

    /// Allow or forbid sudo escalation
    pub fn use_sudo(mut self, use_sudo: bool) -> Self {
        self.config.use_sudo = use_sudo;
        self
    }

    /// Set the host filesystem root
    pub fn root(mut self, root: Option<PathBuf>) -> Self {
        self.config.root = root;
        self
    }

    /// Set the output file
    pub fn output(mut self, output: Option<PathBuf>) -> Self {
        self.config.output = output;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ContainerConfig {
        self.config
    }
}

impl Default for ContainerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ContainerConfigBuilder::new()
            .command_timeout(Some(Duration::from_secs(60)))
            .use_sudo(false)
            .root(Some(PathBuf::from("/srv/capture")))
            .build();

        assert_eq!(config.command_timeout, Some(Duration::from_secs(60)));
        assert!(!config.use_sudo);
        assert_eq!(config.root, Some(PathBuf::from("/srv/capture")));
        assert!(config.output.is_none());
    }

    #[test]
    fn test_default_config() {
        let config = ContainerConfig::default();
        assert!(config.command_timeout.is_none());
        assert!(config.use_sudo);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_complete_service_creation() {
        let container = ServiceContainer::default();
        assert_eq!(container.get_platform_name(), "Linux");
        assert!(container.create_description_service().is_ok());
    }

    #[cfg(not(target_os = "linux"))]
    #[test]
    fn test_unsupported_platform() {
        let container = ServiceContainer::default();
        assert!(matches!(
            container.create_description_service(),
            Err(ReportError::UnsupportedPlatform(_))
        ));
    }
}
