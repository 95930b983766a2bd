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

//! Local filesystem access for host pseudo-files

use crate::domain::SystemError;
use crate::ports::HostFiles;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Reads host files from the local filesystem
///
/// With a root directory set, absolute host paths are resolved beneath it,
/// so `/proc/cpuinfo` becomes `<root>/proc/cpuinfo`.
#[derive(Debug, Clone, Default)]
pub struct LocalHostFiles {
    root: Option<PathBuf>,
}

impl LocalHostFiles {
    /// Read files from `/`
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Read files beneath a captured filesystem tree
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path.trim_start_matches('/')),
            None => Path::new(path).to_path_buf(),
        }
    }
}

#[async_trait]
impl HostFiles for LocalHostFiles {
    async fn read_to_string(&self, path: &str) -> Result<String, SystemError> {
        let resolved = self.resolve(path);
        fs::read_to_string(&resolved).await.map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => SystemError::PermissionDenied(path.to_string()),
            _ => SystemError::IoError(format!("{path}: {e}")),
        })
    }

    async fn exists(&self, path: &str) -> bool {
        fs::try_exists(self.resolve(path)).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use predicates::prelude::*;

    #[tokio::test]
    async fn test_reads_beneath_root() {
        let root = assert_fs::TempDir::new().unwrap();
        root.child("proc/cmdline")
            .write_str("ro root=/dev/sda1 quiet\n")
            .unwrap();

        let files = LocalHostFiles::with_root(root.path());
        let cmdline = files.read_to_string("/proc/cmdline").await.unwrap();
        assert!(predicate::str::contains("root=/dev/sda1").eval(&cmdline));
        assert!(files.exists("/proc/cmdline").await);
        assert!(files.exists("/proc").await);
        assert!(!files.exists("/etc/redhat-release").await);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let root = tempfile::tempdir().unwrap();
        let files = LocalHostFiles::with_root(root.path());

        let err = files.read_to_string("/proc/meminfo").await.unwrap_err();
        assert!(matches!(err, SystemError::IoError(ref msg) if msg.starts_with("/proc/meminfo")));
    }

    #[test]
    fn test_resolve_without_root() {
        let files = LocalHostFiles::new();
        assert_eq!(files.resolve("/proc/cpuinfo"), PathBuf::from("/proc/cpuinfo"));
    }
}
