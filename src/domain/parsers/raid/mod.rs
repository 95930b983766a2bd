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

//! RAID controller listing parsers
//!
//! Both vendor tools print a flat listing in which controller headings,
//! logical drive blocks and physical drive blocks follow one another.
//! [`ListingScan`] holds the state shared by the vendor parsers; each vendor
//! module only decides which lines drive which transition.

pub mod hpacucli;
pub mod megacli;
pub mod speed;

use super::common::Tally;
use crate::domain::{ControllerSection, LogicalVolume, PhysicalDriveGroup};
use std::collections::BTreeMap;

/// Which kind of block the listing scanner is in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Idle,
    Logical,
    Physical,
}

/// Attributes of a physical drive collected before its model line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriveDetails {
    pub size: String,
    pub speed: String,
}

/// Result of scanning one vendor listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing {
    pub controllers: Vec<ControllerSection>,
    pub drives: Vec<PhysicalDriveGroup>,
}

impl Listing {
    pub fn volume_count(&self) -> usize {
        self.controllers.iter().map(|c| c.volumes.len()).sum()
    }
}

/// Accumulator for a controller listing
#[derive(Debug)]
pub struct ListingScan {
    mode: ScanMode,
    sections: Vec<ControllerSection>,
    label: Option<String>,
    volumes: BTreeMap<u32, LogicalVolume>,
    current: Option<u32>,
    pending: DriveDetails,
    drives: Tally<DriveDetails>,
}

impl ListingScan {
    pub fn new(mode: ScanMode) -> Self {
        Self {
            mode,
            sections: Vec::new(),
            label: None,
            volumes: BTreeMap::new(),
            current: None,
            pending: DriveDetails::default(),
            drives: Tally::new(),
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ScanMode) {
        self.mode = mode;
    }

    /// Close the open section and start a new one under `label`
    pub fn boundary(&mut self, label: String) {
        self.close_section();
        self.label = Some(label);
    }

    /// Start logical volume `id`; a repeated id replaces the earlier entry
    pub fn start_volume(&mut self, id: u32) {
        self.mode = ScanMode::Logical;
        self.volumes.insert(id, LogicalVolume::new(id));
        self.current = Some(id);
    }

    /// The volume logical field lines apply to, if any
    pub fn volume_mut(&mut self) -> Option<&mut LogicalVolume> {
        if self.mode != ScanMode::Logical {
            return None;
        }
        let id = self.current?;
        self.volumes.get_mut(&id)
    }

    /// Details of the physical drive whose model line has not been seen yet
    pub fn pending_drive_mut(&mut self) -> &mut DriveDetails {
        &mut self.pending
    }

    /// Count a drive under `model` using the pending details
    pub fn commit_drive(&mut self, model: String) {
        let details = std::mem::take(&mut self.pending);
        self.drives.record(model, details);
    }

    pub fn finish(mut self) -> Listing {
        self.close_section();
        Listing {
            controllers: self.sections,
            drives: self
                .drives
                .into_entries()
                .into_iter()
                .map(|entry| PhysicalDriveGroup {
                    model: entry.key,
                    count: entry.count,
                    size: entry.value.size,
                    speed: entry.value.speed,
                })
                .collect(),
        }
    }

    fn close_section(&mut self) {
        let label = self.label.take();
        if label.is_none() && self.volumes.is_empty() {
            return;
        }
        let volumes = std::mem::take(&mut self.volumes).into_values().collect();
        self.current = None;
        self.sections.push(ControllerSection { label, volumes });
    }
}
