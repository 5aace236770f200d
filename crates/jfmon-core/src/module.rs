//! Detector module identification and per-module summaries.
//!
//! The JUNGFRAU 4M is tiled from eight modules. Status payloads carry
//! per-module arrays indexed by physical module number; that number is the
//! module's identity and never changes with display position.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{CoreError, Result};
use crate::format::{display_count, display_pedestal};

/// Number of detector modules.
pub const MODULE_COUNT: usize = 8;

/// Number of gain stages with a tracked pedestal (G0, G1, G2).
pub const GAIN_STAGES: usize = 3;

/// Physical module number, 0-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId(u8);

impl ModuleId {
    pub fn new(index: usize) -> Result<Self> {
        if index < MODULE_COUNT {
            Ok(Self(index as u8))
        } else {
            Err(CoreError::InvalidModule(index))
        }
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// All modules in physical order.
    pub fn all() -> impl Iterator<Item = ModuleId> {
        (0..MODULE_COUNT as u8).map(ModuleId)
    }

    /// Module shown at display slot `slot` (row-major, two per row).
    ///
    /// Slots map to `2 * (3 - slot / 2) + slot % 2`, which puts the top
    /// modules of the physical layout first.
    pub fn for_display_slot(slot: usize) -> Result<Self> {
        if slot >= MODULE_COUNT {
            return Err(CoreError::InvalidModule(slot));
        }
        Ok(Self((2 * (3 - slot / 2) + slot % 2) as u8))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Module {}", self.0)
    }
}

/// Display order of all modules: `[6, 7, 4, 5, 2, 3, 0, 1]`.
pub fn display_order() -> [ModuleId; MODULE_COUNT] {
    std::array::from_fn(|slot| ModuleId((2 * (3 - slot / 2) + slot % 2) as u8))
}

/// Health summary of one module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleSummary {
    pub id: ModuleId,
    pub name: String,
    /// Number of bad pixels, if reported.
    pub bad_pixels: Option<f64>,
    /// Mean pedestal per gain stage (ADU), if reported.
    pub pedestal_means: [Option<f64>; GAIN_STAGES],
}

impl ModuleSummary {
    /// Summary with no reported values.
    pub fn empty(id: ModuleId) -> Self {
        Self {
            id,
            name: id.to_string(),
            bad_pixels: None,
            pedestal_means: [None; GAIN_STAGES],
        }
    }

    pub fn bad_pixels_display(&self) -> String {
        display_count(self.bad_pixels)
    }

    /// Formatted mean pedestal of gain stage `gain` (0-2).
    pub fn pedestal_display(&self, gain: usize) -> String {
        display_pedestal(self.pedestal_means.get(gain).copied().flatten())
    }
}

/// All eight module summaries, stored by physical module number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleBank {
    modules: [ModuleSummary; MODULE_COUNT],
}

impl Default for ModuleBank {
    fn default() -> Self {
        Self {
            modules: std::array::from_fn(|i| ModuleSummary::empty(ModuleId(i as u8))),
        }
    }
}

impl ModuleBank {
    /// Build from the per-module arrays of a status payload.
    ///
    /// Arrays that are absent, not arrays, or shorter than eight entries
    /// leave the affected modules' values unset.
    pub fn from_arrays(
        bad_pixels: Option<&Value>,
        pedestal_means: [Option<&Value>; GAIN_STAGES],
    ) -> Self {
        let bad = per_module(bad_pixels);
        let gains = pedestal_means.map(per_module);

        Self {
            modules: std::array::from_fn(|i| {
                let id = ModuleId(i as u8);
                ModuleSummary {
                    id,
                    name: id.to_string(),
                    bad_pixels: bad[i],
                    pedestal_means: [gains[0][i], gains[1][i], gains[2][i]],
                }
            }),
        }
    }

    pub fn get(&self, id: ModuleId) -> &ModuleSummary {
        &self.modules[id.index()]
    }

    /// Modules in physical order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleSummary> {
        self.modules.iter()
    }

    /// Modules in display order.
    pub fn in_display_order(&self) -> impl Iterator<Item = &ModuleSummary> {
        display_order().into_iter().map(move |id| self.get(id))
    }
}

fn per_module(array: Option<&Value>) -> [Option<f64>; MODULE_COUNT] {
    let values = array.and_then(Value::as_array);
    std::array::from_fn(|i| {
        values
            .and_then(|v| v.get(i))
            .and_then(crate::format::numeric)
    })
}
