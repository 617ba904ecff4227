//! Channel resolution and unit normalisation.
//!
//! The caller names four logical roles by their EDF labels; this module
//! maps each role to a physical signal index and a factor scaling its
//! samples to microvolts. Everything is validated before any sample data
//! is touched.

use crate::edf::SignalMeta;
use crate::error::{ConvertError, Result};
use std::fmt;

/// The four logical channel roles of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Left central EEG electrode.
    C3,
    /// Right central EEG electrode.
    C4,
    /// Left electrooculogram.
    EogLeft,
    /// Right electrooculogram.
    EogRight,
}

impl Role {
    /// All roles in resolution order.
    pub const ALL: [Role; 4] = [Role::C3, Role::C4, Role::EogLeft, Role::EogRight];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::C3 => "C3",
            Role::C4 => "C4",
            Role::EogLeft => "EL",
            Role::EogRight => "ER",
        };
        f.write_str(name)
    }
}

/// User-supplied label for each role.
#[derive(Debug, Clone)]
pub struct ChannelSelection {
    /// Label bound to C3.
    pub c3: String,
    /// Label bound to C4.
    pub c4: String,
    /// Label bound to the left EOG.
    pub el: String,
    /// Label bound to the right EOG.
    pub er: String,
}

impl ChannelSelection {
    /// The label bound to a role.
    pub fn label(&self, role: Role) -> &str {
        match role {
            Role::C3 => &self.c3,
            Role::C4 => &self.c4,
            Role::EogLeft => &self.el,
            Role::EogRight => &self.er,
        }
    }
}

/// Physical units accepted on the four channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalUnit {
    /// Nanovolts.
    Nanovolt,
    /// Microvolts.
    Microvolt,
    /// Millivolts.
    Millivolt,
    /// Volts.
    Volt,
}

impl PhysicalUnit {
    /// Parse an EDF physical-dimension string.
    ///
    /// Matching is prefix-based on the first two characters; a unit
    /// starting with a bare "V" is the fallback. Anything else is
    /// rejected.
    pub fn parse(unit: &str) -> Option<Self> {
        let unit = unit.trim();
        if unit.starts_with("nV") {
            Some(PhysicalUnit::Nanovolt)
        } else if unit.starts_with("uV") {
            Some(PhysicalUnit::Microvolt)
        } else if unit.starts_with("mV") {
            Some(PhysicalUnit::Millivolt)
        } else if unit.starts_with('V') {
            Some(PhysicalUnit::Volt)
        } else {
            None
        }
    }

    /// Factor converting this unit to microvolts.
    pub fn microvolt_scale(self) -> f64 {
        match self {
            PhysicalUnit::Nanovolt => 0.001,
            PhysicalUnit::Microvolt => 1.0,
            PhysicalUnit::Millivolt => 1000.0,
            PhysicalUnit::Volt => 1_000_000.0,
        }
    }
}

/// A role resolved to a physical signal.
#[derive(Debug, Clone)]
pub struct ResolvedChannel {
    /// The role this resolution is for.
    pub role: Role,
    /// Index of the signal within the EDF.
    pub index: usize,
    /// Nominal sample rate in Hz.
    pub sample_rate: u32,
    /// Factor scaling physical samples to microvolts.
    pub scale: f64,
}

/// All four roles resolved against one EDF signal list.
#[derive(Debug, Clone)]
pub struct ResolvedChannels {
    /// Resolved C3.
    pub c3: ResolvedChannel,
    /// Resolved C4.
    pub c4: ResolvedChannel,
    /// Resolved left EOG.
    pub el: ResolvedChannel,
    /// Resolved right EOG.
    pub er: ResolvedChannel,
}

/// Resolve the selection against the signal list.
///
/// Labels match on exact case-insensitive equality; the first matching
/// signal by index wins. The two central channels must agree on their
/// nominal integer sample rate.
pub fn resolve(selection: &ChannelSelection, signals: &[SignalMeta]) -> Result<ResolvedChannels> {
    let c3 = resolve_role(Role::C3, selection, signals)?;
    let c4 = resolve_role(Role::C4, selection, signals)?;
    let el = resolve_role(Role::EogLeft, selection, signals)?;
    let er = resolve_role(Role::EogRight, selection, signals)?;

    if c3.sample_rate != c4.sample_rate {
        return Err(ConvertError::ChannelRateMismatch {
            c3: c3.sample_rate,
            c4: c4.sample_rate,
        });
    }

    Ok(ResolvedChannels { c3, c4, el, er })
}

fn resolve_role(
    role: Role,
    selection: &ChannelSelection,
    signals: &[SignalMeta],
) -> Result<ResolvedChannel> {
    let wanted = selection.label(role).trim();
    let signal = signals
        .iter()
        .find(|s| s.label.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| ConvertError::LabelNotFound {
            role,
            label: wanted.to_string(),
        })?;

    let unit =
        PhysicalUnit::parse(&signal.physical_unit).ok_or_else(|| ConvertError::UnsupportedUnit {
            role,
            unit: signal.physical_unit.clone(),
        })?;

    Ok(ResolvedChannel {
        role,
        index: signal.index,
        sample_rate: signal.sample_rate(),
        scale: unit.microvolt_scale(),
    })
}
