//! Zone asset and tooltip catalog.
//!
//! Static descriptive text for the zones and modifiers the governor is
//! known to emit. Overlay UI looks tooltips up here; the reducer never
//! consults it, so an unlisted zone or modifier still folds normally and
//! simply gets generic text.

use std::collections::BTreeSet;

use serde::Serialize;

/// Descriptive record for a known zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneEntry {
    /// Zone name as it appears on the wire.
    pub name: &'static str,
    /// Display title.
    pub title: &'static str,
    /// One-paragraph description.
    pub blurb: &'static str,
}

/// Descriptive record for a known modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierEntry {
    /// Modifier name as it appears on the wire.
    pub name: &'static str,
    /// What the modifier does to a zone.
    pub description: &'static str,
}

/// Tooltip line for one modifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifierNote {
    /// Modifier name.
    pub name: String,
    /// Modifier description.
    pub description: String,
}

/// Everything an overlay needs to describe a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneTooltip {
    /// Zone name.
    pub zone: String,
    /// Display title.
    pub title: String,
    /// Zone description.
    pub summary: String,
    /// Whether the zone appears in the catalog.
    pub catalogued: bool,
    /// Modifier notes, sorted by name.
    pub modifiers: Vec<ModifierNote>,
}

const UNCHARTED_SUMMARY: &str = "Uncharted zone. No survey data has been filed for it yet.";
const UNKNOWN_MODIFIER: &str = "Unclassified effect reported by the governor.";

static ZONES: &[ZoneEntry] = &[
    ZoneEntry {
        name: "Zone-Α",
        title: "Aurora Basin",
        blurb: "A shallow basin lit by slow auroral sheets. The usual starting point of a run.",
    },
    ZoneEntry {
        name: "Zone-Β",
        title: "Basalt Steppe",
        blurb: "Wind-cut plains of dark stone where agents travel far between resources.",
    },
    ZoneEntry {
        name: "Zone-Γ",
        title: "Glass Reef",
        blurb: "A fused-silica shelf that refracts everything. Navigation errors are common.",
    },
    ZoneEntry {
        name: "Zone-Δ",
        title: "Delta Archive",
        blurb: "Braided channels around the ruins of a records vault.",
    },
    ZoneEntry {
        name: "Zone-Σ",
        title: "Sigma Spire",
        blurb: "A lone vertical structure the governor watches closely for policy drift.",
    },
    ZoneEntry {
        name: "Zone-Ω",
        title: "Omega Threshold",
        blurb: "The edge of the simulated world. Modifiers accumulate quickly here.",
    },
];

static MODIFIERS: &[ModifierEntry] = &[
    ModifierEntry {
        name: "Entropy Bloom",
        description: "Structures decay faster while the bloom persists.",
    },
    ModifierEntry {
        name: "Gravity Well",
        description: "Movement out of the zone costs extra ticks.",
    },
    ModifierEntry {
        name: "Luminous Cascade",
        description: "Light floods the zone; visibility and discovery rates rise.",
    },
    ModifierEntry {
        name: "Resonant Core",
        description: "Shared knowledge spreads between agents in the zone.",
    },
    ModifierEntry {
        name: "Silent Field",
        description: "Communication actions fail inside the zone.",
    },
    ModifierEntry {
        name: "Temporal Drift",
        description: "Tick pacing in the zone diverges from the world clock.",
    },
];

/// Every catalogued zone.
pub fn zones() -> &'static [ZoneEntry] {
    ZONES
}

/// Every catalogued modifier.
pub fn modifiers() -> &'static [ModifierEntry] {
    MODIFIERS
}

/// Look up a zone by wire name.
pub fn zone_entry(name: &str) -> Option<&'static ZoneEntry> {
    ZONES.iter().find(|entry| entry.name == name)
}

/// Look up a modifier by wire name.
pub fn modifier_entry(name: &str) -> Option<&'static ModifierEntry> {
    MODIFIERS.iter().find(|entry| entry.name == name)
}

/// Build the tooltip for a zone carrying the given modifiers.
///
/// Duplicate modifiers collapse to one note.
pub fn tooltip<'a, I>(zone: &str, modifiers: I) -> ZoneTooltip
where
    I: IntoIterator<Item = &'a str>,
{
    let entry = zone_entry(zone);
    let notes = modifiers
        .into_iter()
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(|name| ModifierNote {
            name: name.to_owned(),
            description: modifier_entry(name)
                .map_or(UNKNOWN_MODIFIER, |m| m.description)
                .to_owned(),
        })
        .collect();

    ZoneTooltip {
        zone: zone.to_owned(),
        title: entry.map_or(zone, |e| e.title).to_owned(),
        summary: entry.map_or(UNCHARTED_SUMMARY, |e| e.blurb).to_owned(),
        catalogued: entry.is_some(),
        modifiers: notes,
    }
}
