//! Fixed definitions: compboards, zones, keycards, ships, supervisor printers
//! and the five stages. Runtime state never adds or removes entries; it only
//! carries per-id flags merged onto these lists.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::CoreError;
use crate::ids::BoardId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Checkmate,
    Orbituary,
    Ruin,
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Checkmate, Zone::Orbituary, Zone::Ruin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkmate => "checkmate",
            Self::Orbituary => "orbituary",
            Self::Ruin => "ruin",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Checkmate => "Checkmate",
            Self::Orbituary => "Orbituary",
            Self::Ruin => "Ruin Station",
        }
    }

    /// The stage completed by collecting every board in this zone.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Checkmate => Stage::Checkmate,
            Self::Orbituary => Stage::Orbituary,
            Self::Ruin => Stage::RuinStation,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Keycard {
    Red,
    Blue,
    Crypt,
}

impl Keycard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Crypt => "crypt",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardDef {
    pub id: BoardId,
    pub label: String,
    pub location: String,
    pub zone: Zone,
    /// Cards needed to reach the board. Empty means none; duplicates are real
    /// (two blue cards for one board).
    #[serde(default)]
    pub keycards: Vec<Keycard>,
}

impl BoardDef {
    fn new(id: u32, location: &str, zone: Zone, keycards: &[Keycard]) -> Self {
        Self {
            id: BoardId::new(id),
            label: format!("Board {id}"),
            location: location.to_string(),
            zone,
            keycards: keycards.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipVariantKind {
    Military,
    Stealth,
}

impl ShipVariantKind {
    pub const ALL: [ShipVariantKind; 2] = [ShipVariantKind::Military, ShipVariantKind::Stealth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Military => "military",
            Self::Stealth => "stealth",
        }
    }
}

/// One claimable ship variant. `id` is `"{ship}-{variant}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipVariantDef {
    pub id: String,
    pub ship: String,
    pub variant: ShipVariantKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterDef {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    SupervisorKeycards = 1,
    Checkmate = 2,
    Orbituary = 3,
    RuinStation = 4,
    ExecutiveHangar = 5,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::SupervisorKeycards,
        Stage::Checkmate,
        Stage::Orbituary,
        Stage::RuinStation,
        Stage::ExecutiveHangar,
    ];

    pub fn number(&self) -> u8 {
        *self as u8
    }

    pub fn zone(&self) -> Option<Zone> {
        match self {
            Self::Checkmate => Some(Zone::Checkmate),
            Self::Orbituary => Some(Zone::Orbituary),
            Self::RuinStation => Some(Zone::Ruin),
            Self::SupervisorKeycards | Self::ExecutiveHangar => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::SupervisorKeycards => "Supervisor Keycards",
            Self::Checkmate => "Checkmate",
            Self::Orbituary => "Orbituary",
            Self::RuinStation => "Ruin Station",
            Self::ExecutiveHangar => "Executive Hangar",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SupervisorKeycards => {
                "Visit PYAM-SUPVISR outposts to print red keycards needed for locked areas in each zone."
            }
            Self::Checkmate => {
                "Contested zone. Collect compboards from the Hangar Area, Server Room, and behind the Red Door."
            }
            Self::Orbituary => {
                "Contested zone. Collect compboards from the Storage Bay and behind Fuse/Blue Doors."
            }
            Self::RuinStation => {
                "Contested zone. Collect compboards from the Crypt and behind the Vault (Timer Door)."
            }
            Self::ExecutiveHangar => {
                "Wait for the green phase, then insert all 7 compboards into the terminal and claim your ship."
            }
        }
    }
}

/// Every fixed list the tracker merges runtime state onto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub boards: Vec<BoardDef>,
    pub ships: Vec<String>,
    pub printers: Vec<PrinterDef>,
}

impl Default for Catalog {
    fn default() -> Self {
        use Keycard::*;
        use Zone::*;
        Self {
            boards: vec![
                BoardDef::new(1, "Hangar Area", Checkmate, &[Red]),
                BoardDef::new(2, "Server Room", Checkmate, &[Blue]),
                BoardDef::new(3, "Behind Red Door", Checkmate, &[Blue]),
                BoardDef::new(4, "Storage Bay", Orbituary, &[Red]),
                BoardDef::new(7, "Behind Fuse/Blue Doors", Orbituary, &[Red, Blue, Blue]),
                BoardDef::new(5, "Crypt", Ruin, &[Crypt]),
                BoardDef::new(6, "Vault (Timer Door)", Ruin, &[]),
            ],
            ships: [
                "F8C Lightning",
                "F7A Hornet Mk II",
                "Corsair",
                "Cutlass Black",
                "Syulen",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            printers: vec![
                PrinterDef {
                    id: "sv-34".into(),
                    label: "PYAM-SUPVISR-3-4".into(),
                },
                PrinterDef {
                    id: "sv-35".into(),
                    label: "PYAM-SUPVISR-3-5".into(),
                },
            ],
        }
    }
}

impl Catalog {
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = BTreeSet::new();
        for board in &self.boards {
            if !seen.insert(board.id) {
                return Err(CoreError::InvalidCatalog(format!("duplicate board id {}", board.id)));
            }
        }
        for zone in Zone::ALL {
            if !self.boards.iter().any(|b| b.zone == zone) {
                return Err(CoreError::InvalidCatalog(format!(
                    "zone {} has no boards",
                    zone.as_str()
                )));
            }
        }
        let mut seen = BTreeSet::new();
        for ship in &self.ships {
            if !seen.insert(ship.as_str()) {
                return Err(CoreError::InvalidCatalog(format!("duplicate ship {ship}")));
            }
        }
        if self.printers.is_empty() {
            return Err(CoreError::InvalidCatalog("no supervisor printers".into()));
        }
        let mut seen = BTreeSet::new();
        for printer in &self.printers {
            if !seen.insert(printer.id.as_str()) {
                return Err(CoreError::InvalidCatalog(format!(
                    "duplicate printer id {}",
                    printer.id
                )));
            }
        }
        Ok(())
    }

    pub fn board(&self, id: BoardId) -> Option<&BoardDef> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn boards_in(&self, zone: Zone) -> impl Iterator<Item = &BoardDef> {
        self.boards.iter().filter(move |b| b.zone == zone)
    }

    /// Every ship crossed with every variant kind, in definition order.
    pub fn ship_variants(&self) -> Vec<ShipVariantDef> {
        self.ships
            .iter()
            .flat_map(|ship| {
                ShipVariantKind::ALL.into_iter().map(move |variant| ShipVariantDef {
                    id: format!("{ship}-{}", variant.as_str()),
                    ship: ship.clone(),
                    variant,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_valid() {
        let catalog = Catalog::default();
        catalog.validate().unwrap();
        assert_eq!(catalog.boards.len(), 7);
        assert_eq!(catalog.boards_in(Zone::Checkmate).count(), 3);
        assert_eq!(catalog.boards_in(Zone::Orbituary).count(), 2);
        assert_eq!(catalog.boards_in(Zone::Ruin).count(), 2);
    }

    #[test]
    fn board_seven_needs_two_blue_cards() {
        let catalog = Catalog::default();
        let board = catalog.board(BoardId::new(7)).unwrap();
        assert_eq!(board.keycards.iter().filter(|k| **k == Keycard::Blue).count(), 2);
        assert!(board.keycards.contains(&Keycard::Red));
        assert!(catalog.board(BoardId::new(6)).unwrap().keycards.is_empty());
    }

    #[test]
    fn ship_variants_cross_product() {
        let variants = Catalog::default().ship_variants();
        assert_eq!(variants.len(), 10);
        assert_eq!(variants[0].id, "F8C Lightning-military");
        assert_eq!(variants[1].id, "F8C Lightning-stealth");
        assert_eq!(variants[9].variant, ShipVariantKind::Stealth);
    }

    #[test]
    fn duplicate_board_rejected() {
        let mut catalog = Catalog::default();
        catalog.boards.push(catalog.boards[0].clone());
        assert!(matches!(catalog.validate(), Err(CoreError::InvalidCatalog(_))));
    }

    #[test]
    fn empty_zone_rejected() {
        let mut catalog = Catalog::default();
        catalog.boards.retain(|b| b.zone != Zone::Ruin);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn stages_map_to_zones() {
        for zone in Zone::ALL {
            assert_eq!(zone.stage().zone(), Some(zone));
        }
        assert_eq!(Stage::ExecutiveHangar.number(), 5);
        assert_eq!(Stage::ExecutiveHangar.zone(), None);
    }

    #[test]
    fn keycards_default_to_empty_when_absent() {
        let board: BoardDef = serde_json::from_str(
            r#"{"id": 9, "label": "Board 9", "location": "Dock", "zone": "ruin"}"#,
        )
        .unwrap();
        assert!(board.keycards.is_empty());
        assert_eq!(board.id, BoardId::new(9));
    }
}
