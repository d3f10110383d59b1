use hangartrack_core::{Catalog, ShipVariantDef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipRecord {
    pub id: String,
    #[serde(default)]
    pub claimed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipVariant {
    pub def: ShipVariantDef,
    pub claimed: bool,
}

/// Claim state for every ship variant in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipTracker {
    ships: Vec<ShipVariant>,
}

impl ShipTracker {
    pub fn from_records(catalog: &Catalog, saved: &[ShipRecord]) -> Self {
        let ships = catalog
            .ship_variants()
            .into_iter()
            .map(|def| {
                let claimed = saved.iter().any(|r| r.id == def.id && r.claimed);
                ShipVariant { def, claimed }
            })
            .collect();
        Self { ships }
    }

    pub fn records(&self) -> Vec<ShipRecord> {
        self.ships
            .iter()
            .map(|s| ShipRecord {
                id: s.def.id.clone(),
                claimed: s.claimed,
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShipVariant> {
        self.ships.iter()
    }

    pub fn get(&self, id: &str) -> Option<&ShipVariant> {
        self.ships.iter().find(|s| s.def.id == id)
    }

    /// Flips `claimed`. Returns false for an unknown id.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.ships.iter_mut().find(|s| s.def.id == id) {
            Some(ship) => {
                ship.claimed = !ship.claimed;
                true
            }
            None => false,
        }
    }

    pub fn reset_all(&mut self) {
        for ship in &mut self.ships {
            ship.claimed = false;
        }
    }

    pub fn total(&self) -> usize {
        self.ships.len()
    }

    pub fn claimed_count(&self) -> usize {
        self.ships.iter().filter(|s| s.claimed).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_merge_by_composite_id() {
        let saved = vec![
            ShipRecord {
                id: "Corsair-stealth".into(),
                claimed: true,
            },
            ShipRecord {
                id: "Corsair-military".into(),
                claimed: false,
            },
            ShipRecord {
                id: "Idris-military".into(),
                claimed: true,
            },
        ];
        let ships = ShipTracker::from_records(&Catalog::default(), &saved);
        assert_eq!(ships.total(), 10);
        assert_eq!(ships.claimed_count(), 1);
        assert!(ships.get("Corsair-stealth").unwrap().claimed);
        assert!(ships.get("Idris-military").is_none());
    }

    #[test]
    fn toggle_and_reset() {
        let mut ships = ShipTracker::from_records(&Catalog::default(), &[]);
        assert!(ships.toggle("Syulen-military"));
        assert!(ships.toggle("F7A Hornet Mk II-stealth"));
        assert!(!ships.toggle("Syulen"));
        assert_eq!(ships.claimed_count(), 2);
        ships.reset_all();
        assert_eq!(ships.claimed_count(), 0);
        assert_eq!(ships.records().len(), 10);
    }
}
