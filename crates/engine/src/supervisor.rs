use std::collections::BTreeMap;

use hangartrack_core::{Catalog, PrinterDef};

/// Which supervisor keycards have been printed. Persisted as
/// `{printer id: bool}`, separately from the printers' cooldown timers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorCards {
    printers: Vec<PrinterDef>,
    collected: BTreeMap<String, bool>,
}

impl SupervisorCards {
    pub fn from_map(catalog: &Catalog, collected: BTreeMap<String, bool>) -> Self {
        Self {
            printers: catalog.printers.clone(),
            collected,
        }
    }

    pub fn as_map(&self) -> &BTreeMap<String, bool> {
        &self.collected
    }

    pub fn printers(&self) -> &[PrinterDef] {
        &self.printers
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.printers.iter().any(|p| p.id == id)
    }

    pub fn is_collected(&self, id: &str) -> bool {
        self.collected.get(id).copied().unwrap_or(false)
    }

    /// Flips the card for a known printer. Returns false for an unknown id.
    pub fn toggle(&mut self, id: &str) -> bool {
        if !self.is_known(id) {
            return false;
        }
        let flipped = !self.is_collected(id);
        self.collected.insert(id.to_string(), flipped);
        true
    }

    pub fn collected_count(&self) -> usize {
        self.printers.iter().filter(|p| self.is_collected(&p.id)).count()
    }

    pub fn all_collected(&self) -> bool {
        self.printers.iter().all(|p| self.is_collected(&p.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_printers_needed() {
        let mut cards = SupervisorCards::from_map(&Catalog::default(), BTreeMap::new());
        assert!(!cards.all_collected());
        assert!(cards.toggle("sv-34"));
        assert!(!cards.all_collected());
        assert!(cards.toggle("sv-35"));
        assert!(cards.all_collected());
        assert_eq!(cards.collected_count(), 2);
    }

    #[test]
    fn unknown_printer_is_ignored() {
        let mut cards = SupervisorCards::from_map(&Catalog::default(), BTreeMap::new());
        assert!(!cards.toggle("sv-99"));
        assert!(cards.as_map().is_empty());
    }

    #[test]
    fn double_toggle_restores() {
        let mut saved = BTreeMap::new();
        saved.insert("sv-34".to_string(), true);
        let mut cards = SupervisorCards::from_map(&Catalog::default(), saved);
        cards.toggle("sv-34");
        cards.toggle("sv-34");
        assert!(cards.is_collected("sv-34"));
    }
}
