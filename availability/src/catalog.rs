//! The Slot Catalog: the fixed ordered list of bookable time labels for one
//! operating day. Injected configuration, never a module-level singleton, so
//! deployments with a different midday gap coexist as values.

use schedule::model::SlotLabel;

/// Default operating day: half-hour slots 06:00..20:00 with a lunch gap
/// between 11:30 and 13:00.
pub const STANDARD_SLOTS: [&str; 27] = [
    "06:00", "06:30", "07:00", "07:30", "08:00", "08:30", "09:00", "09:30", "10:00", "10:30",
    "11:00", "11:30", "13:00", "13:30", "14:00", "14:30", "15:00", "15:30", "16:00", "16:30",
    "17:00", "17:30", "18:00", "18:30", "19:00", "19:30", "20:00",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCatalog {
    labels: Vec<SlotLabel>,
}

impl SlotCatalog {
    /// Build a catalog from caller-supplied labels.
    ///
    /// Labels must be non-empty, parse as `HH:MM`, and be strictly ascending.
    pub fn new(labels: Vec<SlotLabel>) -> anyhow::Result<Self> {
        if labels.is_empty() {
            anyhow::bail!("slot catalog must not be empty");
        }

        for pair in labels.windows(2) {
            if pair[0] >= pair[1] {
                anyhow::bail!(
                    "slot catalog labels must be strictly ascending: {} >= {}",
                    pair[0],
                    pair[1]
                );
            }
        }

        if let Some(bad) = labels.iter().find(|l| l.time().is_none()) {
            anyhow::bail!("slot catalog label is not a valid HH:MM time: {}", bad);
        }

        Ok(Self { labels })
    }

    /// The 27-slot default operating day.
    pub fn standard() -> Self {
        Self {
            labels: STANDARD_SLOTS.iter().map(|s| SlotLabel::new(*s)).collect(),
        }
    }

    /// A copy of this catalog with one label removed. Used for deployments
    /// that drop a slot (e.g. no 13:00) instead of duplicating the constant.
    pub fn without(&self, label: &str) -> Self {
        Self {
            labels: self
                .labels
                .iter()
                .filter(|l| l.as_str() != label)
                .cloned()
                .collect(),
        }
    }

    pub fn labels(&self) -> &[SlotLabel] {
        &self.labels
    }

    pub fn contains(&self, label: &SlotLabel) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// The immediately-following slot in catalog order. `None` for the last
    /// slot or for labels not in the catalog (no wraparound).
    pub fn next_after(&self, label: &SlotLabel) -> Option<&SlotLabel> {
        let idx = self.labels.iter().position(|l| l == label)?;
        self.labels.get(idx + 1)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_has_27_slots_with_lunch_gap() {
        let catalog = SlotCatalog::standard();
        assert_eq!(catalog.len(), 27);
        assert_eq!(
            catalog.next_after(&SlotLabel::new("11:30")),
            Some(&SlotLabel::new("13:00"))
        );
    }

    #[test]
    fn without_produces_the_26_slot_variant() {
        let catalog = SlotCatalog::standard().without("13:00");
        assert_eq!(catalog.len(), 26);
        assert!(!catalog.contains(&SlotLabel::new("13:00")));
        assert_eq!(
            catalog.next_after(&SlotLabel::new("11:30")),
            Some(&SlotLabel::new("13:30"))
        );
    }

    #[test]
    fn next_after_last_slot_is_none() {
        let catalog = SlotCatalog::standard();
        assert_eq!(catalog.next_after(&SlotLabel::new("20:00")), None);
    }

    #[test]
    fn next_after_unknown_label_is_none() {
        let catalog = SlotCatalog::standard();
        assert_eq!(catalog.next_after(&SlotLabel::new("12:00")), None);
    }

    #[test]
    fn new_rejects_empty_and_unordered() {
        assert!(SlotCatalog::new(vec![]).is_err());
        assert!(
            SlotCatalog::new(vec![SlotLabel::new("10:00"), SlotLabel::new("09:00")]).is_err()
        );
        assert!(
            SlotCatalog::new(vec![SlotLabel::new("09:00"), SlotLabel::new("banana")]).is_err()
        );
    }
}
