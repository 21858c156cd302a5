use serde::Serialize;

/// Every bookable time of day, in display order.
pub const SLOT_CATALOG: [&str; 16] = [
    "08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", //
    "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00", "17:30",
];

pub fn is_catalog_slot(time: &str) -> bool {
    SLOT_CATALOG.contains(&time)
}

/// Availability of one catalog slot on a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotAvailability {
    pub time: &'static str,
    pub available: bool,
    /// Name on the appointment holding the slot, when taken.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupied_by: Option<String>,
}

impl SlotAvailability {
    pub fn free(time: &'static str) -> Self {
        Self {
            time,
            available: true,
            occupied_by: None,
        }
    }

    pub fn taken(time: &'static str, occupant: impl Into<String>) -> Self {
        Self {
            time,
            available: false,
            occupied_by: Some(occupant.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(SLOT_CATALOG.len(), 16);
        assert_eq!(SLOT_CATALOG[0], "08:00");
        assert_eq!(SLOT_CATALOG[7], "11:30");
        assert_eq!(SLOT_CATALOG[8], "14:00");
        assert_eq!(SLOT_CATALOG[15], "17:30");

        let mut sorted = SLOT_CATALOG;
        sorted.sort();
        assert_eq!(sorted, SLOT_CATALOG);
    }

    #[test]
    fn test_is_catalog_slot() {
        assert!(is_catalog_slot("09:30"));
        assert!(!is_catalog_slot("12:00"));
        assert!(!is_catalog_slot("9:30"));
        assert!(!is_catalog_slot(""));
    }
}
