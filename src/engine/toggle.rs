use crate::models::{PrayerField, PrayerSlot};

/// Flips one field of a prayer slot.
///
/// Marking jamat also marks prayed; clearing prayed also clears jamat, so
/// `{prayed: false, jamat: true}` is never produced.
pub fn toggle_outcome(slot: PrayerSlot, field: PrayerField) -> PrayerSlot {
    match field {
        PrayerField::Jamat if !slot.jamat => PrayerSlot { prayed: true, jamat: true },
        PrayerField::Jamat => PrayerSlot { jamat: false, ..slot },
        PrayerField::Prayed if slot.prayed => PrayerSlot { prayed: false, jamat: false },
        PrayerField::Prayed => PrayerSlot { prayed: true, ..slot },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: PrayerSlot = PrayerSlot { prayed: false, jamat: false };
    const ALONE: PrayerSlot = PrayerSlot { prayed: true, jamat: false };
    const JAMAT: PrayerSlot = PrayerSlot { prayed: true, jamat: true };

    #[test]
    fn transitions() {
        assert_eq!(toggle_outcome(NONE, PrayerField::Prayed), ALONE);
        assert_eq!(toggle_outcome(NONE, PrayerField::Jamat), JAMAT);
        assert_eq!(toggle_outcome(ALONE, PrayerField::Jamat), JAMAT);
        assert_eq!(toggle_outcome(ALONE, PrayerField::Prayed), NONE);
        assert_eq!(toggle_outcome(JAMAT, PrayerField::Jamat), ALONE);
        assert_eq!(toggle_outcome(JAMAT, PrayerField::Prayed), NONE);
    }

    #[test]
    fn never_reaches_jamat_without_prayer() {
        let fields = [PrayerField::Prayed, PrayerField::Jamat];
        let mut frontier = vec![NONE];
        let mut seen = vec![NONE];
        while let Some(slot) = frontier.pop() {
            for field in fields {
                let next = toggle_outcome(slot, field);
                assert!(!(next.jamat && !next.prayed), "reached {:?}", next);
                if !seen.contains(&next) {
                    seen.push(next);
                    frontier.push(next);
                }
            }
        }
        assert_eq!(seen.len(), 3);
    }
}
