use super::MeetingDb;
use crate::error::StoreError;
use crate::types::{InsertMeetingType, MeetingType};

impl MeetingDb {
    // =========================================================================
    // Meeting types (reference data, no update path)
    // =========================================================================

    pub fn get_meeting_types(&self) -> Vec<MeetingType> {
        self.meeting_types.values().cloned().collect()
    }

    /// Add a meeting type. `value` is a unique key.
    pub fn create_meeting_type(
        &mut self,
        input: InsertMeetingType,
    ) -> Result<MeetingType, StoreError> {
        if self.meeting_types.values().any(|t| t.value == input.value) {
            return Err(StoreError::DuplicateMeetingType(input.value));
        }
        Ok(self
            .meeting_types
            .insert_with(|id| MeetingType {
                id,
                label: input.label,
                value: input.value,
            })
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::db::test_utils::test_db;
    use crate::error::StoreError;
    use crate::types::InsertMeetingType;

    fn input(label: &str, value: &str) -> InsertMeetingType {
        InsertMeetingType {
            label: label.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_create_meeting_type() {
        let mut db = test_db();
        let demo = db.create_meeting_type(input("Product Demo", "product-demo")).unwrap();
        assert_eq!(demo.id, 1);
        assert_eq!(db.get_meeting_types(), vec![demo]);
    }

    #[test]
    fn test_duplicate_value_rejected() {
        let mut db = test_db();
        db.create_meeting_type(input("Product Demo", "product-demo")).unwrap();
        let err = db
            .create_meeting_type(input("Demo (again)", "product-demo"))
            .unwrap_err();
        assert_eq!(err, StoreError::DuplicateMeetingType("product-demo".to_string()));
        assert_eq!(db.meeting_type_count(), 1);
    }
}
