//! Typed attribute storage over a fixed-shape record

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;

/// A fixed-shape record of optional fields
///
/// The field set is closed: `Field` enumerates every key, so lookups of
/// undeclared fields and updates introducing new ones cannot be expressed.
pub trait Record: Clone + Debug + Default + Serialize + DeserializeOwned {
    /// Declared field names
    type Field: Copy + Eq + Debug;
    /// Values any field may hold
    type Value: Clone + PartialEq + Debug;

    /// Current value of `field`, or `None` when absent
    fn get(&self, field: Self::Field) -> Option<Self::Value>;

    /// Overwrite every field that is present in `update`
    fn merge(&mut self, update: Self);

    /// Identifier used to address the record in persistence
    fn id(&self) -> Option<u64>;

    /// Assign the identifier persistence stored the record under
    fn set_id(&mut self, id: u64);
}

/// Holder for one record with bulk read and shallow-merge update
#[derive(Debug, Clone, Default)]
pub struct Attributes<T: Record> {
    data: T,
}

impl<T: Record> Attributes<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }

    pub fn get(&self, field: T::Field) -> Option<T::Value> {
        self.data.get(field)
    }

    /// Merge `update` into the held record; absent fields keep their value
    pub fn set(&mut self, update: T) {
        self.data.merge(update);
    }

    pub fn get_all(&self) -> &T {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::user::{UserField, UserProps, UserValue};

    #[test]
    fn test_get_returns_initial_values() {
        let attrs = Attributes::new(UserProps::default().with_name("myname").with_age(20));
        assert_eq!(
            attrs.get(UserField::Name),
            Some(UserValue::Name("myname".to_string()))
        );
        assert_eq!(attrs.get(UserField::Age), Some(UserValue::Age(20)));
    }

    #[test]
    fn test_absent_field_is_none() {
        let attrs = Attributes::new(UserProps::default().with_name("myname"));
        assert_eq!(attrs.get(UserField::Id), None);
        assert_eq!(attrs.get(UserField::Age), None);
    }

    #[test]
    fn test_set_is_a_shallow_merge() {
        let mut attrs = Attributes::new(UserProps::default().with_name("myname").with_age(20));
        attrs.set(UserProps::default().with_age(21));

        assert_eq!(attrs.get(UserField::Age), Some(UserValue::Age(21)));
        assert_eq!(
            attrs.get(UserField::Name),
            Some(UserValue::Name("myname".to_string()))
        );
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let initial = UserProps::default().with_id(3).with_name("x").with_age(1);
        let mut attrs = Attributes::new(initial.clone());
        attrs.set(UserProps::default());
        assert_eq!(attrs.get_all(), &initial);
    }

    #[test]
    fn test_get_all_reflects_latest_merge() {
        let mut attrs = Attributes::new(UserProps::default());
        attrs.set(UserProps::default().with_id(9));
        attrs.set(UserProps::default().with_name("late"));

        let all = attrs.get_all();
        assert_eq!(all.id, Some(9));
        assert_eq!(all.name.as_deref(), Some("late"));
        assert_eq!(all.age, None);
    }
}
