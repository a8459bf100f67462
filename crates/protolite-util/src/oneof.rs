//! Exclusivity for oneof field groups.
//!
//! A oneof is a tagged union stored as several optional fields, at most one of
//! which may be present. [`OneOf`] is built once per union definition and
//! holds only the member names; it is applied to any message that implements
//! [`FieldSet`].
//!
//! "Last write wins" is explicit: a `FieldSet` reports names in assignment
//! order, and re-assigning a field moves it to the end. [`OneOf::get`] scans
//! that order backwards.

use std::sync::Arc;

/// The message-instance surface a [`OneOf`] needs.
pub trait FieldSet {
    /// Names of fields set on this instance, oldest assignment first.
    ///
    /// Re-assigning a field must move it to the end.
    fn field_names(&self) -> impl DoubleEndedIterator<Item = &str>;

    /// Whether `name` currently holds a non-absent value.
    fn is_present(&self, name: &str) -> bool;

    /// Remove `name` from the instance. Removing an unset field is a no-op.
    fn clear_field(&mut self, name: &str);
}

/// Getter/setter pair for one oneof group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OneOf {
    fields: Arc<[String]>,
}

impl OneOf {
    /// Build the accessor for a union with the given member names.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Member names, in declaration order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether `name` is a member of this group.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// The most recently assigned member that is present on `msg`.
    pub fn get<M: FieldSet>(&self, msg: &M) -> Option<&str> {
        msg.field_names()
            .rev()
            .filter(|name| msg.is_present(name))
            .find_map(|name| self.fields.iter().find(|f| *f == name))
            .map(String::as_str)
    }

    /// Clear every member except `name`.
    ///
    /// `name` is not checked for membership; passing a non-member clears the
    /// whole group.
    pub fn set<M: FieldSet>(&self, msg: &mut M, name: &str) {
        for field in self.fields.iter().filter(|f| *f != name) {
            msg.clear_field(field);
        }
    }

    /// Clear every member.
    pub fn clear<M: FieldSet>(&self, msg: &mut M) {
        for field in self.fields.iter() {
            msg.clear_field(field);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
