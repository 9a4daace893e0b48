//! User record used by the demo views and CLI

use crate::attributes::Record;
use crate::config::ApiConfig;
use crate::error::SyncResult;
use crate::model::Model;
use crate::sync::HttpPersistence;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Attributes of a user; every field may be absent until fetched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

impl UserProps {
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    Name,
    Age,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValue {
    Id(u64),
    Name(String),
    Age(u32),
}

impl fmt::Display for UserValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserValue::Id(id) => write!(f, "{}", id),
            UserValue::Name(name) => f.write_str(name),
            UserValue::Age(age) => write!(f, "{}", age),
        }
    }
}

impl Record for UserProps {
    type Field = UserField;
    type Value = UserValue;

    fn get(&self, field: UserField) -> Option<UserValue> {
        match field {
            UserField::Id => self.id.map(UserValue::Id),
            UserField::Name => self.name.clone().map(UserValue::Name),
            UserField::Age => self.age.map(UserValue::Age),
        }
    }

    fn merge(&mut self, update: Self) {
        if update.id.is_some() {
            self.id = update.id;
        }
        if update.name.is_some() {
            self.name = update.name;
        }
        if update.age.is_some() {
            self.age = update.age;
        }
    }

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }
}

/// Observable user model
pub type User = Model<UserProps>;

impl Model<UserProps> {
    /// Build a user persisted over HTTP at the configured endpoint
    pub fn build_user(attrs: UserProps, api: &ApiConfig) -> SyncResult<Rc<User>> {
        let persistence = HttpPersistence::from_config(api)?;
        Ok(Rc::new(Model::new(attrs, Rc::new(persistence))))
    }
}
