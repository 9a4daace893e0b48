//! Concrete views over the user model

pub mod user_form;
pub mod user_show;

pub use user_form::UserForm;
pub use user_show::UserShow;

use crate::user::{User, UserField};

/// Escaped text of a user field, empty when absent
pub(crate) fn field_text(user: &User, field: UserField) -> String {
    user.get(field)
        .map(|value| ammonia::clean_text(&value.to_string()))
        .unwrap_or_default()
}
