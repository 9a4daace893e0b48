use super::field_text;
use crate::user::{User, UserField, UserProps};
use crate::view::ViewTemplate;

/// Read-only summary of a user
#[derive(Debug, Default)]
pub struct UserShow;

impl ViewTemplate<UserProps> for UserShow {
    fn template(&self, user: &User) -> String {
        format!(
            r#"<div class="user-show"><h1>User Detail</h1><div class="user-name">User Name: {}</div><div class="user-age">User Age: {}</div></div>"#,
            field_text(user, UserField::Name),
            field_text(user, UserField::Age),
        )
    }
}
