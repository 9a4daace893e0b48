use super::field_text;
use crate::events::Callback;
use crate::user::{User, UserField, UserProps};
use crate::view::{EventsMap, ViewTemplate};
use rand::Rng;
use std::rc::Rc;

/// Editable form for a user
///
/// Clicking `.set-age` assigns a new age drawn from the form's age source,
/// which defaults to a random age below 100.
pub struct UserForm {
    next_age: Rc<dyn Fn() -> u32>,
}

impl UserForm {
    pub fn new() -> Self {
        Self::with_age_source(|| rand::thread_rng().gen_range(0..100))
    }

    pub fn with_age_source<F>(next_age: F) -> Self
    where
        F: Fn() -> u32 + 'static,
    {
        Self {
            next_age: Rc::new(next_age),
        }
    }

    fn on_button_click() {
        tracing::info!("hi there");
    }

    fn on_header_hover() {
        tracing::info!("header was hovered over!");
    }
}

impl Default for UserForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTemplate<UserProps> for UserForm {
    fn template(&self, user: &User) -> String {
        format!(
            concat!(
                r#"<div class="user-form">"#,
                r#"<h1>User Form</h1>"#,
                r#"<div class="user-name">User name: {}</div>"#,
                r#"<div class="user-age">User age: {}</div>"#,
                r#"<input />"#,
                r#"<button class="say-hi">Click Me!</button>"#,
                r#"<button class="set-age">Set Random Age</button>"#,
                r#"</div>"#,
            ),
            field_text(user, UserField::Name),
            field_text(user, UserField::Age),
        )
    }

    fn events_map(&self, user: &Rc<User>) -> EventsMap {
        let set_age: Callback = {
            let user = Rc::clone(user);
            let next_age = Rc::clone(&self.next_age);
            Rc::new(move || {
                let age = next_age();
                tracing::debug!("Setting age to {}", age);
                user.set(UserProps::default().with_age(age));
            })
        };

        vec![
            ("click:.say-hi".to_string(), Rc::new(Self::on_button_click) as Callback),
            ("mouseenter:h1".to_string(), Rc::new(Self::on_header_hover) as Callback),
            ("click:.set-age".to_string(), set_age),
        ]
    }
}
