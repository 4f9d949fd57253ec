//! Hebrew notification message rendering.
//!
//! Messages are rendered from `minijinja` templates with the acting
//! user's display name and the task title as context. The application is
//! Hebrew-localised; the templates are the UI-facing strings.

use crate::board::domain::NotificationKind;
use minijinja::{Environment, context};

const ASSIGNMENT_TEMPLATE: &str = "{{ actor }} הקצה לך משימה חדשה: {{ title }}";
const HANDLER_TEMPLATE: &str = "{{ actor }} מינה אותך כמטפל במשימה: {{ title }}";
const MENTION_TEMPLATE: &str = "{{ actor }} תייג אותך בתגובה למשימה: {{ title }}";
const COMMENT_TEMPLATE: &str = "{{ actor }} הגיב על המשימה: {{ title }}";

/// Renders the message body for a notification kind.
pub(crate) fn render(
    kind: NotificationKind,
    actor: &str,
    title: &str,
) -> Result<String, minijinja::Error> {
    let template = match kind {
        NotificationKind::Assignment => ASSIGNMENT_TEMPLATE,
        NotificationKind::Handler => HANDLER_TEMPLATE,
        NotificationKind::Mention => MENTION_TEMPLATE,
        NotificationKind::Comment => COMMENT_TEMPLATE,
    };
    let environment = Environment::new();
    environment.render_str(template, context! { actor => actor, title => title })
}
