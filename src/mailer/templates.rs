//! Built-in mail templates.

use super::{MailError, TemplateData};
use crate::config::TEMPLATE_USER_INVITATION;

/// Subject and HTML body of a rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub body: String,
}

/// Render a named template.
pub fn render(template: &str, data: &TemplateData) -> Result<RenderedMail, MailError> {
    match template {
        TEMPLATE_USER_INVITATION => Ok(user_invitation(data)),
        other => Err(MailError::UnknownTemplate(other.to_string())),
    }
}

fn user_invitation(data: &TemplateData) -> RenderedMail {
    RenderedMail {
        subject: "Finish Registration with TeacherApp".to_string(),
        body: format!(
            r#"<!doctype html>
<html>
  <body>
    <p>Hi {username},</p>
    <p>Thanks for signing up for TeacherApp. We're excited to have you on board!</p>
    <p>Before you can start using TeacherApp, you need to confirm your email address.
       Click the link below to confirm your email address:</p>
    <p><a href="{url}">{url}</a></p>
    <p>If you want to activate your account manually, copy and paste the link above into your browser.</p>
    <p>If you didn't sign up for TeacherApp, you can safely ignore this email.</p>
    <p>Thanks,</p>
    <p>The TeacherApp Team</p>
  </body>
</html>
"#,
            username = escape_html(&data.username),
            url = escape_html(&data.activation_url),
        ),
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
