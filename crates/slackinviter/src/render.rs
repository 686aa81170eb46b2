// Page rendering
//
// The home page and the sign-in page are small enough to build with
// `format!`. Every interpolated value goes through `escape`.

use std::fmt::Write as _;

use slackinviter_core::{DirectorySnapshot, Visitor};

/// Minimal HTML escaping for text and double-quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Everything the invite form shows.
#[derive(Debug, Clone)]
pub struct IndexPage {
    pub site_key: String,
    pub user_count: u64,
    pub active_count: u64,
    pub team_name: String,
    pub team_icon: String,
    pub coc_url: String,
    pub visitor: Option<Visitor>,
}

impl IndexPage {
    pub fn new(snapshot: &DirectorySnapshot, site_key: &str, coc_url: &str, visitor: Option<Visitor>) -> Self {
        Self {
            site_key: site_key.to_owned(),
            user_count: snapshot.total_count,
            active_count: snapshot.active_count,
            team_name: snapshot.workspace_name.clone(),
            team_icon: snapshot.icon_url.clone(),
            coc_url: coc_url.to_owned(),
            visitor,
        }
    }

    pub fn render(&self) -> String {
        let name = escape(&self.team_name);

        let icon = if self.team_icon.is_empty() {
            String::new()
        } else {
            format!(
                r#"<img class="logo" src="{}" alt="{name}">"#,
                escape(&self.team_icon)
            )
        };

        let mut counts = format!("<b>{}</b> users are registered so far.", self.user_count);
        if self.active_count > 0 {
            let _ = write!(counts, " <b>{}</b> are online now.", self.active_count);
        }

        let (email, full_name) = self.visitor.as_ref().map_or((String::new(), String::new()), |v| {
            (
                escape(v.email.as_deref().unwrap_or_default()),
                escape(v.name.as_deref().unwrap_or_default()),
            )
        });
        let greeting = if full_name.is_empty() {
            String::new()
        } else {
            format!("<p class=\"greeting\">Signed in as {full_name}</p>")
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Join {name} on Slack!</title>
  <script src="https://www.google.com/recaptcha/api.js" async defer></script>
</head>
<body>
  <div class="splash">
    {icon}
    <p>Join <b>{name}</b> on Slack.</p>
    <p class="status">{counts}</p>
    {greeting}
    <form id="invite">
      <input type="text" name="fname" placeholder="First name" autofocus>
      <input type="text" name="lname" placeholder="Last name">
      <input type="email" name="email" placeholder="you@yourdomain.com" value="{email}">
      <label><input type="checkbox" name="coc" value="1">
        I agree to the <a href="{coc}" target="_blank" rel="noopener">Code of Conduct</a>.</label>
      <div class="g-recaptcha" data-sitekey="{site_key}"></div>
      <button class="loading">Get my Invite</button>
    </form>
  </div>
  <script src="/static/client.js"></script>
</body>
</html>
"#,
            coc = escape(&self.coc_url),
            site_key = escape(&self.site_key),
        )
    }
}

/// Shown instead of the form to visitors without an active session.
pub fn sign_in_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Sign in required</title>
</head>
<body>
  <div class="splash">
    <p>You need to sign in before requesting an invite.</p>
    <a class="button" href="/.ory/ui/login">Sign in</a>
  </div>
</body>
</html>
"#
    .to_owned()
}
