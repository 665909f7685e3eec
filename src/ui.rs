use crate::widget::WidgetState;

pub fn render_widget(state: &WidgetState) -> String {
    let (pill_class, login_class, name, tag, initials) = match &state.user {
        Some(user) => {
            let username = user.username.as_deref().filter(|name| !name.is_empty());
            (
                "user-pill",
                "btn-login hidden",
                username.unwrap_or("User").to_string(),
                user_tag(user.id),
                initials(username),
            )
        }
        None => (
            "user-pill hidden",
            "btn-login",
            String::new(),
            String::new(),
            String::new(),
        ),
    };

    let balance = state
        .balance
        .map(|value| format!("{value} dbx"))
        .unwrap_or_else(|| "--".to_string());
    let streak = state
        .streak
        .map(|value| value.to_string())
        .unwrap_or_else(|| "--".to_string());
    let (cooldown, daily_attrs) = match state.next_claim_in.filter(|secs| *secs > 0) {
        Some(secs) => (cooldown_label(secs), r#"class="btn-daily disabled" disabled"#),
        None => (String::new(), r#"class="btn-daily""#),
    };
    let log = state
        .log
        .iter()
        .map(|line| format!("[{}] {}", line.at, line.message))
        .collect::<Vec<_>>()
        .join("\n");

    INDEX_HTML
        .replace("{{PILL_CLASS}}", pill_class)
        .replace("{{LOGIN_CLASS}}", login_class)
        .replace("{{USER_NAME}}", &escape_html(&name))
        .replace("{{USER_TAG}}", &escape_html(&tag))
        .replace("{{INITIALS}}", &escape_html(&initials))
        .replace("{{BALANCE}}", &escape_html(&balance))
        .replace("{{STREAK}}", &streak)
        .replace("{{COOLDOWN}}", &cooldown)
        .replace("{{DAILY_ATTRS}}", daily_attrs)
        .replace("{{STATUS}}", &escape_html(&state.status))
        .replace("{{LOG}}", &escape_html(&log))
}

/// `#` plus the last four digits of the id.
pub fn user_tag(id: u64) -> String {
    let digits = id.to_string();
    let tail = &digits[digits.len().saturating_sub(4)..];
    format!("#{tail}")
}

pub fn initials(username: Option<&str>) -> String {
    username
        .unwrap_or("DB")
        .chars()
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

pub fn cooldown_label(secs: u64) -> String {
    format!("Next daily in ~{} min", secs.div_ceil(60))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Doodlebucks</title>
  <style>
    :root {
      --bg: #f4f1fb;
      --ink: #25213b;
      --accent: #7c5cff;
      --muted: #77718f;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(37, 33, 59, 0.14);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, var(--bg), #e7e0ff 70%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px;
    }

    .app {
      width: min(620px, 100%);
      background: var(--card);
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
    }

    h1 {
      margin: 0;
      font-size: 1.8rem;
    }

    .user-pill {
      display: flex;
      align-items: center;
      gap: 10px;
      padding: 6px 14px 6px 6px;
      border-radius: 999px;
      background: white;
    }

    .avatar {
      width: 34px;
      height: 34px;
      border-radius: 50%;
      display: grid;
      place-items: center;
      background: var(--accent);
      color: white;
      font-weight: 600;
    }

    .user-id {
      color: var(--muted);
      font-size: 0.85rem;
    }

    .balance {
      font-size: 2.4rem;
      font-weight: 600;
    }

    .meta {
      color: var(--muted);
    }

    .actions {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    button {
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--ink);
      color: white;
    }

    .btn-daily,
    .btn-login {
      background: var(--accent);
    }

    button.disabled {
      opacity: 0.45;
      cursor: not-allowed;
    }

    .hidden {
      display: none;
    }

    .log {
      margin: 0;
      max-height: 220px;
      overflow-y: auto;
      background: #1d1a2e;
      color: #d9d4f5;
      border-radius: 14px;
      padding: 14px;
      font-size: 0.85rem;
      white-space: pre-wrap;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Doodlebucks</h1>
      <form method="post" action="/ui/login">
        <button id="login-btn" class="{{LOGIN_CLASS}}" type="submit">Login with Discord</button>
      </form>
      <div id="user-pill" class="{{PILL_CLASS}}">
        <span id="user-avatar" class="avatar">{{INITIALS}}</span>
        <span id="user-name">{{USER_NAME}}</span>
        <span id="user-id" class="user-id">{{USER_TAG}}</span>
      </div>
    </header>

    <section>
      <div id="balance-amount" class="balance">{{BALANCE}}</div>
      <div id="streak-text" class="meta">Streak: {{STREAK}}</div>
      <div id="cooldown-text" class="meta">{{COOLDOWN}}</div>
    </section>

    <section class="actions">
      <form method="post" action="/ui/daily">
        <button id="daily-btn" {{DAILY_ATTRS}} type="submit">Claim daily</button>
      </form>
      <form method="post" action="/ui/refresh">
        <button id="refresh-btn" type="submit">Refresh balance</button>
      </form>
      <form method="post" action="/ui/health">
        <button id="health-btn" type="submit">Check API</button>
      </form>
    </section>

    <p id="status-text" class="meta">{{STATUS}}</p>
    <pre id="log-box" class="log">{{LOG}}</pre>
  </main>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClaimResponse, User};

    #[test]
    fn logged_out_page_shows_placeholders() {
        let html = render_widget(&WidgetState::default());
        assert!(html.contains(r#"class="user-pill hidden""#));
        assert!(html.contains(r#"id="login-btn" class="btn-login""#));
        assert!(html.contains(r#"<div id="balance-amount" class="balance">--</div>"#));
        assert!(html.contains("Streak: --"));
        assert!(html.contains(r#"id="daily-btn" class="btn-daily" type="submit""#));
    }

    #[test]
    fn logged_in_page_shows_user_and_cooldown() {
        let state = WidgetState::default()
            .with_user(User::demo())
            .with_claim(&ClaimResponse {
                allowed: true,
                balance: 850,
                streak: 4,
                next_claim_in: Some(86_400),
            });
        let html = render_widget(&state);

        assert!(html.contains(r#"id="user-pill" class="user-pill""#));
        assert!(html.contains("btn-login hidden"));
        assert!(html.contains(">DemoUser<"));
        assert!(html.contains(">#3456<"));
        assert!(html.contains(">DE<"));
        assert!(html.contains("850 dbx"));
        assert!(html.contains("Streak: 4"));
        assert!(html.contains("Next daily in ~1440 min"));
        assert!(html.contains(r#"class="btn-daily disabled" disabled"#));
    }

    #[test]
    fn user_without_name_falls_back() {
        let state = WidgetState::default().with_user(User { id: 42, username: None });
        let html = render_widget(&state);
        assert!(html.contains(">User<"));
        assert!(html.contains(">DB<"));
        assert!(html.contains(">#42<"));
    }

    #[test]
    fn log_and_status_are_escaped() {
        let state = WidgetState::default()
            .with_status("<b>API issue</b>")
            .with_log("10:00:00", "first")
            .with_log("10:00:01", "Health: {\"status\":\"<x>\"}");
        let html = render_widget(&state);
        assert!(html.contains("&lt;b&gt;API issue&lt;/b&gt;"));
        assert!(html.contains("[10:00:01] Health: {&quot;status&quot;:&quot;&lt;x&gt;&quot;}\n[10:00:00] first"));
    }

    #[test]
    fn cooldown_label_rounds_minutes_up() {
        assert_eq!(cooldown_label(1), "Next daily in ~1 min");
        assert_eq!(cooldown_label(60), "Next daily in ~1 min");
        assert_eq!(cooldown_label(61), "Next daily in ~2 min");
        assert_eq!(cooldown_label(86_399), "Next daily in ~1440 min");
    }

    #[test]
    fn initials_are_uppercased() {
        assert_eq!(initials(Some("zoe")), "ZO");
        assert_eq!(initials(Some("z")), "Z");
        assert_eq!(initials(None), "DB");
    }
}
