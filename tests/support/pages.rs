//! HTML fixtures shaped like the pages Steam serves during OpenID sign-in.

/// Standard OpenID assertion fields used across tests.
pub const OPENID_FIELDS: &[(&str, &str)] = &[
    ("action", "steam_openid_login"),
    ("openid.mode", "checkid_setup"),
    ("openidparams", "eyJvcGVuaWQuZ"),
    ("nonce", "6a1f0c9e2b"),
];

/// Steam's auto-submit page with the given hidden inputs.
#[must_use]
pub fn openid_page(fields: &[(&str, &str)]) -> String {
    let inputs: String = fields
        .iter()
        .map(|(name, value)| {
            format!("\n        <input type=\"hidden\" name=\"{name}\" value=\"{value}\" />")
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Steam Community :: Sign In</title></head>
<body>
    <div class="OpenID_Logo"></div>
    <form name="loginForm" id="openidForm" action="https://steamcommunity.com/openid/login" method="POST">
        <!-- hidden assertion fields -->{inputs}
        <input type="submit" class="btn_green_white_innerfade" id="imageLogin" value="Sign In" />
    </form>
</body>
</html>"#
    )
}

/// Steam's sign-in page shown to logged-out visitors.
#[must_use]
pub fn steam_login_page() -> String {
    r#"<!DOCTYPE html>
<html>
<body>
    <div class="login_box">
        <form id="loginForm" action="https://steamcommunity.com/login/dologin" method="POST">
            <input type="text" name="username" />
            <input type="password" name="password" />
        </form>
    </div>
</body>
</html>"#
        .to_string()
}

/// A page with neither form.
#[must_use]
pub fn unrelated_page() -> String {
    "<!DOCTYPE html><html><body><h1>Welcome</h1><p>Nothing to see.</p></body></html>".to_string()
}
