//! HTML rendering for the server-side pages.
//!
//! Pages are plain `format!` templates. Every piece of user-controlled text
//! goes through [`escape`] before it is written.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::domain::{Game, GameDetails, User, UserProfile};

pub(crate) const ALREADY_LOGGED: &str = "You are already logged! Try to log out from homepage.";
pub(crate) const EMPTY_SEARCH: &str = "Error: search field was empty.";
pub(crate) const PROFILE_NOT_FOUND: &str = "Profile not found.";
pub(crate) const GAME_NOT_FOUND: &str = "Game not found.";

/// Escape text for HTML element and attribute content.
pub(crate) fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

/// Bytes escaped in a single path segment: everything but unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a single path segment for links and redirects.
pub(crate) fn path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

fn layout(view: &str, title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\"><title>{title} | GameNest</title></head>\
<body data-view=\"{view}\"><nav><a href=\"/\">Home</a> \
<form action=\"/search\" method=\"get\" style=\"display:inline\">\
<input type=\"text\" name=\"content_search\"><button type=\"submit\">Search</button></form></nav>\
<main>{body}</main></body></html>",
        title = escape(title),
    )
}

fn message(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("<p class=\"message\">{}</p>", escape(text))
    }
}

fn user_link(user: &User) -> String {
    let name = user.username().as_ref();
    format!(
        "<a href=\"/profile/{}\">{}</a>",
        path_segment(name),
        escape(name)
    )
}

fn game_link(game: &Game) -> String {
    let name = game.name().as_ref();
    format!(
        "<a href=\"/game/{}\">{}</a>",
        path_segment(name),
        escape(name)
    )
}

fn list<T>(items: &[T], empty: &str, render: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return format!("<p>{}</p>", escape(empty));
    }
    let entries: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", render(item)))
        .collect();
    format!("<ul>{entries}</ul>")
}

fn disabled(flag: bool) -> &'static str {
    if flag { " disabled" } else { "" }
}

pub(crate) fn index(user: Option<&User>, latest: &[Game]) -> String {
    let greeting = match user {
        Some(user) => format!(
            "<p>Welcome back, {}! <a href=\"/logout\">Logout</a></p>",
            user_link(user)
        ),
        None => "<p><a href=\"/login\">Login</a> or <a href=\"/registration\">Register</a></p>"
            .to_owned(),
    };
    let releases = list(latest, "No Games", |game| {
        format!("{} ({})", game_link(game), game.release_date())
    });
    layout(
        "index",
        "Home",
        &format!("<h1>GameNest</h1>{greeting}<h2>Latest releases</h2>{releases}"),
    )
}

pub(crate) fn login(text: &str, disable_input: bool) -> String {
    let off = disabled(disable_input);
    layout(
        "login",
        "Login",
        &format!(
            "<h1>Login</h1>{}<form action=\"/verifyLogin\" method=\"post\">\
<input type=\"text\" name=\"username\" placeholder=\"Username\"{off}>\
<input type=\"password\" name=\"password\" placeholder=\"Password\"{off}>\
<button type=\"submit\"{off}>Login</button></form>",
            message(text)
        ),
    )
}

pub(crate) fn registration(text: &str, disable_input: bool) -> String {
    let off = disabled(disable_input);
    layout(
        "registration",
        "Registration",
        &format!(
            "<h1>Registration</h1>{}<form action=\"/save\" method=\"post\">\
<input type=\"text\" name=\"username\" placeholder=\"Username\"{off}>\
<input type=\"password\" name=\"password\" placeholder=\"Password\"{off}>\
<input type=\"password\" name=\"confirmPassword\" placeholder=\"Confirm Password\"{off}>\
<button type=\"submit\"{off}>Register</button></form>",
            message(text)
        ),
    )
}

pub(crate) fn registration_success(user: &User) -> String {
    layout(
        "registrationSuccess",
        "Welcome",
        &format!(
            "<h1>Registration completed</h1><p>Welcome {}! You can now <a href=\"/login\">login</a>.</p>",
            escape(user.username().as_ref())
        ),
    )
}

/// What the search page shows.
pub(crate) enum SearchOutcome<'a> {
    Blank,
    Results { users: &'a [User], games: &'a [Game] },
}

pub(crate) fn search(outcome: SearchOutcome<'_>) -> String {
    let body = match outcome {
        SearchOutcome::Blank => format!("<h1>Search</h1>{}", message(EMPTY_SEARCH)),
        SearchOutcome::Results { users, games } => format!(
            "<h1>Search</h1><h2>Users</h2>{}<h2>Games</h2>{}",
            list(users, "No Users", user_link),
            list(games, "No Games", game_link)
        ),
    };
    layout("search", "Search", &body)
}

/// Viewer-dependent flags for the profile page.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ProfileFlags {
    pub is_logged: bool,
    pub is_my_profile: bool,
    pub is_already_followed: bool,
}

pub(crate) fn profile(profile: &UserProfile, flags: ProfileFlags) -> String {
    let name = profile.user.username().as_ref();
    let mut body = format!("<h1>{}</h1>", escape(name));
    if flags.is_my_profile {
        body.push_str(
            "<h2>Change password</h2><form action=\"/changePassword\" method=\"post\">\
<input type=\"password\" name=\"oldPassword\" placeholder=\"Old password\">\
<input type=\"password\" name=\"newPassword\" placeholder=\"New password\">\
<button type=\"submit\">Change</button></form>",
        );
    } else if flags.is_already_followed {
        body.push_str("<p>You follow this user.</p>");
    } else if flags.is_logged {
        body.push_str(&format!(
            "<form action=\"/addUser\" method=\"post\">\
<input type=\"hidden\" name=\"followedToAdd\" value=\"{}\">\
<button type=\"submit\">Follow</button></form>",
            escape(name)
        ));
    }
    body.push_str(&format!(
        "<h2>Following</h2>{}<h2>Followers</h2>{}<h2>Games</h2>{}",
        list(&profile.followed, "No Users", user_link),
        list(&profile.followers, "No Users", user_link),
        list(&profile.games, "No Games", game_link)
    ));
    layout("profile", name, &body)
}

pub(crate) fn game(details: &GameDetails, is_logged: bool, is_already_liked: bool) -> String {
    let game = &details.game;
    let name = game.name().as_ref();
    let mut body = format!(
        "<h1>{}</h1><p>{}</p><p>Released {}</p>",
        escape(name),
        escape(game.description()),
        game.release_date()
    );
    if is_already_liked {
        body.push_str("<p>You like this game.</p>");
    } else if is_logged {
        body.push_str(&format!(
            "<form action=\"/addGame\" method=\"post\">\
<input type=\"hidden\" name=\"gameToAdd\" value=\"{}\">\
<button type=\"submit\">Like</button></form>",
            escape(name)
        ));
    }
    body.push_str(&format!(
        "<h2>Liked by</h2>{}",
        list(&details.likers, "No Users", user_link)
    ));
    layout("game", name, &body)
}

pub(crate) fn password_changed(user: &User) -> String {
    layout(
        "passwordChanged",
        "Password changed",
        &format!(
            "<h1>Password changed</h1><p>Back to {}.</p>",
            user_link(user)
        ),
    )
}

pub(crate) fn password_error(text: &str) -> String {
    layout(
        "passwordError",
        "Password error",
        &format!("<h1>Password not changed</h1>{}", message(text)),
    )
}

pub(crate) fn not_found(view: &str, text: &str) -> String {
    layout(view, "Not found", &format!("<h1>Not found</h1>{}", message(text)))
}

pub(crate) fn unauthorized(text: &str) -> String {
    layout(
        "unauthorized401",
        "Unauthorized",
        &format!(
            "<h1>Unauthorized</h1>{}<p><a href=\"/login\">Login</a></p>",
            message(text)
        ),
    )
}

pub(crate) fn error(text: &str) -> String {
    layout("error", "Error", &format!("<h1>Error</h1>{}", message(text)))
}
