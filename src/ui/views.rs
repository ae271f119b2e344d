use crate::models::Track;
use crate::ui::session::{MoodInput, PlaylistView, Session, View};
use crate::ui::theme::Theme;
use maud::{html, Markup, DOCTYPE};

const MOOD_PREVIEW_CHARS: usize = 60;

/// Full document around the app card.
pub fn page(theme: Theme, session: &Session) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" class=[(theme == Theme::Dark).then_some("dark")] {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Moodify" }
                link rel="stylesheet" href="/assets/style.css";
                script
                    src="https://unpkg.com/htmx.org@2.0.2"
                    integrity="sha384-Y7hw+L/jvKeWIRRkqWYfPcvVxHzVzn5REgzbawhxAuQGwX1XWe70vji+VSeHOThJ"
                    crossorigin="anonymous"
                    {}
                script src="/assets/moodify.js" defer {}
            }
            body {
                (app(session))
            }
        }
    }
}

/// The swappable card. htmx requests get only this.
pub fn app(session: &Session) -> Markup {
    html! {
        div #app .card {
            header {
                div {
                    h1 { "Moodify" }
                    p .muted { "Get personalized playlists based on your mood" }
                }
                (theme_toggle())
            }

            @if let Some(error) = session.error() {
                (error_banner(error))
            }

            @match session.view() {
                View::Input(input) => {
                    (mood_form(input))
                },
                View::Playlist(playlist) => {
                    (playlist_view(playlist))
                },
            }
        }
    }
}

fn theme_toggle() -> Markup {
    html! {
        form method="post" action="/theme" hx-post="/theme" hx-swap="none" {
            button #theme-toggle .theme-toggle type="submit" aria-label="Toggle dark mode" {
                span .sr-only { "Toggle theme" }
                span .moon aria-hidden="true" { "☾" }
                span .sun aria-hidden="true" { "☀" }
            }
        }
    }
}

fn error_banner(message: &str) -> Markup {
    html! {
        div .error-banner role="alert" {
            span { (message) }
            button type="button" data-dismiss aria-label="Dismiss" { "×" }
        }
    }
}

pub fn mood_form(input: &MoodInput) -> Markup {
    html! {
        div .panel {
            form #mood-form
                method="post"
                action="/"
                hx-post="/"
                hx-target="#app"
                hx-swap="outerHTML"
                hx-disabled-elt="find textarea, find button" {
                label for="mood-input" { "How are you feeling today?" }
                textarea #mood-input
                    name="mood"
                    rows="3"
                    placeholder="e.g., I'm feeling energetic and ready to conquer the day!"
                    autofocus[input.focus]
                    disabled[input.loading] {
                    (input.mood)
                }
                button .button.primary type="submit" disabled[input.loading] {
                    @if input.loading {
                        "Generating Playlist..."
                    } @else {
                        span .idle-label { "Generate Playlist" }
                        span .busy-label { "Generating Playlist..." }
                    }
                }
            }
        }
    }
}

pub fn playlist_view(playlist: &PlaylistView) -> Markup {
    html! {
        div .panel {
            div {
                h2 { "Your Personalized Playlist" }
                p .muted {
                    "Based on your mood: \"" (truncate(&playlist.mood_description, MOOD_PREVIEW_CHARS)) "\""
                }
                @if let Some(mood) = &playlist.dominant_mood {
                    span .mood-badge { (mood) }
                }
            }

            @if playlist.tracks.is_empty() {
                div .empty { "No tracks found for your mood. Try a different description." }
            } @else {
                ul .tracks {
                    @for (index, track) in playlist.tracks.iter().enumerate() {
                        (track_row(index, track))
                    }
                }
            }

            @if let Some(url) = &playlist.playlist_url {
                a .button.spotify href=(url) target="_blank" rel="noopener noreferrer" {
                    "Open in Spotify"
                }
            }

            div .actions {
                a .button.outline data-action="back" href="/" hx-get="/" hx-target="#app" hx-swap="outerHTML" {
                    "Back"
                }
                a .button.primary data-action="try-again" href="/" hx-get="/" hx-target="#app" hx-swap="outerHTML" {
                    "Try Again"
                }
            }
        }
    }
}

/// Rows carry their list key so the browser can swap in the placeholder for
/// art that fails to load.
fn track_row(index: usize, track: &Track) -> Markup {
    html! {
        li .track
            data-track-id=(track.key(index))
            style={ "animation-delay: " ((index + 1) * 100) "ms" } {
            div .art {
                @if let Some(src) = track.image_url() {
                    img src=(src)
                        alt=(track.album.as_deref().filter(|a| !a.is_empty()).unwrap_or("Album cover"))
                        width="48"
                        height="48"
                        loading="lazy"
                        onerror="moodifyImageFailed(this)";
                } @else {
                    img .placeholder src="/assets/album-placeholder.svg" alt="" width="48" height="48";
                }
            }
            div .meta {
                div .name { (track.name) }
                div .artists { (track.artist_line()) }
            }
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
