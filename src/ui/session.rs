use crate::models::{GenerationOutput, GenerationResult, MoodRequest, Track};

/// Mood entry form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoodInput {
    pub mood: String,
    pub loading: bool,
    /// Set when an empty submission should put the cursor back in the field.
    pub focus: bool,
}

/// A generated track list and what produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistView {
    pub tracks: Vec<Track>,
    pub mood_description: String,
    pub playlist_url: Option<String>,
    pub dominant_mood: Option<String>,
}

impl PlaylistView {
    fn new(output: GenerationOutput, mood_description: String) -> Self {
        Self {
            playlist_url: output.playlist_url().map(str::to_string),
            dominant_mood: output.dominant_mood().map(str::to_string),
            tracks: output.tracks,
            mood_description,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Input(MoodInput),
    Playlist(PlaylistView),
}

/// One browser session's view state.
///
/// | state           | event               | next            |
/// |-----------------|---------------------|-----------------|
/// | input           | submit (non-blank)  | input (loading) |
/// | input (loading) | success             | playlist        |
/// | input (loading) | failure             | input + error   |
///
/// Back and Try Again leave the playlist by loading `/` again, which starts
/// from `Session::new()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    view: View,
    error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            view: View::Input(MoodInput::default()),
            error: None,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the request to send, or `None` when nothing should be sent:
    /// blank mood, a request already in flight, or not on the input view.
    pub fn submit(&mut self, mood: &str) -> Option<MoodRequest> {
        let View::Input(input) = &mut self.view else {
            return None;
        };
        if input.loading {
            return None;
        }

        input.mood = mood.to_string();

        if mood.trim().is_empty() {
            input.focus = true;
            return None;
        }

        let request = MoodRequest::new(mood).ok()?;
        input.loading = true;
        input.focus = false;
        self.error = None;

        Some(request)
    }

    pub fn resolve(&mut self, result: GenerationResult) {
        let View::Input(input) = &mut self.view else {
            return;
        };
        if !input.loading {
            return;
        }
        input.loading = false;

        match result {
            GenerationResult::Success(output) => {
                let mood = std::mem::take(&mut input.mood);
                self.error = None;
                self.view = View::Playlist(PlaylistView::new(output, mood));
            }
            GenerationResult::Failure { error } => {
                self.error = Some(error);
            }
        }
    }
}
