use crate::feeds::{NewsArticle, QuakeEvent};
use crate::map::{GroupId, MapSurface};
use crate::telemetry::MetricsRecorder;

/// Content of one side list panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent<T> {
    Loading,
    Message(String),
    Entries(Vec<T>),
}

impl<T> PanelContent<T> {
    pub fn entries(&self) -> &[T] {
        match self {
            PanelContent::Entries(entries) => entries,
            _ => &[],
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            PanelContent::Message(message) => Some(message),
            _ => None,
        }
    }
}

/// Token tying one in-flight fetch to the invocation that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Monotonic counter guarding a pipeline against out-of-order responses: a
/// response is applied only while its token is still the latest issued.
#[derive(Debug, Default, Clone)]
struct RequestGeneration {
    latest: u64,
}

impl RequestGeneration {
    fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// Which overlay the user has in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Quakes,
    Fires,
}

/// Explicit application state shared by the pipelines and the UI layer.
///
/// All mutable dashboard state lives here and is reached through accessors,
/// so the pipelines run headless in tests and in the monitor binary.
#[derive(Debug)]
pub struct DashboardState {
    map: MapSurface,
    quake_panel: PanelContent<QuakeEvent>,
    news_panel: PanelContent<NewsArticle>,
    active_view: ViewKind,
    quake_generation: RequestGeneration,
    news_generation: RequestGeneration,
    metrics: MetricsRecorder,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            map: MapSurface::new(),
            quake_panel: PanelContent::Loading,
            news_panel: PanelContent::Loading,
            active_view: ViewKind::Quakes,
            quake_generation: RequestGeneration::default(),
            news_generation: RequestGeneration::default(),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn map(&self) -> &MapSurface {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapSurface {
        &mut self.map
    }

    pub fn quake_panel(&self) -> &PanelContent<QuakeEvent> {
        &self.quake_panel
    }

    pub fn set_quake_panel(&mut self, content: PanelContent<QuakeEvent>) {
        self.quake_panel = content;
    }

    pub fn news_panel(&self) -> &PanelContent<NewsArticle> {
        &self.news_panel
    }

    pub fn set_news_panel(&mut self, content: PanelContent<NewsArticle>) {
        self.news_panel = content;
    }

    pub fn active_view(&self) -> ViewKind {
        self.active_view
    }

    /// Switches the foreground view and mirrors it onto overlay visibility.
    pub fn select_view(&mut self, view: ViewKind) {
        self.active_view = view;
        self.map
            .set_group_visible(GroupId::Quakes, view == ViewKind::Quakes);
        self.map
            .set_group_visible(GroupId::Fires, view == ViewKind::Fires);
    }

    pub fn issue_quake_token(&mut self) -> RequestToken {
        self.quake_generation.issue()
    }

    pub fn quake_token_is_current(&self, token: RequestToken) -> bool {
        self.quake_generation.is_current(token)
    }

    pub fn issue_news_token(&mut self) -> RequestToken {
        self.news_generation.issue()
    }

    pub fn news_token_is_current(&self, token: RequestToken) -> bool {
        self.news_generation.is_current(token)
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_go_stale_when_reissued() {
        let mut state = DashboardState::new();
        let first = state.issue_quake_token();
        assert!(state.quake_token_is_current(first));

        let second = state.issue_quake_token();
        assert!(!state.quake_token_is_current(first));
        assert!(state.quake_token_is_current(second));
    }

    #[test]
    fn quake_and_news_generations_are_independent() {
        let mut state = DashboardState::new();
        let quake = state.issue_quake_token();
        state.issue_news_token();
        assert!(state.quake_token_is_current(quake));
    }

    #[test]
    fn select_view_toggles_overlay_visibility() {
        let mut state = DashboardState::new();
        state.select_view(ViewKind::Fires);
        assert_eq!(state.active_view(), ViewKind::Fires);
        assert!(!state.map().group(GroupId::Quakes).visible());
        assert!(state.map().group(GroupId::Fires).visible());

        state.select_view(ViewKind::Quakes);
        assert!(state.map().group(GroupId::Quakes).visible());
        assert!(!state.map().group(GroupId::Fires).visible());
    }

    #[test]
    fn panel_entries_are_empty_for_messages() {
        let panel: PanelContent<QuakeEvent> = PanelContent::Message("nothing".into());
        assert!(panel.entries().is_empty());
        assert_eq!(panel.message(), Some("nothing"));
    }
}
