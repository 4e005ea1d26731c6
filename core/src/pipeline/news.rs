use crate::feeds::news::{NewsArticle, NewsClient};
use crate::pipeline::state::{DashboardState, PanelContent, RequestToken};
use crate::prelude::{FeedError, FeedResult};
use crate::telemetry::LogManager;

pub const KEY_MISSING_MESSAGE: &str = "News API key is not configured.";
pub const FETCH_FAILED_MESSAGE: &str = "News could not be fetched.";
pub const FAILURE_MESSAGE: &str = "News could not be loaded.";

/// Starts a news refresh. With no usable credential this is a configuration
/// error, not a runtime failure: the panel explains it and no network call
/// is made.
pub fn begin(state: &mut DashboardState, client: &NewsClient) -> Option<RequestToken> {
    if !client.is_configured() {
        state.set_news_panel(PanelContent::Message(KEY_MISSING_MESSAGE.to_string()));
        return None;
    }
    state.set_news_panel(PanelContent::Loading);
    Some(state.issue_news_token())
}

pub async fn fetch(client: &NewsClient) -> FeedResult<Vec<NewsArticle>> {
    client.fetch().await
}

/// Applies a fetch outcome; stale tokens are discarded silently. A missing
/// `articles` collection is the soft "could not fetch" path.
pub fn apply(
    state: &mut DashboardState,
    token: RequestToken,
    outcome: FeedResult<Vec<NewsArticle>>,
) {
    let logger = LogManager::new();
    if !state.news_token_is_current(token) {
        state.metrics().record_stale_discard();
        logger.debug("discarding stale news response");
        return;
    }

    match outcome {
        Ok(articles) => {
            state.metrics().record_fetch();
            logger.record(&format!("news feed applied: {} articles", articles.len()));
            state.set_news_panel(PanelContent::Entries(articles));
        }
        Err(FeedError::Malformed(detail)) => {
            state.metrics().record_failure();
            logger.warn(&format!("news response malformed: {}", detail));
            state.set_news_panel(PanelContent::Message(FETCH_FAILED_MESSAGE.to_string()));
        }
        Err(err) => {
            state.metrics().record_failure();
            logger.error(&format!("news feed error: {}", err));
            state.set_news_panel(PanelContent::Message(FAILURE_MESSAGE.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::news::PLACEHOLDER_KEY;

    fn article(title: &str) -> NewsArticle {
        NewsArticle {
            title: title.to_string(),
            published_at: None,
            url: "http://example.com".to_string(),
        }
    }

    #[test]
    fn begin_without_key_shows_config_message_and_issues_no_token() {
        let mut state = DashboardState::new();
        let client = NewsClient::new(None);
        assert!(begin(&mut state, &client).is_none());
        assert_eq!(state.news_panel().message(), Some(KEY_MISSING_MESSAGE));
    }

    #[test]
    fn begin_with_placeholder_key_behaves_like_unset() {
        let mut state = DashboardState::new();
        let client = NewsClient::new(Some(PLACEHOLDER_KEY.to_string()));
        assert!(begin(&mut state, &client).is_none());
        assert_eq!(state.news_panel().message(), Some(KEY_MISSING_MESSAGE));
    }

    #[test]
    fn begin_with_key_sets_loading() {
        let mut state = DashboardState::new();
        let client = NewsClient::new(Some("abc123".to_string()));
        let token = begin(&mut state, &client);
        assert!(token.is_some());
        assert!(matches!(state.news_panel(), PanelContent::Loading));
    }

    #[test]
    fn apply_success_lists_articles() {
        let mut state = DashboardState::new();
        let client = NewsClient::new(Some("abc123".to_string()));
        let token = begin(&mut state, &client).unwrap();
        apply(&mut state, token, Ok(vec![article("a"), article("b")]));
        assert_eq!(state.news_panel().entries().len(), 2);
    }

    #[test]
    fn apply_malformed_shows_fetch_failed_message() {
        let mut state = DashboardState::new();
        let client = NewsClient::new(Some("abc123".to_string()));
        let token = begin(&mut state, &client).unwrap();
        apply(
            &mut state,
            token,
            Err(FeedError::Malformed("no articles".into())),
        );
        assert_eq!(state.news_panel().message(), Some(FETCH_FAILED_MESSAGE));
    }

    #[test]
    fn apply_transport_error_shows_failure_message() {
        let mut state = DashboardState::new();
        let client = NewsClient::new(Some("abc123".to_string()));
        let token = begin(&mut state, &client).unwrap();
        apply(&mut state, token, Err(FeedError::Transport("timeout".into())));
        assert_eq!(state.news_panel().message(), Some(FAILURE_MESSAGE));
    }

    #[test]
    fn stale_news_response_is_discarded() {
        let mut state = DashboardState::new();
        let client = NewsClient::new(Some("abc123".to_string()));
        let stale = begin(&mut state, &client).unwrap();
        let fresh = begin(&mut state, &client).unwrap();
        apply(&mut state, fresh, Ok(vec![article("fresh")]));
        apply(&mut state, stale, Ok(vec![article("stale")]));
        assert_eq!(state.news_panel().entries().len(), 1);
        assert_eq!(state.news_panel().entries()[0].title, "fresh");
    }
}
