use crate::config::MonitorConfig;
use disastercore::feeds::{NewsClient, QuakeClient, StubFireFeed};
use disastercore::pipeline::state::DashboardState;
use disastercore::pipeline::{fire, news, quake};

/// Summary of one headless refresh cycle, ready for stdout and the report
/// file.
#[derive(Debug, Clone)]
pub struct CycleResult {
    pub quake_count: usize,
    pub strongest_magnitude: Option<f64>,
    pub news_count: usize,
    pub quake_message: Option<String>,
    pub news_message: Option<String>,
}

impl CycleResult {
    pub fn report_line(&self) -> String {
        let strongest = self
            .strongest_magnitude
            .map(|m| format!("{:.1}", m))
            .unwrap_or_else(|| "-".to_string());
        let mut line = format!(
            "quakes={} strongest={} news={}",
            self.quake_count, strongest, self.news_count
        );
        if let Some(message) = &self.quake_message {
            line.push_str(&format!(" quake_note=\"{}\"", message));
        }
        if let Some(message) = &self.news_message {
            line.push_str(&format!(" news_note=\"{}\"", message));
        }
        line
    }
}

/// Drives the core pipelines without a UI, the way the dashboard would.
pub struct Runner {
    config: MonitorConfig,
    quake_client: QuakeClient,
    news_client: NewsClient,
    fire_feed: StubFireFeed,
}

impl Runner {
    pub fn new(config: MonitorConfig) -> Self {
        let quake_client = match &config.quake_endpoint {
            Some(endpoint) => QuakeClient::with_endpoint(endpoint.clone()),
            None => QuakeClient::new(),
        };
        let api_key = config
            .news_api_key
            .clone()
            .or_else(|| std::env::var("NEWSAPI_KEY").ok());
        let news_client = match &config.news_endpoint {
            Some(endpoint) => NewsClient::with_endpoint(endpoint.clone(), api_key),
            None => NewsClient::new(api_key),
        };
        Self {
            config,
            quake_client,
            news_client,
            fire_feed: StubFireFeed,
        }
    }

    /// Runs one full refresh cycle: quakes, fires, then news. Headless mode
    /// has no reason to interleave them, so they are awaited in turn.
    pub async fn cycle(&self, state: &mut DashboardState) -> CycleResult {
        let filters = self.config.to_filter_state();

        let quake_token = quake::begin(state);
        let quake_outcome = quake::fetch(&self.quake_client, filters).await;
        quake::apply(state, quake_token, quake_outcome);

        let fire_outcome = fire::run(&self.fire_feed).await;
        fire::apply(state, fire_outcome);

        if let Some(news_token) = news::begin(state, &self.news_client) {
            let news_outcome = news::fetch(&self.news_client).await;
            news::apply(state, news_token, news_outcome);
        }

        summarize(state)
    }
}

/// Condenses the dashboard state into one report entry.
pub fn summarize(state: &DashboardState) -> CycleResult {
    let quakes = state.quake_panel().entries();
    let strongest_magnitude = quakes
        .iter()
        .filter_map(|event| event.magnitude)
        .fold(None, |best: Option<f64>, magnitude| {
            Some(best.map_or(magnitude, |b| b.max(magnitude)))
        });
    CycleResult {
        quake_count: quakes.len(),
        strongest_magnitude,
        news_count: state.news_panel().entries().len(),
        quake_message: state.quake_panel().message().map(str::to_string),
        news_message: state.news_panel().message().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use disastercore::feeds::QuakeEvent;
    use disastercore::map::LatLng;
    use disastercore::pipeline::quake;

    fn event(magnitude: Option<f64>) -> QuakeEvent {
        QuakeEvent {
            position: LatLng::new(39.0, 35.0),
            depth_km: 10.0,
            magnitude,
            place: Some("X".to_string()),
            occurred_at: None,
            detail_url: String::new(),
        }
    }

    #[test]
    fn summarize_counts_entries_and_strongest_magnitude() {
        let mut state = DashboardState::new();
        let token = quake::begin(&mut state);
        quake::apply(
            &mut state,
            token,
            Ok(vec![event(Some(4.1)), event(Some(6.2)), event(None)]),
        );
        let result = summarize(&state);
        assert_eq!(result.quake_count, 3);
        assert_eq!(result.strongest_magnitude, Some(6.2));
        assert!(result.quake_message.is_none());
    }

    #[test]
    fn summarize_carries_panel_messages() {
        let mut state = DashboardState::new();
        let token = quake::begin(&mut state);
        quake::apply(&mut state, token, Ok(Vec::new()));
        let result = summarize(&state);
        assert_eq!(result.quake_count, 0);
        assert_eq!(result.quake_message.as_deref(), Some(quake::EMPTY_MESSAGE));
    }

    #[test]
    fn report_line_is_one_parseable_record() {
        let result = CycleResult {
            quake_count: 2,
            strongest_magnitude: Some(6.2),
            news_count: 5,
            quake_message: None,
            news_message: Some("News API key is not configured.".to_string()),
        };
        let line = result.report_line();
        assert!(line.starts_with("quakes=2 strongest=6.2 news=5"));
        assert!(line.contains("news_note="));
    }
}
