use chrono::{DateTime, Local, Utc};
use disastercore::feeds::{FireDetection, NewsArticle, NewsClient, QuakeClient, QuakeEvent, StubFireFeed};
use disastercore::map::{GroupId, LatLng, MapSurface, Shape, Viewport};
use disastercore::pipeline::{
    fire, news, quake, DashboardState, PanelContent, PipelineKind, RefreshController, RequestToken,
    Trigger, ViewKind, REFRESH_INTERVAL,
};
use disastercore::prelude::FeedError;
use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};

fn main() -> iced::Result {
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    "Disaster Map Dashboard".into()
}

fn application_subscription(_: &Dashboard) -> Subscription<Message> {
    time::every(REFRESH_INTERVAL).map(|_| Message::RefreshTick)
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Dashboard {
    state: DashboardState,
    controller: RefreshController,
    form: FilterForm,
    status: String,
    quake_client: QuakeClient,
    news_client: NewsClient,
    fire_feed: StubFireFeed,
}

#[derive(Debug, Clone)]
enum Message {
    RefreshTick,
    FilterFieldChanged(FilterField, String),
    ApplyFilters,
    SelectView(ViewKind),
    FocusQuake(usize),
    QuakesFetched(RequestToken, Result<Vec<QuakeEvent>, FeedError>),
    NewsFetched(RequestToken, Result<Vec<NewsArticle>, FeedError>),
    FiresFetched(Result<Vec<FireDetection>, FeedError>),
}

#[derive(Debug, Clone, Copy)]
enum FilterField {
    MinMagnitude,
    MaxCount,
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        let mut dashboard = Dashboard {
            state: DashboardState::new(),
            controller: RefreshController::new(),
            form: FilterForm::default(),
            status: "Loading feeds...".into(),
            quake_client: QuakeClient::new(),
            news_client: NewsClient::from_env(),
            fire_feed: StubFireFeed,
        };
        let task = dashboard.run_trigger(Trigger::Startup);
        (dashboard, task)
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::RefreshTick => {
                // the periodic cycle re-reads whatever is in the inputs
                state
                    .controller
                    .apply_inputs(&state.form.min_magnitude, &state.form.max_count);
                state.run_trigger(Trigger::Periodic)
            }
            Message::FilterFieldChanged(field, value) => {
                state.form.update_field(field, value);
                Task::none()
            }
            Message::ApplyFilters => {
                let filters = state
                    .controller
                    .apply_inputs(&state.form.min_magnitude, &state.form.max_count);
                state.status = format!(
                    "Filters applied: magnitude >= {}, limit {}",
                    filters.min_magnitude, filters.max_count
                );
                state.run_trigger(Trigger::ApplyFilters)
            }
            Message::SelectView(view) => {
                state.state.select_view(view);
                Task::none()
            }
            Message::FocusQuake(index) => {
                quake::focus(&mut state.state, index);
                Task::none()
            }
            Message::QuakesFetched(token, outcome) => {
                if state.state.quake_token_is_current(token) {
                    state.status = match &outcome {
                        Ok(events) => format!("Earthquakes updated: {} events", events.len()),
                        Err(err) => format!("Earthquake feed error: {}", err),
                    };
                }
                quake::apply(&mut state.state, token, outcome);
                Task::none()
            }
            Message::NewsFetched(token, outcome) => {
                news::apply(&mut state.state, token, outcome);
                Task::none()
            }
            Message::FiresFetched(outcome) => {
                fire::apply(&mut state.state, outcome);
                Task::none()
            }
        }
    }

    /// Launches every pipeline the trigger fans out to; the tasks run
    /// independently and complete in any order.
    fn run_trigger(&mut self, trigger: Trigger) -> Task<Message> {
        let mut tasks = Vec::new();
        for kind in trigger.pipelines() {
            match kind {
                PipelineKind::Quake => {
                    let token = quake::begin(&mut self.state);
                    let client = self.quake_client.clone();
                    let filters = self.controller.filters();
                    tasks.push(Task::perform(
                        async move { quake::fetch(&client, filters).await },
                        move |outcome| Message::QuakesFetched(token, outcome),
                    ));
                }
                PipelineKind::Fire => {
                    let feed = self.fire_feed;
                    tasks.push(Task::perform(
                        async move { fire::run(&feed).await },
                        Message::FiresFetched,
                    ));
                }
                PipelineKind::News => {
                    if let Some(token) = news::begin(&mut self.state, &self.news_client) {
                        let client = self.news_client.clone();
                        tasks.push(Task::perform(
                            async move { news::fetch(&client).await },
                            move |outcome| Message::NewsFetched(token, outcome),
                        ));
                    }
                }
            }
        }
        Task::batch(tasks)
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let active = state.state.active_view();
        let toggles = row![
            button("Earthquakes")
                .on_press(Message::SelectView(ViewKind::Quakes))
                .style(if active == ViewKind::Quakes {
                    button::primary
                } else {
                    button::secondary
                })
                .padding(8),
            button("Fires")
                .on_press(Message::SelectView(ViewKind::Fires))
                .style(if active == ViewKind::Fires {
                    button::primary
                } else {
                    button::secondary
                })
                .padding(8),
        ]
        .spacing(8);

        let sidebar = column![
            text("Filters").size(26),
            text_input("Minimum magnitude", &state.form.min_magnitude)
                .on_input(|value| Message::FilterFieldChanged(FilterField::MinMagnitude, value))
                .padding(6),
            text_input("Max results", &state.form.max_count)
                .on_input(|value| Message::FilterFieldChanged(FilterField::MaxCount, value))
                .padding(6),
            button("Apply filters")
                .on_press(Message::ApplyFilters)
                .padding(10),
            toggles,
            text("Earthquakes").size(16),
            Container::new(scrollable(quake_panel(state)).height(Length::Fixed(260.0))).padding(6),
            text("News").size(16),
            Container::new(scrollable(news_panel(state)).height(Length::Fixed(220.0))).padding(6),
            text(&state.status).size(12),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(380.0));

        let map_canvas = Canvas::new(MapCanvas {
            surface: state.state.map().clone(),
        })
        .width(Length::Fill)
        .height(Length::Fill);

        let map_column = column![text("Disaster Map").size(26), map_canvas]
            .spacing(10)
            .padding(16)
            .width(Length::Fill);

        let layout = row![sidebar, map_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn quake_panel(state: &Dashboard) -> Column<'_, Message> {
    match state.state.quake_panel() {
        PanelContent::Loading => Column::new().push(text("Loading...").size(12)),
        PanelContent::Message(message) => Column::new().push(text(message.clone()).size(12)),
        PanelContent::Entries(events) => {
            events
                .iter()
                .enumerate()
                .fold(Column::new().spacing(4), |col, (index, event)| {
                    col.push(
                        button(
                            column![
                                text(format!(
                                    "{} • M {}",
                                    event.place_label(),
                                    event.magnitude_label()
                                ))
                                .size(13),
                                text(format_local(event.occurred_at)).size(11),
                            ]
                            .spacing(2),
                        )
                        .on_press(Message::FocusQuake(index))
                        .style(button::text)
                        .padding(4)
                        .width(Length::Fill),
                    )
                })
        }
    }
}

fn news_panel(state: &Dashboard) -> Column<'_, Message> {
    match state.state.news_panel() {
        PanelContent::Loading => Column::new().push(text("Loading...").size(12)),
        PanelContent::Message(message) => Column::new().push(text(message.clone()).size(12)),
        PanelContent::Entries(articles) => {
            articles
                .iter()
                .fold(Column::new().spacing(6), |col, article| {
                    col.push(
                        column![
                            text(article.title.clone()).size(13),
                            text(format_local(article.published_at)).size(11),
                            text(article.url.clone()).size(11),
                        ]
                        .spacing(2),
                    )
                })
        }
    }
}

fn format_local(stamp: Option<DateTime<Utc>>) -> String {
    stamp
        .map(|stamp| {
            stamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|| "-".into())
}

#[derive(Debug, Clone)]
struct FilterForm {
    min_magnitude: String,
    max_count: String,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self {
            min_magnitude: "3".into(),
            max_count: "50".into(),
        }
    }
}

impl FilterForm {
    fn update_field(&mut self, field: FilterField, value: String) {
        match field {
            FilterField::MinMagnitude => self.min_magnitude = value,
            FilterField::MaxCount => self.max_count = value,
        }
    }
}

/// Square-tile world width at zoom 0, the usual web-map convention.
const TILE_SIZE: f32 = 256.0;
/// Rough meters per degree of latitude, used to size impact circles.
const METERS_PER_DEGREE: f64 = 111_320.0;

const QUAKE_COLOR: Color = Color::from_rgb(0.95, 0.55, 0.2);
const FIRE_COLOR: Color = Color::from_rgb(0.9, 0.3, 0.1);
const CIRCLE_COLOR: Color = Color::from_rgb(0.85, 0.2, 0.2);

/// Equirectangular projection of the viewport onto the canvas.
struct Projector {
    center: LatLng,
    px_per_deg: f32,
    origin: Point,
}

impl Projector {
    fn new(viewport: Viewport, bounds: &Rectangle) -> Self {
        let world_px = TILE_SIZE * 2f32.powf(viewport.zoom as f32);
        Self {
            center: viewport.center,
            px_per_deg: world_px / 360.0,
            origin: Point::new(bounds.width / 2.0, bounds.height / 2.0),
        }
    }

    fn project(&self, position: LatLng) -> Point {
        Point::new(
            self.origin.x + ((position.lng - self.center.lng) as f32) * self.px_per_deg,
            self.origin.y - ((position.lat - self.center.lat) as f32) * self.px_per_deg,
        )
    }

    fn meters_to_px(&self, meters: f64) -> f32 {
        (meters / METERS_PER_DEGREE) as f32 * self.px_per_deg
    }
}

#[derive(Clone)]
struct MapCanvas {
    surface: MapSurface,
}

impl canvas::Program<Message> for MapCanvas {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.04, 0.07, 0.12),
        );

        let projector = Projector::new(self.surface.viewport(), &bounds);
        draw_graticule(&mut frame, &projector, &bounds);

        for id in [GroupId::Fires, GroupId::Quakes] {
            let group = self.surface.group(id);
            if !group.visible() {
                continue;
            }
            let marker_color = match id {
                GroupId::Quakes => QUAKE_COLOR,
                GroupId::Fires => FIRE_COLOR,
            };
            for shape in group.shapes() {
                match shape {
                    Shape::Marker { position, .. } => {
                        let point = projector.project(*position);
                        let marker = Path::new(|builder| builder.circle(point, 4.0));
                        frame.fill(&marker, marker_color);
                    }
                    Shape::Circle { center, radius_m } => {
                        let point = projector.project(*center);
                        let radius = projector.meters_to_px(*radius_m).max(2.0);
                        let circle = Path::new(|builder| builder.circle(point, radius));
                        frame.stroke(
                            &circle,
                            Stroke::default().with_width(1.0).with_color(CIRCLE_COLOR),
                        );
                    }
                }
            }
        }

        if let Some((id, index)) = self.surface.popup() {
            let group = self.surface.group(id);
            if group.visible() {
                if let Some(Shape::Marker { position, popup }) = group.shapes().get(index) {
                    let anchor = projector.project(*position);
                    frame.fill_text(canvas::Text {
                        content: popup.clone(),
                        position: Point::new(anchor.x + 8.0, anchor.y - 8.0),
                        color: Color::WHITE,
                        size: 12.0.into(),
                        ..canvas::Text::default()
                    });
                }
            }
        }

        vec![frame.into_geometry()]
    }
}

fn draw_graticule(frame: &mut Frame, projector: &Projector, bounds: &Rectangle) {
    let stroke = Stroke::default()
        .with_width(1.0)
        .with_color(Color::from_rgb(0.12, 0.16, 0.22));

    for step in (-180..=180).step_by(10) {
        let degrees = step as f64;
        let vertical = projector.project(LatLng::new(projector.center.lat, degrees));
        if vertical.x >= 0.0 && vertical.x <= bounds.width {
            let path = Path::new(|builder| {
                builder.move_to(Point::new(vertical.x, 0.0));
                builder.line_to(Point::new(vertical.x, bounds.height));
            });
            frame.stroke(&path, stroke);
        }
        if (-90..=90).contains(&step) {
            let horizontal = projector.project(LatLng::new(degrees, projector.center.lng));
            if horizontal.y >= 0.0 && horizontal.y <= bounds.height {
                let path = Path::new(|builder| {
                    builder.move_to(Point::new(0.0, horizontal.y));
                    builder.line_to(Point::new(bounds.width, horizontal.y));
                });
                frame.stroke(&path, stroke);
            }
        }
    }
}
