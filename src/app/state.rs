//! The orchestrator: owns the single mutable location/reading/forecast
//! state, sequences resolution and fetches, and applies results only when
//! their generation still matches the latest issued request.

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEventKind};
use tokio::sync::mpsc;

use crate::{
    app::events::{AppEvent, start_refresh_task},
    cli::Cli,
    data::{Pipeline, cities::CityDirectory},
    domain::aqi::{
        AirQualityReading, CityCandidate, ForecastPoint, Location, LocationTier, ReadingSource,
        ResolvedLocation,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Loading,
    Ready,
    Quit,
}

pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub loading_message: String,
    /// Which resolution tier produced the location, surfaced as a banner.
    pub advisory: Option<String>,
    /// Set while the reading on display is the synthetic sample.
    pub data_notice: Option<String>,
    pub location: Option<Location>,
    pub tier: Option<LocationTier>,
    pub reading: Option<AirQualityReading>,
    pub forecast: Vec<ForecastPoint>,
    pub refreshing: bool,
    pub aqi_generation: u64,
    pub forecast_generation: u64,
    pub aqi_pending: bool,
    pub forecast_pending: bool,
    pub picker_open: bool,
    pub picker_query: String,
    pub picker_results: Vec<CityCandidate>,
    pub picker_selected: usize,
    pub searching: bool,
    pub search_seq: u64,
    pipeline: Arc<Pipeline>,
    initial_city: Option<String>,
}

impl AppState {
    pub fn new(cli: &Cli, pipeline: Arc<Pipeline>) -> Self {
        Self {
            mode: AppMode::Loading,
            running: true,
            loading_message: "Initializing...".to_string(),
            advisory: None,
            data_notice: None,
            location: None,
            tier: None,
            reading: None,
            forecast: Vec::new(),
            refreshing: false,
            aqi_generation: 0,
            forecast_generation: 0,
            aqi_pending: false,
            forecast_pending: false,
            picker_open: false,
            picker_query: String::new(),
            picker_results: Vec::new(),
            picker_selected: 0,
            searching: false,
            search_seq: 0,
            pipeline,
            initial_city: cli.city.clone(),
        }
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
        cli: &Cli,
    ) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                cli.validate()?;
                start_refresh_task(tx.clone(), cli.refresh_interval);
                self.start_location_resolve(tx);
            }
            AppEvent::TickRefresh => {
                if self.location.is_some() && self.mode != AppMode::Quit {
                    self.start_aqi_fetch(tx);
                }
            }
            AppEvent::Input(event) => self.handle_input(event, tx).await?,
            AppEvent::LocationResolved(resolved) => self.apply_location(resolved, tx),
            AppEvent::AqiFetched {
                generation,
                reading,
            } => self.apply_reading(generation, reading),
            AppEvent::ForecastFetched { generation, days } => {
                self.apply_forecast(generation, days);
            }
            AppEvent::SearchResults { seq, results } => {
                if seq == self.search_seq {
                    self.searching = false;
                    if self.picker_open {
                        self.picker_results = results;
                        self.picker_selected = 0;
                    }
                }
            }
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
            }
        }

        Ok(())
    }

    fn apply_location(&mut self, resolved: ResolvedLocation, tx: &mpsc::Sender<AppEvent>) {
        self.advisory = resolved.tier.advisory(&resolved.location);
        self.tier = Some(resolved.tier);
        // Superseded wholesale, never merged.
        self.location = Some(resolved.location);
        self.start_aqi_fetch(tx);
        self.start_forecast_fetch(tx);
    }

    fn apply_reading(&mut self, generation: u64, reading: AirQualityReading) {
        if generation != self.aqi_generation {
            // A newer request was issued after this one; drop the stale
            // result instead of letting the last writer win.
            return;
        }
        self.data_notice = (reading.source == ReadingSource::Sample)
            .then(|| "Live air quality unavailable; showing sample data.".to_string());
        self.reading = Some(reading);
        self.aqi_pending = false;
        self.update_mode();
    }

    fn apply_forecast(&mut self, generation: u64, days: Vec<ForecastPoint>) {
        if generation != self.forecast_generation {
            return;
        }
        self.forecast = days;
        self.forecast_pending = false;
        self.update_mode();
    }

    /// The view counts as loaded only once both slots of the current
    /// generation have landed.
    fn update_mode(&mut self) {
        if !self.aqi_pending && !self.forecast_pending {
            if self.mode == AppMode::Loading {
                self.mode = AppMode::Ready;
            }
            self.refreshing = false;
        }
    }

    async fn handle_input(&mut self, event: Event, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if self.picker_open {
            self.handle_picker_key(key.code, tx);
            return Ok(());
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                tx.send(AppEvent::Quit).await?;
            }
            KeyCode::Char('r') => {
                if self.location.is_some() {
                    self.start_aqi_fetch(tx);
                } else {
                    self.start_location_resolve(tx);
                }
            }
            KeyCode::Char('s') | KeyCode::Char('/') => {
                self.open_picker();
            }
            _ => {}
        }

        Ok(())
    }

    fn handle_picker_key(&mut self, code: KeyCode, tx: &mpsc::Sender<AppEvent>) {
        match code {
            KeyCode::Esc => self.close_picker(),
            KeyCode::Enter => self.select_highlighted(tx),
            KeyCode::Up => {
                self.picker_selected = self.picker_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if !self.picker_results.is_empty() {
                    self.picker_selected =
                        (self.picker_selected + 1).min(self.picker_results.len() - 1);
                }
            }
            KeyCode::Backspace => {
                self.picker_query.pop();
                self.start_search(tx);
            }
            KeyCode::Char(c) => {
                self.picker_query.push(c);
                self.start_search(tx);
            }
            _ => {}
        }
    }

    fn open_picker(&mut self) {
        self.picker_open = true;
        self.picker_query.clear();
        self.picker_results.clear();
        self.picker_selected = 0;
        self.searching = false;
    }

    fn close_picker(&mut self) {
        self.picker_open = false;
        self.picker_query.clear();
        self.picker_results.clear();
        self.searching = false;
    }

    fn select_highlighted(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(candidate) = self.picker_results.get(self.picker_selected).cloned() else {
            return;
        };
        self.close_picker();
        self.apply_location(
            ResolvedLocation {
                location: CityDirectory::select(&candidate),
                tier: LocationTier::Manual,
            },
            tx,
        );
    }

    fn start_search(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.search_seq += 1;
        let seq = self.search_seq;

        let query = self.picker_query.trim().to_string();
        if query.is_empty() {
            self.picker_results.clear();
            self.picker_selected = 0;
            self.searching = false;
            return;
        }

        self.searching = true;
        let pipeline = Arc::clone(&self.pipeline);
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let results = pipeline.directory.search(&query).await;
            let _ = tx2.send(AppEvent::SearchResults { seq, results }).await;
        });
    }

    fn start_location_resolve(&mut self, tx: &mpsc::Sender<AppEvent>) {
        self.loading_message = "Detecting your location...".to_string();
        let pipeline = Arc::clone(&self.pipeline);
        let initial_city = self.initial_city.clone();
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let resolved = match initial_city {
                Some(city) => match pipeline.directory.search(&city).await.first() {
                    Some(candidate) => ResolvedLocation {
                        location: CityDirectory::select(candidate),
                        tier: LocationTier::Manual,
                    },
                    None => pipeline.resolver.resolve().await,
                },
                None => pipeline.resolver.resolve().await,
            };
            let _ = tx2.send(AppEvent::LocationResolved(resolved)).await;
        });
    }

    /// Issues a new AQI request. Deliberately not deduplicated: each trigger
    /// bumps the generation, so an older in-flight result is discarded on
    /// arrival.
    fn start_aqi_fetch(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(location) = self.location.clone() else {
            return;
        };
        self.aqi_generation += 1;
        self.aqi_pending = true;
        self.refreshing = true;
        self.loading_message = "Fetching air quality...".to_string();

        let generation = self.aqi_generation;
        let pipeline = Arc::clone(&self.pipeline);
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let reading = pipeline.air.fetch_current(&location).await;
            let _ = tx2
                .send(AppEvent::AqiFetched {
                    generation,
                    reading,
                })
                .await;
        });
    }

    fn start_forecast_fetch(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let Some(location) = self.location.clone() else {
            return;
        };
        self.forecast_generation += 1;
        self.forecast_pending = true;

        let generation = self.forecast_generation;
        let current_aqi = self.reading.as_ref().map(|r| r.aqi);
        let pipeline = Arc::clone(&self.pipeline);
        let tx2 = tx.clone();
        tokio::spawn(async move {
            let days = pipeline.forecast.fetch_forecast(&location, current_aqi).await;
            let _ = tx2
                .send(AppEvent::ForecastFetched { generation, days })
                .await;
        });
    }
}
