use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use rand::Rng;
use tokio::time::sleep;

use crate::domain::aqi::{AirQualityReading, CityCandidate, ForecastPoint, ResolvedLocation};

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    TickRefresh,
    Input(Event),
    LocationResolved(ResolvedLocation),
    /// Result of an AQI fetch; applied only when `generation` still matches
    /// the latest issued request.
    AqiFetched {
        generation: u64,
        reading: AirQualityReading,
    },
    ForecastFetched {
        generation: u64,
        days: Vec<ForecastPoint>,
    },
    SearchResults {
        seq: u64,
        results: Vec<CityCandidate>,
    },
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

pub fn start_refresh_task(tx: tokio::sync::mpsc::Sender<AppEvent>, refresh_secs: u64) {
    tokio::spawn(async move {
        let base = refresh_secs.max(10);
        loop {
            let wait_secs = {
                let mut rng = rand::rng();
                let jitter = rng.random_range(-0.1f32..0.1f32);
                ((base as f32) * (1.0 + jitter)).max(1.0)
            };
            sleep(Duration::from_secs_f32(wait_secs)).await;
            if tx.send(AppEvent::TickRefresh).await.is_err() {
                break;
            }
        }
    });
}
