//! Precomputed pages. One dataset fetch renders every static page. Past the
//! revalidation interval the old snapshot keeps answering while a background
//! task renders its replacement.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

use crate::data::country::{CountryRecord, EnrichedHoliday};
use crate::data::loader::{load, LoadError};
use crate::data::source::DatasetSource;
use crate::data::transform::{flatten_all, flatten_by_year, list_years, sort_countries_by_name};
use crate::server::render;

pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(600);

/// Every path that gets prerendered for this dataset, in a stable order.
pub fn static_paths(countries: &[CountryRecord]) -> Vec<String> {
    let mut paths = vec!["/countries".to_string(), "/holidays".to_string()];
    paths.extend(countries.iter().map(|country| format!("/countries/{}", country.id)));
    paths.extend(
        list_years(countries)
            .into_iter()
            .map(|year| format!("/holidays/{year}")),
    );
    paths
}

#[derive(Debug)]
pub struct SiteSnapshot {
    pages: HashMap<String, String>,
    all_holidays: Vec<EnrichedHoliday>,
    years: Vec<i32>,
    generated_at: Instant,
}

impl SiteSnapshot {
    pub fn render(countries: &[CountryRecord]) -> Self {
        let years = list_years(countries);
        let all_holidays = flatten_all(countries);
        let by_name = sort_countries_by_name(countries);

        let mut pages = HashMap::new();
        pages.insert("/countries".to_string(), render::country_index_page(&by_name));
        pages.insert(
            "/holidays".to_string(),
            render::all_holidays_page(&all_holidays, &years, ""),
        );
        for country in countries {
            // first record wins for a duplicated id, same as lookup
            pages
                .entry(format!("/countries/{}", country.id))
                .or_insert_with(|| render::country_detail_page(country));
        }
        for year in &years {
            pages.insert(
                format!("/holidays/{year}"),
                render::holidays_by_year_page(*year, &flatten_by_year(countries, *year)),
            );
        }

        Self {
            pages,
            all_holidays,
            years,
            generated_at: Instant::now(),
        }
    }

    pub fn page(&self, path: &str) -> Option<&str> {
        self.pages.get(path).map(String::as_str)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// `/holidays` with a search already applied, for clients without script.
    pub fn search_page(&self, query: &str) -> String {
        render::all_holidays_page(&self.all_holidays, &self.years, query)
    }

    fn is_fresh(&self, revalidate: Duration) -> bool {
        self.generated_at.elapsed() < revalidate
    }
}

/// Cheap to clone; clones share the snapshot and the regeneration guard.
#[derive(Clone)]
pub struct PageStore {
    source: Arc<dyn DatasetSource>,
    revalidate: Duration,
    snapshot: Arc<RwLock<Option<Arc<SiteSnapshot>>>>,
    regenerating: Arc<Mutex<()>>,
}

impl PageStore {
    pub fn new(source: Arc<dyn DatasetSource>, revalidate: Duration) -> Self {
        Self {
            source,
            revalidate,
            snapshot: Arc::new(RwLock::new(None)),
            regenerating: Arc::new(Mutex::new(())),
        }
    }

    /// Current snapshot. A stale one is returned as-is while a single
    /// background task regenerates it; only a store that never rendered
    /// waits on the fetch.
    pub async fn snapshot(&self) -> Result<Arc<SiteSnapshot>, LoadError> {
        let current = self.snapshot.read().await.clone();
        match current {
            Some(snapshot) if snapshot.is_fresh(self.revalidate) => Ok(snapshot),
            Some(stale) => {
                self.spawn_regeneration();
                Ok(stale)
            }
            None => self.first_render().await,
        }
    }

    /// Render everything up front so the first visitor does not wait on the fetch.
    pub async fn warm(&self) -> Result<usize, LoadError> {
        self.snapshot().await.map(|snapshot| snapshot.page_count())
    }

    async fn first_render(&self) -> Result<Arc<SiteSnapshot>, LoadError> {
        let _guard = self.regenerating.lock().await;
        if let Some(rendered) = self.snapshot.read().await.clone() {
            return Ok(rendered);
        }
        self.regenerate().await
    }

    fn spawn_regeneration(&self) {
        let Ok(guard) = Arc::clone(&self.regenerating).try_lock_owned() else {
            return;
        };
        let store = self.clone();
        tokio::spawn(async move {
            let _guard = guard;
            if let Err(err) = store.regenerate().await {
                tracing::warn!(error = %err, "page regeneration failed, serving stale pages");
            }
        });
    }

    async fn regenerate(&self) -> Result<Arc<SiteSnapshot>, LoadError> {
        let countries = load(self.source.as_ref()).await?;
        let snapshot = Arc::new(SiteSnapshot::render(&countries));
        tracing::info!(
            pages = snapshot.page_count(),
            countries = countries.len(),
            "regenerated static pages"
        );
        *self.snapshot.write().await = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }
}
