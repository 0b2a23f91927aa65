//! Calendar name → id lookup for calendars the caller owns.

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::constants::CALENDAR_PAGE_SIZE;
use crate::error::{SheetCalError, SheetCalResult};
use crate::remote::{AccessRole, CalendarDirectoryService};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEntry {
    pub name: String,
    pub id: String,
}

/// Owned calendars, fetched from the directory service at most once.
///
/// Build one per run. Concurrent first callers share a single fetch; later
/// callers read the cached list. Nothing invalidates it.
pub struct CalendarDirectory<'a, D> {
    service: &'a D,
    cache: OnceCell<Vec<CalendarEntry>>,
}

impl<'a, D: CalendarDirectoryService> CalendarDirectory<'a, D> {
    pub fn new(service: &'a D) -> Self {
        CalendarDirectory {
            service,
            cache: OnceCell::new(),
        }
    }

    /// Calendars whose access role is `owner`, in listing order.
    pub async fn list(&self) -> SheetCalResult<&[CalendarEntry]> {
        let entries = self
            .cache
            .get_or_try_init(|| async {
                let listings = self.service.list_calendars(CALENDAR_PAGE_SIZE).await?;
                if listings.len() >= CALENDAR_PAGE_SIZE as usize {
                    warn!(
                        page_size = CALENDAR_PAGE_SIZE,
                        "Calendar list filled a whole page; calendars beyond it are not visible"
                    );
                }

                let owned: Vec<CalendarEntry> = listings
                    .into_iter()
                    .filter(|c| c.access_role == AccessRole::Owner)
                    .map(|c| CalendarEntry {
                        name: c.name,
                        id: c.id,
                    })
                    .collect();
                debug!(count = owned.len(), "Loaded owned calendars");
                Ok::<_, SheetCalError>(owned)
            })
            .await?;

        Ok(entries.as_slice())
    }

    pub async fn names(&self) -> SheetCalResult<Vec<String>> {
        Ok(self.list().await?.iter().map(|c| c.name.clone()).collect())
    }

    /// Id of the owned calendar named exactly `name`.
    ///
    /// Fails with `CalendarNotFound` when nothing matches and with
    /// `AmbiguousCalendar` when more than one calendar has that name.
    pub async fn resolve_id(&self, name: &str) -> SheetCalResult<&str> {
        let mut matches = self.list().await?.iter().filter(|c| c.name == name);

        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry.id.as_str()),
            (Some(_), Some(_)) => Err(SheetCalError::AmbiguousCalendar(name.to_string())),
            (None, _) => Err(SheetCalError::CalendarNotFound(name.to_string())),
        }
    }
}
