//! List calendars held in the local file, with their stored access roles.

use anyhow::Result;
use sheetcal_core::remote::CalendarListing;
use sheetcal_core::remote::protocol::ListCalendars;

use super::open_store;

pub async fn handle(cmd: ListCalendars) -> Result<Vec<CalendarListing>> {
    let store = open_store(&cmd.remote_config).await?;
    Ok(store.calendars(cmd.max_results))
}
