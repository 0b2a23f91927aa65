use anyhow::Result;
use sheetcal_core::remote::CalendarEvent;
use sheetcal_core::remote::protocol::ListEvents;

use super::open_store;

pub async fn handle(cmd: ListEvents) -> Result<Vec<CalendarEvent>> {
    let store = open_store(&cmd.remote_config).await?;
    Ok(store.events(&cmd.calendar_id, cmd.from, cmd.to))
}
