//! Create an event. Ids are random UUIDs.

use anyhow::Result;
use sheetcal_core::remote::CalendarEvent;
use sheetcal_core::remote::protocol::CreateEvent;

use super::open_store;

pub async fn handle(cmd: CreateEvent) -> Result<CalendarEvent> {
    let mut store = open_store(&cmd.remote_config).await?;
    store
        .create_event(&cmd.calendar_id, &cmd.title, cmd.start, cmd.end)
        .await
}
