use anyhow::Result;
use sheetcal_core::remote::CalendarEvent;
use sheetcal_core::remote::protocol::GetEvent;

use super::open_store;

pub async fn handle(cmd: GetEvent) -> Result<CalendarEvent> {
    let store = open_store(&cmd.remote_config).await?;
    store.event(&cmd.event_id)
}
