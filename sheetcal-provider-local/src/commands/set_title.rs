use anyhow::Result;
use sheetcal_core::remote::protocol::SetTitle;

use super::open_store;

pub async fn handle(cmd: SetTitle) -> Result<()> {
    let mut store = open_store(&cmd.remote_config).await?;
    store
        .update_event(&cmd.event_id, |event| event.title = cmd.title)
        .await
}
