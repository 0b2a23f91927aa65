//! sheetcal-provider-local - JSON file provider for sheetcal
//!
//! This binary implements the sheetcal provider protocol, communicating
//! with sheetcal via JSON over stdin/stdout.
//!
//! Calendars and events live in a single JSON file, by default
//!   ~/.local/share/sheetcal/local.json
//! (override with `local_path` under `[remote]`).

mod commands;
mod remote_config;
mod store;

use std::future::Future;
use std::io::{self, BufRead, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;
use sheetcal_core::remote::protocol::{Command, Request, Response};

use crate::store::EventMissing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read stdin: {}", e);
                break;
            }
        };

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::<()>::error(&format!("Failed to parse request: {}", e)),
        };

        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }

    Ok(())
}

async fn handle_request(request: Request) -> String {
    let params = request.params;
    match request.command {
        Command::ListCalendars => dispatch(params, commands::list_calendars::handle).await,
        Command::ListEvents => dispatch(params, commands::list_events::handle).await,
        Command::CreateEvent => dispatch(params, commands::create_event::handle).await,
        Command::GetEvent => dispatch(params, commands::get_event::handle).await,
        Command::SetTitle => dispatch(params, commands::set_title::handle).await,
        Command::SetInterval => dispatch(params, commands::set_interval::handle).await,
    }
}

/// Parse params into the command type, run the handler and encode the reply.
async fn dispatch<C, R, F, Fut>(params: serde_json::Value, handler: F) -> String
where
    C: DeserializeOwned,
    R: Serialize,
    F: FnOnce(C) -> Fut,
    Fut: Future<Output = anyhow::Result<R>>,
{
    let cmd: C = match serde_json::from_value(params) {
        Ok(cmd) => cmd,
        Err(e) => return Response::<()>::error(&format!("Invalid params: {}", e)),
    };

    match handler(cmd).await {
        Ok(data) => Response::success(data),
        Err(e) if e.downcast_ref::<EventMissing>().is_some() => {
            Response::<()>::not_found(&format!("{:#}", e))
        }
        Err(e) => Response::<()>::error(&format!("{:#}", e)),
    }
}
