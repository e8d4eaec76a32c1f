// storefront/src/web/handlers/line_event_handlers.rs

//! JSON endpoint for script-driven line editors: the browser forwards
//! every field event and re-renders from the returned view.

use actix_web::{web, HttpResponse};
use kasse::{CommitTrigger, Key, KeyOutcome, LineId, LineView};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extract::{region_from_parts, Shopper};

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LineEvent {
  Focus,
  KeyPress { key: Key },
  Input { value: String },
  Commit { trigger: CommitTrigger },
  Remove,
}

#[derive(Deserialize, Debug)]
pub struct RegionQuery {
  pub channel: Option<String>,
  pub locale: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct LineEventResponse {
  pub line: LineView,
  /// Key, commit or removal outcome; `null` for events without one. Enter
  /// commits, so its outcome is the commit's.
  pub outcome: Value,
}

#[instrument(
    name = "handler::line_event",
    skip(app_state, path, query, event, shopper),
    fields(line_id = %path.as_str())
)]
pub async fn line_event_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  query: web::Query<RegionQuery>,
  event: web::Json<LineEvent>,
  shopper: Shopper,
) -> Result<HttpResponse, AppError> {
  let config = &app_state.config;
  let region = region_from_parts(
    query.channel.as_deref().unwrap_or(&config.default_channel),
    query.locale.as_deref().unwrap_or(&config.default_locale),
  )?;
  let session = app_state
    .sessions
    .open(region, shopper.token.clone(), shopper.engine)
    .await?;
  let line_id = LineId::new(path.into_inner());
  let editor = session
    .editor(&line_id, shopper.engine)?
    .ok_or_else(|| AppError::NotFound(format!("Line '{}' is not in the cart", line_id)))?;

  let event = event.into_inner();
  debug!(?event, "Applying line event.");
  let outcome = match event {
    LineEvent::Focus => {
      editor.focus();
      Ok(Value::Null)
    }
    LineEvent::KeyPress { key } => match editor.key_press(key) {
      KeyOutcome::Commit => serde_json::to_value(editor.commit(CommitTrigger::Enter).await?),
      other => serde_json::to_value(other),
    },
    LineEvent::Input { value } => {
      editor.input(&value);
      Ok(Value::Null)
    }
    LineEvent::Commit { trigger } => serde_json::to_value(editor.commit(trigger).await?),
    LineEvent::Remove => serde_json::to_value(editor.remove().await?),
  }
  .map_err(|e| AppError::Internal(format!("Could not encode outcome: {}", e)))?;

  Ok(HttpResponse::Ok().json(LineEventResponse {
    line: editor.view(),
    outcome,
  }))
}
