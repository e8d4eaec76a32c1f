// kasse/src/editor/render.rs

//! HTML for a line editor. Markup only; styling is someone else's job.

use crate::editor::state::LineView;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use std::fmt::Write;

/// Where the rendered controls post to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineActions {
  pub quantity_url: String,
  pub remove_url: String,
  pub product_url: Option<String>,
}

/// Renders one line: thumbnail, names, the quantity input, the delete
/// control, inline errors and the gross total.
pub fn render_line(view: &LineView, actions: &LineActions) -> String {
  let mut html = String::with_capacity(1024);
  let invalid = !view.errors.is_empty();

  let _ = write!(html, r#"<li class="line-item" data-line-id="{}">"#, attr(view.line_id.as_str()));

  if let Some(url) = &view.thumbnail_url {
    let _ = write!(
      html,
      r#"<img class="line-item__thumbnail" src="{}" alt="{}">"#,
      attr(url),
      attr(&view.thumbnail_alt)
    );
  }

  html.push_str(r#"<div class="line-item__details"><h3>"#);
  match &actions.product_url {
    Some(url) => {
      let _ = write!(html, r#"<a href="{}">{}</a>"#, attr(url), text(&view.product_name));
    }
    None => html.push_str(&text(&view.product_name)),
  }
  let _ = write!(html, "</h3><h4>{}</h4>", text(&view.variant_name));

  let _ = write!(
    html,
    r#"<form method="post" action="{}"><button type="submit" class="line-item__remove">Remove</button></form>"#,
    attr(&actions.remove_url)
  );

  if invalid || view.notice.is_some() {
    html.push_str(r#"<div class="line-item__errors">"#);
    for error in &view.errors {
      let _ = write!(
        html,
        r#"<span class="error" data-field="{}">{}</span>"#,
        attr(error.field_key()),
        text(&error.message)
      );
    }
    if let Some(notice) = &view.notice {
      let _ = write!(html, r#"<span class="notice">{}</span>"#, text(notice));
    }
    html.push_str("</div>");
  }
  html.push_str("</div>");

  let _ = write!(
    html,
    r#"<form method="post" action="{}" class="line-item__quantity"><input type="hidden" name="trigger" value="enter"><input type="number" name="quantity" class="{}" value="{}" min="1" step="1" required{}></form>"#,
    attr(&actions.quantity_url),
    if invalid { "quantity quantity--invalid" } else { "quantity" },
    attr(&view.field),
    if view.disabled { " disabled" } else { "" }
  );

  let _ = write!(html, r#"<p class="line-item__total">{}</p></li>"#, text(&view.total));
  html
}
