// storefront/src/pages.rs

//! Server-rendered HTML for the storefront pages. Markup only.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use kasse::editor::{render_line, LineActions};
use kasse::model::{OrderDirection, ProductCard, ProductDetails, ProductGroup, ProductOrderField};
use kasse::{CheckoutSession, LineView, Region};
use std::fmt::Write;

use crate::web::extract::region_prefix;

pub const NO_PRODUCTS: &str = "No products";
pub const EMPTY_CART: &str = "Your cart is empty.";

/// Wraps `body` in the document shell with the site navigation.
pub fn layout(title: &str, region: &Region, body: &str) -> String {
  layout_with_head(title, region, "", body)
}

fn layout_with_head(title: &str, region: &Region, head: &str, body: &str) -> String {
  let prefix = region_prefix(region);
  format!(
    r#"<!DOCTYPE html>
<html lang="{lang}">
<head><meta charset="utf-8"><title>{title}</title>{head}</head>
<body>
<nav class="navbar"><a href="{prefix}/products">Products</a> <a href="{prefix}/cart">Cart</a></nav>
<main>
{body}
</main>
</body>
</html>"#,
    lang = attr(&region.locale),
    title = text(title),
    prefix = attr(&prefix),
  )
}

/// A page that shows a spinner and reloads itself until the checkout has
/// resolved.
pub fn spinner_page(title: &str, region: &Region) -> String {
  layout_with_head(
    title,
    region,
    r#"<meta http-equiv="refresh" content="1">"#,
    r#"<div class="spinner" role="status" aria-live="polite">Loading…</div>"#,
  )
}

fn line_actions(region: &Region, view: &LineView) -> LineActions {
  let prefix = region_prefix(region);
  LineActions {
    quantity_url: format!("{}/cart/lines/{}/quantity", prefix, view.line_id),
    remove_url: format!("{}/cart/lines/{}/remove", prefix, view.line_id),
    product_url: view
      .product_slug
      .as_ref()
      .map(|slug| format!("{}/products/{}", prefix, slug)),
  }
}

fn totals(checkout: &CheckoutSession) -> String {
  let mut html = String::from(r#"<dl class="cart-totals">"#);
  if let Some(subtotal) = &checkout.subtotal_price {
    let _ = write!(html, "<dt>Subtotal</dt><dd>{}</dd>", text(&subtotal.gross.format()));
  }
  if let Some(total) = &checkout.total_price {
    let _ = write!(html, "<dt>Total</dt><dd>{}</dd>", text(&total.gross.format()));
  }
  html.push_str("</dl>");
  html
}

/// The cart: one editable row per line, totals, and the way to checkout.
pub fn cart_page(region: &Region, checkout: Option<&CheckoutSession>, views: &[LineView]) -> String {
  let mut body = String::from("<h1>Your cart</h1>");
  if views.is_empty() {
    let _ = write!(body, r#"<p class="cart-empty">{}</p>"#, text(EMPTY_CART));
    return layout("Cart", region, &body);
  }

  body.push_str(r#"<ul class="cart-lines">"#);
  for view in views {
    body.push_str(&render_line(view, &line_actions(region, view)));
  }
  body.push_str("</ul>");

  if let Some(checkout) = checkout {
    body.push_str(&totals(checkout));
  }
  let _ = write!(
    body,
    r#"<a class="checkout-link" href="{}/checkout">Checkout</a>"#,
    attr(&region_prefix(region))
  );
  layout("Cart", region, &body)
}

/// Read-only order summary shown next to the checkout form.
pub fn checkout_page(region: &Region, checkout: &CheckoutSession) -> String {
  let mut body = String::from(r#"<h1>Checkout</h1><section class="checkout-sidebar"><ul>"#);
  for line in &checkout.lines {
    let product = line
      .variant
      .product
      .as_ref()
      .map(|p| p.display_name())
      .unwrap_or_default();
    let _ = write!(
      body,
      r#"<li data-line-id="{}"><span class="name">{}</span> <span class="variant">{}</span> × <span class="quantity">{}</span> <span class="total">{}</span></li>"#,
      attr(line.id.as_str()),
      text(product),
      text(line.variant.display_name()),
      line.quantity,
      text(&line.total_price.gross.format()),
    );
  }
  body.push_str("</ul>");
  body.push_str(&totals(checkout));
  body.push_str("</section>");
  layout("Checkout", region, &body)
}

fn product_card(region: &Region, product: &ProductCard) -> String {
  let mut html = String::from(r#"<li class="product-card">"#);
  let _ = write!(
    html,
    r#"<a href="{}/products/{}">"#,
    attr(&region_prefix(region)),
    attr(&product.slug)
  );
  if let Some(thumbnail) = &product.thumbnail {
    let _ = write!(
      html,
      r#"<img src="{}" alt="{}">"#,
      attr(&thumbnail.url),
      attr(thumbnail.alt.as_deref().unwrap_or_default())
    );
  }
  let _ = write!(html, "<h2>{}</h2></a>", text(product.display_name()));
  if let Some(category) = &product.category {
    let _ = write!(html, r#"<p class="category">{}</p>"#, text(&category.name));
  }
  if let Some(price) = product.starting_price() {
    let _ = write!(html, r#"<p class="price">{}</p>"#, text(&price.gross.format()));
  }
  html.push_str("</li>");
  html
}

/// A product grid, or the "No products" notice when there is nothing to
/// show. `load_more` is the href of the next page, if there is one.
pub fn product_grid(region: &Region, products: &[ProductCard], load_more: Option<&str>) -> String {
  if products.is_empty() {
    return format!(r#"<p class="no-products">{}</p>"#, text(NO_PRODUCTS));
  }
  let mut html = String::from(r#"<ul class="product-grid">"#);
  for product in products {
    html.push_str(&product_card(region, product));
  }
  html.push_str("</ul>");
  if let Some(href) = load_more {
    let _ = write!(html, r#"<a class="load-more" href="{}">Load more</a>"#, attr(href));
  }
  html
}

fn paragraphs(html: &mut String, paragraphs: &[String]) {
  for paragraph in paragraphs {
    let _ = write!(html, "<p>{}</p>", text(paragraph));
  }
}

/// Title and description of a category or collection.
pub fn group_hero(group: &ProductGroup) -> String {
  let mut html = format!(r#"<header class="page-hero"><h1>{}</h1>"#, text(group.display_name()));
  paragraphs(&mut html, &group.description_paragraphs());
  html.push_str("</header>");
  html
}

pub fn product_list_page(region: &Region, title: &str, hero: Option<&str>, grid: &str) -> String {
  let mut body = String::new();
  match hero {
    Some(hero) => body.push_str(hero),
    None => {
      let _ = write!(body, "<h1>{}</h1>", text(title));
    }
  }
  body.push_str(grid);
  layout(title, region, &body)
}

/// GET form choosing the sort field and direction for the grids below it.
pub fn sort_control(action: &str, field: Option<ProductOrderField>, direction: Option<OrderDirection>) -> String {
  let option = |html: &mut String, value: &str, label: &str, selected: bool| {
    let _ = write!(
      html,
      r#"<option value="{}"{}>{}</option>"#,
      attr(value),
      if selected { " selected" } else { "" },
      text(label)
    );
  };
  let field = field.unwrap_or_default();
  let direction = direction.unwrap_or_default();

  let mut html = format!(r#"<form class="sorter" method="get" action="{}"><label>Sort by "#, attr(action));
  html.push_str(r#"<select name="sort_field">"#);
  option(&mut html, "NAME", "Name", field == ProductOrderField::Name);
  option(&mut html, "PRICE", "Price", field == ProductOrderField::Price);
  html.push_str(r#"</select></label><select name="sort_direction">"#);
  option(&mut html, "ASC", "Ascending", direction == OrderDirection::Asc);
  option(&mut html, "DESC", "Descending", direction == OrderDirection::Desc);
  html.push_str(r#"</select><button type="submit">Sort</button></form>"#);
  html
}

/// One home page block: a menu item's title, its first products and a link
/// to the full listing.
pub fn home_block(region: &Region, title: &str, href: &str, products: &[ProductCard]) -> String {
  let mut html = format!(r#"<section class="home-block"><h2>{}</h2>"#, text(title));
  html.push_str(&product_grid(region, products, None));
  let _ = write!(html, r#"<a class="browse-all" href="{}">Browse all</a></section>"#, attr(href));
  html
}

pub fn home_page(region: &Region, sorter: &str, blocks: &[String]) -> String {
  let mut body = String::from(r#"<section class="headline"><h1>Welcome</h1></section>"#);
  body.push_str(sorter);
  if blocks.is_empty() {
    let _ = write!(body, r#"<p class="no-products">{}</p>"#, text(NO_PRODUCTS));
  }
  for block in blocks {
    body.push_str(block);
  }
  layout("Home", region, &body)
}

/// Product details with the variant picker and the add-to-cart form.
pub fn product_page(region: &Region, product: &ProductDetails, selected: Option<&str>, suggested: &str) -> String {
  let prefix = region_prefix(region);
  let variant = product.selected_variant(selected);
  let mut body = String::from(r#"<article class="product">"#);

  if let Some(thumbnail) = &product.thumbnail {
    let _ = write!(
      body,
      r#"<img class="product-gallery" src="{}" alt="{}">"#,
      attr(&thumbnail.url),
      attr(thumbnail.alt.as_deref().unwrap_or_default())
    );
  }
  let _ = write!(body, "<h1>{}</h1>", text(product.display_name()));
  if let Some(category) = &product.category {
    let _ = write!(body, r#"<p class="category">{}</p>"#, text(&category.name));
  }
  if let Some(price) = variant.and_then(|v| v.pricing.as_ref()).and_then(|p| p.price.as_ref()) {
    let _ = write!(body, r#"<p class="price">{}</p>"#, text(&price.gross.format()));
  }

  if product.variants.len() > 1 {
    body.push_str(r#"<ul class="variant-selector">"#);
    for option in &product.variants {
      let current = variant.map(|v| v.id == option.id).unwrap_or(false);
      let _ = write!(
        body,
        r#"<li><a href="{}/products/{}?variant={}"{}>{}</a></li>"#,
        attr(&prefix),
        attr(&product.slug),
        attr(option.id.as_str()),
        if current { r#" aria-current="true""# } else { "" },
        text(option.display_name()),
      );
    }
    body.push_str("</ul>");
  }

  let sold_out = variant.and_then(|v| v.quantity_available).map(|q| q <= 0).unwrap_or(false);
  let _ = write!(body, r#"<form class="add-to-cart" method="post" action="{}/cart/add">"#, attr(&prefix));
  if let Some(variant) = variant {
    let _ = write!(
      body,
      r#"<input type="hidden" name="variant_id" value="{}">"#,
      attr(variant.id.as_str())
    );
  }
  let disabled = variant.is_none() || sold_out;
  let _ = write!(
    body,
    r#"<input type="number" name="quantity" value="1" min="1" step="1"{d}><button type="submit"{d}>{label}</button></form>"#,
    d = if disabled { " disabled" } else { "" },
    label = if sold_out { "Sold out!" } else { "Add to cart" },
  );
  if variant.is_none() {
    body.push_str(r#"<p class="hint">Please choose a variant.</p>"#);
  }

  body.push_str(r#"<section class="description">"#);
  paragraphs(&mut body, &product.description_paragraphs());
  body.push_str("</section></article>");

  if !suggested.is_empty() {
    let _ = write!(body, r#"<section class="suggested"><h2>You might like</h2>{}</section>"#, suggested);
  }
  layout(product.display_name(), region, &body)
}
