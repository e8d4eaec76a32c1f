// kasse/src/api/documents.rs

//! GraphQL documents sent by `GraphQlClient`.

const CHECKOUT_DETAILS_FRAGMENT: &str = r#"
fragment MoneyDetails on Money { amount currency }

fragment CheckoutLineDetails on CheckoutLine {
  id
  quantity
  totalPrice { gross { ...MoneyDetails } }
  variant {
    id
    name
    translation(languageCode: $locale) { name }
    product {
      id
      name
      slug
      thumbnail { url alt }
      translation(languageCode: $locale) { name }
    }
  }
}

fragment CheckoutDetails on Checkout {
  token
  lines { ...CheckoutLineDetails }
  subtotalPrice { gross { ...MoneyDetails } net { ...MoneyDetails } }
  totalPrice { gross { ...MoneyDetails } net { ...MoneyDetails } }
}

fragment ErrorDetails on CheckoutError { field message code }
"#;

const PRODUCT_CARD_FRAGMENT: &str = r#"
fragment MoneyDetails on Money { amount currency }

fragment ProductCard on Product {
  id
  name
  slug
  thumbnail { url alt }
  category { name }
  pricing { priceRange { start { gross { ...MoneyDetails } } } }
  translation(languageCode: $locale) { name }
}
"#;

pub(crate) fn checkout_by_token() -> String {
  format!(
    r#"query CheckoutByToken($token: UUID!, $locale: LanguageCodeEnum!) {{
  checkout(token: $token) {{ ...CheckoutDetails }}
}}
{CHECKOUT_DETAILS_FRAGMENT}"#
  )
}

pub(crate) fn checkout_line_update() -> String {
  format!(
    r#"mutation CheckoutLineUpdate($token: UUID, $lines: [CheckoutLineUpdateInput!]!, $locale: LanguageCodeEnum!) {{
  checkoutLinesUpdate(token: $token, lines: $lines) {{
    checkout {{ ...CheckoutDetails }}
    errors {{ ...ErrorDetails }}
  }}
}}
{CHECKOUT_DETAILS_FRAGMENT}"#
  )
}

pub(crate) fn remove_product_from_checkout() -> String {
  format!(
    r#"mutation RemoveProductFromCheckout($checkoutToken: UUID!, $lineId: ID!, $locale: LanguageCodeEnum!) {{
  checkoutLineDelete(token: $checkoutToken, lineId: $lineId) {{
    checkout {{ ...CheckoutDetails }}
    errors {{ ...ErrorDetails }}
  }}
}}
{CHECKOUT_DETAILS_FRAGMENT}"#
  )
}

pub(crate) fn create_checkout() -> String {
  format!(
    r#"mutation CreateCheckout($channel: String!, $lines: [CheckoutLineInput!]!, $locale: LanguageCodeEnum!) {{
  checkoutCreate(input: {{ channel: $channel, lines: $lines }}) {{
    checkout {{ ...CheckoutDetails }}
    errors {{ ...ErrorDetails }}
  }}
}}
{CHECKOUT_DETAILS_FRAGMENT}"#
  )
}

pub(crate) fn checkout_add_product_line() -> String {
  format!(
    r#"mutation CheckoutAddProductLine($checkoutToken: UUID!, $lines: [CheckoutLineInput!]!, $locale: LanguageCodeEnum!) {{
  checkoutLinesAdd(token: $checkoutToken, lines: $lines) {{
    checkout {{ ...CheckoutDetails }}
    errors {{ ...ErrorDetails }}
  }}
}}
{CHECKOUT_DETAILS_FRAGMENT}"#
  )
}

pub(crate) fn product_collection() -> String {
  format!(
    r#"query ProductCollection($first: Int!, $after: String, $channel: String!, $locale: LanguageCodeEnum!, $filter: ProductFilterInput, $sortBy: ProductOrder) {{
  products(first: $first, after: $after, channel: $channel, filter: $filter, sortBy: $sortBy) {{
    totalCount
    edges {{ node {{ ...ProductCard }} }}
    pageInfo {{ hasNextPage endCursor }}
  }}
}}
{PRODUCT_CARD_FRAGMENT}"#
  )
}

pub(crate) fn product_by_slug() -> String {
  r#"query ProductBySlug($slug: String!, $channel: String!, $locale: LanguageCodeEnum!) {
  product(slug: $slug, channel: $channel) {
    id
    name
    slug
    description
    thumbnail { url alt }
    category { name }
    translation(languageCode: $locale) { name description }
    variants {
      id
      name
      quantityAvailable
      translation(languageCode: $locale) { name }
      pricing { price { gross { amount currency } } }
    }
  }
}"#
    .to_string()
}

pub(crate) fn collection_by_slug() -> String {
  r#"query CollectionBySlug($slug: String!, $channel: String!, $locale: LanguageCodeEnum!) {
  collection(slug: $slug, channel: $channel) {
    id
    name
    slug
    description
    translation(languageCode: $locale) { name description }
  }
}"#
    .to_string()
}

pub(crate) fn category_by_slug() -> String {
  r#"query CategoryBySlug($slug: String!, $locale: LanguageCodeEnum!) {
  category(slug: $slug) {
    id
    name
    slug
    description
    translation(languageCode: $locale) { name description }
  }
}"#
    .to_string()
}

pub(crate) fn menu_by_slug() -> String {
  r#"query MenuBySlug($slug: String!, $channel: String!, $locale: LanguageCodeEnum!) {
  menu(slug: $slug, channel: $channel) {
    id
    name
    items {
      id
      name
      translation(languageCode: $locale) { name }
      collection { id name slug translation(languageCode: $locale) { name } }
      category { id name slug translation(languageCode: $locale) { name } }
    }
  }
}"#
    .to_string()
}
