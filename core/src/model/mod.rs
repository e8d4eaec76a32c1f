// kasse/src/model/mod.rs

//! Data returned by, and sent to, the commerce API.

pub mod checkout;
pub mod money;
pub mod product;
pub mod region;

pub use checkout::{
  CheckoutLine, CheckoutLineInput, CheckoutSession, CheckoutToken, Image, LineId, LineProduct, LinesMutationPayload,
  MutationError, ProductId, ProductVariant, Translation, VariantId,
};
pub use money::{Money, TaxedMoney};
pub use product::{
  CategoryRef, Menu, MenuItem, MenuTarget, OrderDirection, PageInfo, ProductCard, ProductCollectionQuery, ProductDetails,
  ProductFilter, ProductGroup, ProductOrder, ProductOrderField, ProductPage,
};
pub use region::Region;
