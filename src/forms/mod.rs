//! Forms
//!
//! Validation, entity lookups with fill-only-empty semantics, line-item
//! totals and draft auto-save for the quotation, sales order and lead forms.

mod drafts;
mod lookup;
mod rows;
mod validation;

pub use drafts::{draft_key, AutoSaver, DraftStore, FormDraft};
pub use lookup::{LoadedQuotation, Lookups, ITEM_ENDPOINT, PROSPECT_ENDPOINT, QUOTATION_ENDPOINT};
pub use rows::{form_totals, ContactFields, FormTotals, LineRow};
pub use validation::{
    is_valid_email, is_valid_phone, validate_line_items, FieldKind, FieldRule, FormData,
    FormValidator, EMAIL_MESSAGE, FORM_ERRORS_MESSAGE, LINE_ITEMS_MESSAGE, PHONE_MESSAGE, REQUIRED_MESSAGE,
};
