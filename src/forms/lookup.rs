//! Entity lookups
//!
//! Cached fetches of a single item, prospect or quotation, used to prefill
//! form fields. A failed request raises the fetcher's error notice; the form
//! is left as it was.

use std::sync::Arc;

use tracing::{debug, info};

use crate::context::CrmContext;
use crate::error::Result;
use crate::fetch::{CachedFetcher, RequestOptions};
use crate::models::{
    ItemLookup, ItemRecord, ProspectLookup, ProspectRecord, QuotationHeader, QuotationLookup,
};
use crate::notify::{Notice, Notifier};

use super::{ContactFields, LineRow};

pub const ITEM_ENDPOINT: &str = "/api/get-item/";
pub const PROSPECT_ENDPOINT: &str = "/api/get-prospect/";
pub const QUOTATION_ENDPOINT: &str = "/api/get-quotation/";

const QUOTATION_NOT_FOUND: &str = "Quotation not found";
const QUOTATION_LOAD_FAILED: &str = "Failed to load quotation";

/// A quotation ready to be copied into a sales order form.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedQuotation {
    pub header: QuotationHeader,
    pub rows: Vec<LineRow>,
}

#[derive(Clone)]
pub struct Lookups {
    fetcher: CachedFetcher,
    notifier: Arc<dyn Notifier>,
}

impl Lookups {
    pub fn new(ctx: &CrmContext) -> Self {
        Self {
            fetcher: ctx.fetcher().clone(),
            notifier: Arc::clone(ctx.notifier()),
        }
    }

    /// Item master record for `code`, cached under `item:{code}`.
    pub async fn item(&self, code: &str) -> Result<Option<ItemRecord>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let key = format!("item:{}", code);
        let options = RequestOptions::get().query("item_code", code);
        let lookup: ItemLookup = self.fetcher.fetch_json(ITEM_ENDPOINT, Some(&key), &options).await?;

        Ok(lookup.item.filter(|_| lookup.success))
    }

    /// Prospect named `name`, cached under `prospect:{name}`.
    pub async fn prospect(&self, name: &str) -> Result<Option<ProspectRecord>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let key = format!("prospect:{}", name);
        let options = RequestOptions::get().query("name", name);
        let lookup: ProspectLookup = self
            .fetcher
            .fetch_json(PROSPECT_ENDPOINT, Some(&key), &options)
            .await?;

        Ok(lookup.prospect.filter(|_| lookup.success))
    }

    /// Quotation `number` with its lines, cached under `quotation:{number}`.
    pub async fn quotation(&self, number: &str) -> Result<Option<QuotationLookup>> {
        self.fetch_quotation(number, RequestOptions::get()).await
    }

    async fn fetch_quotation(
        &self,
        number: &str,
        options: RequestOptions,
    ) -> Result<Option<QuotationLookup>> {
        let number = number.trim();
        if number.is_empty() {
            return Ok(None);
        }

        let key = format!("quotation:{}", number);
        let options = options.query("quote_number", number);
        let lookup: QuotationLookup = self
            .fetcher
            .fetch_json(QUOTATION_ENDPOINT, Some(&key), &options)
            .await?;

        Ok((lookup.success && lookup.quotation.is_some()).then_some(lookup))
    }

    // == Form fill ==
    /// Looks up the row's item code and fills the row's empty fields.
    /// Returns whether the row changed; lookup failures leave it untouched.
    pub async fn fill_row(&self, row: &mut LineRow) -> bool {
        match self.item(&row.item_code).await {
            Ok(Some(item)) => row.fill_from_item(&item),
            Ok(None) => false,
            Err(err) => {
                debug!(item_code = %row.item_code, error = %err, "item lookup failed");
                false
            }
        }
    }

    /// Looks up `prospect_name` and fills the empty contact fields.
    pub async fn fill_contact(&self, contact: &mut ContactFields, prospect_name: &str) -> bool {
        match self.prospect(prospect_name).await {
            Ok(Some(prospect)) => contact.fill_from_prospect(&prospect),
            Ok(None) => false,
            Err(err) => {
                debug!(prospect = %prospect_name, error = %err, "prospect lookup failed");
                false
            }
        }
    }

    /// Loads quotation `number` for conversion into a sales order.
    ///
    /// Announces the outcome: `Loaded quotation {n}!`, `Quotation not found`
    /// or `Failed to load quotation`. Blank input does nothing.
    pub async fn load_quotation(&self, number: &str) -> Result<Option<LoadedQuotation>> {
        let number = number.trim();
        if number.is_empty() {
            return Ok(None);
        }

        let lookup = match self.fetch_quotation(number, RequestOptions::get().quiet()).await {
            Ok(lookup) => lookup,
            Err(err) => {
                self.notifier.notify(Notice::error(QUOTATION_LOAD_FAILED));
                return Err(err);
            }
        };

        let Some(QuotationLookup {
            quotation: Some(header),
            items,
            ..
        }) = lookup
        else {
            self.notifier.notify(Notice::error(QUOTATION_NOT_FOUND));
            return Ok(None);
        };

        let rows: Vec<LineRow> = items.iter().map(LineRow::from).collect();
        info!(quote_number = %header.quote_number, rows = rows.len(), "quotation loaded");
        self.notifier
            .notify(Notice::success(format!("Loaded quotation {}!", number)));
        Ok(Some(LoadedQuotation { header, rows }))
    }
}
