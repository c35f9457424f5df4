//! Request and Response models for the CRM JSON API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::BulkActionRequest;
pub use responses::{
    DashboardMetrics, ItemLookup, ItemRecord, ListResponse, ProspectLookup, ProspectRecord,
    QuotationHeader, QuotationLine, QuotationLookup, StageCount,
};
