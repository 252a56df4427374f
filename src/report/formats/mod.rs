// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

pub mod csv;
pub mod document;

pub use csv::CsvExporter;
pub use document::{DocumentRenderer, Page, RenderedDocument};
