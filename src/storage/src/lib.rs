// Copyright 2025 Stratus Cloud Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Stratus Cloud Client Libraries for Rust - Storage
//!
//! This crate contains traits, types, and functions to interact with the
//! Stratus Object Store. Most applications will start with
//! [Storage][client::Storage], then navigate the service through the
//! immutable [Blob] and [Bucket] handles:
//!
//! ```no_run
//! # tokio_test::block_on(async {
//! use stratus_storage::client::Storage;
//! use stratus_storage::model::BlobId;
//! let client = Storage::builder().build().await?;
//! let blob = client.get_blob(BlobId::new("my-bucket", "my-object"), vec![]).await?;
//! if let Some(blob) = blob {
//!     println!("found {} with generation {}", blob.id(), blob.info().generation);
//! }
//! # stratus_storage::Result::<()>::Ok(()) });
//! ```
//!
//! Handles are immutable: operations that modify a resource, like
//! [Blob::update] or [Blob::copy_to], return a new handle. To get a handle
//! with the most recent metadata use [Blob::reload].
//!
//! Independent operations on many blobs can be combined into a single
//! [batch::BatchRequest] with per-item outcomes, either through the
//! convenience methods ([client::Storage::get_blobs] and friends) or by
//! building and submitting the request directly.

pub use gax::Result;
pub use gax::error::Error;

/// Per-item request batching and outcome correlation.
pub mod batch;
/// The `Storage` client and its builder.
pub mod client;
/// Custom errors for the storage client.
pub mod error;
/// Resource identifiers and metadata snapshots.
pub mod model;
/// Precondition options and their per-context conversions.
pub mod options;
/// The service trait implemented by transports and test mocks.
pub mod stub;

mod blob;
mod bucket;
mod transport;

pub use blob::Blob;
pub use bucket::Bucket;
